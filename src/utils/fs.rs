use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use crate::core::{DownloadArtifact, UploadedFile};
use crate::utils::{StudioError, StudioResult, guess_mime_type};

/// Returns the final path component, or the input when there is none
pub fn extract_filename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

/// Reads an image from disk into an [`UploadedFile`].
///
/// The MIME type is guessed from the extension; files that do not look like
/// images are rejected here rather than silently dropped later.
pub async fn load_upload(path: impl AsRef<Path>) -> StudioResult<UploadedFile> {
    let path = path.as_ref();
    let mime_type = guess_mime_type(path).ok_or_else(|| {
        StudioError::validation(format!("Not a recognised image file: {}", path.display()))
    })?;

    let metadata = fs::metadata(path)
        .await
        .map_err(|e| StudioError::io(format!("Cannot read {}: {}", path.display(), e)))?;
    if !metadata.is_file() {
        return Err(StudioError::validation(
            format!("Input path is not a file: {}", path.display())
        ));
    }

    let bytes = fs::read(path)
        .await
        .map_err(|e| StudioError::io(format!("Cannot read {}: {}", path.display(), e)))?;

    let last_modified = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64);

    let name = extract_filename(&path.to_string_lossy()).to_string();
    debug!("Loaded {} ({} bytes, {})", name, bytes.len(), mime_type);

    let file = UploadedFile::new(name, mime_type, bytes);
    Ok(match last_modified {
        Some(millis) => file.with_last_modified(millis),
        None => file,
    })
}

/// Writes a download artifact into `dir`, creating the directory if needed.
pub async fn write_download(dir: impl AsRef<Path>, artifact: &DownloadArtifact) -> StudioResult<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).await?;

    let target = dir.join(&artifact.file_name);
    fs::write(&target, &artifact.bytes).await?;
    debug!("Saved {} ({} bytes)", target.display(), artifact.bytes.len());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_filename() {
        assert_eq!(extract_filename("/photos/shoe.png"), "shoe.png");
        assert_eq!(extract_filename("shoe.png"), "shoe.png");
    }

    #[tokio::test]
    async fn loads_image_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mug.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let file = load_upload(&path).await.unwrap();
        assert_eq!(file.name, "mug.jpg");
        assert_eq!(file.mime_type, "image/jpeg");
        assert_eq!(file.size(), 3);
        assert!(file.last_modified.is_some());
    }

    #[tokio::test]
    async fn rejects_non_image_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readme.md");
        std::fs::write(&path, "hi").unwrap();

        assert!(matches!(load_upload(&path).await, Err(StudioError::Validation(_))));
    }
}
