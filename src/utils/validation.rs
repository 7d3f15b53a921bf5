use tracing::{debug, warn};
use crate::core::UploadedFile;
use crate::utils::{ImageFormat, StudioError, StudioResult, TransformError, is_image_mime};

/// Size guidance shown by the upload surface. Advisory only, never enforced.
pub const ADVISORY_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Validates a single upload before a record is created for it
pub fn validate_upload(file: &UploadedFile) -> StudioResult<()> {
    if !is_image_mime(&file.mime_type) {
        return Err(StudioError::validation(
            format!("Not an image: {} ({})", file.name, file.mime_type)
        ));
    }

    if file.bytes.is_empty() {
        return Err(StudioError::validation(
            format!("File is empty: {}", file.name)
        ));
    }

    if file.size() > ADVISORY_MAX_UPLOAD_BYTES {
        warn!(
            "{} is {:.1} MB, above the {} MB guidance",
            file.name,
            file.size() as f64 / (1024.0 * 1024.0),
            ADVISORY_MAX_UPLOAD_BYTES / (1024 * 1024)
        );
    }

    Ok(())
}

/// Keeps the uploads that pass [`validate_upload`], logging the rest.
pub fn filter_uploads(files: Vec<UploadedFile>) -> Vec<UploadedFile> {
    let offered = files.len();
    let accepted: Vec<_> = files
        .into_iter()
        .filter(|file| match validate_upload(file) {
            Ok(()) => true,
            Err(e) => {
                debug!("Skipping upload: {}", e);
                false
            }
        })
        .collect();

    if accepted.len() < offered {
        warn!("Accepted {} of {} uploaded files", accepted.len(), offered);
    }
    accepted
}

/// Checks the input constraints of a transformation call.
///
/// `accepted` is the configured allowlist; anything outside it fails without
/// reaching the service.
pub fn validate_transform_input(
    image: &[u8],
    mime_type: &str,
    accepted: &[ImageFormat],
) -> Result<ImageFormat, TransformError> {
    if image.is_empty() {
        return Err(TransformError::unknown("Image data is empty"));
    }

    ImageFormat::from_mime(mime_type)
        .filter(|format| accepted.contains(format))
        .ok_or_else(|| TransformError::unknown(format!("Unsupported image type: {}", mime_type)))
}
