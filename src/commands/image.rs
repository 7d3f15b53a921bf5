//! Command handlers for the image workflow.

use std::path::{Path, PathBuf};
use tracing::debug;
use crate::core::{DownloadArtifact, ImageRecord, Progress, RecordId, RecordSnapshot, StudioState, UploadedFile};
use crate::processing::BatchSummary;
use crate::utils::{StudioResult, load_upload, write_download};

/// Accepts files from the upload surface.
///
/// Only image files are kept; each becomes an `Idle` record.
///
/// # Returns
/// Snapshots of the newly created records, in upload order.
pub fn add_images(
    state: &StudioState,
    files: Vec<UploadedFile>,
) -> StudioResult<Vec<RecordSnapshot>> {
    debug!("Received add_images command for {} files", files.len());
    state.add_files(files)
}

/// Loads image files from disk and adds them.
///
/// Stops at the first file that cannot be read.
pub async fn add_image_paths<P: AsRef<Path>>(
    state: &StudioState,
    paths: &[P],
) -> StudioResult<Vec<RecordSnapshot>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(load_upload(path).await?);
    }
    add_images(state, files)
}

/// Transforms every `Idle` image concurrently.
///
/// # Arguments
/// * `state` - Application state holding the records and client
/// * `progress_callback` - Receives one event per resolved image plus start/complete
///
/// # Returns
/// Counts for the run; an empty summary when nothing was `Idle`.
pub async fn transform_images(
    state: &StudioState,
    progress_callback: impl Fn(Progress) + Send + Sync,
) -> StudioResult<BatchSummary> {
    debug!("Received transform_images command ({} idle)", state.store().idle_count());
    state.create_processor().run_batch(progress_callback).await
}

/// Discards every image. Rejected while a batch is running.
pub fn clear_images(state: &StudioState) -> StudioResult<usize> {
    state.clear()
}

/// Current snapshot of every record, in upload order.
pub fn list_images(state: &StudioState) -> Vec<RecordSnapshot> {
    state.store().snapshot()
}

/// Transformed image of a `Success` record, named `studio_<original name>`.
pub fn download_image(state: &StudioState, id: &RecordId) -> StudioResult<DownloadArtifact> {
    state.store().with_record(id, ImageRecord::download)?
}

/// Saves the transformed image of `id` into `dir`.
///
/// # Returns
/// The path written.
pub async fn save_download(
    state: &StudioState,
    id: &RecordId,
    dir: impl AsRef<Path>,
) -> StudioResult<PathBuf> {
    let artifact = download_image(state, id)?;
    write_download(dir, &artifact).await
}
