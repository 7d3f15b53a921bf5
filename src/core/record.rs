//! Per-image record and its status transitions.

use tracing::debug;
use crate::core::{
    DownloadArtifact, ImageStatus, PreviewHandle, PreviewRegistry, RecordId, RecordSnapshot,
    TransformedImage, UploadedFile,
};
use crate::utils::{StudioError, StudioResult, TransformError};

/// One uploaded image and its transformation state.
///
/// Fields are private so the status/result pairing can only change through
/// the transition methods: `Success` carries a transformed image and no
/// error, `Error` carries a message and no image, `Idle` and `Processing`
/// carry neither.
#[derive(Debug)]
pub struct ImageRecord {
    id: RecordId,
    original: UploadedFile,
    preview: PreviewHandle,
    transformed: Option<TransformedImage>,
    status: ImageStatus,
    error: Option<String>,
}

impl ImageRecord {
    /// Creates an `Idle` record and its preview handle
    pub fn new(original: UploadedFile, previews: &PreviewRegistry) -> Self {
        let preview = previews.create(&original);
        Self {
            id: RecordId::for_file(&original.name),
            original,
            preview,
            transformed: None,
            status: ImageStatus::Idle,
            error: None,
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn original(&self) -> &UploadedFile {
        &self.original
    }

    pub fn preview_url(&self) -> &str {
        self.preview.url()
    }

    pub fn status(&self) -> ImageStatus {
        self.status
    }

    pub fn transformed(&self) -> Option<&TransformedImage> {
        self.transformed.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `Idle -> Processing`
    pub fn begin_processing(&mut self) -> StudioResult<()> {
        self.expect_status(ImageStatus::Idle, ImageStatus::Processing)?;
        self.status = ImageStatus::Processing;
        Ok(())
    }

    /// `Processing -> Success`
    pub fn complete(&mut self, image: TransformedImage) -> StudioResult<()> {
        self.expect_status(ImageStatus::Processing, ImageStatus::Success)?;
        debug!("{} transformed ({} bytes)", self.original.name, image.size());
        self.transformed = Some(image);
        self.error = None;
        self.status = ImageStatus::Success;
        Ok(())
    }

    /// `Processing -> Error`
    pub fn fail(&mut self, message: impl Into<String>) -> StudioResult<()> {
        self.expect_status(ImageStatus::Processing, ImageStatus::Error)?;
        let message = message.into();
        debug!("{} failed: {}", self.original.name, message);
        self.transformed = None;
        self.error = Some(message);
        self.status = ImageStatus::Error;
        Ok(())
    }

    /// Applies the outcome of a transformation call.
    pub fn resolve(&mut self, outcome: Result<TransformedImage, TransformError>) -> StudioResult<()> {
        match outcome {
            Ok(image) => self.complete(image),
            Err(e) => self.fail(e.to_string()),
        }
    }

    pub fn snapshot(&self) -> RecordSnapshot {
        RecordSnapshot {
            id: self.id.clone(),
            file_name: self.original.name.clone(),
            mime_type: self.original.mime_type.clone(),
            original_size: self.original.size(),
            preview_url: self.preview.url().to_string(),
            status: self.status,
            status_label: self.status.label(),
            transformed_size: self.transformed.as_ref().map(TransformedImage::size),
            transformed_mime_type: self.transformed.as_ref().map(|t| t.mime_type.clone()),
            error: self.error.clone(),
        }
    }

    /// Packages the transformed image for saving. Only `Success` records qualify.
    pub fn download(&self) -> StudioResult<DownloadArtifact> {
        let image = self
            .transformed
            .as_ref()
            .ok_or_else(|| StudioError::not_ready(&self.id))?;

        Ok(DownloadArtifact {
            file_name: DownloadArtifact::file_name_for(&self.original.name),
            mime_type: image.mime_type.clone(),
            bytes: image.bytes.clone(),
        })
    }

    fn expect_status(&self, from: ImageStatus, to: ImageStatus) -> StudioResult<()> {
        if self.status == from {
            Ok(())
        } else {
            Err(StudioError::InvalidTransition {
                id: self.id.to_string(),
                from: self.status,
                to,
            })
        }
    }
}
