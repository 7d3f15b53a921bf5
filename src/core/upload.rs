//! Uploaded file definition.

use std::sync::Arc;

/// One file handed over by the upload surface.
///
/// The bytes are immutable and shared, so an in-flight transformation can
/// hold them without copying.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original file name, used for display and the download name
    pub name: String,
    /// MIME type reported by the upload surface
    pub mime_type: String,
    /// Last-modified time in milliseconds since the epoch, when known
    pub last_modified: Option<u64>,
    /// Raw file contents
    pub bytes: Arc<[u8]>,
}

impl UploadedFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            last_modified: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_last_modified(mut self, millis: u64) -> Self {
        self.last_modified = Some(millis);
        self
    }

    /// Size of the file in bytes
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}
