//! Core types for image records, their views and results.

use std::fmt;
use std::sync::Arc;
use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of one uploaded image.
///
/// `Idle -> Processing -> {Success, Error}`. Both outcomes are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    Idle,
    Processing,
    Success,
    Error,
}

impl ImageStatus {
    /// Caption the UI shows for this status
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Awaiting transformation",
            Self::Processing => "Enhancing...",
            Self::Success => "Studio Quality",
            Self::Error => "Transformation Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// Opaque record identifier, stable for the record's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generates a fresh id for an uploaded file
    pub fn for_file(file_name: &str) -> Self {
        Self(format!("{}-{}", file_name, Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Image bytes returned by a successful transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedImage {
    pub bytes: Arc<[u8]>,
    pub mime_type: String,
}

impl TransformedImage {
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Renders the image as a `data:` URL for direct display
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Read-only view of one record, handed to the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSnapshot {
    pub id: RecordId,
    pub file_name: String,
    pub mime_type: String,
    pub original_size: u64,
    /// Revocable handle used to render the original
    pub preview_url: String,
    pub status: ImageStatus,
    pub status_label: &'static str,
    pub transformed_size: Option<u64>,
    pub transformed_mime_type: Option<String>,
    pub error: Option<String>,
}

/// A transformed image packaged for saving.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadArtifact {
    /// `studio_` followed by the original file name
    pub file_name: String,
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Arc<[u8]>,
}

impl DownloadArtifact {
    pub const FILE_PREFIX: &'static str = "studio_";

    pub fn file_name_for(original_name: &str) -> String {
        format!("{}{}", Self::FILE_PREFIX, original_name)
    }
}
