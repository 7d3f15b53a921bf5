//! Error types for the product studio.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.

use std::io;
use thiserror::Error;
use serde::Serialize;
use crate::core::ImageStatus;

/// Failures of a single transformation call.
///
/// The `Display` text of each variant is the message shown to the user next
/// to the failed image.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransformError {
    /// The remote service declined to generate on policy grounds
    #[error("Image generation was blocked due to safety policies.")]
    SafetyRejected,

    /// The remote service reported rate or quota limiting
    #[error("You have exceeded your API quota. Please try again later.")]
    QuotaExceeded,

    /// The call succeeded but carried no inline image
    #[error("No image was generated in the response. The model may have returned text instead.")]
    NoImageReturned,

    /// Anything else, wrapping the underlying message
    #[error("Failed to process image: {0}")]
    Unknown(String),
}

impl TransformError {
    pub fn unknown<T: Into<String>>(msg: T) -> Self {
        Self::Unknown(msg.into())
    }

    /// Classifies a raw failure message by the markers the remote service uses.
    ///
    /// Safety markers win over quota markers; anything unrecognised is wrapped
    /// as [`TransformError::Unknown`].
    pub fn classify(message: &str) -> Self {
        if message.contains("SAFETY") {
            return Self::SafetyRejected;
        }

        let lower = message.to_lowercase();
        if message.contains("429")
            || lower.contains("resource exhausted")
            || lower.contains("resource_exhausted")
        {
            return Self::QuotaExceeded;
        }

        Self::Unknown(message.to_string())
    }
}

/// Startup configuration errors.
#[derive(Error, Debug, Serialize)]
pub enum ConfigError {
    /// No API credential was supplied
    #[error("API key is not set (expected API_KEY or GEMINI_API_KEY)")]
    MissingApiKey,

    /// A value was present but unusable
    #[error("Invalid value for '{key}': {message}")]
    Invalid { key: String, message: String },

    /// The configuration sources could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(String),
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        Self::Load(err.to_string())
    }
}

/// Main error type for the studio.
///
/// All errors surfaced through the command layer are converted to this type
/// before being returned to the UI host.
#[derive(Error, Debug, Serialize)]
pub enum StudioError {
    /// Configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Upload or input validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),

    /// No record with this id
    #[error("Image not found: {0}")]
    NotFound(String),

    /// The record has no transformed image yet
    #[error("Image {0} has no transformed result")]
    NotReady(String),

    /// A batch is running; the request would race with in-flight calls
    #[error("A batch is already being processed")]
    BatchInProgress,

    /// A status change the state machine does not allow
    #[error("Invalid status transition for {id}: {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: ImageStatus,
        to: ImageStatus,
    },

    /// A transformation call failed
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Convenience result type for studio operations.
pub type StudioResult<T> = Result<T, StudioError>;

// Helper methods for error creation
impl StudioError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::IO(msg.into())
    }

    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound(id.to_string())
    }

    pub fn not_ready(id: impl ToString) -> Self {
        Self::NotReady(id.to_string())
    }
}

// Convert std::io::Error to StudioError
impl From<io::Error> for StudioError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}
