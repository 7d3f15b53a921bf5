//! Core application types and state management.
//!
//! This module contains the fundamental types used throughout the application:
//! - [`StudioState`]: Application state shared with the UI host
//! - [`ImageRecord`]: One uploaded image and its status
//! - [`RecordStore`]: The record collection, updated by record id
//! - [`PreviewRegistry`]: Revocable preview handles for originals
//! - [`Progress`]: Progress events for batch runs

mod state;
mod types;
mod upload;
mod record;
mod preview;
mod store;
mod progress;

pub use state::{ProcessingFlag, ProcessingGuard, StudioState};
pub use types::{DownloadArtifact, ImageStatus, RecordId, RecordSnapshot, TransformedImage};
pub use upload::UploadedFile;
pub use record::ImageRecord;
pub use preview::{PreviewHandle, PreviewRegistry};
pub use store::RecordStore;
pub use progress::{Progress, ProgressType};
