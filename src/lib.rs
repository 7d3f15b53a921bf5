// Module declarations in dependency order
pub mod utils;
pub mod config;
pub mod core;
pub mod processing;
pub mod commands;

// Public exports for external consumers
pub use crate::config::StudioConfig;
pub use crate::core::{
    DownloadArtifact, ImageStatus, Progress, ProgressType, RecordId, RecordSnapshot, StudioState,
    TransformedImage, UploadedFile,
};
pub use processing::{BatchSummary, GeminiClient, ImageTransformer};
pub use utils::{StudioError, StudioResult, TransformError, init_tracing};
pub use commands::*;
