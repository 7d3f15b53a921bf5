//! Image transformation: the remote client and the batch orchestrator.
//!
//! - [`ImageTransformer`]: the seam between orchestration and the remote call.
//! - [`GeminiClient`]: `generateContent` implementation with error classification.
//! - [`BatchProcessor`]: dispatches one call per idle record and aggregates completion.

mod batch;
mod client;
mod gemini;
mod prompt;

pub use batch::{BatchProcessor, BatchSummary};
pub use client::ImageTransformer;
pub use gemini::GeminiClient;
pub use prompt::STUDIO_PROMPT;
