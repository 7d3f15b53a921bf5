//! Command handlers for the UI host.
//!
//! This module exposes the operations a rendering surface invokes:
//! - [`add_images`] / [`add_image_paths`]: Accept uploads as `Idle` records
//! - [`transform_images`]: Run a batch over every `Idle` record
//! - [`clear_images`]: Discard all records
//! - [`list_images`], [`studio_status`]: Read current state
//! - [`download_image`], [`save_download`]: Export a transformed image

mod image;
mod status;

pub use image::*;
pub use status::{StudioStatus, studio_status};
