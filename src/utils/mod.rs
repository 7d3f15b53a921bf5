pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;
pub mod logging;

pub use error::{ConfigError, StudioError, StudioResult, TransformError};
pub use validation::{filter_uploads, validate_transform_input, validate_upload, ADVISORY_MAX_UPLOAD_BYTES};
pub use formats::{ImageFormat, guess_mime_type, is_image_mime};
pub use fs::{extract_filename, load_upload, write_download};
pub use logging::init_tracing;
