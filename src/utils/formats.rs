use serde::{Deserialize, Serialize};
use std::path::Path;

/// Image formats an upload may carry.
///
/// The service documents png, jpeg, webp, heic and heif; the rest are common
/// upload types that can be enabled through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    JPEG,
    PNG,
    WebP,
    HEIC,
    HEIF,
    GIF,
    BMP,
    TIFF,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 8] = [
        Self::JPEG,
        Self::PNG,
        Self::WebP,
        Self::HEIC,
        Self::HEIF,
        Self::GIF,
        Self::BMP,
        Self::TIFF,
    ];

    /// Formats sent to the service unless configured otherwise
    pub const SERVICE_DEFAULTS: [ImageFormat; 5] = [
        Self::PNG,
        Self::JPEG,
        Self::WebP,
        Self::HEIC,
        Self::HEIF,
    ];

    /// Canonical MIME type sent to the service
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::JPEG => "image/jpeg",
            Self::PNG => "image/png",
            Self::WebP => "image/webp",
            Self::HEIC => "image/heic",
            Self::HEIF => "image/heif",
            Self::GIF => "image/gif",
            Self::BMP => "image/bmp",
            Self::TIFF => "image/tiff",
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::JPEG => &["jpg", "jpeg"],
            Self::PNG => &["png"],
            Self::WebP => &["webp"],
            Self::HEIC => &["heic"],
            Self::HEIF => &["heif"],
            Self::GIF => &["gif"],
            Self::BMP => &["bmp"],
            Self::TIFF => &["tif", "tiff"],
        }
    }

    /// Case-insensitive extension check
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions().contains(&ext.as_str())
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.matches_extension(ext))
    }

    /// Looks up a format by MIME type, ignoring case and parameters.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim().to_lowercase();
        match essence.as_str() {
            "image/jpg" | "image/pjpeg" => Some(Self::JPEG),
            "image/tif" => Some(Self::TIFF),
            other => Self::ALL.into_iter().find(|format| format.mime_type() == other),
        }
    }
}

/// True for any `image/*` MIME type, the filter the upload surface applies.
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_lowercase().starts_with("image/")
}

/// Guesses an `image/*` MIME type from a file extension.
pub fn guess_mime_type(path: impl AsRef<Path>) -> Option<&'static str> {
    let ext = path.as_ref().extension()?.to_str()?;
    ImageFormat::from_extension(ext).map(|format| format.mime_type())
}
