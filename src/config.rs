//! Studio configuration loaded from `.env` and the process environment.
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | API_KEY / GEMINI_API_KEY / STUDIO_API_KEY | (required) | Credential for the image-generation API. |
//! | STUDIO_MODEL | gemini-2.5-flash-image-preview | Model used for `generateContent`. |
//! | STUDIO_API_BASE | https://generativelanguage.googleapis.com/v1beta | API root. |
//! | STUDIO_REQUEST_TIMEOUT_SECS | 120 | Transport timeout per HTTP request. |
//! | STUDIO_ACCEPTED_MIME_TYPES | image/png,image/jpeg,image/webp,image/heic,image/heif | Comma-separated types sent to the service; others fail before any request. |

use std::fmt;
use std::time::Duration;
use serde::Deserialize;
use tracing::{debug, error};
use crate::utils::{ConfigError, ImageFormat};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_accepted_mime_types() -> String {
    ImageFormat::SERVICE_DEFAULTS
        .iter()
        .map(ImageFormat::mime_type)
        .collect::<Vec<_>>()
        .join(",")
}

/// Settings for the transformation client.
///
/// Built once at startup and passed explicitly to
/// [`GeminiClient::new`](crate::processing::GeminiClient::new).
#[derive(Clone, Deserialize)]
pub struct StudioConfig {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_accepted_mime_types")]
    pub accepted_mime_types: String,
}

impl StudioConfig {
    /// Creates a config with defaults and an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            model: default_model(),
            api_base: default_api_base(),
            request_timeout_secs: default_request_timeout_secs(),
            accepted_mime_types: default_accepted_mime_types(),
        }
    }

    /// Loads `.env` (if present) and then the process environment.
    ///
    /// Credential precedence: `API_KEY` > `GEMINI_API_KEY` > `STUDIO_API_KEY`.
    /// Does not validate; call [`StudioConfig::validate`] before use.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::Load(e.to_string())),
        }

        let api_key = std::env::var("API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok();

        Self::from_sources(config::Environment::with_prefix("STUDIO"), api_key)
    }

    /// Builds a config from an environment source plus an optional key override.
    pub fn from_sources(
        env: config::Environment,
        api_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .set_default("model", DEFAULT_MODEL)?
            .set_default("api_base", DEFAULT_API_BASE)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS as i64)?
            .set_default("accepted_mime_types", default_accepted_mime_types())?
            .add_source(env)
            .set_override_option("api_key", api_key)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Startup-time validation. A missing credential is an error, never a silent default.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key().is_none() {
            error!("API key is not set; image transformation is unavailable");
            return Err(ConfigError::MissingApiKey);
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("model", "must not be empty"));
        }
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(ConfigError::invalid("api_base", format!("not an http(s) URL: {}", self.api_base)));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid("request_timeout_secs", "must be greater than 0"));
        }
        self.accepted_formats()?;
        Ok(())
    }

    /// Parses the allowlist of formats sent to the service.
    pub fn accepted_formats(&self) -> Result<Vec<ImageFormat>, ConfigError> {
        let mut formats = Vec::new();
        for entry in self.accepted_mime_types.split(',').map(str::trim).filter(|m| !m.is_empty()) {
            let format = ImageFormat::from_mime(entry).ok_or_else(|| {
                ConfigError::invalid("accepted_mime_types", format!("unknown image type: {}", entry))
            })?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }

        if formats.is_empty() {
            return Err(ConfigError::invalid("accepted_mime_types", "must list at least one image type"));
        }
        Ok(formats)
    }

    /// The trimmed API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_accepted_mime_types(mut self, mime_types: impl Into<String>) -> Self {
        self.accepted_mime_types = mime_types.into();
        self
    }
}

impl fmt::Debug for StudioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudioConfig")
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("accepted_mime_types", &self.accepted_mime_types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("STUDIO").source(Some(map))
    }

    #[test]
    fn defaults_apply() {
        let config = StudioConfig::from_sources(env(&[]), Some("secret".into())).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.request_timeout(), Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
        assert_eq!(config.api_key(), Some("secret"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = StudioConfig::from_sources(
            env(&[
                ("STUDIO_MODEL", "custom-model"),
                ("STUDIO_REQUEST_TIMEOUT_SECS", "30"),
                ("STUDIO_API_KEY", "from-prefix"),
            ]),
            None,
        )
        .unwrap();
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.api_key(), Some("from-prefix"));
    }

    #[test]
    fn explicit_key_wins_over_prefixed_key() {
        let config = StudioConfig::from_sources(
            env(&[("STUDIO_API_KEY", "from-prefix")]),
            Some("explicit".into()),
        )
        .unwrap();
        assert_eq!(config.api_key(), Some("explicit"));
    }

    #[test]
    fn missing_key_fails_validation() {
        let config = StudioConfig::from_sources(env(&[]), None).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));

        let blank = StudioConfig::new("   ");
        assert!(matches!(blank.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = StudioConfig::new("k");
        config.request_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let config = StudioConfig::new("k").with_api_base("ftp://example.com");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn accepted_types_default_to_service_formats() {
        let config = StudioConfig::from_sources(env(&[]), Some("k".into())).unwrap();
        assert_eq!(config.accepted_formats().unwrap(), ImageFormat::SERVICE_DEFAULTS.to_vec());
    }

    #[test]
    fn accepted_types_come_from_environment() {
        let config = StudioConfig::from_sources(
            env(&[("STUDIO_ACCEPTED_MIME_TYPES", "image/png, image/gif,image/png")]),
            Some("k".into()),
        )
        .unwrap();
        assert_eq!(config.accepted_formats().unwrap(), vec![ImageFormat::PNG, ImageFormat::GIF]);
    }

    #[test]
    fn rejects_bad_accepted_types() {
        let unknown = StudioConfig::new("k").with_accepted_mime_types("image/png,text/plain");
        assert!(matches!(unknown.validate(), Err(ConfigError::Invalid { .. })));

        let empty = StudioConfig::new("k").with_accepted_mime_types(" , ");
        assert!(matches!(empty.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn debug_redacts_key() {
        let rendered = format!("{:?}", StudioConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
