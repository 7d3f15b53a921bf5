//! Gemini image-generation client.
//!
//! Sends the original image plus [`STUDIO_PROMPT`] to `models/{model}:generateContent`
//! with image and text response modalities, and returns the first inline image
//! found in the response.
//!
//! API key: passed in through [`StudioConfig`]. Default model: `gemini-2.5-flash-image-preview`.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::StudioConfig;
use crate::core::TransformedImage;
use crate::utils::{ConfigError, ImageFormat, StudioResult, TransformError, validate_transform_input};

use super::client::ImageTransformer;
use super::prompt::STUDIO_PROMPT;

// generateContent request/response (camelCase on the wire)
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart {
    Image {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: &'static str,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: [&'static str; 2],
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    inline_data: Option<ResponseInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseInlineData {
    #[serde(default)]
    mime_type: Option<String>,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    api_key: String,
    model: String,
    endpoint: String,
    accepted: Vec<ImageFormat>,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Creates a client from validated configuration.
    ///
    /// A missing credential fails here, at startup, rather than on first use.
    pub fn new(config: &StudioConfig) -> StudioResult<Self> {
        config.validate()?;
        let api_key = config
            .api_key()
            .ok_or(ConfigError::MissingApiKey)?
            .to_string();
        let accepted = config.accepted_formats()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::Load(format!("HTTP client: {}", e)))?;

        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.api_base.trim_end_matches('/'),
            config.model
        );
        debug!("Gemini endpoint: {}", endpoint);

        Ok(Self {
            api_key,
            model: config.model.clone(),
            endpoint,
            accepted,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, image: &[u8], mime_type: &str) -> Result<TransformedImage, TransformError> {
        let body = build_request(image, mime_type);

        let res = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransformError::unknown(format!("request failed: {}", e.without_url())))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(classify_api_failure(status, &body));
        }

        let parsed: GenerateContentResponse = res
            .json()
            .await
            .map_err(|e| TransformError::unknown(format!("response parse failed: {}", e.without_url())))?;

        extract_image(parsed, mime_type)
    }
}

#[async_trait]
impl ImageTransformer for GeminiClient {
    async fn transform(&self, image: &[u8], mime_type: &str) -> Result<TransformedImage, TransformError> {
        let result = match validate_transform_input(image, mime_type, &self.accepted) {
            Ok(format) => self.generate(image, format.mime_type()).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            error!("Error transforming image: {}", e);
        }
        result
    }
}

fn build_request(image: &[u8], mime_type: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                RequestPart::Image {
                    inline_data: InlineData {
                        mime_type: mime_type.to_string(),
                        data: general_purpose::STANDARD.encode(image),
                    },
                },
                RequestPart::Text { text: STUDIO_PROMPT },
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: ["IMAGE", "TEXT"],
        },
    }
}

/// Maps a non-2xx response to the error taxonomy.
fn classify_api_failure(status: StatusCode, body: &str) -> TransformError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return TransformError::QuotaExceeded;
    }

    let detail = match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => format!(
            "API error {} {}: {}",
            status.as_u16(),
            envelope.error.status.unwrap_or_default(),
            envelope.error.message
        ),
        Err(_) => format!("API error {}: {}", status.as_u16(), body.trim()),
    };
    TransformError::classify(&detail)
}

fn is_safety_finish(reason: &str) -> bool {
    reason.contains("SAFETY") || reason.contains("PROHIBITED") || reason == "BLOCKLIST" || reason == "SPII"
}

/// Scans the first candidate for the first inline image part.
fn extract_image(response: GenerateContentResponse, fallback_mime: &str) -> Result<TransformedImage, TransformError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        debug!("Prompt blocked: {}", reason);
        return Err(TransformError::SafetyRejected);
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(TransformError::NoImageReturned);
    };

    let inline = candidate
        .content
        .into_iter()
        .flat_map(|c| c.parts)
        .find_map(|p| p.inline_data);

    let Some(inline) = inline else {
        return match candidate.finish_reason.as_deref() {
            Some(reason) if is_safety_finish(reason) => Err(TransformError::SafetyRejected),
            _ => Err(TransformError::NoImageReturned),
        };
    };

    let bytes = general_purpose::STANDARD
        .decode(inline.data.as_bytes())
        .map_err(|e| TransformError::unknown(format!("invalid image payload: {}", e)))?;
    if bytes.is_empty() {
        return Err(TransformError::NoImageReturned);
    }

    let mime_type = inline.mime_type.unwrap_or_else(|| fallback_mime.to_string());
    Ok(TransformedImage::new(bytes, mime_type))
}
