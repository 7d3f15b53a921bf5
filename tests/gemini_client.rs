//! Gemini client against a local stub of the `generateContent` endpoint.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use parking_lot::Mutex;
use serde_json::{Value, json};

use product_studio::{
    GeminiClient, ImageStatus, ImageTransformer, StudioConfig, StudioState, TransformError, UploadedFile,
    add_images, list_images, transform_images,
};

const MODEL_PATH: &str = "/v1beta/models/gemini-2.5-flash-image-preview:generateContent";

#[derive(Debug, Clone)]
struct SeenRequest {
    path: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    reply: Value,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

async fn handle(
    State(stub): State<Stub>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    stub.seen.lock().push(SeenRequest {
        path: uri.path().to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    (stub.status, Json(stub.reply.clone()))
}

/// Serves `reply` with `status` for every request; returns the client and the request log.
async fn stub_client(status: StatusCode, reply: Value) -> (GeminiClient, Arc<Mutex<Vec<SeenRequest>>>) {
    stub_client_with(status, reply, |config| config).await
}

async fn stub_client_with(
    status: StatusCode,
    reply: Value,
    configure: impl FnOnce(StudioConfig) -> StudioConfig,
) -> (GeminiClient, Arc<Mutex<Vec<SeenRequest>>>) {
    let stub = Stub {
        status,
        reply,
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let seen = Arc::clone(&stub.seen);

    let app = Router::new().fallback(handle).with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = configure(StudioConfig::new("test-key").with_api_base(format!("http://{addr}/v1beta")));
    (GeminiClient::new(&config).unwrap(), seen)
}

fn image_reply() -> Value {
    json!({
        "candidates": [{
            "content": {"parts": [
                {"text": "Here is your studio shot."},
                {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
            ]},
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn sends_image_prompt_and_key() {
    let (client, seen) = stub_client(StatusCode::OK, image_reply()).await;

    let image = client.transform(&[1, 2, 3], "image/jpeg").await.unwrap();
    assert_eq!(image.mime_type, "image/png");
    assert_eq!(&image.bytes[..], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    let request = &seen[0];
    assert_eq!(request.path, MODEL_PATH);
    assert_eq!(request.api_key.as_deref(), Some("test-key"));

    let parts = &request.body["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
    assert_eq!(parts[0]["inlineData"]["data"], "AQID");
    assert_eq!(parts[1]["text"], product_studio::processing::STUDIO_PROMPT);
    assert_eq!(request.body["generationConfig"]["responseModalities"], json!(["IMAGE", "TEXT"]));
}

#[tokio::test]
async fn rate_limit_is_quota() {
    let reply = json!({"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}});
    let (client, _) = stub_client(StatusCode::TOO_MANY_REQUESTS, reply).await;

    let err = client.transform(&[1], "image/png").await.unwrap_err();
    assert_eq!(err, TransformError::QuotaExceeded);
    assert_eq!(err.to_string(), "You have exceeded your API quota. Please try again later.");
}

#[tokio::test]
async fn text_only_reply_is_no_image() {
    let reply = json!({"candidates": [{"content": {"parts": [{"text": "I can only describe it."}]}, "finishReason": "STOP"}]});
    let (client, _) = stub_client(StatusCode::OK, reply).await;

    let err = client.transform(&[1], "image/png").await.unwrap_err();
    assert_eq!(err, TransformError::NoImageReturned);
}

#[tokio::test]
async fn blocked_prompt_is_safety() {
    let reply = json!({"promptFeedback": {"blockReason": "SAFETY"}});
    let (client, _) = stub_client(StatusCode::OK, reply).await;

    let err = client.transform(&[1], "image/webp").await.unwrap_err();
    assert_eq!(err.to_string(), "Image generation was blocked due to safety policies.");
}

#[tokio::test]
async fn other_api_errors_carry_the_message() {
    let reply = json!({"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}});
    let (client, _) = stub_client(StatusCode::BAD_REQUEST, reply).await;

    let err = client.transform(&[1], "image/png").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to process image: API error 400 INVALID_ARGUMENT: API key not valid"
    );
}

#[tokio::test]
async fn unreachable_endpoint_is_unknown() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = StudioConfig::new("test-key").with_api_base(format!("http://{addr}/v1beta"));
    let client = GeminiClient::new(&config).unwrap();

    let err = client.transform(&[1], "image/png").await.unwrap_err();
    assert!(matches!(err, TransformError::Unknown(_)));
    assert!(err.to_string().starts_with("Failed to process image: "));
}

#[tokio::test]
async fn transport_failure_ignores_markers_in_url() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = StudioConfig::new("test-key").with_api_base(format!("http://{addr}/proxy-4290/SAFETY/v1beta"));
    let client = GeminiClient::new(&config).unwrap();

    let err = client.transform(&[1], "image/png").await.unwrap_err();
    assert!(matches!(err, TransformError::Unknown(_)), "{err:?}");
    let message = err.to_string();
    assert!(!message.contains("4290"), "{message}");
    assert!(!message.contains("SAFETY"), "{message}");
}

#[tokio::test]
async fn configured_types_reach_the_service() {
    let (client, seen) = stub_client_with(StatusCode::OK, image_reply(), |config| {
        config.with_accepted_mime_types("image/png,image/gif")
    })
    .await;

    client.transform(&[1, 2], "image/gif").await.unwrap();
    let err = client.transform(&[1, 2], "image/jpeg").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to process image: Unsupported image type: image/jpeg");

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].body["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/gif");
}

#[tokio::test]
async fn batch_through_stub_records_outcomes() {
    let (client, seen) = stub_client(StatusCode::OK, image_reply()).await;
    let state = StudioState::with_transformer(Arc::new(client));

    add_images(
        &state,
        vec![
            UploadedFile::new("mug.jpg", "image/jpeg", vec![1u8, 2]),
            UploadedFile::new("lamp.png", "image/png", vec![3u8, 4]),
            UploadedFile::new("spin.gif", "image/gif", vec![5u8, 6]),
        ],
    )
    .unwrap();
    let summary = transform_images(&state, |_| {}).await.unwrap();

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    // The gif is refused before any request is made.
    assert_eq!(seen.lock().len(), 2);

    let images = list_images(&state);
    assert_eq!(images[0].status, ImageStatus::Success);
    assert_eq!(images[0].transformed_mime_type.as_deref(), Some("image/png"));
    assert_eq!(images[1].status, ImageStatus::Success);
    assert_eq!(images[2].status, ImageStatus::Error);
    assert_eq!(
        images[2].error.as_deref(),
        Some("Failed to process image: Unsupported image type: image/gif")
    );
}
