//! Mock fal backend for integration tests
//!
//! Serves three surfaces from one listener: the synchronous generation
//! endpoint, the queue OpenAPI document used for schema discovery, and a
//! media route the gateway fetches result bytes from.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Bytes served from the media route
pub const MEDIA_BYTES: &[u8] = b"fake-image-bytes";

/// One byte past the gateway's inline-encoding limit for video payloads
pub const OVERSIZED_VIDEO_BYTES: usize = 3_500_001;

#[derive(Clone, Copy)]
enum Mode {
    Image,
    Video,
    OversizedVideo,
    ValidationError,
    RateLimited,
}

pub struct MockFal {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockFalState>,
}

struct MockFalState {
    addr: SocketAddr,
    mode: Mode,
    generate_count: AtomicU32,
    schema_count: AtomicU32,
    last_payload: Mutex<Option<Value>>,
}

impl MockFal {
    /// Start a mock whose generation result is an image URL
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(Mode::Image).await
    }

    /// Start a mock whose generation result is a video URL
    pub async fn start_video() -> anyhow::Result<Self> {
        Self::start_inner(Mode::Video).await
    }

    /// Start a mock whose generation result is a video too large to inline
    pub async fn start_oversized_video() -> anyhow::Result<Self> {
        Self::start_inner(Mode::OversizedVideo).await
    }

    /// Start a mock that rejects generation with a detail envelope
    pub async fn start_validation_error() -> anyhow::Result<Self> {
        Self::start_inner(Mode::ValidationError).await
    }

    /// Start a mock that answers generation with 429
    pub async fn start_rate_limited() -> anyhow::Result<Self> {
        Self::start_inner(Mode::RateLimited).await
    }

    async fn start_inner(mode: Mode) -> anyhow::Result<Self> {
        // Bind first: handlers embed the address in the URLs they return
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = Arc::new(MockFalState {
            addr,
            mode,
            generate_count: AtomicU32::new(0),
            schema_count: AtomicU32::new(0),
            last_payload: Mutex::new(None),
        });

        let app = Router::new()
            .route("/api/openapi/queue/openapi.json", routing::get(handle_schema))
            .route("/media/output", routing::get(handle_media))
            .route("/{*endpoint}", routing::post(handle_generate))
            .with_state(Arc::clone(&state));

        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for both generation and schema discovery
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of generation requests received
    pub fn generate_count(&self) -> u32 {
        self.state.generate_count.load(Ordering::Relaxed)
    }

    /// Number of schema document requests received
    pub fn schema_count(&self) -> u32 {
        self.state.schema_count.load(Ordering::Relaxed)
    }

    /// The JSON body of the most recent generation request
    pub fn last_payload(&self) -> Option<Value> {
        self.state.last_payload.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Drop for MockFal {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_generate(
    State(state): State<Arc<MockFalState>>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    state.generate_count.fetch_add(1, Ordering::Relaxed);
    if let Ok(mut guard) = state.last_payload.lock() {
        *guard = Some(payload);
    }

    match state.mode {
        Mode::Image => Json(serde_json::json!({
            "images": [{
                "url": format!("http://{}/media/output?kind=image", state.addr),
                "content_type": "image/png"
            }]
        }))
        .into_response(),
        Mode::Video => Json(serde_json::json!({
            "video": { "url": format!("http://{}/media/output?kind=video", state.addr) }
        }))
        .into_response(),
        Mode::OversizedVideo => Json(serde_json::json!({
            "video": { "url": format!("http://{}/media/output?kind=large-video", state.addr) }
        }))
        .into_response(),
        Mode::ValidationError => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "detail": [{ "msg": "prompt must not be empty", "loc": ["body", "prompt"] }]
            })),
        )
            .into_response(),
        Mode::RateLimited => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({ "detail": "Too many requests" })),
        )
            .into_response(),
    }
}

async fn handle_media(
    axum::extract::Query(params): axum::extract::Query<std::collections::HashMap<String, String>>,
) -> impl IntoResponse {
    match params.get("kind").map(String::as_str) {
        Some("video") => ([(header::CONTENT_TYPE, "video/mp4")], MEDIA_BYTES.to_vec()),
        Some("large-video") => (
            [(header::CONTENT_TYPE, "video/mp4")],
            vec![0u8; OVERSIZED_VIDEO_BYTES],
        ),
        _ => ([(header::CONTENT_TYPE, "image/png")], MEDIA_BYTES.to_vec()),
    }
}

/// Queue OpenAPI document in the shape fal publishes: the input schema is
/// reachable only through the JSON request body of a declared operation
async fn handle_schema(State(state): State<Arc<MockFalState>>) -> impl IntoResponse {
    state.schema_count.fetch_add(1, Ordering::Relaxed);

    Json(serde_json::json!({
        "openapi": "3.0.0",
        "paths": {
            "/": {
                "post": {
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/TextToImageInput" }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "TextToImageInput": {
                    "type": "object",
                    "required": ["prompt"],
                    "properties": {
                        "prompt": { "type": "string", "description": "The prompt to generate from" },
                        "image_url": { "type": "string", "description": "Source image" },
                        "num_inference_steps": {
                            "type": "integer", "minimum": 1, "maximum": 50, "default": 28
                        },
                        "guidance_scale": { "type": "number", "default": 3.5 },
                        "sync_mode": { "type": "boolean" }
                    }
                }
            }
        }
    }))
}
