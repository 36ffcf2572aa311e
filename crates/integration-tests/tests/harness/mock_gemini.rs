//! Mock Gemini backend for integration tests
//!
//! Implements just enough of the `generateContent` surface to exercise
//! the adapter: an inline-image answer, a text-only answer, and a 429.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use tokio_util::sync::CancellationToken;

/// Base64 for the bytes "hello"; any decodable payload works
pub const INLINE_IMAGE_B64: &str = "aGVsbG8=";

#[derive(Clone, Copy)]
enum Mode {
    InlineImage,
    TextOnly,
    RateLimited,
}

pub struct MockGemini {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockGeminiState>,
}

struct MockGeminiState {
    request_count: AtomicU32,
    mode: Mode,
}

impl MockGemini {
    /// Start a mock that answers with an inline image part
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(Mode::InlineImage).await
    }

    /// Start a mock that answers with text instead of media
    pub async fn start_text_only() -> anyhow::Result<Self> {
        Self::start_inner(Mode::TextOnly).await
    }

    /// Start a mock that answers every request with 429
    pub async fn start_rate_limited() -> anyhow::Result<Self> {
        Self::start_inner(Mode::RateLimited).await
    }

    async fn start_inner(mode: Mode) -> anyhow::Result<Self> {
        let state = Arc::new(MockGeminiState {
            request_count: AtomicU32::new(0),
            mode,
        });

        // The adapter appends ":generateContent" to the model segment,
        // which lands inside the capture
        let app = Router::new()
            .route("/models/{model}", routing::post(handle_generate))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
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

    /// Base URL for configuring the mock as the Gemini endpoint
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of generate requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockGemini {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_generate(State(state): State<Arc<MockGeminiState>>) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    match state.mode {
        Mode::InlineImage => Json(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{
                        "inlineData": { "mimeType": "image/png", "data": INLINE_IMAGE_B64 }
                    }]
                }
            }]
        }))
        .into_response(),
        Mode::TextOnly => Json(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "I can't generate that image." }]
                }
            }]
        }))
        .into_response(),
        Mode::RateLimited => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": { "message": "Resource has been exhausted", "code": 429 }
            })),
        )
            .into_response(),
    }
}
