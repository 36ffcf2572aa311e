//! Mock Replicate backend for integration tests
//!
//! Predictions walk a scripted status sequence: submission returns the
//! first entry and each poll advances one step, holding at the last.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Bytes served from the media route
pub const MEDIA_BYTES: &[u8] = b"fake-replicate-bytes";

pub struct MockReplicate {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockReplicateState>,
}

struct MockReplicateState {
    addr: SocketAddr,
    statuses: Vec<&'static str>,
    rate_limited: bool,
    poll_broken: bool,
    submit_count: AtomicU32,
    poll_count: AtomicU32,
    schema_count: AtomicU32,
}

impl MockReplicate {
    /// Start a mock whose prediction succeeds after two polls
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with_statuses(vec!["starting", "processing", "succeeded"]).await
    }

    /// Start a mock whose prediction never leaves "processing"
    pub async fn start_never_terminal() -> anyhow::Result<Self> {
        Self::start_with_statuses(vec!["processing"]).await
    }

    /// Start a mock whose prediction fails
    pub async fn start_failing() -> anyhow::Result<Self> {
        Self::start_with_statuses(vec!["starting", "failed"]).await
    }

    /// Start a mock whose prediction is canceled
    pub async fn start_canceled() -> anyhow::Result<Self> {
        Self::start_with_statuses(vec!["starting", "canceled"]).await
    }

    /// Start a mock that answers submission with 429
    pub async fn start_rate_limited() -> anyhow::Result<Self> {
        Self::start_inner(vec!["starting"], true, false).await
    }

    /// Start a mock whose status route answers every poll with 500
    pub async fn start_poll_broken() -> anyhow::Result<Self> {
        Self::start_inner(vec!["starting"], false, true).await
    }

    /// Start a mock with an explicit prediction status sequence
    pub async fn start_with_statuses(statuses: Vec<&'static str>) -> anyhow::Result<Self> {
        Self::start_inner(statuses, false, false).await
    }

    async fn start_inner(statuses: Vec<&'static str>, rate_limited: bool, poll_broken: bool) -> anyhow::Result<Self> {
        // Bind first: prediction documents carry absolute poll URLs
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = Arc::new(MockReplicateState {
            addr,
            statuses,
            rate_limited,
            poll_broken,
            submit_count: AtomicU32::new(0),
            poll_count: AtomicU32::new(0),
            schema_count: AtomicU32::new(0),
        });

        let app = Router::new()
            .route("/models/{owner}/{name}/predictions", routing::post(handle_submit))
            .route("/models/{owner}/{name}", routing::get(handle_model))
            .route("/predictions/{id}", routing::get(handle_poll))
            .route("/media/output", routing::get(handle_media))
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

    /// Base URL for configuring the mock as the Replicate API
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of prediction submissions received
    pub fn submit_count(&self) -> u32 {
        self.state.submit_count.load(Ordering::Relaxed)
    }

    /// Number of status polls received
    pub fn poll_count(&self) -> u32 {
        self.state.poll_count.load(Ordering::Relaxed)
    }

    /// Number of model document requests received
    pub fn schema_count(&self) -> u32 {
        self.state.schema_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockReplicate {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl MockReplicateState {
    /// Prediction document for the status at `index` in the sequence
    fn prediction(&self, index: usize) -> Value {
        let status = self.statuses[index.min(self.statuses.len() - 1)];
        let mut body = serde_json::json!({
            "id": "pred-test-1",
            "status": status,
            "urls": { "get": format!("http://{}/predictions/pred-test-1", self.addr) }
        });
        if status == "succeeded" {
            body["output"] = serde_json::json!([format!("http://{}/media/output", self.addr)]);
        }
        if status == "failed" {
            body["error"] = Value::String("NSFW content detected".to_owned());
        }
        body
    }
}

async fn handle_submit(State(state): State<Arc<MockReplicateState>>, Json(body): Json<Value>) -> impl IntoResponse {
    state.submit_count.fetch_add(1, Ordering::Relaxed);

    if state.rate_limited {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({ "detail": "Request was throttled", "status": 429 })),
        )
            .into_response();
    }

    // Submissions must wrap the model payload in an "input" envelope
    if body.get("input").is_none() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "detail": "input is required" })),
        )
            .into_response();
    }

    (StatusCode::CREATED, Json(state.prediction(0))).into_response()
}

async fn handle_poll(
    State(state): State<Arc<MockReplicateState>>,
    Path(_id): Path<String>,
) -> impl IntoResponse {
    let polls = state.poll_count.fetch_add(1, Ordering::Relaxed) as usize;

    if state.poll_broken {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "detail": "status backend unavailable" })),
        )
            .into_response();
    }

    Json(state.prediction(polls + 1)).into_response()
}

async fn handle_media() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], MEDIA_BYTES)
}

/// Model document in Replicate's shape: the OpenAPI schema hangs off the
/// latest version, with the input definition under `components.schemas`
async fn handle_model(
    State(state): State<Arc<MockReplicateState>>,
    Path((owner, name)): Path<(String, String)>,
) -> impl IntoResponse {
    state.schema_count.fetch_add(1, Ordering::Relaxed);

    Json(serde_json::json!({
        "owner": owner,
        "name": name,
        "latest_version": {
            "id": "ver-test-1",
            "openapi_schema": {
                "components": {
                    "schemas": {
                        "Input": {
                            "type": "object",
                            "required": ["prompt"],
                            "properties": {
                                "prompt": { "type": "string", "description": "Input prompt", "x-order": 0 },
                                "image": { "type": "string", "description": "Input image" },
                                "seed": { "type": "integer", "description": "Random seed" },
                                "aspect_ratio": {
                                    "allOf": [{ "$ref": "#/components/schemas/aspect_ratio" }]
                                },
                                "disable_safety_checker": { "type": "boolean", "default": false }
                            }
                        },
                        "aspect_ratio": {
                            "type": "string",
                            "enum": ["1:1", "16:9", "9:16"],
                            "default": "1:1",
                            "description": "Aspect ratio of the output"
                        }
                    }
                }
            }
        }
    }))
}
