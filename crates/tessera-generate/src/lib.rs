#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod inputs;
pub mod media;
mod provider;
mod server;
mod types;

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    response::Response,
    routing::post,
};
use serde::Serialize;
use tessera_core::RequestContext;

pub use error::{GenerateError, Result};
pub use server::Server;
pub use types::{GenProvider, GenerationOutput, GenerationRequest, MediaKind, MediaOutput, ModelSelector};

/// Serialized response size above which a warning is logged
///
/// Inline-encoded media can push the JSON body toward the platform's
/// response ceiling; the warning is observability only, never a failure.
const RESPONSE_SIZE_WARN_BYTES: usize = 4_000_000;

/// Build the generation server from configuration
pub fn build_server(config: &tessera_config::Config, schema: Arc<tessera_schema::Server>) -> Arc<Server> {
    Arc::new(Server::from_config(config, schema))
}

/// Create the endpoint router for generation
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/generate", post(generate))
}

/// Successful generation body
///
/// Exactly one of `image`, `video`, or `videoUrl` is set
#[derive(Debug, Default, Serialize)]
struct GenerateResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video: Option<String>,
    #[serde(rename = "videoUrl", skip_serializing_if = "Option::is_none")]
    video_url: Option<String>,
    #[serde(rename = "contentType")]
    content_type: String,
}

/// Handle `POST /generate`
async fn generate(
    State(server): State<Arc<Server>>,
    axum::Extension(context): axum::Extension<RequestContext>,
    Json(request): Json<GenerationRequest>,
) -> Result<Response> {
    validate(&request)?;

    tracing::debug!(
        provider = %request.model.provider,
        model = %request.model.id,
        "generation handler called"
    );

    let output = server.generate(&request, &context).await?;

    let media = output
        .outputs
        .into_iter()
        .next()
        .ok_or_else(|| GenerateError::EmptyResponse {
            model: request.model.name.clone(),
        })?;

    let mut body = GenerateResponse {
        success: true,
        content_type: media.content_type,
        ..GenerateResponse::default()
    };

    match media.kind {
        MediaKind::Image => body.image = Some(media.data),
        MediaKind::Video => {
            if media.data.starts_with("data:") {
                body.video = Some(media.data);
            } else {
                body.video_url = Some(media.data);
            }
        }
    }

    let serialized = serde_json::to_vec(&body).map_err(|e| GenerateError::Internal(e.to_string()))?;

    if serialized.len() > RESPONSE_SIZE_WARN_BYTES {
        tracing::warn!(
            bytes = serialized.len(),
            model = %request.model.id,
            "generation response is approaching the platform size ceiling"
        );
    }

    // Content-Length is set explicitly to match the serialized body
    Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::CONTENT_LENGTH, serialized.len())
        .body(Body::from(serialized))
        .map_err(|e| GenerateError::Internal(e.to_string()))
}

/// Reject requests carrying nothing to generate from
fn validate(request: &GenerationRequest) -> Result<()> {
    let has_dynamic = request.dynamic_inputs.as_ref().is_some_and(|map| !map.is_empty());
    if request.prompt.trim().is_empty() && request.images.is_empty() && !has_dynamic {
        return Err(GenerateError::InvalidRequest(
            "prompt, an input image, or dynamic inputs are required".to_owned(),
        ));
    }
    Ok(())
}
