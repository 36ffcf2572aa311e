#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod classify;
mod error;
mod extract;
mod fetch;
pub mod map;
mod resolve;
mod server;
mod store;
mod types;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tessera_core::RequestContext;

pub use error::{Result, SchemaError};
pub use extract::extract_schema;
pub use fetch::{FalSchemaFetcher, ReplicateSchemaFetcher};
pub use server::Server;
pub use store::{Clock, SchemaStore, SystemClock};
pub use types::{InputType, ModelInput, ModelParameter, ParameterType, SchemaExtraction, SchemaProvider};

/// Build the schema lookup server from configuration
pub fn build_server(config: &tessera_config::Config) -> Arc<Server> {
    Arc::new(Server::from_config(config))
}

/// Create the endpoint router for schema lookups
///
/// Model ids may contain `/` (Replicate's owner/name form), so the route
/// takes a wildcard segment; axum percent-decodes the capture.
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/models/{*model_id}", get(lookup_schema))
}

#[derive(Debug, Deserialize)]
struct LookupQuery {
    provider: Option<String>,
}

/// Successful schema lookup body
#[derive(Debug, Serialize)]
struct LookupResponse {
    success: bool,
    parameters: Vec<ModelParameter>,
    inputs: Vec<ModelInput>,
    cached: bool,
}

/// Handle `GET /models/{model_id}?provider=replicate|fal`
async fn lookup_schema(
    State(server): State<Arc<Server>>,
    axum::Extension(context): axum::Extension<RequestContext>,
    Path(model_id): Path<String>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<LookupResponse>> {
    let raw_provider = query.provider.unwrap_or_default();
    let provider = SchemaProvider::parse(&raw_provider).ok_or(SchemaError::InvalidProvider(raw_provider))?;

    tracing::debug!(%provider, model = %model_id, "schema lookup requested");

    let (extraction, cached) = server.lookup(provider, &model_id, &context).await?;

    Ok(Json(LookupResponse {
        success: true,
        parameters: extraction.parameters,
        inputs: extraction.inputs,
        cached,
    }))
}
