use reqwest::Client;
use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::extract::extract_schema;
use crate::resolve::resolve_ref;
use crate::types::SchemaExtraction;

/// Default Replicate API base URL
const DEFAULT_REPLICATE_BASE_URL: &str = "https://api.replicate.com/v1";

/// Default fal schema discovery base URL
const DEFAULT_FAL_SCHEMA_BASE_URL: &str = "https://fal.ai";

/// Fetches a Replicate model's input schema
///
/// The model document nests an OpenAPI schema under the latest version;
/// the input schema lives in its components table.
pub struct ReplicateSchemaFetcher {
    client: Client,
    base_url: String,
}

impl ReplicateSchemaFetcher {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_REPLICATE_BASE_URL.to_owned()),
        }
    }

    /// Fetch and extract the input schema for `model_id` (owner/name form)
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response. A
    /// document that parses as JSON but lacks a usable input schema yields
    /// an empty extraction instead.
    pub async fn fetch(&self, model_id: &str, token: &str) -> Result<SchemaExtraction> {
        let url = format!("{}/models/{model_id}", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model = %model_id, error = %e, "replicate schema fetch failed");
                SchemaError::Connection(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(model = %model_id, status = %status, "replicate schema endpoint returned error");
            return Err(SchemaError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let document: Value = response
            .json()
            .await
            .map_err(|e| SchemaError::Connection(format!("failed to parse model document: {e}")))?;

        Ok(extract_replicate_document(&document))
    }
}

/// Pull the input schema out of a Replicate model document
fn extract_replicate_document(document: &Value) -> SchemaExtraction {
    let Some(schemas) = document
        .pointer("/latest_version/openapi_schema/components/schemas")
        .and_then(Value::as_object)
    else {
        tracing::warn!("replicate model document has no openapi schema; returning empty extraction");
        return SchemaExtraction::default();
    };

    let Some(input) = schemas.get("Input") else {
        tracing::warn!("replicate openapi schema has no Input definition; returning empty extraction");
        return SchemaExtraction::default();
    };

    extract_schema(input, Some(schemas))
}

/// Fetches a fal endpoint's input schema from its queue OpenAPI document
///
/// Unlike Replicate, the document does not name the input schema directly:
/// the declared HTTP operations are scanned for the one accepting a JSON
/// request body, and its referenced schema is resolved.
pub struct FalSchemaFetcher {
    client: Client,
    base_url: String,
}

impl FalSchemaFetcher {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_FAL_SCHEMA_BASE_URL.to_owned()),
        }
    }

    /// Fetch and extract the input schema for a fal endpoint id
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response;
    /// unusable documents yield an empty extraction.
    pub async fn fetch(&self, model_id: &str, key: Option<&str>) -> Result<SchemaExtraction> {
        let url = format!(
            "{}/api/openapi/queue/openapi.json?endpoint_id={model_id}",
            self.base_url.trim_end_matches('/')
        );

        let mut request = self.client.get(&url);
        if let Some(key) = key {
            request = request.header("Authorization", format!("Key {key}"));
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(model = %model_id, error = %e, "fal schema fetch failed");
            SchemaError::Connection(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(model = %model_id, status = %status, "fal schema endpoint returned error");
            return Err(SchemaError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let document: Value = response
            .json()
            .await
            .map_err(|e| SchemaError::Connection(format!("failed to parse openapi document: {e}")))?;

        Ok(extract_fal_document(&document))
    }
}

/// Scan a fal OpenAPI document for the JSON-accepting operation and
/// extract its referenced input schema
fn extract_fal_document(document: &Value) -> SchemaExtraction {
    let schemas = document.pointer("/components/schemas").and_then(Value::as_object);

    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        tracing::warn!("fal openapi document has no paths; returning empty extraction");
        return SchemaExtraction::default();
    };

    for path_item in paths.values() {
        let Some(operations) = path_item.as_object() else {
            continue;
        };
        for operation in operations.values() {
            // "application/json" escapes to "application~1json" in a JSON pointer
            let Some(reference) = operation
                .pointer("/requestBody/content/application~1json/schema/$ref")
                .and_then(Value::as_str)
            else {
                continue;
            };
            let Some(input) = schemas.and_then(|table| resolve_ref(reference, table)) else {
                continue;
            };
            return extract_schema(input, schemas);
        }
    }

    tracing::warn!("fal openapi document has no JSON request operation; returning empty extraction");
    SchemaExtraction::default()
}
