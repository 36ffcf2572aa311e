use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tessera_config::FalConfig;
use tessera_core::RequestContext;
use tessera_schema::SchemaProvider;

use super::{GenerationProvider, parse_provider_error};
use crate::error::{GenerateError, Result};
use crate::inputs::build_payload;
use crate::media::resolve_output_url;
use crate::types::{GenerationOutput, GenerationRequest};

/// Default fal synchronous execution base URL
const DEFAULT_BASE_URL: &str = "https://fal.run";

/// Remediation hint surfaced on a fal 429
const RATE_LIMIT_HINT: &str = "fal throttles by account tier; wait before retrying or raise your concurrency limit.";

/// fal synchronous-HTTP provider
///
/// One POST per request; the endpoint blocks until the media is ready and
/// returns its URL in the body.
pub struct FalProvider {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
    schema: Arc<tessera_schema::Server>,
}

impl FalProvider {
    /// Create from provider configuration and the shared schema server
    pub fn new(config: &FalConfig, schema: Arc<tessera_schema::Server>) -> Self {
        Self {
            client: Client::new(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            api_key: config.api_key.clone(),
            schema,
        }
    }

    /// Declared property names for the model, or empty when the schema
    /// cannot be fetched (generation proceeds on default field names)
    async fn property_names(&self, request: &GenerationRequest, context: &RequestContext) -> Vec<String> {
        match self.schema.lookup(SchemaProvider::Fal, &request.model.id, context).await {
            Ok((extraction, _)) => extraction.property_names(),
            Err(e) => {
                tracing::warn!(model = %request.model.id, error = %e, "fal schema unavailable; using default field names");
                Vec::new()
            }
        }
    }
}

/// Find the authoritative media URL in a fal response body
///
/// Known output shapes, in precedence order: `images[0].url`, `image.url`,
/// `video.url`, and a top-level `url`.
fn find_media_url(body: &Value) -> Option<String> {
    if let Some(url) = body
        .get("images")
        .and_then(Value::as_array)
        .and_then(|images| images.first())
        .and_then(|image| image.get("url"))
        .and_then(Value::as_str)
    {
        return Some(url.to_owned());
    }

    for key in ["image", "video"] {
        if let Some(url) = body.get(key).and_then(|media| media.get("url")).and_then(Value::as_str) {
            return Some(url.to_owned());
        }
    }

    body.get("url").and_then(Value::as_str).map(str::to_owned)
}

#[async_trait]
impl GenerationProvider for FalProvider {
    fn name(&self) -> &str {
        "fal"
    }

    async fn generate(&self, request: &GenerationRequest, context: &RequestContext) -> Result<GenerationOutput> {
        // Credential check happens before any network I/O
        let api_key = context
            .credentials
            .fal
            .as_ref()
            .or(self.api_key.as_ref())
            .map(|key| key.expose_secret().to_owned())
            .ok_or(GenerateError::MissingCredential { provider: "fal" })?;

        let property_names = if request.dynamic_inputs.as_ref().is_some_and(|map| !map.is_empty()) {
            Vec::new()
        } else {
            self.property_names(request, context).await
        };

        let payload = build_payload(request, &property_names, "prompt", "image_url");
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), request.model.id);

        tracing::debug!(model = %request.model.id, "sending fal generation request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Key {api_key}"))
            .json(&Value::Object(payload))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model = %request.model.id, error = %e, "fal request failed");
                GenerateError::Connection(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                return Err(GenerateError::RateLimited {
                    model: request.model.name.clone(),
                    hint: RATE_LIMIT_HINT.to_owned(),
                });
            }
            let message = parse_provider_error(&body).unwrap_or_else(|| format!("HTTP {status}"));
            tracing::warn!(model = %request.model.id, status = %status, "fal returned error");
            return Err(GenerateError::Provider {
                model: request.model.name.clone(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GenerateError::Connection(format!("failed to parse fal response: {e}")))?;

        let media_url = find_media_url(&body).ok_or_else(|| GenerateError::EmptyResponse {
            model: request.model.name.clone(),
        })?;

        let output = resolve_output_url(&self.client, &media_url, &request.model.name).await?;

        Ok(GenerationOutput { outputs: vec![output] })
    }
}
