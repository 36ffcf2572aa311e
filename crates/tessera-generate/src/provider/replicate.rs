use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tessera_config::ReplicateConfig;
use tessera_core::RequestContext;
use tessera_schema::SchemaProvider;

use super::{GenerationProvider, parse_provider_error};
use crate::error::{GenerateError, Result};
use crate::inputs::build_payload;
use crate::media::resolve_output_url;
use crate::types::{GenerationOutput, GenerationRequest};

/// Default Replicate API base URL
const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";

/// Remediation hint surfaced on a Replicate 429
const RATE_LIMIT_HINT: &str = "Replicate rate-limits prediction creation per account; wait a few seconds and retry.";

/// Replicate asynchronous provider
///
/// Submits a prediction, then polls its status at a fixed interval until a
/// terminal state or the wall-clock ceiling, whichever comes first. The
/// interval is deliberately fixed rather than backing off.
pub struct ReplicateProvider {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
    poll_interval: Duration,
    poll_timeout: Duration,
    schema: Arc<tessera_schema::Server>,
}

/// Prediction wire format, shared by submission and status fetches
#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    #[serde(default)]
    get: Option<String>,
}

impl Prediction {
    fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "failed" | "canceled")
    }

    fn error_message(&self) -> String {
        self.error
            .as_ref()
            .map_or_else(|| "prediction failed".to_owned(), |error| {
                error.as_str().map_or_else(|| error.to_string(), str::to_owned)
            })
    }
}

impl ReplicateProvider {
    /// Create from provider configuration and the shared schema server
    pub fn new(config: &ReplicateConfig, schema: Arc<tessera_schema::Server>) -> Self {
        Self {
            client: Client::new(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            api_key: config.api_key.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            poll_timeout: Duration::from_secs(config.poll_timeout_secs),
            schema,
        }
    }

    /// Declared property names for the model, or empty when the schema
    /// cannot be fetched (generation proceeds on default field names)
    async fn property_names(&self, request: &GenerationRequest, context: &RequestContext) -> Vec<String> {
        match self
            .schema
            .lookup(SchemaProvider::Replicate, &request.model.id, context)
            .await
        {
            Ok((extraction, _)) => extraction.property_names(),
            Err(e) => {
                tracing::warn!(model = %request.model.id, error = %e, "replicate schema unavailable; using default field names");
                Vec::new()
            }
        }
    }

    /// Submit the prediction and return its initial state
    async fn submit(&self, request: &GenerationRequest, token: &str, input: Value) -> Result<Prediction> {
        let url = format!(
            "{}/models/{}/predictions",
            self.base_url.trim_end_matches('/'),
            request.model.id
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {token}"))
            .json(&serde_json::json!({ "input": input }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model = %request.model.id, error = %e, "replicate submission failed");
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
            tracing::warn!(model = %request.model.id, status = %status, "replicate returned error");
            return Err(GenerateError::Provider {
                model: request.model.name.clone(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GenerateError::Connection(format!("failed to parse prediction: {e}")))
    }

    /// Fetch the current state of a prediction
    async fn fetch_status(&self, prediction: &Prediction, request: &GenerationRequest, token: &str) -> Result<Prediction> {
        let url = prediction
            .urls
            .as_ref()
            .and_then(|urls| urls.get.clone())
            .unwrap_or_else(|| {
                format!("{}/predictions/{}", self.base_url.trim_end_matches('/'), prediction.id)
            });

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| GenerateError::Connection(format!("prediction status fetch failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = parse_provider_error(&body).unwrap_or_else(|| format!("HTTP {status}"));
            return Err(GenerateError::Provider {
                model: request.model.name.clone(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GenerateError::Connection(format!("failed to parse prediction: {e}")))
    }

    /// Poll until the prediction reaches a terminal state or the ceiling
    /// elapses
    async fn poll_until_terminal(
        &self,
        mut prediction: Prediction,
        request: &GenerationRequest,
        token: &str,
    ) -> Result<Prediction> {
        let deadline = Instant::now() + self.poll_timeout;

        while !prediction.is_terminal() {
            if Instant::now() >= deadline {
                tracing::warn!(model = %request.model.id, prediction = %prediction.id, "poll ceiling elapsed");
                return Err(GenerateError::Timeout {
                    model: request.model.name.clone(),
                });
            }

            tokio::time::sleep(self.poll_interval).await;
            prediction = self.fetch_status(&prediction, request, token).await?;
        }

        Ok(prediction)
    }
}

/// The first element of a list output is authoritative; a scalar output
/// stands alone
fn first_output(output: &Value) -> Option<&Value> {
    match output {
        Value::Array(entries) => entries.first(),
        other => Some(other),
    }
}

#[async_trait]
impl GenerationProvider for ReplicateProvider {
    fn name(&self) -> &str {
        "replicate"
    }

    async fn generate(&self, request: &GenerationRequest, context: &RequestContext) -> Result<GenerationOutput> {
        let token = context
            .credentials
            .replicate
            .as_ref()
            .or(self.api_key.as_ref())
            .map(|key| key.expose_secret().to_owned())
            .ok_or(GenerateError::MissingCredential { provider: "replicate" })?;

        let property_names = if request.dynamic_inputs.as_ref().is_some_and(|map| !map.is_empty()) {
            Vec::new()
        } else {
            self.property_names(request, context).await
        };

        let input = build_payload(request, &property_names, "prompt", "image");

        tracing::debug!(model = %request.model.id, "submitting replicate prediction");

        let prediction = self.submit(request, &token, Value::Object(input)).await?;
        let prediction = self.poll_until_terminal(prediction, request, &token).await?;

        match prediction.status.as_str() {
            "succeeded" => {
                let output = prediction.output.as_ref().and_then(first_output).and_then(Value::as_str);
                let Some(media_url) = output else {
                    return Err(GenerateError::EmptyResponse {
                        model: request.model.name.clone(),
                    });
                };

                let media = resolve_output_url(&self.client, media_url, &request.model.name).await?;
                Ok(GenerationOutput { outputs: vec![media] })
            }
            "canceled" => Err(GenerateError::Provider {
                model: request.model.name.clone(),
                message: "prediction was canceled".to_owned(),
            }),
            _ => Err(GenerateError::Provider {
                model: request.model.name.clone(),
                message: prediction.error_message(),
            }),
        }
    }
}
