//! Provider trait and the three adapter implementations

pub mod fal;
pub mod gemini;
pub mod replicate;

use async_trait::async_trait;
use serde_json::Value;
use tessera_core::RequestContext;

use crate::error::Result;
use crate::types::{GenerationOutput, GenerationRequest};

/// Trait implemented by each generation adapter
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Provider name for logs and dispatch diagnostics
    fn name(&self) -> &str;

    /// Run one generation request to completion
    async fn generate(&self, request: &GenerationRequest, context: &RequestContext) -> Result<GenerationOutput>;
}

/// Pull a human-readable message out of a provider error body
///
/// Providers disagree on their error envelope; the known shapes are
/// `{"detail": "..."}`, `{"detail": [{"msg": "..."}]}`,
/// `{"error": {"message": "..."}}`, `{"error": "..."}`, and
/// `{"message": "..."}`. Unparseable bodies fall through to the raw text.
pub(crate) fn parse_provider_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    if let Some(detail) = value.get("detail") {
        if let Some(text) = detail.as_str() {
            return Some(text.to_owned());
        }
        if let Some(first) = detail.as_array().and_then(|entries| entries.first()) {
            if let Some(msg) = first.get("msg").and_then(Value::as_str) {
                return Some(msg.to_owned());
            }
            return Some(first.to_string());
        }
    }

    if let Some(error) = value.get("error") {
        if let Some(message) = error.get("message").and_then(Value::as_str) {
            return Some(message.to_owned());
        }
        if let Some(text) = error.as_str() {
            return Some(text.to_owned());
        }
    }

    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
}
