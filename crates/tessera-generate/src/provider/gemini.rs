use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tessera_config::GeminiConfig;
use tessera_core::RequestContext;

use super::{GenerationProvider, parse_provider_error};
use crate::error::{GenerateError, Result};
use crate::media::{parse_data_uri, to_data_uri};
use crate::types::{GenerationOutput, GenerationRequest, MediaKind, MediaOutput};

/// Default Generative Language API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Remediation hint surfaced on a Gemini 429
const RATE_LIMIT_HINT: &str = "The Gemini free tier allows a limited number of requests per minute; wait a moment before retrying.";

/// Gemini direct-API provider
///
/// One `generateContent` call per request: a single user content carrying
/// the prompt and any input images as inline parts.
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl GeminiProvider {
    /// Create from provider configuration
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            api_key: config.api_key.clone(),
        }
    }

    /// Resolve the API key from the request context or configuration
    fn resolve_api_key(&self, context: &RequestContext) -> Option<String> {
        context
            .credentials
            .gemini
            .as_ref()
            .or(self.api_key.as_ref())
            .map(|key| key.expose_secret().to_owned())
    }

    /// Build the `generateContent` endpoint URL for a model
    fn generate_url(&self, model: &str, api_key: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/models/{model}:generateContent?key={api_key}")
    }
}

/// Wire format for the `generateContent` request
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseModalities")]
    response_modalities: Vec<String>,
    #[serde(rename = "imageConfig", skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Serialize)]
struct ImageConfig {
    #[serde(rename = "aspectRatio", skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<String>,
    #[serde(rename = "imageSize", skip_serializing_if = "Option::is_none")]
    image_size: Option<String>,
}

#[derive(Serialize)]
struct Tool {
    #[serde(rename = "googleSearch")]
    google_search: serde_json::Map<String, Value>,
}

/// Wire format for the `generateContent` response
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// Assemble the request parts and capability-dependent generation config
///
/// Gemini takes input images inline only, so every image must be a base64
/// data URI. A request whose images are all plain URLs is rejected rather
/// than silently degraded to prompt-only generation; when at least one
/// image is usable, the rest are skipped with a warning.
fn build_request(request: &GenerationRequest) -> Result<GeminiRequest> {
    let mut parts = vec![Part {
        text: Some(request.prompt.clone()),
        inline_data: None,
    }];

    for image in &request.images {
        let Some((mime_type, bytes)) = parse_data_uri(image) else {
            tracing::warn!(model = %request.model.id, "skipping input image that is not a base64 data URI");
            continue;
        };
        parts.push(Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type,
                data: {
                    use base64::Engine;
                    base64::engine::general_purpose::STANDARD.encode(bytes)
                },
            }),
        });
    }

    if !request.images.is_empty() && parts.len() == 1 {
        return Err(GenerateError::InvalidRequest(
            "gemini input images must be base64 data URIs".to_owned(),
        ));
    }

    let parameter = |name: &str| {
        request
            .parameters
            .as_ref()
            .and_then(|map| map.get(name))
            .and_then(Value::as_str)
            .map(str::to_owned)
    };

    let image_config = if request.model.has_capability("resolution") {
        Some(ImageConfig {
            aspect_ratio: parameter("aspect_ratio"),
            image_size: parameter("resolution"),
        })
    } else {
        parameter("aspect_ratio").map(|ratio| ImageConfig {
            aspect_ratio: Some(ratio),
            image_size: None,
        })
    };

    let tools = request.model.has_capability("search").then(|| {
        vec![Tool {
            google_search: serde_json::Map::new(),
        }]
    });

    Ok(GeminiRequest {
        contents: vec![Content {
            role: "user".to_owned(),
            parts,
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["IMAGE".to_owned(), "TEXT".to_owned()],
            image_config,
        },
        tools,
    })
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest, context: &RequestContext) -> Result<GenerationOutput> {
        let api_key = self
            .resolve_api_key(context)
            .ok_or(GenerateError::MissingCredential { provider: "gemini" })?;

        let wire_request = build_request(request)?;
        let url = self.generate_url(&request.model.id, &api_key);

        tracing::debug!(model = %request.model.id, "sending gemini generation request");

        let response = self.client.post(&url).json(&wire_request).send().await.map_err(|e| {
            tracing::error!(model = %request.model.id, error = %e, "gemini request failed");
            GenerateError::Connection(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = parse_provider_error(&body).unwrap_or_else(|| format!("HTTP {status}"));

            if status.as_u16() == 429 {
                return Err(GenerateError::RateLimited {
                    model: request.model.name.clone(),
                    hint: RATE_LIMIT_HINT.to_owned(),
                });
            }
            return Err(GenerateError::Provider {
                model: request.model.name.clone(),
                message,
            });
        }

        let wire_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Connection(format!("failed to parse gemini response: {e}")))?;

        let parts = wire_response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .filter(|parts| !parts.is_empty())
            .ok_or_else(|| GenerateError::EmptyResponse {
                model: request.model.name.clone(),
            })?;

        // An inline image part wins; a text-only answer is a refusal
        if let Some(inline) = parts.iter().find_map(|part| part.inline_data.as_ref()) {
            use base64::Engine;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(&inline.data)
                .map_err(|e| GenerateError::Connection(format!("invalid inline image payload: {e}")))?;

            return Ok(GenerationOutput {
                outputs: vec![MediaOutput {
                    kind: MediaKind::Image,
                    data: to_data_uri(&inline.mime_type, &bytes),
                    url: None,
                    content_type: inline.mime_type.clone(),
                }],
            });
        }

        if let Some(text) = parts.iter().find_map(|part| part.text.as_deref()) {
            return Err(GenerateError::Refused {
                model: request.model.name.clone(),
                message: text.to_owned(),
            });
        }

        Err(GenerateError::EmptyResponse {
            model: request.model.name.clone(),
        })
    }
}
