use serde::Deserialize;
use serde_json::{Map, Value};

/// Generation provider selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenProvider {
    /// Gemini direct API
    Gemini,
    /// Replicate asynchronous predictions
    Replicate,
    /// fal synchronous endpoints
    Fal,
}

impl std::fmt::Display for GenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => f.write_str("gemini"),
            Self::Replicate => f.write_str("replicate"),
            Self::Fal => f.write_str("fal"),
        }
    }
}

/// The model the caller wants to generate with
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSelector {
    /// Provider-side model identifier (e.g. "owner/model" for Replicate)
    pub id: String,
    /// Display name used in error messages
    pub name: String,
    /// Which adapter handles the request
    pub provider: GenProvider,
    /// Capability flags (e.g. "resolution", "search")
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Optional description, unused by the adapters
    #[serde(default)]
    pub description: Option<String>,
}

impl ModelSelector {
    /// Whether the model advertises a capability flag
    pub fn has_capability(&self, flag: &str) -> bool {
        self.capabilities.iter().any(|capability| capability == flag)
    }
}

/// Caller-facing generation request
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    /// Text prompt
    #[serde(default)]
    pub prompt: String,
    /// Input images as data URIs or URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// Target model
    pub model: ModelSelector,
    /// Tunable parameters keyed by the provider's field names
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
    /// Explicit field-name-to-value map from connected graph nodes;
    /// bypasses heuristic input mapping entirely when present
    #[serde(default, rename = "dynamicInputs")]
    pub dynamic_inputs: Option<Map<String, Value>>,
}

/// Kind of generated media
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// One normalized generation result
#[derive(Debug, Clone)]
pub struct MediaOutput {
    /// Media kind derived from the content type
    pub kind: MediaKind,
    /// Inline data URI, or the bare remote URL for oversized videos
    pub data: String,
    /// Remote URL when the provider returned one
    pub url: Option<String>,
    /// Declared content type
    pub content_type: String,
}

/// Normalized adapter result
#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
    /// Generated media; the first entry is authoritative
    pub outputs: Vec<MediaOutput>,
}
