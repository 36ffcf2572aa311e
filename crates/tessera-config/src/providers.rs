use secrecy::SecretString;
use serde::Deserialize;

/// Configuration for the three generation providers
///
/// API keys configured here act as deployment-level fallbacks; a key
/// supplied in request headers always takes precedence
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvidersConfig {
    /// Gemini (direct API) provider
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Replicate (asynchronous poll) provider
    #[serde(default)]
    pub replicate: ReplicateConfig,
    /// fal (synchronous HTTP) provider
    #[serde(default)]
    pub fal: FalConfig,
}

/// Gemini provider configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key fallback when the request carries none
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override (defaults to the Generative Language API)
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Replicate provider configuration
///
/// The same base URL serves prediction submission, status polling, and
/// schema discovery
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplicateConfig {
    /// API token fallback when the request carries none
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override (defaults to `https://api.replicate.com/v1`)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Delay between prediction status polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Wall-clock ceiling for a prediction to reach a terminal state, in seconds
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
}

impl Default for ReplicateConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            poll_interval_ms: default_poll_interval_ms(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

const fn default_poll_interval_ms() -> u64 {
    1000
}

const fn default_poll_timeout_secs() -> u64 {
    300
}

/// fal provider configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FalConfig {
    /// Key fallback when the request carries none
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Generation base URL override (defaults to `https://fal.run`)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Schema discovery base URL override (defaults to `https://fal.ai`)
    #[serde(default)]
    pub schema_base_url: Option<String>,
}
