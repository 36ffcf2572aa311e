//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use secrecy::SecretString;
use tessera_config::{
    Config, CorsConfig, FalConfig, GeminiConfig, HealthConfig, ProvidersConfig, ReplicateConfig, SchemaConfig,
    ServerConfig,
};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    ///
    /// Polling is tightened so Replicate tests finish in milliseconds
    /// rather than the production defaults.
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                    cors: None,
                },
                providers: ProvidersConfig {
                    gemini: GeminiConfig::default(),
                    replicate: ReplicateConfig {
                        poll_interval_ms: 10,
                        poll_timeout_secs: 5,
                        ..ReplicateConfig::default()
                    },
                    fal: FalConfig::default(),
                },
                schema: SchemaConfig::default(),
            },
        }
    }

    /// Point the Gemini adapter at a mock backend
    pub fn with_gemini(mut self, base_url: &str) -> Self {
        self.config.providers.gemini.base_url = Some(base_url.to_owned());
        self
    }

    /// Set a deployment-level Gemini API key fallback
    pub fn with_gemini_key(mut self, key: &str) -> Self {
        self.config.providers.gemini.api_key = Some(SecretString::from(key));
        self
    }

    /// Point the Replicate adapter (generation and schema) at a mock backend
    pub fn with_replicate(mut self, base_url: &str) -> Self {
        self.config.providers.replicate.base_url = Some(base_url.to_owned());
        self
    }

    /// Set a deployment-level Replicate API token fallback
    pub fn with_replicate_key(mut self, key: &str) -> Self {
        self.config.providers.replicate.api_key = Some(SecretString::from(key));
        self
    }

    /// Set the Replicate poll ceiling in seconds
    pub fn with_replicate_poll_timeout(mut self, secs: u64) -> Self {
        self.config.providers.replicate.poll_timeout_secs = secs;
        self
    }

    /// Point the fal generation adapter at a mock backend
    pub fn with_fal(mut self, base_url: &str) -> Self {
        self.config.providers.fal.base_url = Some(base_url.to_owned());
        self
    }

    /// Point fal schema discovery at a mock backend
    pub fn with_fal_schema(mut self, base_url: &str) -> Self {
        self.config.providers.fal.schema_base_url = Some(base_url.to_owned());
        self
    }

    /// Set a deployment-level fal key fallback
    pub fn with_fal_key(mut self, key: &str) -> Self {
        self.config.providers.fal.api_key = Some(SecretString::from(key));
        self
    }

    /// Set the schema cache time-to-live in seconds
    pub fn with_schema_ttl(mut self, secs: u64) -> Self {
        self.config.schema.ttl_secs = secs;
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable the health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
