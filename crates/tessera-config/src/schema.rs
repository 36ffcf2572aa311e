use serde::Deserialize;

/// Schema extraction cache configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Time-to-live for cached extractions, in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

const fn default_ttl_secs() -> u64 {
    600
}
