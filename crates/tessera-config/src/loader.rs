use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if timing or cache settings are out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.schema.ttl_secs == 0 {
            anyhow::bail!("schema.ttl_secs must be greater than zero");
        }

        let replicate = &self.providers.replicate;
        if replicate.poll_interval_ms == 0 {
            anyhow::bail!("providers.replicate.poll_interval_ms must be greater than zero");
        }
        if replicate.poll_timeout_secs == 0 {
            anyhow::bail!("providers.replicate.poll_timeout_secs must be greater than zero");
        }

        Ok(())
    }
}
