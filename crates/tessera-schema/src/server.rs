use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tessera_config::Config;
use tessera_core::RequestContext;

use crate::error::{Result, SchemaError};
use crate::fetch::{FalSchemaFetcher, ReplicateSchemaFetcher};
use crate::store::SchemaStore;
use crate::types::{SchemaExtraction, SchemaProvider};

/// Schema lookup server: one store, one fetcher per provider
pub struct Server {
    store: SchemaStore,
    replicate: ReplicateSchemaFetcher,
    fal: FalSchemaFetcher,
    replicate_key: Option<SecretString>,
    fal_key: Option<SecretString>,
}

impl Server {
    /// Build the schema server from configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            store: SchemaStore::new(Duration::from_secs(config.schema.ttl_secs)),
            replicate: ReplicateSchemaFetcher::new(config.providers.replicate.base_url.clone()),
            fal: FalSchemaFetcher::new(config.providers.fal.schema_base_url.clone()),
            replicate_key: config.providers.replicate.api_key.clone(),
            fal_key: config.providers.fal.api_key.clone(),
        }
    }

    /// Look up a model's extraction, serving from cache within the TTL
    ///
    /// Returns the extraction and whether it was a cache hit.
    ///
    /// # Errors
    ///
    /// Returns an error when the required credential is missing or the
    /// discovery endpoint cannot be reached
    pub async fn lookup(
        &self,
        provider: SchemaProvider,
        model_id: &str,
        context: &RequestContext,
    ) -> Result<(SchemaExtraction, bool)> {
        if let Some(hit) = self.store.lookup(provider, model_id) {
            tracing::debug!(%provider, model = %model_id, "schema cache hit");
            return Ok((hit, true));
        }

        let extraction = match provider {
            SchemaProvider::Replicate => {
                let token = context
                    .credentials
                    .replicate
                    .as_ref()
                    .or(self.replicate_key.as_ref())
                    .ok_or(SchemaError::MissingCredential { provider: "replicate" })?;
                self.replicate.fetch(model_id, token.expose_secret()).await?
            }
            SchemaProvider::Fal => {
                let key = context.credentials.fal.as_ref().or(self.fal_key.as_ref());
                self.fal.fetch(model_id, key.map(ExposeSecret::expose_secret)).await?
            }
        };

        self.store.store(provider, model_id.to_owned(), extraction.clone());
        tracing::debug!(%provider, model = %model_id, "schema extraction cached");

        Ok((extraction, false))
    }
}
