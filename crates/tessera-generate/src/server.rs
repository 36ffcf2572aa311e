use std::sync::Arc;

use tessera_config::Config;
use tessera_core::RequestContext;

use crate::error::Result;
use crate::provider::{GenerationProvider, fal::FalProvider, gemini::GeminiProvider, replicate::ReplicateProvider};
use crate::types::{GenProvider, GenerationOutput, GenerationRequest};

/// Generation server holding one adapter per provider
///
/// Dispatch is a match on the caller-declared provider tag; there is no
/// registry or capability scan.
pub struct Server {
    gemini: GeminiProvider,
    replicate: ReplicateProvider,
    fal: FalProvider,
}

impl Server {
    /// Build the generation server from configuration
    ///
    /// The schema server is shared so HTTP adapters can map generic input
    /// names against cached extractions.
    pub fn from_config(config: &Config, schema: Arc<tessera_schema::Server>) -> Self {
        Self {
            gemini: GeminiProvider::new(&config.providers.gemini),
            replicate: ReplicateProvider::new(&config.providers.replicate, Arc::clone(&schema)),
            fal: FalProvider::new(&config.providers.fal, schema),
        }
    }

    /// Run a generation request on the adapter its model selects
    pub async fn generate(&self, request: &GenerationRequest, context: &RequestContext) -> Result<GenerationOutput> {
        let provider: &dyn GenerationProvider = match request.model.provider {
            GenProvider::Gemini => &self.gemini,
            GenProvider::Replicate => &self.replicate,
            GenProvider::Fal => &self.fal,
        };

        tracing::debug!(
            provider = provider.name(),
            model = %request.model.id,
            "dispatching generation request"
        );

        provider.generate(request, context).await
    }
}
