#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod providers;
pub mod schema;
pub mod server;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use providers::*;
pub use schema::*;
pub use server::*;

/// Top-level Tessera configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Generation provider configuration
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Schema extraction cache configuration
    #[serde(default)]
    pub schema: SchemaConfig,
}
