#![allow(clippy::must_use_candidate)]

mod context;
mod error;

pub use context::{FAL_KEY_HEADER, GEMINI_KEY_HEADER, ProviderCredentials, REPLICATE_TOKEN_HEADER, RequestContext};
pub use error::HttpError;
