use http::HeaderMap;
use secrecy::SecretString;

/// Header carrying the caller's Gemini API key
pub const GEMINI_KEY_HEADER: &str = "x-gemini-api-key";
/// Header carrying the caller's Replicate API token
pub const REPLICATE_TOKEN_HEADER: &str = "x-replicate-api-token";
/// Header carrying the caller's fal key
pub const FAL_KEY_HEADER: &str = "x-fal-key";

/// Runtime context for provider requests
///
/// Shared across the schema lookup and generation request flows
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP request parts (method, URI, headers, extensions)
    pub parts: http::request::Parts,
    /// Per-provider credentials supplied by the caller via headers
    pub credentials: ProviderCredentials,
}

impl RequestContext {
    /// Access request headers
    pub fn headers(&self) -> &http::HeaderMap {
        &self.parts.headers
    }
}

/// Caller-supplied credentials, one optional secret per provider
///
/// Header values override any keys configured at the deployment level;
/// absence here does not imply a validation failure, since a configured
/// fallback key may exist
#[derive(Debug, Clone, Default)]
pub struct ProviderCredentials {
    /// Gemini API key from `x-gemini-api-key`
    pub gemini: Option<SecretString>,
    /// Replicate API token from `x-replicate-api-token`
    pub replicate: Option<SecretString>,
    /// fal key from `x-fal-key`
    pub fal: Option<SecretString>,
}

impl ProviderCredentials {
    /// Extract credentials from request headers
    ///
    /// Non-UTF-8 header values are treated as absent
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let secret = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(|value| SecretString::from(value.to_owned()))
        };

        Self {
            gemini: secret(GEMINI_KEY_HEADER),
            replicate: secret(REPLICATE_TOKEN_HEADER),
            fal: secret(FAL_KEY_HEADER),
        }
    }
}
