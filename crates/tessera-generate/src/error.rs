use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use tessera_core::HttpError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenerateError>;

/// Errors from the generation path
///
/// Nothing here is retried inside the core; retry, if any, is the
/// caller's responsibility.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Caller's fault: missing prompt/image or malformed request
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The target provider requires a credential and none was supplied
    #[error("missing {provider} API key")]
    MissingCredential { provider: &'static str },

    /// Provider signaled 429; the hint names the provider-specific remedy
    #[error("{model}: rate limit exceeded. {hint}")]
    RateLimited { model: String, hint: String },

    /// Provider returned a structured failure, or a job reached a
    /// failed/canceled terminal state
    #[error("{model}: {message}")]
    Provider { model: String, message: String },

    /// Poll ceiling elapsed before the job reached a terminal state;
    /// the job may still complete server-side
    #[error("generation timed out for {model}")]
    Timeout { model: String },

    /// Provider answered with text instead of media
    #[error("{model} declined to generate an image: {message}")]
    Refused { model: String, message: String },

    /// Provider succeeded but produced no usable image, video, or text
    #[error("{model} returned an empty response")]
    EmptyResponse { model: String },

    /// Network failure reaching the provider
    #[error("connection error: {0}")]
    Connection(String),

    /// Unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl HttpError for GenerateError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::MissingCredential { .. } => StatusCode::UNAUTHORIZED,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Provider { .. }
            | Self::Timeout { .. }
            | Self::Refused { .. }
            | Self::EmptyResponse { .. }
            | Self::Connection(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::MissingCredential { .. } => "authentication_error",
            Self::RateLimited { .. } => "rate_limit_error",
            Self::Provider { .. } => "provider_error",
            Self::Timeout { .. } => "timeout_error",
            Self::Refused { .. } => "provider_refusal",
            Self::EmptyResponse { .. } => "empty_response_error",
            Self::Connection(_) => "connection_error",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "internal server error".to_owned(),
            other => other.to_string(),
        }
    }
}

/// Failure body shared by both endpoints: `{"success": false, "error": ...}`
#[derive(Debug, serde::Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.client_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
