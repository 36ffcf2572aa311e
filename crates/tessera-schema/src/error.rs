use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use tessera_core::HttpError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors from the schema lookup path
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Missing or unrecognized `provider` query parameter
    #[error("invalid provider: {0:?}")]
    InvalidProvider(String),

    /// The target provider requires a credential and none was supplied
    #[error("missing {provider} credential")]
    MissingCredential { provider: &'static str },

    /// Schema discovery endpoint returned a non-2xx status
    #[error("schema endpoint returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Network failure reaching the schema discovery endpoint
    #[error("connection error: {0}")]
    Connection(String),
}

impl HttpError for SchemaError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidProvider(_) => StatusCode::BAD_REQUEST,
            Self::MissingCredential { .. } => StatusCode::UNAUTHORIZED,
            Self::Upstream { .. } | Self::Connection(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidProvider(_) => "invalid_request_error",
            Self::MissingCredential { .. } => "authentication_error",
            Self::Upstream { .. } => "upstream_error",
            Self::Connection(_) => "connection_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

/// Failure body shared by both endpoints: `{"success": false, "error": ...}`
#[derive(Debug, serde::Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for SchemaError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.client_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
