//! Error types for the HTTP service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, warn};

/// Webhook handler errors with HTTP status code mapping.
///
/// Only the orchestrator produces non-200 responses; gateway and resolver
/// failures are recovered into values and reported in-band inside the 200
/// decision body. The mapping follows the documented contract:
///
/// - `400 Bad Request`: the body could not be parsed
/// - `401 Unauthorized`: signature verification failed
/// - `500 Internal Server Error`: unexpected per-request failure
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The request body is not a valid event payload.
    ///
    /// Maps to: `400 Bad Request`.
    #[error("Invalid request body: {message}")]
    MalformedBody { message: String },

    /// The `X-Hub-Signature-256` header is absent or does not match the
    /// configured secret. The request is aborted before any GitHub call.
    ///
    /// Maps to: `401 Unauthorized`.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Catch-all for failures outside the classified cases. The request
    /// fails; the process does not.
    ///
    /// Maps to: `500 Internal Server Error`.
    #[error("Unexpected error processing webhook: {message}")]
    Internal { message: String },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MalformedBody { message } => {
                warn!(error = %message, "Rejecting malformed webhook body");
                StatusCode::BAD_REQUEST
            }
            Self::InvalidSignature => {
                error!("Rejecting webhook with invalid signature");
                StatusCode::UNAUTHORIZED
            }
            Self::Internal { message } => {
                error!(error = %message, "Unexpected error while processing webhook");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (status, Json(body)).into_response()
    }
}

/// Service-level errors.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },
}

/// Configuration errors, surfaced at startup only.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] deploy_warden_core::ValidationError),

    #[error("Configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
