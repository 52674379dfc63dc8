//! Error types for the gateway.

use crate::api::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use whatsapp_client::TransportError;

/// Gateway error types.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotReady(String),

    #[error("Recipient is not registered on WhatsApp: {0}")]
    UnregisteredRecipient(String),

    #[error("{0}")]
    Transport(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Default not-ready error for send operations.
    pub fn not_ready() -> Self {
        GatewayError::NotReady("WhatsApp client is not ready. Please scan QR code first.".into())
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::UnregisteredRecipient(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller caused the failure.
    fn is_client_fault(&self) -> bool {
        matches!(
            self,
            GatewayError::Validation(_)
                | GatewayError::NotReady(_)
                | GatewayError::RateLimitExceeded
        )
    }

    /// Attach the endpoint's failure message for the HTTP response.
    pub fn during(self, failure: &'static str) -> ApiError {
        ApiError {
            error: self,
            failure,
        }
    }
}

impl From<TransportError> for GatewayError {
    fn from(e: TransportError) -> Self {
        GatewayError::Transport(e.to_string())
    }
}

/// A [`GatewayError`] raised while serving a specific endpoint.
#[derive(Debug)]
pub struct ApiError {
    pub error: GatewayError,
    pub failure: &'static str,
}

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        error.during("Request failed")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();

        // Client faults explain themselves; server faults keep the detail separate.
        let body: ApiResponse<()> = if self.error.is_client_fault() {
            ApiResponse::failure(self.error.to_string(), None)
        } else {
            ApiResponse::failure(self.failure, Some(self.error.to_string()))
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
