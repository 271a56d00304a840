use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::database::StoreError;
use crate::services::payment_gateway::GatewayError;

/// Errors surfaced to HTTP clients.
///
/// Every variant renders as `{ "error": true, "message": ... }`. Internal
/// details are logged where the error is raised and never returned.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid authorization")]
    Unauthorized,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Internal server error")]
    Internal,

    #[error("Payment gateway error")]
    Gateway,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidArgument(_) | ApiError::InvalidState(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal | ApiError::Gateway => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: true,
            message: self.to_string(),
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SeatsExhausted => ApiError::InvalidState(err.to_string()),
            StoreError::CardNotFound => ApiError::InvalidState(err.to_string()),
            StoreError::Backend(msg) => {
                log::error!("❌ Store error: {}", msg);
                ApiError::Internal
            }
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        log::error!("❌ Payment gateway error: {}", err);
        ApiError::Gateway
    }
}
