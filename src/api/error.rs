use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::blockchain::ChainError;

/// Errors surfaced at the HTTP boundary, always rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No transaction provided")]
    MissingTransaction,

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("{0}")]
    InvalidPayload(String),

    #[error("blocking task failed: {0}")]
    Internal(#[from] BlockingError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
