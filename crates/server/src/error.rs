use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use embedding::EmbeddingError;
use serde::{Deserialize, Serialize};

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Embedding(err) => match err {
                EmbeddingError::Validation(_) => StatusCode::BAD_REQUEST,
                EmbeddingError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                EmbeddingError::ProviderRateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                EmbeddingError::ProviderRejectedInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
                EmbeddingError::ProviderInternalError(_) => StatusCode::BAD_GATEWAY,
                EmbeddingError::DimensionMismatch { .. }
                | EmbeddingError::DegenerateVector
                | EmbeddingError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
            ServerError::Embedding(err) => match err {
                EmbeddingError::Validation(_) => "VALIDATION_ERROR",
                EmbeddingError::ProviderUnavailable(_) => "PROVIDER_UNAVAILABLE",
                EmbeddingError::ProviderRateLimited(_) => "PROVIDER_RATE_LIMITED",
                EmbeddingError::ProviderRejectedInput(_) => "PROVIDER_REJECTED_INPUT",
                EmbeddingError::ProviderInternalError(_) => "PROVIDER_ERROR",
                EmbeddingError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
                EmbeddingError::DegenerateVector => "DEGENERATE_VECTOR",
                EmbeddingError::InvalidConfig(_) => "CONFIG_ERROR",
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge(rejection.body_text())
        } else {
            ServerError::BadRequest(rejection.body_text())
        }
    }
}
