use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use loan_servicing_core::ServicingError;

/// API-facing error envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Servicing(#[from] ServicingError),

    #[error("Internal server error")]
    LockPoisoned,
}

impl<T> From<std::sync::PoisonError<T>> for ApiError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        ApiError::LockPoisoned
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Servicing(err) => (status_for(err), error_code(err)),
            ApiError::LockPoisoned => {
                tracing::error!("store lock poisoned");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };

        let body = Json(json!({
            "error": code,
            "detail": self.to_string(),
        }));
        (status, body).into_response()
    }
}

fn status_for(err: &ServicingError) -> StatusCode {
    match err {
        ServicingError::ArrearsNotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn error_code(err: &ServicingError) -> &'static str {
    match err {
        ServicingError::InvalidLine { .. } => "invalid_line",
        ServicingError::InvalidAmount { .. } => "invalid_amount",
        ServicingError::ArrearsNotFound { .. } => "arrears_not_found",
        ServicingError::NoTargets => "no_targets",
        ServicingError::NotNsf { .. } => "not_nsf",
    }
}

/// Helper type for API results
pub type ApiResult<T> = Result<T, ApiError>;
