use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelscope_catalog::UpstreamFailure;
use reelscope_core::error::{ApiError, ErrorEnvelope};

/// Newtype wrapper so we can implement `IntoResponse` in this crate.
#[derive(Debug)]
pub struct AppError(pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope::from(&self.0);
        (status, Json(envelope)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl From<UpstreamFailure> for AppError {
    fn from(e: UpstreamFailure) -> Self {
        Self(match e {
            UpstreamFailure::RateLimited => ApiError::RateLimited,
            UpstreamFailure::NotFound => ApiError::NotFound("catalog resource not found".into()),
            UpstreamFailure::Unauthorized => ApiError::CredentialMissing,
            UpstreamFailure::UpstreamError { status, message } => {
                ApiError::Upstream { status, message }
            }
        })
    }
}
