//! HTTP mapping for core errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use tracing::warn;

use prenda_core::CommerceError;

/// Wrapper giving core errors an HTTP shape. Every REST handler returns
/// `Result<_, ApiError>` and lets `?` do the mapping.
pub struct ApiError(pub CommerceError);

impl From<CommerceError> for ApiError {
    fn from(e: CommerceError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CommerceError::Validation(_) => StatusCode::BAD_REQUEST,
            CommerceError::NotFound(_) => StatusCode::NOT_FOUND,
            CommerceError::RemoteService(_) | CommerceError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            warn!(error = %self.0, "Request failed");
        }

        let body = Json(serde_json::json!({
            "success": false,
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}
