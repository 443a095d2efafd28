pub mod discover;
pub mod health;
pub mod swipe;

pub use discover::discover_handler;
pub use health::health_handler;
pub use swipe::swipe_handler;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::common::CoreError;

/// Maps the core error taxonomy to HTTP responses.
///
/// Absence and validation problems are the caller's fault and come back as
/// 400 with a message; infrastructure failures come back as an opaque 500 so
/// internal detail never leaks to clients.
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_not_found() || matches!(err.root(), CoreError::Validation(_)) {
            let body = json!({ "error": err.root().to_string() });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }

        tracing::error!(error = %err, "request failed");
        let body = json!({ "error": "internal server error" });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
