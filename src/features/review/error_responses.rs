use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::data::models::ReviewError;

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ReviewError::NotLoggedIn => (StatusCode::UNAUTHORIZED, self.to_string()),
            ReviewError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ReviewError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ReviewError::DatabaseError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", e),
            ),
            ReviewError::PoolError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Connection pool error: {}", e),
            ),
        };

        let body = json!({
            "error": message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}
