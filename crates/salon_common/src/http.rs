// --- File: crates/salon_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{HttpStatusCode, SalonError};

/// Extension trait for SalonError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for SalonError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "code": status_code.as_u16(),
                "reason": self.reason(),
            }
        }));

        (status_code, body).into_response()
    }
}

/// Implement IntoResponse for SalonError so handlers can return it directly.
impl IntoResponse for SalonError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}
