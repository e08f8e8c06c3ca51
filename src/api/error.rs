//! HTTP rendering of [`Error`].
//!
//! Every failure becomes `{"detail": "..."}` with the status code the error
//! carries. Server-side failures are logged and their detail replaced by a
//! generic message.

use crate::errors::Error;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = json!({ "detail": self.public_message() });
        (status, Json(body)).into_response()
    }
}
