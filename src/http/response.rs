//! Response helpers shared by endpoints and the dispatch handler.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// The answer for a path no rule matched.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "No matching route found").into_response()
}

pub fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (status, Json(body)).into_response()
}

pub fn text(status: StatusCode, body: &str) -> Response {
    (status, body.to_string()).into_response()
}

/// 302 to `location`.
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Convert a configured status, falling back to 500 for codes outside
/// 100..=999 (validation rejects those before they get here).
pub fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
