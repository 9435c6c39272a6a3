use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use larder_core::DomainError;

/// Map a domain failure to its HTTP status and `{"error": ...}` body.
///
/// Invalid ids surface as 404 rather than 400: a non-integer id segment
/// behaves like a row that does not exist. Internal errors expose their raw
/// message; diagnosability is preferred over hiding store details.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let status = match &err {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::InvalidId(_) | DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    json_error(status, err.message())
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

pub fn json_message(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(json!({ "message": message.into() }))).into_response()
}
