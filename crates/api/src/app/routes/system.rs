use axum::{http::StatusCode, response::IntoResponse, Json};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn index() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "ok" }))
}
