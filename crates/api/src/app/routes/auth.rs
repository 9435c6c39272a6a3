use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use larder_accounts::Registration;
use larder_auth::LoginKey;
use larder_core::{DomainError, DomainResult};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    dto::ApiJson(body): dto::ApiJson<Registration>,
) -> Response {
    if let Err(err) = body.validate() {
        return errors::domain_error_to_response(err);
    }
    let hash = match services.passwords().hash(&body.password) {
        Ok(hash) => hash,
        Err(err) => return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };
    match services.register_user(body, hash).await {
        Ok(user) => errors::json_message(
            StatusCode::CREATED,
            format!("User {} registered successfully", user.username),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    dto::ApiJson(body): dto::ApiJson<dto::LoginRequest>,
) -> Response {
    let key = services.login_key();
    if let Err(err) = body.validate(key) {
        return errors::domain_error_to_response(err);
    }
    match authenticate(&services, key, body.identity(key), &body.password).await {
        Ok(token) => (
            StatusCode::OK,
            Json(serde_json::json!({ "access_token": token })),
        )
            .into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

/// Verify the password against the stored hash and mint a token. An unknown
/// identity and a wrong password fail with the same error.
async fn authenticate(
    services: &AppServices,
    key: LoginKey,
    identity: &str,
    password: &str,
) -> DomainResult<String> {
    let user = services.find_user(key, identity).await?;
    let verified = user
        .as_ref()
        .map(|user| services.passwords().verify(password, &user.password_hash))
        .unwrap_or(false);
    if !verified {
        return Err(DomainError::unauthorized("Invalid credentials"));
    }
    services
        .tokens()
        .issue(identity)
        .map_err(|err| DomainError::internal(err.to_string()))
}
