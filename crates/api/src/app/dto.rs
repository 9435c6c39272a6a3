//! The JSON body extractor and the handful of request DTOs that are not
//! domain inputs themselves.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use larder_auth::LoginKey;
use larder_core::{validate, DomainResult};

use crate::app::errors;

/// `axum::Json` with its rejection normalized to the API error envelope.
///
/// Malformed JSON, a wrong content type, and missing required fields all
/// become 400 `{"error": <message>}`.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = axum::response::Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(reject(rejection)),
        }
    }
}

fn reject(rejection: JsonRejection) -> axum::response::Response {
    errors::json_error(StatusCode::BAD_REQUEST, rejection.body_text())
}

/// Login body. Which identity field is read depends on the configured login
/// key; the other field is ignored.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

impl LoginRequest {
    /// The identity value for the configured login key (empty when absent).
    pub fn identity(&self, key: LoginKey) -> &str {
        let field = match key {
            LoginKey::Username => &self.username,
            LoginKey::Email => &self.email,
        };
        field.as_deref().unwrap_or_default()
    }

    /// Credentials are checked with the same rules as registration, so an
    /// absent identity field fails validation rather than reaching lookup.
    pub fn validate(&self, key: LoginKey) -> DomainResult<()> {
        match key {
            LoginKey::Username => validate::require_len("username", self.identity(key), 3, 50)?,
            LoginKey::Email => validate::require_email("email", self.identity(key))?,
        }
        validate::require_min_len("password", &self.password, 6)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_follows_the_login_key() {
        let body: LoginRequest = serde_json::from_value(serde_json::json!({
            "username": "mvictoria",
            "email": "mvictoria@example.com",
            "password": "hunter22",
        }))
        .unwrap();
        assert_eq!(body.identity(LoginKey::Username), "mvictoria");
        assert_eq!(body.identity(LoginKey::Email), "mvictoria@example.com");
    }

    #[test]
    fn missing_identity_field_fails_validation() {
        let body: LoginRequest = serde_json::from_value(serde_json::json!({
            "username": "mvictoria",
            "password": "hunter22",
        }))
        .unwrap();
        assert!(body.validate(LoginKey::Username).is_ok());
        assert!(body.validate(LoginKey::Email).is_err());
    }

    #[test]
    fn short_password_fails_validation() {
        let body: LoginRequest = serde_json::from_value(serde_json::json!({
            "username": "mvictoria",
            "password": "nope",
        }))
        .unwrap();
        let err = body.validate(LoginKey::Username).unwrap_err();
        assert_eq!(err.message(), "password must be at least 6 characters");
    }
}
