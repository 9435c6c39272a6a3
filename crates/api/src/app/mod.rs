//! HTTP API application wiring (Axum router + service wiring).
//!
//! If you're new to Rust, this folder is structured like:
//! - `services.rs`: backend wiring (store selection, tokens, password hashing)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and the JSON body extractor
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::audit;
use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> Router {
    let services = services::build_services(config).await;
    build_app_with(config, services)
}

/// Build the router over an already-constructed service set. Tests use this
/// to keep a handle on the in-memory audit store.
pub fn build_app_with(config: &AppConfig, services: AppServices) -> Router {
    let services = Arc::new(services);
    let auth_state = middleware::AuthState {
        tokens: services.tokens(),
    };
    let audit_state = audit::AuditState {
        store: services.audit(),
        tokens: services.tokens(),
        sensitive_fields: Arc::new(config.sensitive_fields.clone()),
    };

    // Protected routes: require a bearer token.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    // The audit layer wraps the whole app, auth routes included, so login
    // and registration attempts are recorded with their bodies redacted.
    Router::new()
        .route("/", get(routes::system::index))
        .route("/health", get(routes::system::health))
        .merge(routes::auth::router())
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    audit_state,
                    audit::audit_middleware,
                ))
                .layer(Extension(services)),
        )
}
