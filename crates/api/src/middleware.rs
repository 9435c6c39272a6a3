use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};

use larder_auth::TokenService;

use crate::app::errors;
use crate::context::ActorContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
}

/// Bearer-token gateway for the resource routes.
///
/// A missing header and a failing token are distinct client errors; both
/// short-circuit with 401 before the handler runs.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "Token is missing");
    };

    let claims = match bearer_token(header).and_then(|token| state.tokens.verify(token).ok()) {
        Some(claims) => claims,
        None => return errors::json_error(StatusCode::UNAUTHORIZED, "Invalid or expired token"),
    };

    req.extensions_mut().insert(ActorContext::new(claims.sub));

    next.run(req).await
}

/// The token portion of a `Bearer` authorization header, if well-formed.
pub(crate) fn bearer_token(header: &HeaderValue) -> Option<&str> {
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
