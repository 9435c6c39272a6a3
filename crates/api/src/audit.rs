//! Request-audit middleware: every mutating request is captured into the
//! audit store before its handler runs.

use std::collections::{BTreeMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, MatchedPath, Query, RawPathParams, State},
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use uuid::Uuid;

use larder_auth::TokenService;
use larder_infra::{audit::at_second_precision, redact_in_place, AuditEntry, AuditStore};

use crate::app::errors;
use crate::middleware::bearer_token;

#[derive(Clone)]
pub struct AuditState {
    pub store: AuditStore,
    pub tokens: Arc<TokenService>,
    pub sensitive_fields: Arc<HashSet<String>>,
}

/// Outermost middleware: append one audit entry per mutating request.
///
/// Safe methods pass through untouched. The body is buffered once so it can
/// be sanitized for the entry and then replayed to the handler. A store
/// failure aborts the request; the handler never runs without its entry.
pub async fn audit_middleware(
    State(state): State<AuditState>,
    matched_path: Option<MatchedPath>,
    path_params: Option<RawPathParams>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    query: Option<Query<BTreeMap<String, String>>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if matches!(req.method().as_str(), "GET" | "HEAD" | "OPTIONS") {
        return next.run(req).await;
    }

    // Actor resolution does not go through the auth gateway: public routes
    // and requests with unusable tokens are still recorded, with no actor.
    let actor = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(bearer_token)
        .and_then(|token| state.tokens.verify(token).ok())
        .map(|claims| claims.sub);

    let method = req.method().to_string();
    let endpoint = matched_path
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    let ip = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned());

    let (parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };

    // Non-JSON and empty bodies are recorded as a null payload.
    let payload = serde_json::from_slice::<serde_json::Value>(&bytes)
        .ok()
        .map(|mut value| {
            redact_in_place(&mut value, &state.sensitive_fields);
            value
        });

    let entry = AuditEntry {
        id: Uuid::now_v7(),
        timestamp: at_second_precision(Utc::now()),
        method,
        endpoint,
        ip,
        query_params: query.map(|Query(params)| params).unwrap_or_default(),
        path_params: path_params
            .map(|params| {
                params
                    .iter()
                    .map(|(name, value)| (name.to_owned(), value.to_owned()))
                    .collect()
            })
            .unwrap_or_default(),
        payload,
        actor,
    };

    if let Err(err) = state.store.append(entry).await {
        return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, err.message().to_owned());
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
