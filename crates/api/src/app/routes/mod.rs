use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::Response;
use axum::Router;

use super::errors;

pub mod auth;
pub mod branches;
pub mod categories;
pub mod items;
pub mod outlets;
pub mod products;
pub mod recipes;
pub mod stock_counts;
pub mod suppliers;
pub mod system;
pub mod tags;

/// Router for all bearer-protected resource endpoints.
///
/// Collection routes keep their trailing slash (`/branches/`), so resource
/// routers are merged at full paths instead of nested.
pub fn router() -> Router {
    Router::new()
        .merge(branches::router())
        .merge(categories::router())
        .merge(items::router())
        .merge(outlets::router())
        .merge(products::router())
        .merge(recipes::router())
        .merge(stock_counts::router())
        .merge(suppliers::router())
        .merge(tags::router())
}

/// Parse a path segment into a typed id. A segment that is not an integer is
/// reported the same way as a missing row.
pub(crate) fn path_id<T: FromStr>(raw: &str, entity: &str) -> Result<T, Response> {
    raw.parse::<T>()
        .map_err(|_| errors::json_error(StatusCode::NOT_FOUND, format!("{entity} not found")))
}
