use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use larder_core::{OutletId, ProductId};
use larder_sites::{NewOutlet, Outlet, OutletPatch};

use crate::app::routes::path_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/outlets/", post(create_outlet).get(list_outlets))
        .route(
            "/outlets/:outlet_id",
            get(get_outlet).put(update_outlet).delete(delete_outlet),
        )
}

#[derive(Debug, Default, Deserialize)]
pub struct OutletListQuery {
    pub product_id: Option<String>,
}

pub async fn create_outlet(
    Extension(services): Extension<Arc<AppServices>>,
    dto::ApiJson(body): dto::ApiJson<NewOutlet>,
) -> Response {
    if let Err(err) = body.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.create_outlet(body).await {
        Ok(outlet) => errors::json_message(
            StatusCode::CREATED,
            format!("Outlet {} created successfully", outlet.name),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_outlets(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<OutletListQuery>,
) -> Response {
    // `?product_id=` with an empty value means no filter.
    let filter = match query.product_id.as_deref().filter(|raw| !raw.is_empty()) {
        Some(raw) => match raw.parse::<ProductId>() {
            Ok(id) => Some(id),
            Err(_) => {
                return errors::json_error(StatusCode::BAD_REQUEST, "product_id must be an integer")
            }
        },
        None => None,
    };
    match services.list_outlets(filter).await {
        Ok(outlets) => Json(outlets.iter().map(Outlet::view).collect::<Vec<_>>()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_outlet(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: OutletId = match path_id(&id, "Outlet") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.get_outlet(id).await {
        Ok(outlet) => Json(outlet.view()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn update_outlet(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    dto::ApiJson(patch): dto::ApiJson<OutletPatch>,
) -> Response {
    let id: OutletId = match path_id(&id, "Outlet") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(err) = patch.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.update_outlet(id, patch).await {
        Ok(outlet) => errors::json_message(
            StatusCode::OK,
            format!("Outlet {} updated successfully", outlet.name),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_outlet(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: OutletId = match path_id(&id, "Outlet") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.delete_outlet(id).await {
        Ok(()) => errors::json_message(StatusCode::OK, "Outlet deleted successfully"),
        Err(err) => errors::domain_error_to_response(err),
    }
}
