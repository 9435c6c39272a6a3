use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use larder_core::SupplierId;
use larder_parties::{NewSupplier, Supplier, SupplierPatch};

use crate::app::routes::path_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/suppliers/", post(create_supplier).get(list_suppliers))
        .route(
            "/suppliers/:supplier_id",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
}

pub async fn create_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    dto::ApiJson(body): dto::ApiJson<NewSupplier>,
) -> Response {
    if let Err(err) = body.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.create_supplier(body).await {
        Ok(supplier) => errors::json_message(
            StatusCode::CREATED,
            format!("Supplier {} created successfully", supplier.name),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_suppliers(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.list_suppliers().await {
        Ok(suppliers) => {
            Json(suppliers.iter().map(Supplier::view).collect::<Vec<_>>()).into_response()
        }
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: SupplierId = match path_id(&id, "Supplier") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.get_supplier(id).await {
        Ok(supplier) => Json(supplier.view()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn update_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    dto::ApiJson(patch): dto::ApiJson<SupplierPatch>,
) -> Response {
    let id: SupplierId = match path_id(&id, "Supplier") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(err) = patch.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.update_supplier(id, patch).await {
        Ok(supplier) => errors::json_message(
            StatusCode::OK,
            format!("Supplier {} updated successfully", supplier.name),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: SupplierId = match path_id(&id, "Supplier") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.delete_supplier(id).await {
        Ok(()) => errors::json_message(StatusCode::OK, "Supplier deleted successfully"),
        Err(err) => errors::domain_error_to_response(err),
    }
}
