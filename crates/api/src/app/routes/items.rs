use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use larder_core::ItemId;
use larder_inventory::{InventoryItem, ItemPatch, NewItem};

use crate::app::routes::path_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/inventory-items/", post(create_item).get(list_items))
        .route(
            "/inventory-items/:item_id",
            get(get_item).put(update_item).delete(delete_item),
        )
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    dto::ApiJson(body): dto::ApiJson<NewItem>,
) -> Response {
    if let Err(err) = body.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.create_item(body).await {
        Ok(item) => errors::json_message(
            StatusCode::CREATED,
            format!("Inventory item {} created successfully", item.name),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_items(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.list_items().await {
        Ok(items) => Json(items.iter().map(InventoryItem::view).collect::<Vec<_>>()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: ItemId = match path_id(&id, "Inventory item") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.get_item(id).await {
        Ok(item) => Json(item.view()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    dto::ApiJson(patch): dto::ApiJson<ItemPatch>,
) -> Response {
    let id: ItemId = match path_id(&id, "Inventory item") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(err) = patch.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.update_item(id, patch).await {
        Ok(item) => errors::json_message(
            StatusCode::OK,
            format!("Inventory item {} updated successfully", item.name),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: ItemId = match path_id(&id, "Inventory item") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.delete_item(id).await {
        Ok(()) => errors::json_message(StatusCode::OK, "Inventory item deleted successfully"),
        Err(err) => errors::domain_error_to_response(err),
    }
}
