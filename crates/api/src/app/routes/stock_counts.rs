use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use larder_core::{BranchId, ItemId};
use larder_inventory::{NewStockCount, StockCount, StockCountPatch};

use crate::app::routes::path_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route(
            "/branchstockcounts/",
            post(create_stock_count).get(list_stock_counts),
        )
        .route(
            "/branchstockcounts/:branch_id/:item_id",
            get(get_stock_count)
                .put(update_stock_count)
                .delete(delete_stock_count),
        )
}

fn stock_count_key(raw_branch: &str, raw_item: &str) -> Result<(BranchId, ItemId), Response> {
    let branch_id = path_id(raw_branch, "Branch stock count")?;
    let item_id = path_id(raw_item, "Branch stock count")?;
    Ok((branch_id, item_id))
}

pub async fn create_stock_count(
    Extension(services): Extension<Arc<AppServices>>,
    dto::ApiJson(body): dto::ApiJson<NewStockCount>,
) -> Response {
    if let Err(err) = body.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.create_stock_count(body).await {
        Ok(count) => errors::json_message(
            StatusCode::CREATED,
            format!(
                "Branch Stock Count for Branch {} and Item {} created successfully",
                count.branch_id, count.item_id
            ),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_stock_counts(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.list_stock_counts().await {
        Ok(counts) => Json(counts.iter().map(StockCount::view).collect::<Vec<_>>()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_stock_count(
    Extension(services): Extension<Arc<AppServices>>,
    Path((raw_branch, raw_item)): Path<(String, String)>,
) -> Response {
    let (branch_id, item_id) = match stock_count_key(&raw_branch, &raw_item) {
        Ok(key) => key,
        Err(resp) => return resp,
    };
    match services.get_stock_count(branch_id, item_id).await {
        Ok(count) => Json(count.view()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn update_stock_count(
    Extension(services): Extension<Arc<AppServices>>,
    Path((raw_branch, raw_item)): Path<(String, String)>,
    dto::ApiJson(patch): dto::ApiJson<StockCountPatch>,
) -> Response {
    let (branch_id, item_id) = match stock_count_key(&raw_branch, &raw_item) {
        Ok(key) => key,
        Err(resp) => return resp,
    };
    if let Err(err) = patch.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.update_stock_count(branch_id, item_id, patch).await {
        Ok(count) => errors::json_message(
            StatusCode::OK,
            format!(
                "Branch Stock Count for Branch {} and Item {} updated successfully",
                count.branch_id, count.item_id
            ),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_stock_count(
    Extension(services): Extension<Arc<AppServices>>,
    Path((raw_branch, raw_item)): Path<(String, String)>,
) -> Response {
    let (branch_id, item_id) = match stock_count_key(&raw_branch, &raw_item) {
        Ok(key) => key,
        Err(resp) => return resp,
    };
    match services.delete_stock_count(branch_id, item_id).await {
        Ok(()) => errors::json_message(StatusCode::OK, "Branch stock count deleted successfully"),
        Err(err) => errors::domain_error_to_response(err),
    }
}
