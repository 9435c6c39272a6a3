use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use larder_core::BranchId;
use larder_sites::{Branch, BranchPatch, NewBranch};

use crate::app::routes::path_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/branches/", post(create_branch).get(list_branches))
        .route(
            "/branches/:branch_id",
            get(get_branch).put(update_branch).delete(delete_branch),
        )
}

pub async fn create_branch(
    Extension(services): Extension<Arc<AppServices>>,
    dto::ApiJson(body): dto::ApiJson<NewBranch>,
) -> Response {
    if let Err(err) = body.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.create_branch(body).await {
        Ok(branch) => errors::json_message(
            StatusCode::CREATED,
            format!("Branch {} created successfully", branch.name),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_branches(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.list_branches().await {
        Ok(branches) => Json(branches.iter().map(Branch::view).collect::<Vec<_>>()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_branch(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: BranchId = match path_id(&id, "Branch") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.get_branch(id).await {
        Ok(branch) => Json(branch.view()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn update_branch(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    dto::ApiJson(patch): dto::ApiJson<BranchPatch>,
) -> Response {
    let id: BranchId = match path_id(&id, "Branch") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(err) = patch.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.update_branch(id, patch).await {
        Ok(branch) => errors::json_message(
            StatusCode::OK,
            format!("Branch {} updated successfully", branch.name),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_branch(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: BranchId = match path_id(&id, "Branch") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.delete_branch(id).await {
        Ok(()) => errors::json_message(StatusCode::OK, "Branch deleted successfully"),
        Err(err) => errors::domain_error_to_response(err),
    }
}
