use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use larder_catalog::{Category, CategoryPatch, NewCategory};
use larder_core::CategoryId;

use crate::app::routes::path_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/categories/", post(create_category).get(list_categories))
        .route(
            "/categories/:category_id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    dto::ApiJson(body): dto::ApiJson<NewCategory>,
) -> Response {
    if let Err(err) = body.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.create_category(body).await {
        Ok(category) => errors::json_message(
            StatusCode::CREATED,
            format!("Category {} created successfully", category.name),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_categories(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.list_categories().await {
        Ok(categories) => {
            Json(categories.iter().map(Category::view).collect::<Vec<_>>()).into_response()
        }
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: CategoryId = match path_id(&id, "Category") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.get_category(id).await {
        Ok(category) => Json(category.view()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    dto::ApiJson(patch): dto::ApiJson<CategoryPatch>,
) -> Response {
    let id: CategoryId = match path_id(&id, "Category") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(err) = patch.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.update_category(id, patch).await {
        Ok(category) => errors::json_message(
            StatusCode::OK,
            format!("Category {} updated successfully", category.name),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: CategoryId = match path_id(&id, "Category") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.delete_category(id).await {
        Ok(()) => errors::json_message(StatusCode::OK, "Category deleted successfully"),
        Err(err) => errors::domain_error_to_response(err),
    }
}
