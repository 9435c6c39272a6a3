use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use larder_catalog::{NewTag, Tag, TagPatch};
use larder_core::TagId;

use crate::app::routes::path_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/tags/", post(create_tag).get(list_tags))
        .route("/tags/:tag_id", get(get_tag).put(update_tag).delete(delete_tag))
}

pub async fn create_tag(
    Extension(services): Extension<Arc<AppServices>>,
    dto::ApiJson(body): dto::ApiJson<NewTag>,
) -> Response {
    if let Err(err) = body.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.create_tag(body).await {
        Ok(tag) => errors::json_message(
            StatusCode::CREATED,
            format!("Tag {} created successfully", tag.name),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_tags(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.list_tags().await {
        Ok(tags) => Json(tags.iter().map(Tag::view).collect::<Vec<_>>()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_tag(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: TagId = match path_id(&id, "Tag") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.get_tag(id).await {
        Ok(tag) => Json(tag.view()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn update_tag(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    dto::ApiJson(patch): dto::ApiJson<TagPatch>,
) -> Response {
    let id: TagId = match path_id(&id, "Tag") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(err) = patch.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.update_tag(id, patch).await {
        Ok(tag) => errors::json_message(
            StatusCode::OK,
            format!("Tag {} updated successfully", tag.name),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_tag(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: TagId = match path_id(&id, "Tag") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.delete_tag(id).await {
        Ok(()) => errors::json_message(StatusCode::OK, "Tag deleted successfully"),
        Err(err) => errors::domain_error_to_response(err),
    }
}
