use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use larder_catalog::{NewProduct, NewProductTag, Product, ProductPatch, Tag};
use larder_core::{ProductId, TagId};

use crate::app::routes::path_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/products/", post(create_product).get(list_products))
        .route(
            "/products/:product_id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route(
            "/products/:product_id/tags/",
            post(attach_tag).get(list_product_tags),
        )
        .route("/products/:product_id/tags/:tag_id", delete(detach_tag))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    dto::ApiJson(body): dto::ApiJson<NewProduct>,
) -> Response {
    if let Err(err) = body.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.create_product(body).await {
        Ok(product) => errors::json_message(
            StatusCode::CREATED,
            format!("Product {} created successfully", product.name),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.list_products().await {
        Ok(products) => Json(products.iter().map(Product::view).collect::<Vec<_>>()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: ProductId = match path_id(&id, "Product") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.get_product(id).await {
        Ok(product) => Json(product.view()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    dto::ApiJson(patch): dto::ApiJson<ProductPatch>,
) -> Response {
    let id: ProductId = match path_id(&id, "Product") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(err) = patch.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.update_product(id, patch).await {
        Ok(product) => errors::json_message(
            StatusCode::OK,
            format!("Product {} updated successfully", product.name),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: ProductId = match path_id(&id, "Product") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.delete_product(id).await {
        Ok(()) => errors::json_message(StatusCode::OK, "Product deleted successfully"),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn attach_tag(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    dto::ApiJson(body): dto::ApiJson<NewProductTag>,
) -> Response {
    let product_id: ProductId = match path_id(&id, "Product") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.attach_tag(product_id, body.tag_id).await {
        Ok(()) => errors::json_message(
            StatusCode::CREATED,
            format!(
                "Tag {} added to Product {} successfully",
                body.tag_id, product_id
            ),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_product_tags(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let product_id: ProductId = match path_id(&id, "Product") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.list_product_tags(product_id).await {
        Ok(tags) => Json(tags.iter().map(Tag::view).collect::<Vec<_>>()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn detach_tag(
    Extension(services): Extension<Arc<AppServices>>,
    Path((product_id, tag_id)): Path<(String, String)>,
) -> Response {
    let product_id: ProductId = match path_id(&product_id, "Product tag") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let tag_id: TagId = match path_id(&tag_id, "Product tag") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.detach_tag(product_id, tag_id).await {
        Ok(()) => errors::json_message(StatusCode::OK, "Product tag deleted successfully"),
        Err(err) => errors::domain_error_to_response(err),
    }
}
