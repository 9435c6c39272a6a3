use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use larder_catalog::{NewRecipe, Recipe, RecipePatch};
use larder_core::{ItemId, ProductId};

use crate::app::routes::path_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/recipes/", post(create_recipe).get(list_recipes))
        .route(
            "/recipes/:product_id/:item_id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
}

fn recipe_key(raw_product: &str, raw_item: &str) -> Result<(ProductId, ItemId), Response> {
    let product_id = path_id(raw_product, "Recipe")?;
    let item_id = path_id(raw_item, "Recipe")?;
    Ok((product_id, item_id))
}

pub async fn create_recipe(
    Extension(services): Extension<Arc<AppServices>>,
    dto::ApiJson(body): dto::ApiJson<NewRecipe>,
) -> Response {
    if let Err(err) = body.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.create_recipe(body).await {
        Ok(recipe) => errors::json_message(
            StatusCode::CREATED,
            format!(
                "Recipe for Product {} and Item {} created successfully",
                recipe.product_id, recipe.item_id
            ),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn list_recipes(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.list_recipes().await {
        Ok(recipes) => Json(recipes.iter().map(Recipe::view).collect::<Vec<_>>()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn get_recipe(
    Extension(services): Extension<Arc<AppServices>>,
    Path((raw_product, raw_item)): Path<(String, String)>,
) -> Response {
    let (product_id, item_id) = match recipe_key(&raw_product, &raw_item) {
        Ok(key) => key,
        Err(resp) => return resp,
    };
    match services.get_recipe(product_id, item_id).await {
        Ok(recipe) => Json(recipe.view()).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn update_recipe(
    Extension(services): Extension<Arc<AppServices>>,
    Path((raw_product, raw_item)): Path<(String, String)>,
    dto::ApiJson(patch): dto::ApiJson<RecipePatch>,
) -> Response {
    let (product_id, item_id) = match recipe_key(&raw_product, &raw_item) {
        Ok(key) => key,
        Err(resp) => return resp,
    };
    if let Err(err) = patch.validate() {
        return errors::domain_error_to_response(err);
    }
    match services.update_recipe(product_id, item_id, patch).await {
        Ok(recipe) => errors::json_message(
            StatusCode::OK,
            format!(
                "Recipe for Product {} and Item {} updated successfully",
                recipe.product_id, recipe.item_id
            ),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

pub async fn delete_recipe(
    Extension(services): Extension<Arc<AppServices>>,
    Path((raw_product, raw_item)): Path<(String, String)>,
) -> Response {
    let (product_id, item_id) = match recipe_key(&raw_product, &raw_item) {
        Ok(key) => key,
        Err(resp) => return resp,
    };
    match services.delete_recipe(product_id, item_id).await {
        Ok(()) => errors::json_message(StatusCode::OK, "Recipe deleted successfully"),
        Err(err) => errors::domain_error_to_response(err),
    }
}
