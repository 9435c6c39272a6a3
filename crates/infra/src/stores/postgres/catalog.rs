use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use larder_catalog::{
    Category, CategoryPatch, NewCategory, NewProduct, NewRecipe, NewTag, Product, ProductPatch,
    Recipe, RecipePatch, Tag, TagPatch,
};
use larder_core::{CategoryId, DomainError, DomainResult, ItemId, ProductId, TagId};

use super::{conflict_or_internal, internal};

const PRODUCT_CONSTRAINTS: &[(&str, &str)] =
    &[("products_sku_key", "Product with this SKU already exists")];

const CATEGORY_CONSTRAINTS: &[(&str, &str)] =
    &[("categories_name_key", "Category with this name already exists")];

const TAG_CONSTRAINTS: &[(&str, &str)] =
    &[("tags_name_key", "Tag with this name already exists")];

const RECIPE_CONSTRAINTS: &[(&str, &str)] = &[(
    "recipes_pkey",
    "Recipe with this product_id and item_id already exists",
)];

const PRODUCT_TAG_CONSTRAINTS: &[(&str, &str)] = &[(
    "product_tags_pkey",
    "Product tag with this product_id and tag_id already exists",
)];

/// Postgres products, categories, tags, recipes, and product-tag links.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, input), err)]
    pub async fn create_product(&self, input: NewProduct) -> DomainResult<Product> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO products (name, variant_group_id, sku, category_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING product_id, name, variant_group_id, sku, category_id,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.variant_group_id)
        .bind(&input.sku)
        .bind(input.category_id.as_i64())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_internal(e, PRODUCT_CONSTRAINTS))?;
        product_from_row(&row)
    }

    #[instrument(skip(self), err)]
    pub async fn list_products(&self) -> DomainResult<Vec<Product>> {
        let rows = sqlx::query(
            "SELECT product_id, name, variant_group_id, sku, category_id, \
                    created_at, updated_at, deleted_at \
             FROM products ORDER BY product_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self), err)]
    pub async fn get_product(&self, id: ProductId) -> DomainResult<Product> {
        let row = sqlx::query(
            "SELECT product_id, name, variant_group_id, sku, category_id, \
                    created_at, updated_at, deleted_at \
             FROM products WHERE product_id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;
        match row {
            Some(row) => product_from_row(&row),
            None => Err(DomainError::not_found("Product not found")),
        }
    }

    #[instrument(skip(self, patch), err)]
    pub async fn update_product(&self, id: ProductId, patch: ProductPatch) -> DomainResult<Product> {
        let mut product = self.get_product(id).await?;
        patch.apply(&mut product, Utc::now());
        sqlx::query(
            "UPDATE products SET name = $2, variant_group_id = $3, sku = $4, category_id = $5, \
                    updated_at = $6 \
             WHERE product_id = $1",
        )
        .bind(id.as_i64())
        .bind(&product.name)
        .bind(&product.variant_group_id)
        .bind(&product.sku)
        .bind(product.category_id.as_i64())
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_internal(e, PRODUCT_CONSTRAINTS))?;
        Ok(product)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_product(&self, id: ProductId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Product not found"));
        }
        Ok(())
    }

    #[instrument(skip(self, input), err)]
    pub async fn create_category(&self, input: NewCategory) -> DomainResult<Category> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO categories (name, created_at, updated_at)
            VALUES ($1, $2, $2)
            RETURNING category_id, name, created_at, updated_at, deleted_at
            "#,
        )
        .bind(&input.name)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_internal(e, CATEGORY_CONSTRAINTS))?;
        category_from_row(&row)
    }

    #[instrument(skip(self), err)]
    pub async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT category_id, name, created_at, updated_at, deleted_at \
             FROM categories ORDER BY category_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        rows.iter().map(category_from_row).collect()
    }

    #[instrument(skip(self), err)]
    pub async fn get_category(&self, id: CategoryId) -> DomainResult<Category> {
        let row = sqlx::query(
            "SELECT category_id, name, created_at, updated_at, deleted_at \
             FROM categories WHERE category_id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;
        match row {
            Some(row) => category_from_row(&row),
            None => Err(DomainError::not_found("Category not found")),
        }
    }

    #[instrument(skip(self, patch), err)]
    pub async fn update_category(
        &self,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> DomainResult<Category> {
        let mut category = self.get_category(id).await?;
        patch.apply(&mut category, Utc::now());
        sqlx::query("UPDATE categories SET name = $2, updated_at = $3 WHERE category_id = $1")
            .bind(id.as_i64())
            .bind(&category.name)
            .bind(category.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_or_internal(e, CATEGORY_CONSTRAINTS))?;
        Ok(category)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_category(&self, id: CategoryId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE category_id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Category not found"));
        }
        Ok(())
    }

    #[instrument(skip(self, input), err)]
    pub async fn create_tag(&self, input: NewTag) -> DomainResult<Tag> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO tags (name, created_at, updated_at)
            VALUES ($1, $2, $2)
            RETURNING tag_id, name, created_at, updated_at, deleted_at
            "#,
        )
        .bind(&input.name)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_internal(e, TAG_CONSTRAINTS))?;
        tag_from_row(&row)
    }

    #[instrument(skip(self), err)]
    pub async fn list_tags(&self) -> DomainResult<Vec<Tag>> {
        let rows = sqlx::query(
            "SELECT tag_id, name, created_at, updated_at, deleted_at FROM tags ORDER BY tag_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        rows.iter().map(tag_from_row).collect()
    }

    #[instrument(skip(self), err)]
    pub async fn get_tag(&self, id: TagId) -> DomainResult<Tag> {
        let row = sqlx::query(
            "SELECT tag_id, name, created_at, updated_at, deleted_at FROM tags WHERE tag_id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;
        match row {
            Some(row) => tag_from_row(&row),
            None => Err(DomainError::not_found("Tag not found")),
        }
    }

    #[instrument(skip(self, patch), err)]
    pub async fn update_tag(&self, id: TagId, patch: TagPatch) -> DomainResult<Tag> {
        let mut tag = self.get_tag(id).await?;
        patch.apply(&mut tag, Utc::now());
        sqlx::query("UPDATE tags SET name = $2, updated_at = $3 WHERE tag_id = $1")
            .bind(id.as_i64())
            .bind(&tag.name)
            .bind(tag.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_or_internal(e, TAG_CONSTRAINTS))?;
        Ok(tag)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_tag(&self, id: TagId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM tags WHERE tag_id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Tag not found"));
        }
        Ok(())
    }

    #[instrument(skip(self, input), err)]
    pub async fn create_recipe(&self, input: NewRecipe) -> DomainResult<Recipe> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO recipes (product_id, item_id, quantity, is_takeout, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING product_id, item_id, quantity, is_takeout, created_at, updated_at, deleted_at
            "#,
        )
        .bind(input.product_id.as_i64())
        .bind(input.item_id.as_i64())
        .bind(input.quantity)
        .bind(input.is_takeout)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_internal(e, RECIPE_CONSTRAINTS))?;
        recipe_from_row(&row)
    }

    #[instrument(skip(self), err)]
    pub async fn list_recipes(&self) -> DomainResult<Vec<Recipe>> {
        let rows = sqlx::query(
            "SELECT product_id, item_id, quantity, is_takeout, created_at, updated_at, deleted_at \
             FROM recipes ORDER BY product_id, item_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        rows.iter().map(recipe_from_row).collect()
    }

    #[instrument(skip(self), err)]
    pub async fn get_recipe(&self, product_id: ProductId, item_id: ItemId) -> DomainResult<Recipe> {
        let row = sqlx::query(
            "SELECT product_id, item_id, quantity, is_takeout, created_at, updated_at, deleted_at \
             FROM recipes WHERE product_id = $1 AND item_id = $2",
        )
        .bind(product_id.as_i64())
        .bind(item_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;
        match row {
            Some(row) => recipe_from_row(&row),
            None => Err(DomainError::not_found("Recipe not found")),
        }
    }

    #[instrument(skip(self, patch), err)]
    pub async fn update_recipe(
        &self,
        product_id: ProductId,
        item_id: ItemId,
        patch: RecipePatch,
    ) -> DomainResult<Recipe> {
        let mut recipe = self.get_recipe(product_id, item_id).await?;
        patch.apply(&mut recipe, Utc::now());
        sqlx::query(
            "UPDATE recipes SET quantity = $3, is_takeout = $4, updated_at = $5 \
             WHERE product_id = $1 AND item_id = $2",
        )
        .bind(product_id.as_i64())
        .bind(item_id.as_i64())
        .bind(recipe.quantity)
        .bind(recipe.is_takeout)
        .bind(recipe.updated_at)
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(recipe)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_recipe(&self, product_id: ProductId, item_id: ItemId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM recipes WHERE product_id = $1 AND item_id = $2")
            .bind(product_id.as_i64())
            .bind(item_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Recipe not found"));
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn attach_tag(&self, product_id: ProductId, tag_id: TagId) -> DomainResult<()> {
        self.get_product(product_id).await?;
        sqlx::query("INSERT INTO product_tags (product_id, tag_id) VALUES ($1, $2)")
            .bind(product_id.as_i64())
            .bind(tag_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_or_internal(e, PRODUCT_TAG_CONSTRAINTS))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn list_product_tags(&self, product_id: ProductId) -> DomainResult<Vec<Tag>> {
        self.get_product(product_id).await?;
        let rows = sqlx::query(
            "SELECT t.tag_id, t.name, t.created_at, t.updated_at, t.deleted_at \
             FROM product_tags pt JOIN tags t ON t.tag_id = pt.tag_id \
             WHERE pt.product_id = $1 ORDER BY t.tag_id",
        )
        .bind(product_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        rows.iter().map(tag_from_row).collect()
    }

    #[instrument(skip(self), err)]
    pub async fn detach_tag(&self, product_id: ProductId, tag_id: TagId) -> DomainResult<()> {
        let result =
            sqlx::query("DELETE FROM product_tags WHERE product_id = $1 AND tag_id = $2")
                .bind(product_id.as_i64())
                .bind(tag_id.as_i64())
                .execute(&self.pool)
                .await
                .map_err(internal)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Product tag not found"));
        }
        Ok(())
    }
}

fn product_from_row(row: &PgRow) -> DomainResult<Product> {
    Ok(Product {
        product_id: ProductId::from_i64(row.try_get("product_id").map_err(internal)?),
        name: row.try_get("name").map_err(internal)?,
        variant_group_id: row.try_get("variant_group_id").map_err(internal)?,
        sku: row.try_get("sku").map_err(internal)?,
        category_id: CategoryId::from_i64(row.try_get("category_id").map_err(internal)?),
        created_at: row.try_get("created_at").map_err(internal)?,
        updated_at: row.try_get("updated_at").map_err(internal)?,
        deleted_at: row.try_get("deleted_at").map_err(internal)?,
    })
}

fn category_from_row(row: &PgRow) -> DomainResult<Category> {
    Ok(Category {
        category_id: CategoryId::from_i64(row.try_get("category_id").map_err(internal)?),
        name: row.try_get("name").map_err(internal)?,
        created_at: row.try_get("created_at").map_err(internal)?,
        updated_at: row.try_get("updated_at").map_err(internal)?,
        deleted_at: row.try_get("deleted_at").map_err(internal)?,
    })
}

fn tag_from_row(row: &PgRow) -> DomainResult<Tag> {
    Ok(Tag {
        tag_id: TagId::from_i64(row.try_get("tag_id").map_err(internal)?),
        name: row.try_get("name").map_err(internal)?,
        created_at: row.try_get("created_at").map_err(internal)?,
        updated_at: row.try_get("updated_at").map_err(internal)?,
        deleted_at: row.try_get("deleted_at").map_err(internal)?,
    })
}

fn recipe_from_row(row: &PgRow) -> DomainResult<Recipe> {
    Ok(Recipe {
        product_id: ProductId::from_i64(row.try_get("product_id").map_err(internal)?),
        item_id: ItemId::from_i64(row.try_get("item_id").map_err(internal)?),
        quantity: row.try_get("quantity").map_err(internal)?,
        is_takeout: row.try_get("is_takeout").map_err(internal)?,
        created_at: row.try_get("created_at").map_err(internal)?,
        updated_at: row.try_get("updated_at").map_err(internal)?,
        deleted_at: row.try_get("deleted_at").map_err(internal)?,
    })
}
