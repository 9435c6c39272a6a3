use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{validate, CategoryId, DomainResult, ProductId};

/// A sellable product.
///
/// SKU is unique across products. `category_id` is an untyped reference;
/// services do not check it against the categories table.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub variant_group_id: String,
    pub sku: String,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn new(product_id: ProductId, input: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            product_id,
            name: input.name,
            variant_group_id: input.variant_group_id,
            sku: input.sku,
            category_id: input.category_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn view(&self) -> ProductView {
        ProductView {
            id: self.product_id,
            name: self.name.clone(),
            variant_group_id: self.variant_group_id.clone(),
            sku: self.sku.clone(),
            category_id: self.category_id,
        }
    }
}

/// Public serialization of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub variant_group_id: String,
    pub sku: String,
    pub category_id: CategoryId,
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub variant_group_id: String,
    pub sku: String,
    pub category_id: CategoryId,
}

impl NewProduct {
    pub fn validate(&self) -> DomainResult<()> {
        validate::require_len("name", &self.name, 3, 50)?;
        validate::require_len("variant_group_id", &self.variant_group_id, 3, 50)?;
        validate::require_len("sku", &self.sku, 3, 50)?;
        Ok(())
    }
}

/// Partial update for a product; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub variant_group_id: Option<String>,
    pub sku: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl ProductPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate::require_len("name", name, 3, 50)?;
        }
        if let Some(variant_group_id) = &self.variant_group_id {
            validate::require_len("variant_group_id", variant_group_id, 3, 50)?;
        }
        if let Some(sku) = &self.sku {
            validate::require_len("sku", sku, 3, 50)?;
        }
        Ok(())
    }

    pub fn apply(&self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(variant_group_id) = &self.variant_group_id {
            product.variant_group_id = variant_group_id.clone();
        }
        if let Some(sku) = &self.sku {
            product.sku = sku.clone();
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
        product.updated_at = now;
    }
}
