use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{validate, DomainResult, ItemId, ProductId};

/// One line of a product's bill of materials: how much of an inventory item
/// goes into the product, split by dine-in/takeout preparation.
///
/// Keyed by the `(product_id, item_id)` pair; there is no surrogate id. The
/// wire name of the takeout flag is exactly `isTakeout`.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub product_id: ProductId,
    pub item_id: ItemId,
    pub quantity: f64,
    pub is_takeout: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Recipe {
    pub fn new(input: NewRecipe, now: DateTime<Utc>) -> Self {
        Self {
            product_id: input.product_id,
            item_id: input.item_id,
            quantity: input.quantity,
            is_takeout: input.is_takeout,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn view(&self) -> RecipeView {
        RecipeView {
            product_id: self.product_id,
            item_id: self.item_id,
            quantity: self.quantity,
            is_takeout: self.is_takeout,
        }
    }
}

/// Public serialization of a recipe line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeView {
    pub product_id: ProductId,
    pub item_id: ItemId,
    pub quantity: f64,
    #[serde(rename = "isTakeout")]
    pub is_takeout: bool,
}

/// Input for creating a recipe line; the caller supplies both key components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecipe {
    pub product_id: ProductId,
    pub item_id: ItemId,
    pub quantity: f64,
    #[serde(rename = "isTakeout")]
    pub is_takeout: bool,
}

impl NewRecipe {
    pub fn validate(&self) -> DomainResult<()> {
        validate::require_finite("quantity", self.quantity)
    }
}

/// Partial update for a recipe line. The key pair is addressed by the route
/// and cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipePatch {
    pub quantity: Option<f64>,
    #[serde(rename = "isTakeout")]
    pub is_takeout: Option<bool>,
}

impl RecipePatch {
    pub fn validate(&self) -> DomainResult<()> {
        match self.quantity {
            Some(quantity) => validate::require_finite("quantity", quantity),
            None => Ok(()),
        }
    }

    pub fn apply(&self, recipe: &mut Recipe, now: DateTime<Utc>) {
        if let Some(quantity) = self.quantity {
            recipe.quantity = quantity;
        }
        if let Some(is_takeout) = self.is_takeout {
            recipe.is_takeout = is_takeout;
        }
        recipe.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> NewRecipe {
        NewRecipe {
            product_id: ProductId::from_i64(1),
            item_id: ItemId::from_i64(2),
            quantity: 0.25,
            is_takeout: false,
        }
    }

    #[test]
    fn validate_rejects_non_finite_quantity() {
        assert!(valid_input().validate().is_ok());

        let mut input = valid_input();
        input.quantity = f64::INFINITY;
        assert!(input.validate().is_err());
    }

    #[test]
    fn patch_updates_non_key_fields() {
        let now = Utc::now();
        let mut recipe = Recipe::new(valid_input(), now);

        let patch = RecipePatch {
            quantity: Some(0.5),
            is_takeout: Some(true),
        };
        patch.validate().unwrap();
        patch.apply(&mut recipe, now);

        assert_eq!(recipe.quantity, 0.5);
        assert!(recipe.is_takeout);
        assert_eq!(recipe.product_id.as_i64(), 1);
        assert_eq!(recipe.item_id.as_i64(), 2);
    }

    #[test]
    fn wire_name_is_camel_case() {
        let recipe = Recipe::new(valid_input(), Utc::now());
        let json = serde_json::to_value(recipe.view()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "product_id": 1,
                "item_id": 2,
                "quantity": 0.25,
                "isTakeout": false,
            })
        );

        let parsed: RecipePatch =
            serde_json::from_value(serde_json::json!({"isTakeout": true})).unwrap();
        assert_eq!(parsed.is_takeout, Some(true));
    }
}
