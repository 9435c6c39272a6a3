use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{validate, DomainResult, OutletId, ProductId};

/// A sales outlet offering a product at a price.
///
/// `product_id` is an untyped reference; services do not check it against
/// the products table.
#[derive(Debug, Clone, PartialEq)]
pub struct Outlet {
    pub outlet_id: OutletId,
    pub product_id: ProductId,
    pub name: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Outlet {
    pub fn new(outlet_id: OutletId, input: NewOutlet, now: DateTime<Utc>) -> Self {
        Self {
            outlet_id,
            product_id: input.product_id,
            name: input.name,
            price: input.price,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn view(&self) -> OutletView {
        OutletView {
            id: self.outlet_id,
            product_id: self.product_id,
            name: self.name.clone(),
            price: self.price,
        }
    }
}

/// Public serialization of an outlet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutletView {
    pub id: OutletId,
    pub product_id: ProductId,
    pub name: String,
    pub price: f64,
}

/// Input for creating an outlet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOutlet {
    pub product_id: ProductId,
    pub name: String,
    pub price: f64,
}

impl NewOutlet {
    pub fn validate(&self) -> DomainResult<()> {
        validate::require_len("name", &self.name, 3, 50)?;
        validate::require_finite("price", self.price)?;
        Ok(())
    }
}

/// Partial update for an outlet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutletPatch {
    pub product_id: Option<ProductId>,
    pub name: Option<String>,
    pub price: Option<f64>,
}

impl OutletPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate::require_len("name", name, 3, 50)?;
        }
        if let Some(price) = self.price {
            validate::require_finite("price", price)?;
        }
        Ok(())
    }

    pub fn apply(&self, outlet: &mut Outlet, now: DateTime<Utc>) {
        if let Some(product_id) = self.product_id {
            outlet.product_id = product_id;
        }
        if let Some(name) = &self.name {
            outlet.name = name.clone();
        }
        if let Some(price) = self.price {
            outlet.price = price;
        }
        outlet.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> NewOutlet {
        NewOutlet {
            product_id: ProductId::from_i64(1),
            name: "Main Counter".into(),
            price: 125.50,
        }
    }

    #[test]
    fn new_copies_input_fields() {
        let outlet = Outlet::new(OutletId::from_i64(3), valid_input(), Utc::now());
        assert_eq!(outlet.outlet_id.as_i64(), 3);
        assert_eq!(outlet.product_id.as_i64(), 1);
        assert_eq!(outlet.price, 125.50);
    }

    #[test]
    fn validate_checks_name_and_price() {
        assert!(valid_input().validate().is_ok());

        let mut input = valid_input();
        input.name = "ab".into();
        assert!(input.validate().is_err());

        let mut input = valid_input();
        input.price = f64::NAN;
        assert!(input.validate().is_err());
    }

    #[test]
    fn patch_merges_present_fields() {
        let now = Utc::now();
        let mut outlet = Outlet::new(OutletId::from_i64(3), valid_input(), now);

        let patch = OutletPatch {
            product_id: None,
            name: None,
            price: Some(99.0),
        };
        patch.validate().unwrap();
        patch.apply(&mut outlet, now);

        assert_eq!(outlet.price, 99.0);
        assert_eq!(outlet.name, "Main Counter");
        assert_eq!(outlet.product_id.as_i64(), 1);
    }

    #[test]
    fn view_serializes_schema_fields() {
        let outlet = Outlet::new(OutletId::from_i64(2), valid_input(), Utc::now());
        let json = serde_json::to_value(outlet.view()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 2,
                "product_id": 1,
                "name": "Main Counter",
                "price": 125.50,
            })
        );
    }
}
