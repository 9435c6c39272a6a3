use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{validate, DomainResult, SupplierId};

/// An inventory supplier. Email and phone are each unique across suppliers.
#[derive(Debug, Clone, PartialEq)]
pub struct Supplier {
    pub supplier_id: SupplierId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Supplier {
    pub fn new(supplier_id: SupplierId, input: NewSupplier, now: DateTime<Utc>) -> Self {
        Self {
            supplier_id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            country_code: input.country_code,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn view(&self) -> SupplierView {
        SupplierView {
            id: self.supplier_id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            country_code: self.country_code.clone(),
        }
    }
}

/// Public serialization of a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierView {
    pub id: SupplierId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
}

/// Input for creating a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
}

impl NewSupplier {
    pub fn validate(&self) -> DomainResult<()> {
        validate::require_len("name", &self.name, 3, 50)?;
        validate::require_email("email", &self.email)?;
        validate::require_len("phone", &self.phone, 1, 11)?;
        validate::require_len("country_code", &self.country_code, 1, 8)?;
        Ok(())
    }
}

/// Partial update for a supplier; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country_code: Option<String>,
}

impl SupplierPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate::require_len("name", name, 3, 50)?;
        }
        if let Some(email) = &self.email {
            validate::require_email("email", email)?;
        }
        if let Some(phone) = &self.phone {
            validate::require_len("phone", phone, 1, 11)?;
        }
        if let Some(country_code) = &self.country_code {
            validate::require_len("country_code", country_code, 1, 8)?;
        }
        Ok(())
    }

    pub fn apply(&self, supplier: &mut Supplier, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            supplier.name = name.clone();
        }
        if let Some(email) = &self.email {
            supplier.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            supplier.phone = phone.clone();
        }
        if let Some(country_code) = &self.country_code {
            supplier.country_code = country_code.clone();
        }
        supplier.updated_at = now;
    }
}
