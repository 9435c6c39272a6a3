use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use larder_core::{DomainError, DomainResult, SupplierId};
use larder_parties::{NewSupplier, Supplier, SupplierPatch};

use super::{read, write, Sequence};

/// In-memory suppliers.
#[derive(Debug, Default)]
pub struct MemoryPartyStore {
    suppliers: RwLock<HashMap<SupplierId, Supplier>>,
    supplier_seq: Sequence,
}

impl MemoryPartyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_supplier(&self, input: NewSupplier) -> DomainResult<Supplier> {
        let mut suppliers = write(&self.suppliers)?;
        if suppliers.values().any(|s| s.email == input.email) {
            return Err(DomainError::conflict(
                "Supplier with this email already exists",
            ));
        }
        if suppliers.values().any(|s| s.phone == input.phone) {
            return Err(DomainError::conflict(
                "Supplier with this phone number already exists",
            ));
        }
        let supplier = Supplier::new(
            SupplierId::from_i64(self.supplier_seq.next()),
            input,
            Utc::now(),
        );
        suppliers.insert(supplier.supplier_id, supplier.clone());
        Ok(supplier)
    }

    pub fn list_suppliers(&self) -> DomainResult<Vec<Supplier>> {
        let suppliers = read(&self.suppliers)?;
        let mut all: Vec<Supplier> = suppliers.values().cloned().collect();
        all.sort_by_key(|s| s.supplier_id);
        Ok(all)
    }

    pub fn get_supplier(&self, id: SupplierId) -> DomainResult<Supplier> {
        read(&self.suppliers)?
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Supplier not found"))
    }

    pub fn update_supplier(&self, id: SupplierId, patch: SupplierPatch) -> DomainResult<Supplier> {
        let mut suppliers = write(&self.suppliers)?;
        if !suppliers.contains_key(&id) {
            return Err(DomainError::not_found("Supplier not found"));
        }
        if let Some(email) = &patch.email {
            if suppliers
                .values()
                .any(|s| s.supplier_id != id && s.email == *email)
            {
                return Err(DomainError::conflict(
                    "Supplier with this email already exists",
                ));
            }
        }
        if let Some(phone) = &patch.phone {
            if suppliers
                .values()
                .any(|s| s.supplier_id != id && s.phone == *phone)
            {
                return Err(DomainError::conflict(
                    "Supplier with this phone number already exists",
                ));
            }
        }
        match suppliers.get_mut(&id) {
            Some(supplier) => {
                patch.apply(supplier, Utc::now());
                Ok(supplier.clone())
            }
            None => Err(DomainError::not_found("Supplier not found")),
        }
    }

    pub fn delete_supplier(&self, id: SupplierId) -> DomainResult<()> {
        write(&self.suppliers)?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Supplier not found"))
    }
}
