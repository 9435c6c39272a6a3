use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use larder_core::{BranchId, DomainError, DomainResult, OutletId, ProductId};
use larder_sites::{Branch, BranchPatch, NewBranch, NewOutlet, Outlet, OutletPatch};

use super::{read, write, Sequence};

/// In-memory branches and outlets.
#[derive(Debug, Default)]
pub struct MemorySiteStore {
    branches: RwLock<HashMap<BranchId, Branch>>,
    outlets: RwLock<HashMap<OutletId, Outlet>>,
    branch_seq: Sequence,
    outlet_seq: Sequence,
}

impl MemorySiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_branch(&self, input: NewBranch) -> DomainResult<Branch> {
        let mut branches = write(&self.branches)?;
        if branches.values().any(|b| b.name == input.name) {
            return Err(DomainError::conflict("Branch with this name already exists"));
        }
        if branches.values().any(|b| b.address == input.address) {
            return Err(DomainError::conflict(
                "Branch with this address already exists",
            ));
        }
        let branch = Branch::new(BranchId::from_i64(self.branch_seq.next()), input, Utc::now());
        branches.insert(branch.branch_id, branch.clone());
        Ok(branch)
    }

    pub fn list_branches(&self) -> DomainResult<Vec<Branch>> {
        let branches = read(&self.branches)?;
        let mut all: Vec<Branch> = branches.values().cloned().collect();
        all.sort_by_key(|b| b.branch_id);
        Ok(all)
    }

    pub fn get_branch(&self, id: BranchId) -> DomainResult<Branch> {
        read(&self.branches)?
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Branch not found"))
    }

    pub fn update_branch(&self, id: BranchId, patch: BranchPatch) -> DomainResult<Branch> {
        let mut branches = write(&self.branches)?;
        if !branches.contains_key(&id) {
            return Err(DomainError::not_found("Branch not found"));
        }
        if let Some(name) = &patch.name {
            if branches.values().any(|b| b.branch_id != id && b.name == *name) {
                return Err(DomainError::conflict("Branch with this name already exists"));
            }
        }
        if let Some(address) = &patch.address {
            if branches
                .values()
                .any(|b| b.branch_id != id && b.address == *address)
            {
                return Err(DomainError::conflict(
                    "Branch with this address already exists",
                ));
            }
        }
        match branches.get_mut(&id) {
            Some(branch) => {
                patch.apply(branch, Utc::now());
                Ok(branch.clone())
            }
            None => Err(DomainError::not_found("Branch not found")),
        }
    }

    pub fn delete_branch(&self, id: BranchId) -> DomainResult<()> {
        write(&self.branches)?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Branch not found"))
    }

    pub fn create_outlet(&self, input: NewOutlet) -> DomainResult<Outlet> {
        let mut outlets = write(&self.outlets)?;
        if outlets.values().any(|o| o.name == input.name) {
            return Err(DomainError::conflict("Outlet with this name already exists"));
        }
        let outlet = Outlet::new(OutletId::from_i64(self.outlet_seq.next()), input, Utc::now());
        outlets.insert(outlet.outlet_id, outlet.clone());
        Ok(outlet)
    }

    /// List outlets, optionally only those selling one product.
    pub fn list_outlets(&self, product_id: Option<ProductId>) -> DomainResult<Vec<Outlet>> {
        let outlets = read(&self.outlets)?;
        let mut all: Vec<Outlet> = outlets
            .values()
            .filter(|o| product_id.is_none_or(|p| o.product_id == p))
            .cloned()
            .collect();
        all.sort_by_key(|o| o.outlet_id);
        Ok(all)
    }

    pub fn get_outlet(&self, id: OutletId) -> DomainResult<Outlet> {
        read(&self.outlets)?
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Outlet not found"))
    }

    pub fn update_outlet(&self, id: OutletId, patch: OutletPatch) -> DomainResult<Outlet> {
        let mut outlets = write(&self.outlets)?;
        if !outlets.contains_key(&id) {
            return Err(DomainError::not_found("Outlet not found"));
        }
        if let Some(name) = &patch.name {
            if outlets.values().any(|o| o.outlet_id != id && o.name == *name) {
                return Err(DomainError::conflict("Outlet with this name already exists"));
            }
        }
        match outlets.get_mut(&id) {
            Some(outlet) => {
                patch.apply(outlet, Utc::now());
                Ok(outlet.clone())
            }
            None => Err(DomainError::not_found("Outlet not found")),
        }
    }

    pub fn delete_outlet(&self, id: OutletId) -> DomainResult<()> {
        write(&self.outlets)?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Outlet not found"))
    }
}
