use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{validate, BranchId, DomainResult};

/// A restaurant branch (physical location).
///
/// Name and address are both unique across branches. `deleted_at` exists in
/// the schema but no code path sets or filters on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub branch_id: BranchId,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Branch {
    pub fn new(branch_id: BranchId, input: NewBranch, now: DateTime<Utc>) -> Self {
        Self {
            branch_id,
            name: input.name,
            address: input.address,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Wire serialization: schema fields only, no timestamps.
    pub fn view(&self) -> BranchView {
        BranchView {
            id: self.branch_id,
            name: self.name.clone(),
            address: self.address.clone(),
        }
    }
}

/// Public serialization of a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchView {
    pub id: BranchId,
    pub name: String,
    pub address: String,
}

/// Input for creating a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBranch {
    pub name: String,
    pub address: String,
}

impl NewBranch {
    pub fn validate(&self) -> DomainResult<()> {
        validate::require_len("name", &self.name, 3, 50)?;
        validate::require_len("address", &self.address, 1, 100)?;
        Ok(())
    }
}

/// Partial update for a branch; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchPatch {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl BranchPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate::require_len("name", name, 3, 50)?;
        }
        if let Some(address) = &self.address {
            validate::require_len("address", address, 1, 100)?;
        }
        Ok(())
    }

    /// Field-by-field merge onto an existing branch.
    pub fn apply(&self, branch: &mut Branch, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            branch.name = name.clone();
        }
        if let Some(address) = &self.address {
            branch.address = address.clone();
        }
        branch.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> NewBranch {
        NewBranch {
            name: "TLC Mandaluyong".into(),
            address: "124 Mandaluyong".into(),
        }
    }

    #[test]
    fn new_sets_fields_and_timestamps() {
        let now = Utc::now();
        let branch = Branch::new(BranchId::from_i64(1), valid_input(), now);
        assert_eq!(branch.branch_id.as_i64(), 1);
        assert_eq!(branch.name, "TLC Mandaluyong");
        assert_eq!(branch.created_at, now);
        assert_eq!(branch.updated_at, now);
        assert!(branch.deleted_at.is_none());
    }

    #[test]
    fn validate_enforces_name_and_address_bounds() {
        assert!(valid_input().validate().is_ok());

        let mut input = valid_input();
        input.name = "ab".into();
        assert!(input.validate().is_err());

        let mut input = valid_input();
        input.address = String::new();
        assert!(input.validate().is_err());

        let mut input = valid_input();
        input.address = "x".repeat(101);
        assert!(input.validate().is_err());
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let created = Utc::now();
        let mut branch = Branch::new(BranchId::from_i64(1), valid_input(), created);

        let later = created + chrono::Duration::seconds(5);
        let patch = BranchPatch {
            name: Some("TLC Manila".into()),
            address: None,
        };
        patch.validate().unwrap();
        patch.apply(&mut branch, later);

        assert_eq!(branch.name, "TLC Manila");
        assert_eq!(branch.address, "124 Mandaluyong");
        assert_eq!(branch.created_at, created);
        assert_eq!(branch.updated_at, later);
    }

    #[test]
    fn empty_patch_is_valid_and_only_touches_updated_at() {
        let created = Utc::now();
        let mut branch = Branch::new(BranchId::from_i64(1), valid_input(), created);
        let later = created + chrono::Duration::seconds(1);

        let patch = BranchPatch::default();
        patch.validate().unwrap();
        patch.apply(&mut branch, later);

        assert_eq!(branch.name, "TLC Mandaluyong");
        assert_eq!(branch.updated_at, later);
    }

    #[test]
    fn patch_rejects_out_of_bounds_fields() {
        let patch = BranchPatch {
            name: Some("ab".into()),
            address: None,
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn view_exposes_schema_fields_only() {
        let branch = Branch::new(BranchId::from_i64(7), valid_input(), Utc::now());
        let json = serde_json::to_value(branch.view()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "name": "TLC Mandaluyong",
                "address": "124 Mandaluyong",
            })
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_patch_preserves_unpatched_fields(
                patch_name in proptest::option::of("[a-zA-Z ]{3,50}"),
                patch_address in proptest::option::of("[a-zA-Z0-9 ]{1,100}"),
            ) {
                let now = Utc::now();
                let mut branch = Branch::new(BranchId::from_i64(1), valid_input(), now);
                let patch = BranchPatch { name: patch_name.clone(), address: patch_address.clone() };
                prop_assert!(patch.validate().is_ok());
                patch.apply(&mut branch, now);

                match patch_name {
                    Some(n) => prop_assert_eq!(branch.name, n),
                    None => prop_assert_eq!(branch.name.as_str(), "TLC Mandaluyong"),
                }
                match patch_address {
                    Some(a) => prop_assert_eq!(branch.address, a),
                    None => prop_assert_eq!(branch.address.as_str(), "124 Mandaluyong"),
                }
            }
        }
    }
}
