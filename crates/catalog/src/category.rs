use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{validate, CategoryId, DomainResult};

/// A product category. Name is unique across categories.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn new(category_id: CategoryId, input: NewCategory, now: DateTime<Utc>) -> Self {
        Self {
            category_id,
            name: input.name,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn view(&self) -> CategoryView {
        CategoryView {
            id: self.category_id,
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    pub fn validate(&self) -> DomainResult<()> {
        validate::require_len("name", &self.name, 3, 50)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
}

impl CategoryPatch {
    pub fn validate(&self) -> DomainResult<()> {
        match &self.name {
            Some(name) => validate::require_len("name", name, 3, 50),
            None => Ok(()),
        }
    }

    pub fn apply(&self, category: &mut Category, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            category.name = name.clone();
        }
        category.updated_at = now;
    }
}
