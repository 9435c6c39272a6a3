use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{validate, DomainResult, TagId};

/// A product tag. Name is unique across tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub tag_id: TagId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Tag {
    pub fn new(tag_id: TagId, input: NewTag, now: DateTime<Utc>) -> Self {
        Self {
            tag_id,
            name: input.name,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn view(&self) -> TagView {
        TagView {
            id: self.tag_id,
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagView {
    pub id: TagId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
}

impl NewTag {
    pub fn validate(&self) -> DomainResult<()> {
        validate::require_len("name", &self.name, 3, 50)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagPatch {
    pub name: Option<String>,
}

impl TagPatch {
    pub fn validate(&self) -> DomainResult<()> {
        match &self.name {
            Some(name) => validate::require_len("name", name, 3, 50),
            None => Ok(()),
        }
    }

    pub fn apply(&self, tag: &mut Tag, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            tag.name = name.clone();
        }
        tag.updated_at = now;
    }
}
