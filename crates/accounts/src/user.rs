use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{validate, DomainResult, UserId};

/// A registered API user.
///
/// Username and email are each unique. `password_age` records when the
/// current hash was set; there is no change-password flow yet, so it always
/// equals `created_at`. Users are never exposed through a resource route and
/// never deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<String>,
    pub position: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub password_age: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Build a user from a validated registration and an already-computed
    /// password hash.
    pub fn register(
        user_id: UserId,
        input: Registration,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            username: input.username,
            first_name: input.first_name,
            middle_name: input.middle_name,
            last_name: input.last_name,
            birth_date: input.birth_date,
            sex: input.sex,
            position: input.position,
            email: input.email,
            password_hash,
            password_age: now,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Registration input. Only username/email/password are required; profile
/// fields are stored verbatim when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

impl Registration {
    pub fn validate(&self) -> DomainResult<()> {
        validate::require_len("username", &self.username, 3, 50)?;
        validate::require_email("email", &self.email)?;
        validate::require_min_len("password", &self.password, 6)?;
        Ok(())
    }
}
