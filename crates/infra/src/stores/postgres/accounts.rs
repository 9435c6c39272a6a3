use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use larder_accounts::{Registration, User};
use larder_core::{DomainResult, UserId};

use super::{conflict_or_internal, internal};

const USER_CONSTRAINTS: &[(&str, &str)] = &[
    ("users_username_key", "That username already exists"),
    ("users_email_key", "That email already exists"),
];

/// Postgres users.
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, input, password_hash), fields(username = %input.username), err)]
    pub async fn register_user(
        &self,
        input: Registration,
        password_hash: String,
    ) -> DomainResult<User> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO users
                (username, first_name, middle_name, last_name, birth_date, sex, position,
                 email, password_hash, password_age, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10, $10)
            RETURNING id, username, first_name, middle_name, last_name, birth_date, sex,
                      position, email, password_hash, password_age,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(&input.username)
        .bind(&input.first_name)
        .bind(&input.middle_name)
        .bind(&input.last_name)
        .bind(input.birth_date)
        .bind(&input.sex)
        .bind(&input.position)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_internal(e, USER_CONSTRAINTS))?;
        user_from_row(&row)
    }

    #[instrument(skip(self), err)]
    pub async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, first_name, middle_name, last_name, birth_date, sex, \
                    position, email, password_hash, password_age, \
                    created_at, updated_at, deleted_at \
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;
        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    pub async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, first_name, middle_name, last_name, birth_date, sex, \
                    position, email, password_hash, password_age, \
                    created_at, updated_at, deleted_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;
        row.as_ref().map(user_from_row).transpose()
    }
}

fn user_from_row(row: &PgRow) -> DomainResult<User> {
    Ok(User {
        user_id: UserId::from_i64(row.try_get("id").map_err(internal)?),
        username: row.try_get("username").map_err(internal)?,
        first_name: row.try_get("first_name").map_err(internal)?,
        middle_name: row.try_get("middle_name").map_err(internal)?,
        last_name: row.try_get("last_name").map_err(internal)?,
        birth_date: row.try_get("birth_date").map_err(internal)?,
        sex: row.try_get("sex").map_err(internal)?,
        position: row.try_get("position").map_err(internal)?,
        email: row.try_get("email").map_err(internal)?,
        password_hash: row.try_get("password_hash").map_err(internal)?,
        password_age: row.try_get("password_age").map_err(internal)?,
        created_at: row.try_get("created_at").map_err(internal)?,
        updated_at: row.try_get("updated_at").map_err(internal)?,
        deleted_at: row.try_get("deleted_at").map_err(internal)?,
    })
}
