//! Postgres-backed resource stores.
//!
//! Runtime-checked queries only; rows are mapped by hand. Uniqueness is
//! enforced by named constraints, and unique violations (`23505`) are
//! translated back into the same `DomainError::Conflict` messages the
//! in-memory stores produce, keyed by constraint name.

pub mod accounts;
pub mod catalog;
pub mod inventory;
pub mod parties;
pub mod sites;

pub use accounts::PgAccountStore;
pub use catalog::PgCatalogStore;
pub use inventory::PgInventoryStore;
pub use parties::PgPartyStore;
pub use sites::PgSiteStore;

use sqlx::PgPool;
use tracing::info;

use larder_core::{DomainError, DomainResult};

pub async fn connect(url: &str) -> DomainResult<PgPool> {
    PgPool::connect(url).await.map_err(internal)
}

/// Create every resource table that does not exist yet.
///
/// Column types mirror the entities: BIGSERIAL ids, TIMESTAMPTZ timestamps,
/// DOUBLE PRECISION quantities. Referential columns keep their foreign keys
/// even though services never check them; only the product-tag join cascades,
/// because its rows are owned by the product.
pub async fn init_schema(pool: &PgPool) -> DomainResult<()> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS branches (
            branch_id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            address TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            deleted_at TIMESTAMPTZ,
            CONSTRAINT branches_name_key UNIQUE (name),
            CONSTRAINT branches_address_key UNIQUE (address)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            category_id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            deleted_at TIMESTAMPTZ,
            CONSTRAINT categories_name_key UNIQUE (name)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            tag_id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            deleted_at TIMESTAMPTZ,
            CONSTRAINT tags_name_key UNIQUE (name)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS suppliers (
            supplier_id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            country_code TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            deleted_at TIMESTAMPTZ,
            CONSTRAINT suppliers_email_key UNIQUE (email),
            CONSTRAINT suppliers_phone_key UNIQUE (phone)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS products (
            product_id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            variant_group_id TEXT NOT NULL,
            sku TEXT NOT NULL,
            category_id BIGINT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            deleted_at TIMESTAMPTZ,
            CONSTRAINT products_sku_key UNIQUE (sku)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS inventoryitems (
            item_id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            cost DOUBLE PRECISION NOT NULL,
            unit TEXT NOT NULL,
            stock_warning_level DOUBLE PRECISION NOT NULL,
            supplier_id BIGINT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            deleted_at TIMESTAMPTZ
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS outlets (
            outlet_id BIGSERIAL PRIMARY KEY,
            product_id BIGINT NOT NULL REFERENCES products(product_id),
            name TEXT NOT NULL,
            price DOUBLE PRECISION NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            deleted_at TIMESTAMPTZ,
            CONSTRAINT outlets_name_key UNIQUE (name)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS recipes (
            product_id BIGINT NOT NULL REFERENCES products(product_id),
            item_id BIGINT NOT NULL REFERENCES inventoryitems(item_id),
            quantity DOUBLE PRECISION NOT NULL,
            is_takeout BOOLEAN NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            deleted_at TIMESTAMPTZ,
            CONSTRAINT recipes_pkey PRIMARY KEY (product_id, item_id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS branchstockcount (
            branch_id BIGINT NOT NULL REFERENCES branches(branch_id),
            item_id BIGINT NOT NULL REFERENCES inventoryitems(item_id),
            in_stock DOUBLE PRECISION NOT NULL,
            ordered_qty DOUBLE PRECISION NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            deleted_at TIMESTAMPTZ,
            CONSTRAINT branchstockcount_pkey PRIMARY KEY (branch_id, item_id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS product_tags (
            product_id BIGINT NOT NULL REFERENCES products(product_id) ON DELETE CASCADE,
            tag_id BIGINT NOT NULL REFERENCES tags(tag_id) ON DELETE CASCADE,
            CONSTRAINT product_tags_pkey PRIMARY KEY (product_id, tag_id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL,
            first_name TEXT,
            middle_name TEXT,
            last_name TEXT,
            birth_date DATE,
            sex TEXT,
            position TEXT,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            password_age TIMESTAMPTZ NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            deleted_at TIMESTAMPTZ,
            CONSTRAINT users_username_key UNIQUE (username),
            CONSTRAINT users_email_key UNIQUE (email)
        )
        "#,
    ];

    for ddl in statements {
        sqlx::query(ddl).execute(pool).await.map_err(internal)?;
    }
    info!("relational schema ready");
    Ok(())
}

pub(crate) fn internal(err: impl std::fmt::Display) -> DomainError {
    DomainError::internal(err.to_string())
}

/// Map a write error: a unique violation on a known constraint becomes the
/// matching conflict, anything else is internal.
pub(crate) fn conflict_or_internal(
    err: sqlx::Error,
    constraints: &[(&str, &str)],
) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23505") {
            if let Some(constraint) = db.constraint() {
                for (name, message) in constraints {
                    if constraint == *name {
                        return DomainError::conflict(*message);
                    }
                }
            }
        }
    }
    internal(err)
}
