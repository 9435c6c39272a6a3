//! Environment-sourced configuration, read once at startup.

use std::collections::HashSet;

use larder_auth::LoginKey;

/// Process configuration.
///
/// Built once in `main` (or a test harness) and passed down; nothing reads
/// the environment after startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    /// Which identity field `/auth/login` reads; deployments pick one.
    pub login_key: LoginKey,
    /// bcrypt work factor; `None` means the library default.
    pub bcrypt_cost: Option<u32>,
    /// Body keys whose values are blanked out of audit entries.
    pub sensitive_fields: HashSet<String>,
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
    /// Audit store connection string; falls back to `database_url`.
    pub audit_database_url: Option<String>,
    pub audit_table: String,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let sensitive_fields = std::env::var("SENSITIVE_FIELDS")
            .map(|raw| parse_field_set(&raw))
            .unwrap_or_else(|_| parse_field_set("password"));

        Self {
            jwt_secret,
            token_ttl_secs: env_parsed("TOKEN_TTL_SECS").unwrap_or(3600),
            login_key: env_parsed("LOGIN_KEY").unwrap_or_default(),
            bcrypt_cost: env_parsed("BCRYPT_COST"),
            sensitive_fields,
            use_persistent_stores: env_parsed("USE_PERSISTENT_STORES").unwrap_or(false),
            database_url: std::env::var("DATABASE_URL").ok(),
            audit_database_url: std::env::var("AUDIT_DATABASE_URL").ok(),
            audit_table: std::env::var("AUDIT_TABLE")
                .unwrap_or_else(|_| "request_logs".to_string()),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|raw| raw.parse().ok())
}

fn parse_field_set(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_set_splits_and_trims() {
        let fields = parse_field_set("password, token ,,secret");
        assert_eq!(fields.len(), 3);
        assert!(fields.contains("password"));
        assert!(fields.contains("token"));
        assert!(fields.contains("secret"));
    }

    #[test]
    fn empty_field_set_is_empty() {
        assert!(parse_field_set("").is_empty());
        assert!(parse_field_set(" , ").is_empty());
    }
}
