use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::token::TokenError;

/// JWT claims model (transport-agnostic).
///
/// The subject is the configured login-key value (username or email) of the
/// authenticated identity. Timestamps are seconds since the Unix epoch, as
/// JWTs encode them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject / identity reference.
    pub sub: String,

    /// Issued-at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: impl Into<String>, issued_at: DateTime<Utc>, ttl_secs: i64) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: sub.into(),
            iat,
            exp: iat + ttl_secs,
        }
    }

    pub fn issued_at(&self) -> i64 {
        self.iat
    }

    pub fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// Deterministically validate the claim time window.
///
/// Note: this validates the *claims* only. Signature verification/decoding
/// happens in [`crate::token::TokenService`].
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.exp <= claims.iat {
        return Err(TokenError::InvalidTimeWindow);
    }
    if now.timestamp() < claims.iat {
        return Err(TokenError::NotYetValid);
    }
    if now.timestamp() >= claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(())
}
