//! Signed bearer token issuance and verification (HS256 JWT).

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{validate_claims, Claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Issues and verifies signed, time-limited bearer tokens.
///
/// The signing secret and TTL are fixed at construction; there is no
/// revocation, refresh, or runtime rotation. Verification checks the
/// signature first, then the claim time window against the supplied clock.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a token for `identity`, valid from now for the configured TTL.
    pub fn issue(&self, identity: &str) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token with an explicit issue instant (deterministic for tests).
    pub fn issue_at(&self, identity: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims::new(identity, now, self.ttl_secs);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }

    /// Verify a token against the current wall clock.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token's signature, then its claim window at `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        // Expiry is checked by `validate_claims` with zero leeway, not by the
        // decoder. The decoder still requires the claim fields to be present.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn service() -> TokenService {
        TokenService::new(b"test-secret", 3600)
    }

    #[test]
    fn verify_round_trips_the_identity() {
        let svc = service();
        let token = svc.issue("alice").unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn tokens_are_url_safe_compact_jwts() {
        let svc = service();
        let token = svc.issue("alice").unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')));
    }

    #[test]
    fn rejects_tokens_past_their_ttl() {
        let svc = service();
        let issued = Utc::now() - Duration::hours(2);
        let token = svc.issue_at("alice", issued).unwrap();
        assert_eq!(svc.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn accepts_just_before_expiry_rejects_at_expiry() {
        let svc = service();
        let issued = Utc::now();
        let token = svc.issue_at("alice", issued).unwrap();
        assert!(svc.verify_at(&token, issued + Duration::seconds(3599)).is_ok());
        assert_eq!(
            svc.verify_at(&token, issued + Duration::seconds(3600)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let other = TokenService::new(b"other-secret", 3600);
        let token = other.issue("alice").unwrap();
        assert!(matches!(service().verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn rejects_garbage_and_tampered_tokens() {
        let svc = service();
        assert!(matches!(
            svc.verify("not-a-jwt"),
            Err(TokenError::Invalid(_))
        ));

        let token = svc.issue("alice").unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let tampered_payload = format!("{}AA", parts[1]);
        parts[1] = &tampered_payload;
        let tampered = parts.join(".");
        assert!(matches!(svc.verify(&tampered), Err(TokenError::Invalid(_))));
    }
}
