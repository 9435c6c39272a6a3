//! `larder-auth` — pure authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: token
//! issuance/verification and password hashing only.

pub mod claims;
pub mod login;
pub mod password;
pub mod token;

pub use claims::{validate_claims, Claims};
pub use login::LoginKey;
pub use password::{PasswordError, PasswordHasher};
pub use token::{TokenError, TokenService};
