//! Login-key deployment variant.

use core::str::FromStr;

/// Which credential field identifies a user at login.
///
/// Deployments pick exactly one; the variants are mutually exclusive, never
/// simultaneous.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LoginKey {
    #[default]
    Username,
    Email,
}

impl LoginKey {
    /// The JSON field name carrying the login key in a login request.
    pub fn field(&self) -> &'static str {
        match self {
            LoginKey::Username => "username",
            LoginKey::Email => "email",
        }
    }
}

impl FromStr for LoginKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "username" => Ok(LoginKey::Username),
            "email" => Ok(LoginKey::Email),
            other => Err(format!(
                "login key must be \"username\" or \"email\", got {other:?}"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_variants_case_insensitively() {
        assert_eq!("username".parse::<LoginKey>().unwrap(), LoginKey::Username);
        assert_eq!("Email".parse::<LoginKey>().unwrap(), LoginKey::Email);
        assert_eq!(" EMAIL ".parse::<LoginKey>().unwrap(), LoginKey::Email);
    }

    #[test]
    fn rejects_unknown_variants() {
        assert!("both".parse::<LoginKey>().is_err());
        assert!("".parse::<LoginKey>().is_err());
    }

    #[test]
    fn field_names_match_the_wire_format() {
        assert_eq!(LoginKey::Username.field(), "username");
        assert_eq!(LoginKey::Email.field(), "email");
    }
}
