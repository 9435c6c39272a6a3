use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use larder_accounts::{Registration, User};
use larder_core::{DomainError, DomainResult, UserId};

use super::{read, write, Sequence};

/// In-memory users. Lookups return `None` for absent identities so the
/// caller can collapse "no such user" and "wrong password" into one answer.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    users: RwLock<HashMap<UserId, User>>,
    user_seq: Sequence,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_user(
        &self,
        input: Registration,
        password_hash: String,
    ) -> DomainResult<User> {
        let mut users = write(&self.users)?;
        if users.values().any(|u| u.username == input.username) {
            return Err(DomainError::conflict("That username already exists"));
        }
        if users.values().any(|u| u.email == input.email) {
            return Err(DomainError::conflict("That email already exists"));
        }
        let user = User::register(
            UserId::from_i64(self.user_seq.next()),
            input,
            password_hash,
            Utc::now(),
        );
        users.insert(user.user_id, user.clone());
        Ok(user)
    }

    pub fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let users = read(&self.users)?;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    pub fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let users = read(&self.users)?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(username: &str, email: &str) -> Registration {
        Registration {
            username: username.into(),
            email: email.into(),
            password: "hunter22".into(),
            first_name: None,
            middle_name: None,
            last_name: None,
            birth_date: None,
            sex: None,
            position: None,
        }
    }

    #[test]
    fn register_then_find_by_either_key() {
        let store = MemoryAccountStore::new();
        let user = store
            .register_user(registration("mvictoria", "mv@example.com"), "hash".into())
            .unwrap();
        assert_eq!(user.user_id.as_i64(), 1);

        let by_name = store.find_by_username("mvictoria").unwrap().unwrap();
        assert_eq!(by_name.email, "mv@example.com");

        let by_email = store.find_by_email("mv@example.com").unwrap().unwrap();
        assert_eq!(by_email.username, "mvictoria");

        assert!(store.find_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_conflicts_and_keeps_first_user() {
        let store = MemoryAccountStore::new();
        store
            .register_user(registration("mvictoria", "mv@example.com"), "hash-a".into())
            .unwrap();

        let err = store
            .register_user(registration("mvictoria", "other@example.com"), "hash-b".into())
            .unwrap_err();
        assert_eq!(err.message(), "That username already exists");

        let kept = store.find_by_username("mvictoria").unwrap().unwrap();
        assert_eq!(kept.password_hash, "hash-a");
    }

    #[test]
    fn duplicate_email_has_its_own_message() {
        let store = MemoryAccountStore::new();
        store
            .register_user(registration("mvictoria", "mv@example.com"), "hash".into())
            .unwrap();
        let err = store
            .register_user(registration("other", "mv@example.com"), "hash".into())
            .unwrap_err();
        assert_eq!(err.message(), "That email already exists");
    }
}
