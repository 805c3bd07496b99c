//! Account lookup collaborator and password hashing.
//!
//! The auth core only ever asks for an account by username and verifies a
//! password against its stored digest; everything else about user
//! persistence lives behind [`UserStore`].

use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use argon2::{Argon2, password_hash};
use std::collections::HashMap;
use std::sync::Mutex;

/// A stored account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_digest: String,
}

#[derive(Debug)]
pub enum UserStoreError {
    DuplicateUsername,
}

impl std::fmt::Display for UserStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStoreError::DuplicateUsername => write!(f, "username is already taken"),
        }
    }
}

impl std::error::Error for UserStoreError {}

/// Account lookup interface consumed by the login and register handlers.
pub trait UserStore: Send + Sync {
    /// Find an account by username.
    fn find_by_username(&self, username: &str) -> Option<User>;

    /// Create an account with an already-hashed password, returning its id.
    fn create(&self, username: &str, password_digest: &str) -> Result<i64, UserStoreError>;
}

/// Username-keyed in-memory account store.
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: Mutex<Accounts>,
}

#[derive(Default)]
struct Accounts {
    by_username: HashMap<String, User>,
    next_id: i64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn find_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .lock()
            .expect("user store lock poisoned")
            .by_username
            .get(username)
            .cloned()
    }

    fn create(&self, username: &str, password_digest: &str) -> Result<i64, UserStoreError> {
        let mut accounts = self.inner.lock().expect("user store lock poisoned");
        if accounts.by_username.contains_key(username) {
            return Err(UserStoreError::DuplicateUsername);
        }

        accounts.next_id += 1;
        let id = accounts.next_id;
        accounts.by_username.insert(
            username.to_string(),
            User {
                id,
                username: username.to_string(),
                password_digest: password_digest.to_string(),
            },
        );
        Ok(id)
    }
}

/// Hash a password with Argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a password against a stored digest. An undecodable digest is
/// treated as a mismatch.
pub fn verify_password(password: &str, digest: &str) -> bool {
    PasswordHash::new(digest)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
