//! In-memory registry of active sessions.
//!
//! The registry is the sole source of truth for revocation: a token that
//! still verifies cryptographically is rejected once its entry is gone.
//! State is process-local and lost on restart; it does not scale across
//! instances without swapping in a shared store behind the same methods.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Maps {
    access: HashMap<String, String>,
    refresh: HashMap<String, String>,
}

/// Username-keyed maps of the currently-valid access and refresh tokens,
/// guarded by a single lock. At most one of each per username; saving
/// again overwrites.
///
/// Entries are removed only by explicit logout. They are not swept when
/// the underlying token expires; decode rejects such tokens before the
/// registry is ever consulted.
#[derive(Default)]
pub struct SessionRegistry {
    inner: Mutex<Maps>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Critical sections are map operations only; token validation and I/O
    // happen outside the lock.
    fn maps(&self) -> MutexGuard<'_, Maps> {
        self.inner.lock().expect("session registry lock poisoned")
    }

    /// Record `token` as the single active access token for `username`,
    /// replacing any prior one.
    pub fn save_access_token(&self, username: &str, token: &str) {
        self.maps()
            .access
            .insert(username.to_string(), token.to_string());
    }

    pub fn remove_access_token(&self, username: &str) {
        self.maps().access.remove(username);
    }

    pub fn is_access_token_active(&self, username: &str) -> bool {
        self.maps().access.contains_key(username)
    }

    /// Record `token` as the single active refresh token for `username`,
    /// replacing any prior one.
    pub fn save_refresh_token(&self, username: &str, token: &str) {
        self.maps()
            .refresh
            .insert(username.to_string(), token.to_string());
    }

    pub fn remove_refresh_token(&self, username: &str) {
        self.maps().refresh.remove(username);
    }

    pub fn is_refresh_token_active(&self, username: &str) -> bool {
        self.maps().refresh.contains_key(username)
    }

    /// Whether `token` is exactly the refresh token stored for `username`.
    /// False when the user is logged out or the session was superseded.
    pub fn refresh_token_matches(&self, username: &str, token: &str) -> bool {
        self.maps().refresh.get(username).map(String::as_str) == Some(token)
    }

    /// Remove both entries for `username` in one critical section (logout).
    pub fn clear_session(&self, username: &str) {
        let mut maps = self.maps();
        maps.access.remove(username);
        maps.refresh.remove(username);
    }
}
