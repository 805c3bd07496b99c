//! Authentication user types.

/// Identity injected into request context once a credential has passed the
/// auth gate.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Database user ID
    pub user_id: i64,
    /// Username from the token claims
    pub username: String,
}
