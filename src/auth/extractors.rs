//! Axum extractor implementing the auth gate.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use tracing::warn;

use super::cookie::{ACCESS_COOKIE_NAME, get_cookie};
use super::errors::{AuthError, AuthErrorKind};
use super::state::HasAuthState;
use super::types::AuthenticatedUser;

/// Pull the access credential from the request: the `Authorization` header
/// when present (which must be `Bearer `-prefixed), otherwise the
/// `access_token` cookie.
fn extract_credential(parts: &Parts) -> Result<&str, AuthErrorKind> {
    if let Some(value) = parts.headers.get(header::AUTHORIZATION) {
        let value = value.to_str().map_err(|_| AuthErrorKind::BearerRequired)?;
        return value
            .strip_prefix("Bearer ")
            .ok_or(AuthErrorKind::BearerRequired);
    }

    get_cookie(&parts.headers, ACCESS_COOKIE_NAME).ok_or(AuthErrorKind::MissingToken)
}

/// Extractor for endpoints that require an authenticated session.
///
/// Decodes the presented access token and cross-checks the session registry,
/// so a logged-out token is rejected even though it would still verify until
/// its natural expiry. Rejection short-circuits the request with a 401.
pub struct Auth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for Auth
where
    S: HasAuthState + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_credential(parts).map_err(|kind| {
            warn!(error = ?kind, "request carried no usable access credential");
            AuthError::new(kind)
        })?;

        let claims = state.jwt().decode(token).map_err(|e| {
            warn!(error = %e, "access token failed validation");
            AuthError::new(AuthErrorKind::InvalidToken(e))
        })?;

        if !state.sessions().is_access_token_active(&claims.username) {
            warn!(username = %claims.username, "access token no longer registered");
            return Err(AuthError::new(AuthErrorKind::Revoked));
        }

        Ok(Auth(AuthenticatedUser {
            user_id: claims.user_id,
            username: claims.username,
        }))
    }
}
