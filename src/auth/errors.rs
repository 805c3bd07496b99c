//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::jwt::JwtError;

/// Why a request failed the auth gate. All kinds map to 401; they exist so
/// the logs can tell a missing credential from a revoked one.
#[derive(Debug)]
pub enum AuthErrorKind {
    /// No credential in the Authorization header or the access cookie
    MissingToken,
    /// Authorization header present but not `Bearer `-prefixed
    BearerRequired,
    /// Credential failed to decode (malformed, tampered, or expired)
    InvalidToken(JwtError),
    /// Token verifies but the session is no longer in the registry
    Revoked,
}

/// Rejection produced by the auth gate. Renders as 401 with a JSON body
/// whose `status` field mirrors the HTTP code.
#[derive(Debug)]
pub struct AuthError {
    kind: AuthErrorKind,
}

impl AuthError {
    pub(super) fn new(kind: AuthErrorKind) -> Self {
        Self { kind }
    }

    fn message(&self) -> String {
        match &self.kind {
            AuthErrorKind::MissingToken => "access token required".to_string(),
            AuthErrorKind::BearerRequired => "access token Bearer required".to_string(),
            AuthErrorKind::InvalidToken(e) => e.to_string(),
            AuthErrorKind::Revoked => "token unauthorized".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: u16,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = StatusCode::UNAUTHORIZED;
        (
            status,
            Json(ErrorBody {
                status: status.as_u16(),
                message: self.message(),
            }),
        )
            .into_response()
    }
}
