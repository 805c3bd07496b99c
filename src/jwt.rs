//! Token issuance and validation.
//!
//! One symmetric secret signs both token kinds (HS256). Access and refresh
//! tokens carry the same claims; they differ only in lifetime and in which
//! session-registry map tracks them.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Issuer embedded in every token.
pub const ISSUER: &str = "Todo-Service";

/// Access token duration: 30 minutes
pub const ACCESS_TOKEN_DURATION_SECS: u64 = 30 * 60;

/// Refresh token duration: 1 hour
pub const REFRESH_TOKEN_DURATION_SECS: u64 = 60 * 60;

/// Decoded token payload. Reconstructed from the signed string on every
/// request; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to
    pub username: String,
    /// Database user ID
    pub user_id: i64,
    /// Issuer (always [`ISSUER`])
    pub iss: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Configuration for JWT operations.
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a short-lived access token for an authenticated user.
    pub fn issue_access_token(&self, username: &str, user_id: i64) -> Result<String, JwtError> {
        self.issue(username, user_id, ACCESS_TOKEN_DURATION_SECS)
    }

    /// Issue a refresh token, valid long enough to re-mint access tokens
    /// without forcing re-authentication.
    pub fn issue_refresh_token(&self, user_id: i64, username: &str) -> Result<String, JwtError> {
        self.issue(username, user_id, REFRESH_TOKEN_DURATION_SECS)
    }

    fn issue(&self, username: &str, user_id: i64, lifetime_secs: u64) -> Result<String, JwtError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| JwtError::Time)?
            .as_secs();

        let claims = Claims {
            username: username.to_string(),
            user_id,
            iss: ISSUER.to_string(),
            exp: now + lifetime_secs,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            // A signing failure means a misconfigured deployment; be loud.
            tracing::error!(error = %e, "failed to sign token");
            JwtError::Signing(e)
        })
    }

    /// Verify a token's signature and expiry and return its claims.
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);

        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(classify)?;

        Ok(token_data.claims)
    }
}

fn classify(e: jsonwebtoken::errors::Error) -> JwtError {
    use jsonwebtoken::errors::ErrorKind;
    match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidSignature => JwtError::SignatureInvalid,
        _ => JwtError::Malformed,
    }
}

/// Errors that can occur during token operations.
#[derive(Debug)]
pub enum JwtError {
    /// Token string cannot be parsed into the expected structure
    Malformed,
    /// Signature does not match (tampering or wrong secret)
    SignatureInvalid,
    /// Token expiry has passed
    Expired,
    /// Error producing a signature (internal, never expected with a valid secret)
    Signing(jsonwebtoken::errors::Error),
    /// System time error
    Time,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Malformed => write!(f, "malformed access token"),
            JwtError::SignatureInvalid => write!(f, "access token signature invalid"),
            JwtError::Expired => write!(f, "access token expired"),
            JwtError::Signing(e) => write!(f, "failed to sign token: {}", e),
            JwtError::Time => write!(f, "system time error"),
        }
    }
}

impl std::error::Error for JwtError {}
