//! Session lifecycle endpoints.
//!
//! - POST `/Login` - Verify credentials, issue tokens, register the session
//! - POST `/Logout` - Revoke the session and clear cookies
//! - POST `/RefreshToken` - Exchange the refresh cookie for a new access token
//! - GET `/AuthStatus` - Liveness probe for the current session
//! - POST `/Register` - Create an account

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    middleware,
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::error::ApiError;
use crate::auth::{
    ACCESS_COOKIE_NAME, Auth, REFRESH_COOKIE_NAME, access_cookie, clear_cookie, get_cookie,
    refresh_cookie,
};
use crate::impl_has_auth_state;
use crate::jwt::JwtConfig;
use crate::rate_limit::{RateLimitConfig, rate_limit_login, rate_limit_register};
use crate::sessions::SessionRegistry;
use crate::users::{self, UserStore};

#[derive(Clone)]
pub struct AccountsState {
    pub users: Arc<dyn UserStore>,
    pub jwt: Arc<JwtConfig>,
    pub sessions: Arc<SessionRegistry>,
    pub secure_cookies: bool,
}

impl_has_auth_state!(AccountsState);

pub fn router(state: AccountsState, rate_limits: Arc<RateLimitConfig>) -> Router {
    let login_routes = Router::new()
        .route("/Login", post(login))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(
            rate_limits.clone(),
            rate_limit_login,
        ));

    let register_routes = Router::new()
        .route("/Register", post(register))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(
            rate_limits,
            rate_limit_register,
        ));

    let session_routes = Router::new()
        .route("/RefreshToken", post(refresh_token))
        .route("/AuthStatus", get(auth_status))
        .route("/Logout", post(logout))
        .with_state(state);

    login_routes.merge(register_routes).merge(session_routes)
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Serialize)]
struct UserInfo {
    username: String,
    id: i64,
}

#[derive(Serialize)]
struct SessionResponse {
    status: u16,
    message: &'static str,
    user: UserInfo,
}

/// Verify credentials, mint both tokens, and register the session.
///
/// Single-session policy: a username with a live access entry cannot log in
/// again until it logs out. Credential failures are 400, never 401 - there
/// is no session yet to be unauthorized about.
async fn login(
    State(state): State<AccountsState>,
    Json(payload): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    if state.sessions.is_access_token_active(&payload.username) {
        warn!(username = %payload.username, "login rejected, session already active");
        return Err(ApiError::bad_request("User is already logged in"));
    }

    let user = state
        .users
        .find_by_username(&payload.username)
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    if !users::verify_password(&payload.password, &user.password_digest) {
        warn!(username = %user.username, "login rejected, password mismatch");
        return Err(ApiError::bad_request("Invalid Password Credentials"));
    }

    let access_token = state
        .jwt
        .issue_access_token(&user.username, user.id)
        .map_err(|e| ApiError::internal("Error while generating access token.", e))?;
    let refresh_token = state
        .jwt
        .issue_refresh_token(user.id, &user.username)
        .map_err(|e| ApiError::internal("Error while generating refresh token.", e))?;

    state.sessions.save_access_token(&user.username, &access_token);
    state
        .sessions
        .save_refresh_token(&user.username, &refresh_token);

    info!(username = %user.username, "user logged in");

    Ok((
        StatusCode::OK,
        AppendHeaders([
            (SET_COOKIE, access_cookie(&access_token, state.secure_cookies)),
            (
                SET_COOKIE,
                refresh_cookie(&refresh_token, state.secure_cookies),
            ),
        ]),
        Json(SessionResponse {
            status: StatusCode::OK.as_u16(),
            message: "User logged in successfully",
            user: UserInfo {
                username: user.username,
                id: user.id,
            },
        }),
    ))
}

#[derive(Serialize)]
struct MessageResponse {
    status: u16,
    message: &'static str,
}

/// Revoke the caller's session and clear both cookies.
///
/// Gated: requires a live access credential, so a second logout with the
/// same token is 401 - the registry entry is already gone.
async fn logout(State(state): State<AccountsState>, Auth(user): Auth) -> impl IntoResponse {
    state.sessions.clear_session(&user.username);

    info!(username = %user.username, "user logged out");

    (
        StatusCode::OK,
        AppendHeaders([
            (
                SET_COOKIE,
                clear_cookie(ACCESS_COOKIE_NAME, state.secure_cookies),
            ),
            (
                SET_COOKIE,
                clear_cookie(REFRESH_COOKIE_NAME, state.secure_cookies),
            ),
        ]),
        Json(MessageResponse {
            status: StatusCode::OK.as_u16(),
            message: "User logged out successfully",
        }),
    )
}

#[derive(Serialize)]
struct RefreshResponse {
    status: u16,
    access_token: String,
}

/// Exchange the refresh cookie for a new access token.
///
/// The presented token must be exactly the one stored in the registry; a
/// logged-out or superseded session is rejected even while the token still
/// verifies. The refresh token itself is not rotated.
async fn refresh_token(
    State(state): State<AccountsState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let presented = get_cookie(&headers, REFRESH_COOKIE_NAME)
        .ok_or_else(|| ApiError::unauthorized("could not fetch refresh token from cookie"))?;

    let claims = state.jwt.decode(presented).map_err(|e| {
        warn!(error = %e, "refresh token failed validation");
        ApiError::unauthorized("invalid refresh token.")
    })?;

    if !state
        .sessions
        .refresh_token_matches(&claims.username, presented)
    {
        warn!(username = %claims.username, "refresh token not registered or superseded");
        return Err(ApiError::unauthorized("refresh token unauthorized"));
    }

    let access_token = state
        .jwt
        .issue_access_token(&claims.username, claims.user_id)
        .map_err(|e| ApiError::internal("Error while generating access token.", e))?;

    // Overwrites any prior access entry for this username.
    state
        .sessions
        .save_access_token(&claims.username, &access_token);

    Ok((
        StatusCode::OK,
        Json(RefreshResponse {
            status: StatusCode::OK.as_u16(),
            access_token,
        }),
    ))
}

/// Report whether the presented access credential belongs to a live
/// session. Decode plus registry check only; no mutation.
async fn auth_status(Auth(user): Auth) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(SessionResponse {
            status: StatusCode::OK.as_u16(),
            message: "Session is active",
            user: UserInfo {
                username: user.username,
                id: user.user_id,
            },
        }),
    )
}

#[derive(Serialize)]
struct RegisterResponse {
    status: u16,
    message: &'static str,
    id: i64,
}

async fn register(
    State(state): State<AccountsState>,
    Json(payload): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    let username = payload.username.trim();

    if username.is_empty() {
        return Err(ApiError::bad_request("Username cannot be empty"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::bad_request("Password cannot be empty"));
    }

    let digest = users::hash_password(&payload.password)
        .map_err(|e| ApiError::internal("Error while hashing password.", e))?;

    let id = state
        .users
        .create(username, &digest)
        .map_err(|e| ApiError::conflict(e.to_string()))?;

    info!(username = %username, id, "user registered");

    Ok((
        StatusCode::OK,
        Json(RegisterResponse {
            status: StatusCode::OK.as_u16(),
            message: "User created successfully",
            id,
        }),
    ))
}
