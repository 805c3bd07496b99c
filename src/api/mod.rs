mod accounts;
mod error;

use axum::Router;
use std::sync::Arc;

use crate::jwt::JwtConfig;
use crate::rate_limit::RateLimitConfig;
use crate::sessions::SessionRegistry;
use crate::users::UserStore;

pub use accounts::AccountsState;

/// Create the API router, nested under `/api/v1`.
pub fn create_api_router(
    users: Arc<dyn UserStore>,
    jwt: Arc<JwtConfig>,
    sessions: Arc<SessionRegistry>,
    secure_cookies: bool,
) -> Router {
    let accounts_state = AccountsState {
        users,
        jwt,
        sessions,
        secure_cookies,
    };

    let rate_limits = Arc::new(RateLimitConfig::new());

    Router::new().nest("/api/v1", accounts::router(accounts_state, rate_limits))
}
