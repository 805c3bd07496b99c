//! Request-gating authentication.
//!
//! The gate takes a credential from the `Authorization: Bearer` header or
//! the access cookie, validates it against the signing secret, and
//! cross-checks the session registry so that logout revokes tokens before
//! their natural expiry.

mod cookie;
mod errors;
mod extractors;
mod state;
mod types;

pub use cookie::{
    ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME, access_cookie, clear_cookie, get_cookie,
    refresh_cookie,
};
pub use errors::{AuthError, AuthErrorKind};
pub use extractors::Auth;
pub use state::HasAuthState;
pub use types::AuthenticatedUser;
