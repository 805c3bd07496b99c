//! Authentication state trait and macro.

use crate::jwt::JwtConfig;
use crate::sessions::SessionRegistry;

/// Trait for state types that provide the codec and session registry the
/// auth gate needs.
pub trait HasAuthState {
    fn jwt(&self) -> &JwtConfig;
    fn sessions(&self) -> &SessionRegistry;
}

/// Implement [`HasAuthState`] for a state struct with the standard fields:
/// `jwt: Arc<JwtConfig>` and `sessions: Arc<SessionRegistry>`.
#[macro_export]
macro_rules! impl_has_auth_state {
    ($state_type:ty) => {
        impl $crate::auth::HasAuthState for $state_type {
            fn jwt(&self) -> &$crate::jwt::JwtConfig {
                &self.jwt
            }
            fn sessions(&self) -> &$crate::sessions::SessionRegistry {
                &self.sessions
            }
        }
    };
}
