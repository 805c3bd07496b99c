pub mod api;
pub mod auth;
pub mod cli;
pub mod jwt;
pub mod rate_limit;
pub mod sessions;
pub mod users;

use api::create_api_router;
use axum::Router;
use jwt::JwtConfig;
use sessions::SessionRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use users::UserStore;

pub struct ServerConfig {
    /// JWT secret for signing tokens
    pub jwt_secret: Vec<u8>,
    /// Whether to set the Secure flag on cookies (true in production with HTTPS)
    pub secure_cookies: bool,
    /// Account lookup collaborator
    pub users: Arc<dyn UserStore>,
}

/// Create the application router with the given configuration.
///
/// Each app owns its own session registry and codec, so tests get isolated
/// session state per instance.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = Arc::new(JwtConfig::new(&config.jwt_secret));
    let sessions = Arc::new(SessionRegistry::new());

    create_api_router(
        config.users.clone(),
        jwt,
        sessions,
        config.secure_cookies,
    )
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, make_service).await
}
