#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header::SET_COOKIE},
};
use std::sync::Arc;
use todo_api::users::InMemoryUserStore;
use todo_api::{ServerConfig, create_app};
use tower::ServiceExt;

/// Build an isolated app: fresh user store, fresh session registry.
pub fn create_test_app() -> Router {
    let config = ServerConfig {
        jwt_secret: b"test-jwt-secret-long-enough-for-testing".to_vec(),
        secure_cookies: false,
        users: Arc::new(InMemoryUserStore::new()),
    };
    create_app(&config)
}

pub async fn post_json(app: &Router, uri: &str, body: String) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Send a request with arbitrary extra headers and no body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    headers: &[(&str, String)],
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, value);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Value of the `name` cookie from the response's Set-Cookie headers.
pub fn set_cookie_value(response: &Response<Body>, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    for header in response.headers().get_all(SET_COOKIE) {
        let value = header.to_str().ok()?;
        if let Some(rest) = value.strip_prefix(&prefix) {
            let token = rest.split(';').next().unwrap_or("");
            return Some(token.to_string());
        }
    }
    None
}

pub async fn register(app: &Router, username: &str, password: &str) -> Response<Body> {
    post_json(
        app,
        "/api/v1/Register",
        format!(r#"{{"username": "{}", "password": "{}"}}"#, username, password),
    )
    .await
}

pub async fn login(app: &Router, username: &str, password: &str) -> Response<Body> {
    post_json(
        app,
        "/api/v1/Login",
        format!(r#"{{"username": "{}", "password": "{}"}}"#, username, password),
    )
    .await
}

/// Register an account, log it in, and return the issued
/// (access token, refresh token) pair from the login cookies.
pub async fn register_and_login(app: &Router, username: &str, password: &str) -> (String, String) {
    let response = register(app, username, password).await;
    assert!(
        response.status().is_success(),
        "register failed: {}",
        response.status()
    );

    let response = login(app, username, password).await;
    assert!(
        response.status().is_success(),
        "login failed: {}",
        response.status()
    );

    let access = set_cookie_value(&response, "access_token").expect("no access cookie set");
    let refresh = set_cookie_value(&response, "refresh_token").expect("no refresh cookie set");
    (access, refresh)
}
