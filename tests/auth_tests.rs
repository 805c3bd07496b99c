mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_app, login, register, register_and_login, send, set_cookie_value,
};

fn bearer(token: &str) -> (&'static str, String) {
    ("authorization", format!("Bearer {}", token))
}

fn access_cookie(token: &str) -> (&'static str, String) {
    ("cookie", format!("access_token={}", token))
}

fn refresh_cookie(token: &str) -> (&'static str, String) {
    ("cookie", format!("refresh_token={}", token))
}

#[tokio::test]
async fn test_happy_path_login_status_logout() {
    let app = create_test_app();

    register(&app, "alice", "correct-pw").await;

    // Login sets both cookies and returns the user
    let response = login(&app, "alice", "correct-pw").await;
    assert_eq!(response.status(), StatusCode::OK);
    let access = set_cookie_value(&response, "access_token").expect("no access cookie");
    let refresh = set_cookie_value(&response, "refresh_token").expect("no refresh cookie");
    assert!(!access.is_empty());
    assert!(!refresh.is_empty());

    let json = body_json(response).await;
    assert_eq!(json["status"], 200);
    assert_eq!(json["user"]["username"], "alice");
    assert_eq!(json["user"]["id"], 1);

    // AuthStatus accepts the token via Bearer header
    let response = send(&app, "GET", "/api/v1/AuthStatus", &[bearer(&access)]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["username"], "alice");

    // Logout clears both cookies
    let response = send(&app, "POST", "/api/v1/Logout", &[access_cookie(&access)]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared_access = set_cookie_value(&response, "access_token").unwrap();
    let cleared_refresh = set_cookie_value(&response, "refresh_token").unwrap();
    assert!(cleared_access.is_empty());
    assert!(cleared_refresh.is_empty());

    // The token still verifies cryptographically but the session is revoked
    let response = send(&app, "GET", "/api/v1/AuthStatus", &[bearer(&access)]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["status"], 401);
    assert_eq!(json["message"], "token unauthorized");
}

#[tokio::test]
async fn test_double_login_rejected() {
    let app = create_test_app();

    register(&app, "alice", "pw-alice-123").await;

    let response = login(&app, "alice", "pw-alice-123").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = login(&app, "alice", "pw-alice-123").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "User is already logged in");
}

#[tokio::test]
async fn test_login_after_logout_succeeds() {
    let app = create_test_app();

    let (access, _) = register_and_login(&app, "alice", "pw-alice-123").await;
    let response = send(&app, "POST", "/api/v1/Logout", &[bearer(&access)]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = login(&app, "alice", "pw-alice-123").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = create_test_app();

    let response = login(&app, "nobody", "pw").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["message"], "user not found");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_test_app();

    register(&app, "alice", "correct-pw").await;

    let response = login(&app, "alice", "wrong-pw").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid Password Credentials");
}

#[tokio::test]
async fn test_missing_credential_rejected() {
    let app = create_test_app();

    let response = send(&app, "GET", "/api/v1/AuthStatus", &[]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "access token required");
}

#[tokio::test]
async fn test_non_bearer_header_rejected() {
    let app = create_test_app();

    let response = send(
        &app,
        "GET",
        "/api/v1/AuthStatus",
        &[("authorization", "Basic dXNlcjpwdw==".to_string())],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "access token Bearer required");
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let app = create_test_app();

    let (access, _) = register_and_login(&app, "alice", "pw-alice-123").await;

    // Flip one character inside the claims segment
    let dot = access.find('.').unwrap();
    let mut bytes = access.into_bytes();
    let idx = dot + 2;
    bytes[idx] = if bytes[idx] == b'x' { b'y' } else { b'x' };
    let tampered = String::from_utf8(bytes).unwrap();

    let response = send(&app, "GET", "/api/v1/AuthStatus", &[bearer(&tampered)]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_gate_accepts_cookie_credential() {
    let app = create_test_app();

    let (access, _) = register_and_login(&app, "alice", "pw-alice-123").await;

    let response = send(&app, "GET", "/api/v1/AuthStatus", &[access_cookie(&access)]).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let app = create_test_app();

    let (access, refresh) = register_and_login(&app, "alice", "pw-alice-123").await;

    // Cross a second boundary so the new token's expiry differs
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let response = send(
        &app,
        "POST",
        "/api/v1/RefreshToken",
        &[refresh_cookie(&refresh)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let new_access = json["access_token"].as_str().unwrap().to_string();
    assert!(!new_access.is_empty());
    assert_ne!(new_access, access);

    // The new token gates requests
    let response = send(&app, "GET", "/api/v1/AuthStatus", &[bearer(&new_access)]).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_without_cookie_rejected() {
    let app = create_test_app();

    let response = send(&app, "POST", "/api/v1/RefreshToken", &[]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "could not fetch refresh token from cookie");
}

#[tokio::test]
async fn test_refresh_with_garbage_token_rejected() {
    let app = create_test_app();

    let response = send(
        &app,
        "POST",
        "/api/v1/RefreshToken",
        &[refresh_cookie("not-a-token")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "invalid refresh token.");
}

#[tokio::test]
async fn test_refresh_after_logout_rejected() {
    let app = create_test_app();

    let (access, refresh) = register_and_login(&app, "alice", "pw-alice-123").await;

    let response = send(&app, "POST", "/api/v1/Logout", &[bearer(&access)]).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The refresh token still verifies but is no longer registered
    let response = send(
        &app,
        "POST",
        "/api/v1/RefreshToken",
        &[refresh_cookie(&refresh)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "refresh token unauthorized");
}

#[tokio::test]
async fn test_second_logout_rejected() {
    let app = create_test_app();

    let (access, _) = register_and_login(&app, "alice", "pw-alice-123").await;

    let response = send(&app, "POST", "/api/v1/Logout", &[bearer(&access)]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "POST", "/api/v1/Logout", &[bearer(&access)]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sessions_are_isolated_per_user() {
    let app = create_test_app();

    let (alice_access, _) = register_and_login(&app, "alice", "pw-alice-123").await;
    let (bob_access, _) = register_and_login(&app, "bob", "pw-bob-456").await;

    // Alice logging out does not touch Bob's session
    let response = send(&app, "POST", "/api/v1/Logout", &[bearer(&alice_access)]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/api/v1/AuthStatus", &[bearer(&bob_access)]).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["username"], "bob");
}
