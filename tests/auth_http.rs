mod common;

use axum::http::{Method, StatusCode};

use common::app::spawn_test_app;
use common::auth::{auth_header, register_and_get_token};
use common::http::{assert_json_error, request, response_json};

#[tokio::test]
async fn it_auth_register_success() {
    let app = spawn_test_app().await;

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": "auth-register@test.com",
            "username": "auth_register",
            "password": "Passw0rd1"
        })),
        &[],
    )
    .await;

    let (status, _, body) = response_json(response).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert!(body["data"]["accessToken"].is_string());
    assert_eq!(body["data"]["user"]["email"], "auth-register@test.com");
    assert_eq!(body["data"]["user"]["isAdmin"], false);
}

#[tokio::test]
async fn it_auth_duplicate_email_conflict() {
    let app = spawn_test_app().await;

    let payload = serde_json::json!({
        "email": "dup@test.com",
        "username": "dup_user",
        "password": "Passw0rd1"
    });
    let _ = request(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(payload.clone()),
        &[],
    )
    .await;

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": "dup@test.com",
            "username": "dup_user2",
            "password": "Passw0rd1"
        })),
        &[],
    )
    .await;

    let (status, _, body) = response_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_json_error(&body, "AUTH_EMAIL_EXISTS");
}

#[tokio::test]
async fn it_auth_invalid_email_rejected() {
    let app = spawn_test_app().await;

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": "not-an-email",
            "username": "someone",
            "password": "Passw0rd1"
        })),
        &[],
    )
    .await;

    let (status, _, body) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "AUTH_INVALID_EMAIL");
}

#[tokio::test]
async fn it_auth_weak_password_rejected() {
    let app = spawn_test_app().await;

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": "weak@test.com",
            "username": "weak_user",
            "password": "short"
        })),
        &[],
    )
    .await;

    let (status, _, body) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "AUTH_WEAK_PASSWORD");
}

#[tokio::test]
async fn it_auth_login_success_and_wrong_password_rejected() {
    let app = spawn_test_app().await;

    let _ = request(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": "login@test.com",
            "username": "login_user",
            "password": "Passw0rd1"
        })),
        &[],
    )
    .await;

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({
            "email": "login@test.com",
            "password": "Passw0rd1"
        })),
        &[],
    )
    .await;
    let (status, _, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["accessToken"].is_string());

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({
            "email": "login@test.com",
            "password": "WrongPass1"
        })),
        &[],
    )
    .await;
    let (status, _, _) = response_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn it_auth_unknown_email_gets_same_error_as_wrong_password() {
    let app = spawn_test_app().await;

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({
            "email": "nobody@test.com",
            "password": "Passw0rd1"
        })),
        &[],
    )
    .await;
    let (status, _, body) = response_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTH_UNAUTHORIZED");
}

#[tokio::test]
async fn it_auth_logout_invalidates_session() {
    let app = spawn_test_app().await;
    let (token, _) = register_and_get_token(&app).await;

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/logout",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // 会话已删除，同一令牌不再可用
    let response = request(
        &app.app,
        Method::GET,
        "/api/users/me",
        None,
        &[("authorization", auth_header(&token))],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn it_auth_banned_user_cannot_login() {
    let app = spawn_test_app().await;
    let (_, user_id) = register_and_get_token(&app).await;

    let user = app.state.store().set_user_banned(&user_id, true).unwrap();

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/login",
        Some(serde_json::json!({
            "email": user.email,
            "password": "Passw0rd1"
        })),
        &[],
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn it_auth_requests_without_token_rejected() {
    let app = spawn_test_app().await;

    let response = request(&app.app, Method::GET, "/api/users/me", None, &[]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn it_auth_malformed_json_body_rejected() {
    let app = spawn_test_app().await;

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({ "email": "only@test.com" })),
        &[],
    )
    .await;
    let (status, _, body) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "INVALID_REQUEST_BODY");
}
