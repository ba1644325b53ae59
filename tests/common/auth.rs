use axum::http::Method;
use chrono::Utc;

use super::app::TestApp;
use super::http::{request, response_json};

pub fn auth_header(token: &str) -> String {
    format!("Bearer {token}")
}

/// 注册一个随机新用户，返回 (access_token, user_id)。
pub async fn register_and_get_token(app: &TestApp) -> (String, String) {
    let email = format!("user-{}@test.com", uuid::Uuid::new_v4());
    let username = format!("user-{}", uuid::Uuid::new_v4().simple());

    let response = request(
        &app.app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": email,
            "username": username,
            "password": "Passw0rd1",
        })),
        &[],
    )
    .await;

    let (status, _, body) = response_json(response).await;
    assert!(status.is_success(), "register failed: {body}");

    let token = body["data"]["accessToken"]
        .as_str()
        .expect("access token in register response")
        .to_string();
    let user_id = body["data"]["user"]["id"]
        .as_str()
        .expect("user id in register response")
        .to_string();

    (token, user_id)
}

/// 注册用户并通过存储层直接升级为管理员，返回其令牌。
pub async fn setup_admin_and_get_token(app: &TestApp) -> String {
    let (token, user_id) = register_and_get_token(app).await;

    let mut user = app
        .state
        .store()
        .get_user_by_id(&user_id)
        .expect("load user")
        .expect("user exists");
    user.is_admin = true;
    user.updated_at = Utc::now();
    app.state.store().update_user(&user).expect("promote admin");

    token
}
