use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{
    generate_dummy_argon2_hash, hash_password, hash_token, sign_jwt_for_user, verify_password,
    AuthUser,
};
use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::store::operations::sessions::Session;
use crate::store::operations::users::User;
use crate::validation::{is_valid_email, validate_password, validate_username};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
    pub is_banned: bool,
}

impl From<&User> for UserProfile {
    fn from(value: &User) -> Self {
        Self {
            id: value.id.clone(),
            email: value.email.clone(),
            username: value.username.clone(),
            is_admin: value.is_admin,
            is_banned: value.is_banned,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserProfile,
}

/// 签发访问令牌并落库对应会话。
fn issue_token(user_id: &str, state: &AppState) -> Result<String, AppError> {
    let access_token = sign_jwt_for_user(
        user_id,
        &state.config().jwt_secret,
        state.config().jwt_expires_in_hours,
    )?;

    let token_hash = hash_token(&access_token);
    state.store().create_session(&Session {
        token_hash,
        user_id: user_id.to_string(),
        created_at: Utc::now(),
        expires_at: Utc::now() + Duration::hours(state.config().jwt_expires_in_hours as i64),
    })?;

    Ok(access_token)
}

async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = req.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::bad_request(
            "AUTH_INVALID_EMAIL",
            "Invalid email format",
        ));
    }
    let username = req.username.trim();
    if let Err(msg) = validate_username(username) {
        return Err(AppError::bad_request("AUTH_INVALID_USERNAME", msg));
    }
    if let Err(msg) = validate_password(&req.password) {
        return Err(AppError::bad_request("AUTH_WEAK_PASSWORD", msg));
    }

    let now = Utc::now();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: email.clone(),
        username: username.to_string(),
        password_hash: hash_password(&req.password)?,
        is_admin: false,
        is_banned: false,
        created_at: now,
        updated_at: now,
    };

    // 邮箱唯一性由存储层的 CAS 索引保证，并发重复注册在这里变成 Conflict
    state.store().create_user(&user).map_err(|e| {
        if matches!(e, crate::store::StoreError::Conflict { .. }) {
            AppError::conflict("AUTH_EMAIL_EXISTS", "Email already registered")
        } else {
            e.into()
        }
    })?;

    let access_token = issue_token(&user.id, &state)?;

    Ok(created(AuthResponse {
        access_token,
        user: UserProfile::from(&user),
    }))
}

async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.store().get_user_by_email(req.email.trim())?;

    // 账户不存在时仍跑一次 argon2 校验，使耗时与正常路径一致
    let Some(user) = user else {
        let _ = verify_password(&req.password, &generate_dummy_argon2_hash());
        return Err(AppError::unauthorized("Invalid email or password"));
    };

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    if user.is_banned {
        return Err(AppError::forbidden("User is banned"));
    }

    let access_token = issue_token(&user.id, &state)?;

    Ok(ok(AuthResponse {
        access_token,
        user: UserProfile::from(&user),
    }))
}

async fn logout(
    auth_user: AuthUser,
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    // AuthUser 已验证过该令牌，这里只需删掉对应会话
    let token = crate::auth::extract_token_from_headers(&headers)?;
    state.store().delete_session(&hash_token(&token))?;

    tracing::info!(user_id = %auth_user.user_id, "user logged out");
    Ok(ok(serde_json::json!({ "loggedOut": true })))
}
