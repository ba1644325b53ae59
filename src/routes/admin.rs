use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, AdminUser};
use crate::engine::rank::tier_for_points;
use crate::engine::{combat_power, StatSheet, CRIT_CAP};
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::operations::users::User;
use crate::store::StoreError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id/ban", post(set_ban))
        .route("/users/:id/god-mode", post(god_mode))
        .route("/seed", post(seed))
}

const LIST_DEFAULT_LIMIT: usize = 50;
const LIST_MAX_LIMIT: usize = 200;

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<usize>,
    offset: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminUserView {
    id: String,
    email: String,
    username: String,
    is_admin: bool,
    is_banned: bool,
    created_at: chrono::DateTime<Utc>,
    stat_sheet: StatSheet,
    combat_power: f64,
}

async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(LIST_DEFAULT_LIMIT).min(LIST_MAX_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let users = state.store().list_users(limit, offset)?;
    let mut views = Vec::with_capacity(users.len());
    for user in users {
        let sheet = state.store().get_stat_sheet(&user.id)?;
        let power = combat_power(&sheet);
        views.push(AdminUserView {
            id: user.id,
            email: user.email,
            username: user.username,
            is_admin: user.is_admin,
            is_banned: user.is_banned,
            created_at: user.created_at,
            stat_sheet: sheet,
            combat_power: power,
        });
    }

    Ok(ok(views))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BanRequest {
    banned: bool,
}

async fn set_ban(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    JsonBody(req): JsonBody<BanRequest>,
) -> Result<impl IntoResponse, AppError> {
    // 管理员不能封禁自己，避免把最后一个管理员锁在门外
    if user_id == admin.user_id {
        return Err(AppError::bad_request(
            "ADMIN_SELF_BAN",
            "Cannot ban your own account",
        ));
    }

    let user = state.store().set_user_banned(&user_id, req.banned)?;
    tracing::info!(admin_id = %admin.user_id, target = %user.id, banned = req.banned, "ban state changed");

    Ok(ok(serde_json::json!({
        "id": user.id,
        "isBanned": user.is_banned,
    })))
}

/// 神模式只允许抬升属性。允许的字段全部可选，缺省保持原值。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GodModeRequest {
    level: Option<u32>,
    atk: Option<u32>,
    def: Option<u32>,
    crit: Option<f64>,
    max_hp: Option<u32>,
    rank_points: Option<u32>,
}

async fn god_mode(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    JsonBody(req): JsonBody<GodModeRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .store()
        .get_user_by_id(&user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let mut sheet = state.store().get_stat_sheet(&user_id)?;

    raise_only(&mut sheet.level, req.level, "level")?;
    raise_only(&mut sheet.atk, req.atk, "atk")?;
    raise_only(&mut sheet.def, req.def, "def")?;
    raise_only(&mut sheet.max_hp, req.max_hp, "maxHp")?;

    if let Some(crit) = req.crit {
        if !crit.is_finite() || crit < sheet.crit || crit > CRIT_CAP {
            return Err(AppError::bad_request(
                "INVALID_INPUT",
                "crit must be finite, non-decreasing and within cap",
            ));
        }
        sheet.crit = crit;
    }

    if let Some(points) = req.rank_points {
        if points < sheet.rank_points {
            return Err(AppError::bad_request(
                "INVALID_INPUT",
                "rankPoints must be non-decreasing",
            ));
        }
        sheet.rank_points = points;
        sheet.rank = tier_for_points(points);
    }

    // 属性抬升后补满血，保持 hp <= maxHp
    sheet.hp = sheet.max_hp;
    sheet.check_invariants()?;
    state.store().put_stat_sheet(&user_id, &sheet)?;

    tracing::info!(admin_id = %admin.user_id, target = %user_id, "god-mode stats applied");

    let power = combat_power(&sheet);
    Ok(ok(serde_json::json!({
        "statSheet": sheet,
        "combatPower": power,
    })))
}

fn raise_only(current: &mut u32, requested: Option<u32>, field: &str) -> Result<(), AppError> {
    if let Some(value) = requested {
        if value < *current {
            return Err(AppError::bad_request(
                "INVALID_INPUT",
                &format!("{field} must be non-decreasing"),
            ));
        }
        *current = value;
    }
    Ok(())
}

/// 灌入一批演示账号，重复执行是幂等的（已存在的直接跳过）。
async fn seed(
    admin: AdminUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let demo_accounts: &[(&str, &str, u32, u32)] = &[
        // (email, username, level, rank_points)
        ("seed-bronze@wordwarrior.dev", "青铜新兵", 2, 40),
        ("seed-silver@wordwarrior.dev", "白银剑士", 5, 160),
        ("seed-gold@wordwarrior.dev", "黄金统帅", 9, 320),
    ];

    let mut created = Vec::new();
    for &(email, username, level, rank_points) in demo_accounts {
        if state.store().get_user_by_email(email)?.is_some() {
            continue;
        }

        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: hash_password("SeedAccount123")?,
            is_admin: false,
            is_banned: false,
            created_at: now,
            updated_at: now,
        };
        match state.store().create_user(&user) {
            Ok(()) => {}
            // 并发 seed 撞上同一邮箱时直接跳过
            Err(StoreError::Conflict { .. }) => continue,
            Err(e) => return Err(e.into()),
        }

        let sheet = seed_sheet(level, rank_points);
        sheet.check_invariants()?;
        state.store().put_stat_sheet(&user.id, &sheet)?;
        created.push(user.id);
    }

    tracing::info!(admin_id = %admin.user_id, count = created.len(), "seed accounts created");
    Ok(ok(serde_json::json!({ "createdIds": created })))
}

fn seed_sheet(level: u32, rank_points: u32) -> StatSheet {
    let base = StatSheet::default();
    StatSheet {
        level,
        atk: base.atk + (level - 1),
        def: base.def + (level - 1),
        max_hp: base.max_hp + (level - 1) * 5,
        hp: base.max_hp + (level - 1) * 5,
        rank_points,
        rank: tier_for_points(rank_points),
        ..base
    }
}
