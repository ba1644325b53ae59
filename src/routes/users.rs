use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::engine::{combat_power, StatSheet};
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/leaderboard", get(leaderboard))
        .route("/:id", get(get_user))
}

/// 玩家档案视图：属性表加上派生的战力值。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub id: String,
    pub username: String,
    pub stat_sheet: StatSheet,
    pub combat_power: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MeResponse {
    user: super::auth::UserProfile,
    stat_sheet: StatSheet,
    combat_power: f64,
}

#[derive(Debug, Deserialize)]
struct LeaderboardQuery {
    limit: Option<usize>,
}

const LEADERBOARD_DEFAULT_LIMIT: usize = 20;
const LEADERBOARD_MAX_LIMIT: usize = 100;
/// 排行榜扫描上限，避免全库加载失控。
const LEADERBOARD_SCAN_LIMIT: usize = 10_000;

async fn get_me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .store()
        .get_user_by_id(&auth_user.user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let sheet = state.store().get_stat_sheet(&user.id)?;
    let power = combat_power(&sheet);

    Ok(ok(MeResponse {
        user: super::auth::UserProfile::from(&user),
        stat_sheet: sheet,
        combat_power: power,
    }))
}

/// 公开档案：不含邮箱等隐私字段。
async fn get_user(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .store()
        .get_user_by_id(&user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let sheet = state.store().get_stat_sheet(&user.id)?;
    let power = combat_power(&sheet);

    Ok(ok(PlayerProfile {
        id: user.id,
        username: user.username,
        stat_sheet: sheet,
        combat_power: power,
    }))
}

/// 按战力降序的排行榜。战力相同按用户名稳定排序。
async fn leaderboard(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query
        .limit
        .unwrap_or(LEADERBOARD_DEFAULT_LIMIT)
        .min(LEADERBOARD_MAX_LIMIT);

    let users = state.store().list_users(LEADERBOARD_SCAN_LIMIT, 0)?;
    let mut entries = Vec::with_capacity(users.len());
    for user in users {
        if user.is_banned {
            continue;
        }
        let sheet = state.store().get_stat_sheet(&user.id)?;
        let power = combat_power(&sheet);
        entries.push(PlayerProfile {
            id: user.id,
            username: user.username,
            stat_sheet: sheet,
            combat_power: power,
        });
    }

    entries.sort_by(|a, b| {
        b.combat_power
            .partial_cmp(&a.combat_power)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.username.cmp(&b.username))
    });
    entries.truncate(limit);

    Ok(ok(entries))
}
