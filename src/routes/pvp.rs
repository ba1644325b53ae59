use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::engine::{apply_battle_result, combat_power, BattleResult, RankTier, StatSheet};
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::operations::battle_records::BattleRecord;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/result", post(report_result))
        .route("/history", get(history))
}

const HISTORY_DEFAULT_LIMIT: usize = 20;
const HISTORY_MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BattleResultRequest {
    opponent_rank: RankTier,
    result: BattleResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BattleResultResponse {
    stat_sheet: StatSheet,
    combat_power: f64,
    upset_win: bool,
    record: BattleRecord,
}

/// 结算一场排位战并记录战报。
///
/// 以下克上由服务端根据双方段位推导，客户端无权声明。
async fn report_result(
    auth_user: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<BattleResultRequest>,
) -> Result<impl IntoResponse, AppError> {
    let sheet = state.store().get_stat_sheet(&auth_user.user_id)?;

    let upset_win =
        req.result == BattleResult::Win && sheet.rank.ordinal() < req.opponent_rank.ordinal();

    let updated = apply_battle_result(&sheet, req.opponent_rank, req.result, upset_win)?;
    state.store().put_stat_sheet(&auth_user.user_id, &updated)?;

    let power = combat_power(&updated);
    let record = BattleRecord {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: auth_user.user_id.clone(),
        opponent_rank: req.opponent_rank,
        result: req.result,
        upset_win,
        rank_points_after: updated.rank_points,
        combat_power_after: power,
        created_at: Utc::now(),
    };
    state.store().append_battle_record(&record)?;

    Ok(ok(BattleResultResponse {
        stat_sheet: updated,
        combat_power: power,
        upset_win,
        record,
    }))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

/// 最近的战报，新的在前。
async fn history(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query
        .limit
        .unwrap_or(HISTORY_DEFAULT_LIMIT)
        .min(HISTORY_MAX_LIMIT);
    let records = state
        .store()
        .list_battle_records(&auth_user.user_id, limit)?;
    Ok(ok(records))
}
