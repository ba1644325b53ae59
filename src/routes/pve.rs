use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::engine::{
    apply_reading_outcome, apply_vocab_mastery, apply_writing_score, combat_power, StatSheet,
};
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::services::grader::WritingGrade;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vocab", post(vocab))
        .route("/writing", post(writing))
        .route("/reading", post(reading))
        .route("/quiz/:category", get(quiz))
}

/// 单批掌握单词数上限，防止刷接口一次灌满经验。
const MAX_MASTERED_PER_BATCH: u32 = 500;
const MAX_WRITING_CONTENT_CHARS: usize = 10_000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VocabRequest {
    mastered_count: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VocabResponse {
    gained_exp: u32,
    stat_sheet: StatSheet,
    combat_power: f64,
}

async fn vocab(
    auth_user: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<VocabRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.mastered_count > MAX_MASTERED_PER_BATCH {
        return Err(AppError::bad_request(
            "INVALID_INPUT",
            "masteredCount exceeds per-batch limit",
        ));
    }

    let sheet = state.store().get_stat_sheet(&auth_user.user_id)?;
    let updated = apply_vocab_mastery(&sheet, req.mastered_count)?;
    state.store().put_stat_sheet(&auth_user.user_id, &updated)?;

    let combat_power = combat_power(&updated);
    Ok(ok(VocabResponse {
        gained_exp: req.mastered_count * crate::engine::activity::EXP_PER_WORD,
        stat_sheet: updated,
        combat_power,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WritingRequest {
    topic: String,
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WritingResponse {
    grade: WritingGrade,
    stat_sheet: StatSheet,
    combat_power: f64,
}

async fn writing(
    auth_user: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<WritingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let topic = req.topic.trim();
    let content = req.content.trim();
    if topic.is_empty() || content.is_empty() {
        return Err(AppError::bad_request(
            "INVALID_INPUT",
            "topic and content must not be empty",
        ));
    }
    if content.chars().count() > MAX_WRITING_CONTENT_CHARS {
        return Err(AppError::bad_request(
            "INVALID_INPUT",
            "content is too long",
        ));
    }

    // AI 分数是有噪声的外部信号，越界值由引擎收敛而不是拒绝
    let grade = state.grader().grade_writing(topic, content).await?;

    let sheet = state.store().get_stat_sheet(&auth_user.user_id)?;
    let updated = apply_writing_score(&sheet, grade.score)?;
    state.store().put_stat_sheet(&auth_user.user_id, &updated)?;

    let combat_power = combat_power(&updated);
    Ok(ok(WritingResponse {
        grade,
        stat_sheet: updated,
        combat_power,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadingRequest {
    question: String,
    user_answer: String,
    correct_answer: String,
    difficulty: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadingResponse {
    correct: bool,
    explanation: Option<String>,
    stat_sheet: StatSheet,
    combat_power: f64,
}

async fn reading(
    auth_user: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ReadingRequest>,
) -> Result<impl IntoResponse, AppError> {
    // 判题在路由层完成，引擎只见到布尔结果
    let correct = normalize_answer(&req.user_answer) == normalize_answer(&req.correct_answer);

    let sheet = state.store().get_stat_sheet(&auth_user.user_id)?;
    let updated = apply_reading_outcome(&sheet, req.difficulty, correct)?;
    state.store().put_stat_sheet(&auth_user.user_id, &updated)?;

    // 讲解失败不影响结算，只是少了一段解释
    let explanation = if correct {
        None
    } else {
        match state
            .grader()
            .explain_answer(&req.question, &req.user_answer, &req.correct_answer)
            .await
        {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(error = %e, "answer explanation failed");
                None
            }
        }
    };

    let combat_power = combat_power(&updated);
    Ok(ok(ReadingResponse {
        correct,
        explanation,
        stat_sheet: updated,
        combat_power,
    }))
}

fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

async fn quiz(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let category = category.trim();
    if category.is_empty() || category.chars().count() > 50 {
        return Err(AppError::bad_request("INVALID_INPUT", "invalid category"));
    }

    let payload = state.grader().build_quiz(category).await?;
    Ok(ok(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_compare_case_and_space_insensitive() {
        assert_eq!(normalize_answer("  Apple "), normalize_answer("apple"));
        assert_ne!(normalize_answer("apple"), normalize_answer("apples"));
    }
}
