//! 活动适配器：把单次活动结果转换为新的属性表。
//!
//! 四个适配器都是全量校验、全量返回：入参非法或属性表不一致时
//! 直接报错，绝不返回改了一半的表。

use serde::{Deserialize, Serialize};

use crate::engine::{leveling, rank, EngineError, RankTier, StatSheet, CRIT_CAP};

/// 每个掌握单词的经验值。
pub const EXP_PER_WORD: u32 = 5;
/// 每掌握多少个单词换 1 点攻击（向下取整）。
pub const WORDS_PER_ATK: u32 = 4;

/// 写作每分经验（分数 0..=100，经验最高 50）。
pub const WRITING_EXP_PER_POINT: f64 = 0.5;
/// 写作质量阈值，达到后 def +1。
pub const WRITING_DEF_THRESHOLD: f64 = 75.0;

/// 阅读答对时每级难度的经验。
pub const READING_EXP_PER_DIFFICULTY: u32 = 8;
/// 阅读答对时每级难度回复的 hp。
pub const READING_HP_PER_DIFFICULTY: u32 = 3;
/// 答错的安慰经验（努力也有回报）。
pub const READING_CONSOLATION_EXP: u32 = 2;

/// 胜场基础积分。
pub const WIN_BASE_POINTS: i64 = 20;
/// 每级段位差的积分加成（打高段位更值钱）。
pub const WIN_DISTANCE_SCALE: i64 = 5;
/// 胜场积分下限（打再低的段位也不白赢）。
pub const WIN_MIN_POINTS: i64 = 5;
/// 以下克上的积分倍率。
pub const UPSET_MULTIPLIER: f64 = 1.5;
/// 以下克上的突破奖励。
pub const UPSET_ATK_BONUS: u32 = 1;
pub const UPSET_CRIT_BONUS: f64 = 0.02;
/// 胜场固定经验。
pub const BATTLE_WIN_EXP: u32 = 50;
/// 连胜达到该值后每场额外加分。
pub const STREAK_BONUS_THRESHOLD: u32 = 5;
pub const STREAK_BONUS_POINTS: u32 = 5;

/// 败场基础扣分（比胜场加分平缓）。
pub const LOSS_BASE_POINTS: i64 = 12;
/// 每级段位差的扣分调整（输给低段位扣更多）。
pub const LOSS_DISTANCE_SCALE: i64 = 3;
/// 败场扣分下限。
pub const LOSS_MIN_POINTS: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleResult {
    Win,
    Loss,
}

/// 词汇掌握：经验按掌握数量累积，攻击小幅增长。零输入是恒等变换。
pub fn apply_vocab_mastery(
    sheet: &StatSheet,
    mastered_count: u32,
) -> Result<StatSheet, EngineError> {
    sheet.check_invariants()?;

    let mut updated = sheet.clone();
    if mastered_count == 0 {
        return Ok(updated);
    }

    updated.atk += mastered_count / WORDS_PER_ATK;
    leveling::grant_exp(&mut updated, mastered_count * EXP_PER_WORD);
    Ok(updated)
}

/// 写作评分：经验与分数成正比；达到质量阈值再加防御。
///
/// 分数来自外部 AI 评分器，属于有噪声的信号，超出 [0,100] 时
/// 收敛到区间而不是拒绝；非有限值仍然算调用方违约。
pub fn apply_writing_score(sheet: &StatSheet, score: f64) -> Result<StatSheet, EngineError> {
    sheet.check_invariants()?;
    if !score.is_finite() {
        return Err(EngineError::InvalidInput(format!(
            "writing score must be finite, got {score}"
        )));
    }

    let score = score.clamp(0.0, 100.0);
    let mut updated = sheet.clone();
    if score >= WRITING_DEF_THRESHOLD {
        updated.def += 1;
    }
    leveling::grant_exp(&mut updated, (score * WRITING_EXP_PER_POINT).round() as u32);
    Ok(updated)
}

/// 阅读理解：答对按难度给经验并小幅回血；答错只给安慰经验。
/// 阅读不是竞技轴，永不触碰段位与连胜。
pub fn apply_reading_outcome(
    sheet: &StatSheet,
    difficulty: u32,
    is_correct: bool,
) -> Result<StatSheet, EngineError> {
    sheet.check_invariants()?;
    if !(1..=5).contains(&difficulty) {
        return Err(EngineError::InvalidInput(format!(
            "reading difficulty must be 1..=5, got {difficulty}"
        )));
    }

    let mut updated = sheet.clone();
    if is_correct {
        let recovery = difficulty * READING_HP_PER_DIFFICULTY;
        updated.hp = updated.hp.saturating_add(recovery).min(updated.max_hp);
        leveling::grant_exp(&mut updated, difficulty * READING_EXP_PER_DIFFICULTY);
    } else {
        leveling::grant_exp(&mut updated, READING_CONSOLATION_EXP);
    }
    Ok(updated)
}

/// 排位战结果。
///
/// 胜场：连胜 +1，积分按段位差放大，以下克上再乘
/// [`UPSET_MULTIPLIER`] 并获得突破奖励（atk/crit），最后结算固定
/// 经验并重审升级。败场：连胜清零，扣分比加分平缓且单场至多降
/// 一级，不扣经验不减属性。
pub fn apply_battle_result(
    sheet: &StatSheet,
    opponent_rank: RankTier,
    result: BattleResult,
    upset_win: bool,
) -> Result<StatSheet, EngineError> {
    sheet.check_invariants()?;

    let own_ordinal = i64::from(sheet.rank.ordinal());
    let opponent_ordinal = i64::from(opponent_rank.ordinal());
    if upset_win && (result != BattleResult::Win || own_ordinal >= opponent_ordinal) {
        return Err(EngineError::InvalidInput(
            "upsetWin requires a win against a strictly higher tier".into(),
        ));
    }

    let distance = opponent_ordinal - own_ordinal;
    let mut updated = sheet.clone();

    match result {
        BattleResult::Win => {
            updated.win_streak += 1;

            let base = (WIN_BASE_POINTS + WIN_DISTANCE_SCALE * distance).max(WIN_MIN_POINTS);
            let mut points = if upset_win {
                (base as f64 * UPSET_MULTIPLIER).round() as u32
            } else {
                base as u32
            };
            if updated.win_streak >= STREAK_BONUS_THRESHOLD {
                points += STREAK_BONUS_POINTS;
            }

            let (new_rank, new_points) = rank::apply_gain(updated.rank, updated.rank_points, points);
            updated.rank = new_rank;
            updated.rank_points = new_points;

            if upset_win {
                updated.atk += UPSET_ATK_BONUS;
                updated.crit = (updated.crit + UPSET_CRIT_BONUS).min(CRIT_CAP);
            }

            leveling::grant_exp(&mut updated, BATTLE_WIN_EXP);
        }
        BattleResult::Loss => {
            updated.win_streak = 0;

            let deduction =
                (LOSS_BASE_POINTS - LOSS_DISTANCE_SCALE * distance).max(LOSS_MIN_POINTS);
            let (new_rank, new_points) =
                rank::apply_loss(updated.rank, updated.rank_points, deduction as u32);
            updated.rank = new_rank;
            updated.rank_points = new_points;
        }
    }

    Ok(updated)
}
