//! 成长与战斗引擎。
//!
//! 引擎是一组同步纯函数：输入一张 [`StatSheet`] 和一次活动结果，
//! 返回一张新表，不做任何 I/O，也不调用 AI 服务。外部评分
//! （写作分数、阅读判题）必须在调用前由路由层解析为标量。
//! 同一玩家的并发调用由调用方（存储层）串行化，引擎不加锁。

pub mod activity;
pub mod leveling;
pub mod power;
pub mod rank;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use activity::{
    apply_battle_result, apply_reading_outcome, apply_vocab_mastery, apply_writing_score,
    BattleResult,
};
pub use power::combat_power;
pub use rank::RankTier;

/// 暴击率上限，防止数值失控。
pub const CRIT_CAP: f64 = 0.75;

/// 玩家的属性表。引擎只接收值并返回新值，从不保留引用；
/// 持久化与同玩家串行化由外部 profile 存储负责。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatSheet {
    pub level: u32,
    pub exp: u32,
    pub atk: u32,
    pub def: u32,
    pub crit: f64,
    pub hp: u32,
    pub max_hp: u32,
    pub rank_points: u32,
    pub rank: RankTier,
    pub win_streak: u32,
}

impl Default for StatSheet {
    fn default() -> Self {
        Self {
            level: 1,
            exp: 0,
            atk: 10,
            def: 10,
            crit: 0.05,
            hp: 100,
            max_hp: 100,
            rank_points: 0,
            rank: RankTier::Bronze,
            win_streak: 0,
        }
    }
}

impl StatSheet {
    /// 校验不变式。违反视为数据损坏，不做静默修复。
    pub fn check_invariants(&self) -> Result<(), EngineError> {
        if self.level == 0 || self.atk == 0 || self.def == 0 || self.max_hp == 0 {
            return Err(EngineError::InconsistentState(
                "level/atk/def/maxHp must be positive".into(),
            ));
        }
        if self.hp > self.max_hp {
            return Err(EngineError::InconsistentState(format!(
                "hp {} exceeds maxHp {}",
                self.hp, self.max_hp
            )));
        }
        if !self.crit.is_finite() || self.crit < 0.0 || self.crit > CRIT_CAP {
            return Err(EngineError::InconsistentState(format!(
                "crit {} outside [0, {CRIT_CAP}]",
                self.crit
            )));
        }
        if !rank::is_consistent(self.rank, self.rank_points) {
            return Err(EngineError::InconsistentState(format!(
                "rank {:?} inconsistent with {} rank points",
                self.rank, self.rank_points
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// 调用方违反输入契约。快速失败，不返回半成品属性表。
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// 入参属性表已违反不变式，视为持久层损坏，交由调用方处理。
    #[error("inconsistent stat sheet: {0}")]
    InconsistentState(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sheet_satisfies_invariants() {
        assert!(StatSheet::default().check_invariants().is_ok());
    }

    #[test]
    fn hp_above_max_is_inconsistent() {
        let sheet = StatSheet {
            hp: 150,
            ..StatSheet::default()
        };
        assert!(matches!(
            sheet.check_invariants(),
            Err(EngineError::InconsistentState(_))
        ));
    }

    #[test]
    fn crit_above_cap_is_inconsistent() {
        let sheet = StatSheet {
            crit: 0.9,
            ..StatSheet::default()
        };
        assert!(sheet.check_invariants().is_err());
    }

    #[test]
    fn rank_points_outside_tier_is_inconsistent() {
        let sheet = StatSheet {
            rank_points: 500,
            rank: RankTier::Bronze,
            ..StatSheet::default()
        };
        assert!(sheet.check_invariants().is_err());
    }

    #[test]
    fn sheet_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(StatSheet::default()).unwrap();
        assert_eq!(json["maxHp"], 100);
        assert_eq!(json["rankPoints"], 0);
        assert_eq!(json["winStreak"], 0);
        assert_eq!(json["rank"], "Bronze");
    }
}
