//! 战力公式：把一张属性表折算成一个可比较的标量。

use crate::engine::StatSheet;

const ATK_WEIGHT: f64 = 2.0;
const DEF_WEIGHT: f64 = 1.5;
// 生命值是防御缓冲而非输出，权重最低
const MAX_HP_WEIGHT: f64 = 0.1;
/// 每级战力增益（等级 1 为基准）
const LEVEL_UPLIFT: f64 = 0.02;
/// 每个段位序数的战力增益（Bronze 为基准）
const RANK_UPLIFT: f64 = 0.05;

/// 计算战力。纯函数，对任意合法属性表都返回非负有限值，
/// 且对每个单独属性严格单调递增。
pub fn combat_power(sheet: &StatSheet) -> f64 {
    let base = f64::from(sheet.atk) * ATK_WEIGHT
        + f64::from(sheet.def) * DEF_WEIGHT
        + f64::from(sheet.max_hp) * MAX_HP_WEIGHT;
    let crit_bonus = 1.0 + sheet.crit;
    let level_bonus = 1.0 + LEVEL_UPLIFT * f64::from(sheet.level - 1);
    let rank_bonus = 1.0 + RANK_UPLIFT * f64::from(sheet.rank.ordinal() - 1);

    round2(base * crit_bonus * level_bonus * rank_bonus)
}

// 展示值保留两位小数，与前端显示精度一致
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
