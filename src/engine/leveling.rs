//! 等级模型：经验累积与升级结算。

use crate::engine::StatSheet;

/// 每升一级的属性成长。
pub const ATK_PER_LEVEL: u32 = 1;
pub const DEF_PER_LEVEL: u32 = 1;
pub const MAX_HP_PER_LEVEL: u32 = 5;

/// 升到下一级所需经验。线性递增，保证越升越难。
pub fn exp_requirement(level: u32) -> u32 {
    level.saturating_mul(100)
}

/// 累积经验并结算升级。
///
/// 经验溢出部分结转到下一级；每次升级固定成长 atk/def/maxHp，
/// 并将 hp 回满（升级回血是常规规则，依赖战斗残血的调用方不在本引擎范围内）。
pub fn grant_exp(sheet: &mut StatSheet, delta: u32) {
    sheet.exp = sheet.exp.saturating_add(delta);
    while sheet.exp >= exp_requirement(sheet.level) {
        sheet.exp -= exp_requirement(sheet.level);
        sheet.level += 1;
        sheet.atk += ATK_PER_LEVEL;
        sheet.def += DEF_PER_LEVEL;
        sheet.max_hp += MAX_HP_PER_LEVEL;
        sheet.hp = sheet.max_hp;
    }
}
