//! 段位阶梯：五个段位的有序表与升降级规则。
//!
//! 段位顺序与积分阈值只在这里定义一次，其余模块一律通过
//! `ordinal()` 和 `tier_for_points()` 查询，不得自行复制序数逻辑。

use serde::{Deserialize, Serialize};

/// 升级时允许超出新段位下限的最大积分余量。
/// 必须小于最窄段位的宽度，否则一次大额加分可能连跳两级。
pub const PROMOTION_OVERFLOW: u32 = 50;

/// 各段位的积分下限（`King` 无上限）。上限即下一段位的下限。
const TIER_FLOORS: [u32; 5] = [0, 100, 250, 450, 700];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RankTier {
    Bronze,
    Silver,
    Gold,
    Diamond,
    King,
}

impl RankTier {
    /// 序数 1..=5，用于升级判定与「以下克上」比较。
    pub fn ordinal(self) -> u32 {
        match self {
            RankTier::Bronze => 1,
            RankTier::Silver => 2,
            RankTier::Gold => 3,
            RankTier::Diamond => 4,
            RankTier::King => 5,
        }
    }

    /// 本段位的积分下限。
    pub fn floor(self) -> u32 {
        TIER_FLOORS[self.ordinal() as usize - 1]
    }

    /// 本段位的积分上限（下一段位的下限）；`King` 无上限。
    pub fn ceiling(self) -> Option<u32> {
        TIER_FLOORS.get(self.ordinal() as usize).copied()
    }

    pub fn next(self) -> Option<RankTier> {
        match self {
            RankTier::Bronze => Some(RankTier::Silver),
            RankTier::Silver => Some(RankTier::Gold),
            RankTier::Gold => Some(RankTier::Diamond),
            RankTier::Diamond => Some(RankTier::King),
            RankTier::King => None,
        }
    }

    pub fn prev(self) -> Option<RankTier> {
        match self {
            RankTier::Bronze => None,
            RankTier::Silver => Some(RankTier::Bronze),
            RankTier::Gold => Some(RankTier::Silver),
            RankTier::Diamond => Some(RankTier::Gold),
            RankTier::King => Some(RankTier::Diamond),
        }
    }
}

/// 积分到段位的唯一映射：取下限不超过积分的最高段位。
pub fn tier_for_points(points: u32) -> RankTier {
    let mut tier = RankTier::Bronze;
    while let (Some(next), Some(ceiling)) = (tier.next(), tier.ceiling()) {
        if points < ceiling {
            break;
        }
        tier = next;
    }
    tier
}

/// 段位与积分是否一致（积分落在段位区间内）。
pub fn is_consistent(rank: RankTier, points: u32) -> bool {
    tier_for_points(points) == rank
}

/// 加分并结算升级。
///
/// 若加分使积分进入更高段位，则将积分收敛到新段位下限加
/// [`PROMOTION_OVERFLOW`] 以内，保证单次加分至多升一级。
pub fn apply_gain(rank: RankTier, points: u32, gain: u32) -> (RankTier, u32) {
    let mut new_points = points.saturating_add(gain);
    if let Some(ceiling) = rank.ceiling() {
        if new_points >= ceiling {
            new_points = new_points.min(ceiling + PROMOTION_OVERFLOW);
        }
    }
    (tier_for_points(new_points), new_points)
}

/// 扣分并结算降级。
///
/// 扣分下限取下一级段位的下限（`Bronze` 取 0），因此单次扣分
/// 至多降一级，且积分永不为负。
pub fn apply_loss(rank: RankTier, points: u32, deduction: u32) -> (RankTier, u32) {
    let lower_bound = rank.prev().map(RankTier::floor).unwrap_or(0);
    let new_points = points.saturating_sub(deduction).max(lower_bound);
    (tier_for_points(new_points), new_points)
}
