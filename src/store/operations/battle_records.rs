use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{BattleResult, RankTier};
use crate::store::keys;
use crate::store::{Store, StoreError};

/// 一场排位战的历史记录（战报页按时间倒序展示）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRecord {
    pub id: String,
    pub user_id: String,
    pub opponent_rank: RankTier,
    pub result: BattleResult,
    pub upset_win: bool,
    pub rank_points_after: u32,
    pub combat_power_after: f64,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn append_battle_record(&self, record: &BattleRecord) -> Result<(), StoreError> {
        let key = keys::battle_record_key(
            &record.user_id,
            record.created_at.timestamp_millis(),
            &record.id,
        );
        self.battle_records
            .insert(key.as_bytes(), Self::serialize(record)?)?;
        Ok(())
    }

    /// 最近的对战记录，新的在前（键内时间戳取反，扫描前缀即可）。
    pub fn list_battle_records(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<BattleRecord>, StoreError> {
        let prefix = keys::battle_record_prefix(user_id);
        let mut records = Vec::new();
        for item in self.battle_records.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            records.push(Self::deserialize::<BattleRecord>(&value)?);
            if records.len() >= limit {
                break;
            }
        }
        Ok(records)
    }
}
