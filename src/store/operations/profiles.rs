use crate::engine::StatSheet;
use crate::store::keys;
use crate::store::{Store, StoreError};

impl Store {
    /// 读取玩家属性表；未知玩家返回文档化的默认表。
    /// 这是默认档案契约的唯一归属地——引擎永远看不到「缺失」状态。
    pub fn get_stat_sheet(&self, user_id: &str) -> Result<StatSheet, StoreError> {
        let key = keys::stat_sheet_key(user_id);
        match self.stat_sheets.get(key.as_bytes())? {
            Some(raw) => Ok(Self::deserialize(&raw)?),
            None => Ok(StatSheet::default()),
        }
    }

    /// 整表替换。同玩家并发写为 last-write-wins（见 store 模块文档）。
    pub fn put_stat_sheet(&self, user_id: &str, sheet: &StatSheet) -> Result<(), StoreError> {
        let key = keys::stat_sheet_key(user_id);
        self.stat_sheets
            .insert(key.as_bytes(), Self::serialize(sheet)?)?;
        Ok(())
    }
}
