pub const USERS: &str = "users";
pub const SESSIONS: &str = "sessions";
pub const STAT_SHEETS: &str = "stat_sheets";
pub const BATTLE_RECORDS: &str = "battle_records";
