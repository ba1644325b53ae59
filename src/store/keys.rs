pub fn user_key(user_id: &str) -> String {
    user_id.to_string()
}

pub fn user_email_index_key(email: &str) -> String {
    format!("email:{}", email.to_lowercase())
}

pub fn session_key(token_hash: &str) -> String {
    token_hash.to_string()
}

pub fn stat_sheet_key(user_id: &str) -> String {
    user_id.to_string()
}

/// 对战记录按时间倒序排列：时间戳取反后，同一用户前缀下新记录排前。
pub fn battle_record_key(user_id: &str, timestamp_ms: i64, record_id: &str) -> String {
    let ts = timestamp_ms.max(0) as u64;
    let reverse_ts = u64::MAX - ts;
    format!("{}:{:020}:{}", user_id, reverse_ts, record_id)
}

pub fn battle_record_prefix(user_id: &str) -> String {
    format!("{}:", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battle_records_order_newest_first() {
        let newer = battle_record_key("u1", 2000, "b2");
        let older = battle_record_key("u1", 1000, "b1");
        assert!(newer < older);
    }

    #[test]
    fn email_index_is_normalized() {
        assert_eq!(user_email_index_key("A@Ex.com"), "email:a@ex.com");
    }
}
