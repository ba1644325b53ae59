pub mod battle_records;
pub mod profiles;
pub mod sessions;
pub mod users;
