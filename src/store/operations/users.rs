use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let email_key = keys::user_email_index_key(&user.email);

        // 邮箱索引用 CAS 占位，防止两个并发注册同时通过存在性检查
        let cas_result = self
            .users
            .compare_and_swap(
                email_key.as_bytes(),
                None::<&[u8]>,
                Some(user.id.as_bytes().to_vec()),
            )
            .map_err(StoreError::Sled)?;

        if cas_result.is_err() {
            return Err(StoreError::Conflict {
                entity: "user_email".to_string(),
                key: user.email.clone(),
            });
        }

        let user_key = keys::user_key(&user.id);
        let user_bytes = Self::serialize(user)?;
        if let Err(e) = self.users.insert(user_key.as_bytes(), user_bytes) {
            let _ = self.users.remove(email_key.as_bytes());
            return Err(StoreError::Sled(e));
        }

        Ok(())
    }

    pub fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let key = keys::user_key(user_id);
        match self.users.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let index_key = keys::user_email_index_key(email);
        let Some(user_id_raw) = self.users.get(index_key.as_bytes())? else {
            return Ok(None);
        };
        let user_id = match String::from_utf8(user_id_raw.to_vec()) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid UTF-8 in user email index");
                return Ok(None);
            }
        };
        self.get_user_by_id(&user_id)
    }

    pub fn update_user(&self, user: &User) -> Result<(), StoreError> {
        self.get_user_by_id(&user.id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "user".to_string(),
                key: user.id.clone(),
            })?;

        let user_key = keys::user_key(&user.id);
        self.users
            .insert(user_key.as_bytes(), Self::serialize(user)?)?;
        Ok(())
    }

    pub fn set_user_banned(&self, user_id: &str, banned: bool) -> Result<User, StoreError> {
        let mut user = self
            .get_user_by_id(user_id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "user".to_string(),
                key: user_id.to_string(),
            })?;
        user.is_banned = banned;
        user.updated_at = Utc::now();
        self.update_user(&user)?;
        Ok(user)
    }

    pub fn list_users(&self, limit: usize, offset: usize) -> Result<Vec<User>, StoreError> {
        let mut users = Vec::new();
        for item in self.users.iter() {
            let (key, value) = item?;
            // 跳过邮箱索引项
            if key.starts_with(b"email:") {
                continue;
            }
            users.push(Self::deserialize::<User>(&value)?);
        }

        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users.into_iter().skip(offset).take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::tempdir;

    use super::*;

    fn sample_user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            email: email.to_string(),
            username: "warrior".to_string(),
            password_hash: "hash".to_string(),
            is_admin: false,
            is_banned: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_get_user() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("users-db").to_str().unwrap()).unwrap();

        let user = sample_user("u1", "u1@test.com");
        store.create_user(&user).unwrap();
        let got = store.get_user_by_id("u1").unwrap().unwrap();
        assert_eq!(got.email, "u1@test.com");

        let by_email = store.get_user_by_email("U1@TEST.com").unwrap().unwrap();
        assert_eq!(by_email.id, "u1");
    }

    #[test]
    fn duplicate_email_conflicts() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("users-db2").to_str().unwrap()).unwrap();

        store.create_user(&sample_user("u1", "dup@test.com")).unwrap();
        let err = store
            .create_user(&sample_user("u2", "dup@test.com"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[test]
    fn ban_round_trip() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("users-db3").to_str().unwrap()).unwrap();

        store.create_user(&sample_user("u1", "a@test.com")).unwrap();
        let banned = store.set_user_banned("u1", true).unwrap();
        assert!(banned.is_banned);
        let unbanned = store.set_user_banned("u1", false).unwrap();
        assert!(!unbanned.is_banned);
    }

    #[test]
    fn list_skips_email_index_entries() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("users-db4").to_str().unwrap()).unwrap();

        store.create_user(&sample_user("u1", "a@test.com")).unwrap();
        store.create_user(&sample_user("u2", "b@test.com")).unwrap();
        let users = store.list_users(10, 0).unwrap();
        assert_eq!(users.len(), 2);
    }
}
