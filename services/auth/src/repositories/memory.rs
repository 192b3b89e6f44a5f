//! In-memory credential and OTP store
//!
//! One value implements both traits so that `create_with_otp` can write
//! the user and the OTP under a single lock.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{OtpStore, UserStore};
use crate::models::{NewUser, OtpRecord, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    otps: Vec<OtpRecord>,
}

impl Tables {
    fn push_otp(&mut self, email: &str, code: &str, created_at: DateTime<Utc>) -> OtpRecord {
        let record = OtpRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            code: code.to_string(),
            created_at,
        };
        self.otps.push(record.clone());
        record
    }

    fn latest_otp(
        &self,
        issued_after: Option<DateTime<Utc>>,
        matches: impl Fn(&OtpRecord) -> bool,
    ) -> Option<OtpRecord> {
        self.otps
            .iter()
            .filter(|r| issued_after.is_none_or(|cutoff| r.created_at >= cutoff))
            .filter(|r| matches(*r))
            .max_by_key(|r| r.created_at)
            .cloned()
    }
}

#[derive(Clone, Default)]
pub struct MemoryAuthStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an OTP with an explicit creation time
    pub async fn insert_otp_at(
        &self,
        email: &str,
        code: &str,
        created_at: DateTime<Utc>,
    ) -> OtpRecord {
        self.tables.lock().await.push_otp(email, code, created_at)
    }

    /// Every OTP issued to an email, oldest first
    pub async fn otps_for(&self, email: &str) -> Vec<OtpRecord> {
        self.tables
            .lock()
            .await
            .otps
            .iter()
            .filter(|r| r.email == email)
            .cloned()
            .collect()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.lock().await.users.len()
    }
}

#[async_trait]
impl UserStore for MemoryAuthStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_with_otp(&self, new_user: &NewUser, otp_code: &str) -> Result<Option<User>> {
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.email == new_user.email) {
            return Ok(None);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            user_name: new_user.user_name.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            country: new_user.country.clone(),
            date_of_birth: new_user.date_of_birth.clone(),
            role: None,
            verified: false,
            profile_picture: None,
            created_at: now,
            updated_at: now,
        };

        tables.users.insert(user.id, user.clone());
        tables.push_otp(&user.email, otp_code, now);
        Ok(Some(user))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        Ok(match tables.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn mark_verified(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        Ok(match tables.users.get_mut(&id) {
            Some(user) => {
                user.verified = true;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }
}

#[async_trait]
impl OtpStore for MemoryAuthStore {
    async fn create(&self, email: &str, code: &str) -> Result<OtpRecord> {
        Ok(self.tables.lock().await.push_otp(email, code, Utc::now()))
    }

    async fn latest_for_email(
        &self,
        email: &str,
        issued_after: Option<DateTime<Utc>>,
    ) -> Result<Option<OtpRecord>> {
        let tables = self.tables.lock().await;
        Ok(tables.latest_otp(issued_after, |r| r.email == email))
    }

    async fn latest_by_code(
        &self,
        code: &str,
        issued_after: Option<DateTime<Utc>>,
    ) -> Result<Option<OtpRecord>> {
        let tables = self.tables.lock().await;
        Ok(tables.latest_otp(issued_after, |r| r.code == code))
    }

    async fn latest_for_email_and_code(
        &self,
        email: &str,
        code: &str,
        issued_after: Option<DateTime<Utc>>,
    ) -> Result<Option<OtpRecord>> {
        let tables = self.tables.lock().await;
        Ok(tables.latest_otp(issued_after, |r| r.email == email && r.code == code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            user_name: "alice".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            country: "CM".to_string(),
            date_of_birth: "1990-01-01".to_string(),
        }
    }

    #[tokio::test]
    async fn create_with_otp_writes_both_records() {
        let store = MemoryAuthStore::new();
        let user = store
            .create_with_otp(&new_user("a@example.com"), "123456")
            .await
            .unwrap()
            .unwrap();

        assert!(!user.verified);
        let otps = store.otps_for("a@example.com").await;
        assert_eq!(otps.len(), 1);
        assert_eq!(otps[0].code, "123456");
    }

    #[tokio::test]
    async fn duplicate_email_writes_nothing() {
        let store = MemoryAuthStore::new();
        store
            .create_with_otp(&new_user("a@example.com"), "111111")
            .await
            .unwrap();

        let second = store
            .create_with_otp(&new_user("a@example.com"), "222222")
            .await
            .unwrap();

        assert!(second.is_none());
        assert_eq!(store.user_count().await, 1);
        assert_eq!(store.otps_for("a@example.com").await.len(), 1);
    }

    #[tokio::test]
    async fn latest_lookups_prefer_newest_live_record() {
        let store = MemoryAuthStore::new();
        let now = Utc::now();
        store
            .insert_otp_at("a@example.com", "111111", now - Duration::minutes(2))
            .await;
        store
            .insert_otp_at("a@example.com", "222222", now - Duration::minutes(1))
            .await;
        store
            .insert_otp_at("b@example.com", "111111", now - Duration::hours(1))
            .await;

        let latest = store
            .latest_for_email("a@example.com", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.code, "222222");

        let by_code = store.latest_by_code("111111", None).await.unwrap().unwrap();
        assert_eq!(by_code.email, "a@example.com");

        let cutoff = Some(now - Duration::minutes(30));
        let scoped = store
            .latest_for_email_and_code("b@example.com", "111111", cutoff)
            .await
            .unwrap();
        assert!(scoped.is_none());
    }
}
