//! Profile store boundary used by the dashboard.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::db::Database;
use crate::models::ProfileRecord;

/// Outcome of a profile point lookup.
///
/// A missing profile is an expected outcome and is kept apart from
/// failures so callers never inspect error codes to tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileLookup {
    Found(ProfileRecord),
    NotFound,
    Failed(String),
}

impl ProfileLookup {
    /// Get the found record, if any.
    pub fn record(&self) -> Option<&ProfileRecord> {
        match self {
            ProfileLookup::Found(record) => Some(record),
            _ => None,
        }
    }
}

/// Read access to stored profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Look up the single profile owned by `user_id`.
    async fn fetch_profile_by_user(&self, user_id: &str) -> ProfileLookup;
}

/// [`ProfileStore`] backed by the local SQLite database.
#[derive(Clone)]
pub struct SqliteProfileStore {
    db: Arc<Mutex<Database>>,
}

impl SqliteProfileStore {
    /// Wrap a shared database handle.
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn fetch_profile_by_user(&self, user_id: &str) -> ProfileLookup {
        let db = match self.db.lock() {
            Ok(db) => db,
            Err(e) => return ProfileLookup::Failed(format!("Lock poisoned: {}", e)),
        };

        match db.get_profile_by_user(user_id) {
            Ok(Some(record)) => ProfileLookup::Found(record),
            Ok(None) => ProfileLookup::NotFound,
            Err(e) => ProfileLookup::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(profile: Option<&ProfileRecord>) -> SqliteProfileStore {
        let db = Database::open_in_memory().unwrap();
        if let Some(profile) = profile {
            db.insert_profile(profile).unwrap();
        }
        SqliteProfileStore::new(Arc::new(Mutex::new(db)))
    }

    #[tokio::test]
    async fn test_found() {
        let profile =
            ProfileRecord::new("user-1".into(), "Jane Doe".into(), "+15551234567".into());
        let store = store_with(Some(&profile));

        let lookup = store.fetch_profile_by_user("user-1").await;
        assert_eq!(lookup.record(), Some(&profile));
    }

    #[tokio::test]
    async fn test_not_found() {
        let store = store_with(None);
        assert_eq!(
            store.fetch_profile_by_user("user-1").await,
            ProfileLookup::NotFound
        );
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let store = store_with(None);
        store
            .db
            .lock()
            .unwrap()
            .conn()
            .execute_batch("DROP TABLE medical_profiles")
            .unwrap();

        let lookup = store.fetch_profile_by_user("user-1").await;
        assert!(matches!(lookup, ProfileLookup::Failed(_)));
        assert!(lookup.record().is_none());
    }
}
