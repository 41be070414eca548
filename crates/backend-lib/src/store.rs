// ============================
// crates/backend-lib/src/store.rs
// ============================
//! Per-project user collections over a flat-file backing store.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{fs as tokio_fs, io::AsyncWriteExt};
use uuid::Uuid;

use crate::error::AppError;

/// A stored credential record. Created by registration, never mutated;
/// the session identity is `(db_name, id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Trait for user credential stores
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user record into the project's collection and return
    /// its freshly minted id. Duplicate emails are accepted.
    async fn insert_user(
        &self,
        db_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<String, AppError>;

    /// All records in the project whose email matches. Returns every
    /// candidate because emails are not unique; the caller decides which
    /// one (if any) matches by verifying the password hash.
    async fn find_by_email(&self, db_name: &str, email: &str)
        -> Result<Vec<UserRecord>, AppError>;
}

/// Flat-file implementation of the `UserStore` trait.
///
/// Each project keeps its users in `projects/<db_name>/users.jsonl`, one
/// JSON record per line; an insert is a single append.
#[derive(Clone)]
pub struct FlatFileStore {
    root: PathBuf,
}

impl FlatFileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(root.join("projects"))?;
        Ok(Self { root })
    }

    fn users_path(&self, db_name: &str) -> PathBuf {
        self.root.join("projects").join(db_name).join("users.jsonl")
    }
}

#[async_trait]
impl UserStore for FlatFileStore {
    async fn insert_user(
        &self,
        db_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<String, AppError> {
        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };

        let path = self.users_path(db_name);

        // ensure the project directory exists
        tokio_fs::create_dir_all(path.parent().unwrap())
            .await
            .map_err(unavailable)?;

        let line = serde_json::to_string(&record)?;
        let mut file = tokio_fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(unavailable)?;

        file.write_all(line.as_bytes()).await.map_err(unavailable)?;
        file.write_all(b"\n").await.map_err(unavailable)?;

        Ok(record.id)
    }

    async fn find_by_email(
        &self,
        db_name: &str,
        email: &str,
    ) -> Result<Vec<UserRecord>, AppError> {
        let path = self.users_path(db_name);

        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = tokio_fs::read_to_string(&path).await.map_err(unavailable)?;

        let mut matches = Vec::new();
        for line in content.lines().filter(|line| !line.trim().is_empty()) {
            match serde_json::from_str::<UserRecord>(line) {
                Ok(record) if record.email == email => matches.push(record),
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(db_name, %err, "skipping malformed user record");
                }
            }
        }

        Ok(matches)
    }
}

fn unavailable(err: std::io::Error) -> AppError {
    AppError::StoreUnavailable(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_insert_and_find() {
        let dir = tempdir().unwrap();
        let store = FlatFileStore::new(dir.path()).unwrap();

        let id = store
            .insert_user("proj1", "a@x.com", "hash-1")
            .await
            .unwrap();

        let found = store.find_by_email("proj1", "a@x.com").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
        assert_eq!(found[0].password_hash, "hash-1");
    }

    #[tokio::test]
    async fn test_duplicate_emails_are_all_returned() {
        let dir = tempdir().unwrap();
        let store = FlatFileStore::new(dir.path()).unwrap();

        let first = store
            .insert_user("proj1", "a@x.com", "hash-1")
            .await
            .unwrap();
        let second = store
            .insert_user("proj1", "a@x.com", "hash-2")
            .await
            .unwrap();
        assert_ne!(first, second);

        let found = store.find_by_email("proj1", "a@x.com").await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_projects_are_isolated() {
        let dir = tempdir().unwrap();
        let store = FlatFileStore::new(dir.path()).unwrap();

        store
            .insert_user("proj1", "a@x.com", "hash-1")
            .await
            .unwrap();

        let other = store.find_by_email("proj2", "a@x.com").await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_project_is_empty_not_an_error() {
        let dir = tempdir().unwrap();
        let store = FlatFileStore::new(dir.path()).unwrap();

        let found = store.find_by_email("nope", "a@x.com").await.unwrap();
        assert!(found.is_empty());
    }
}
