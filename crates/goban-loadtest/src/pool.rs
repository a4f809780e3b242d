//! Registered-account pool
//!
//! The account flow appends every identity it finishes with so later runs
//! can reuse them. Appends and checkouts serialize on one lock; the file
//! format is a plain JSON array.

use std::fs;
use std::io;
use std::path::Path;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;

use goban_core::types::Session;

/// One stored account, password included so later runs can log in
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAccount {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub token: String,
    pub password: String,
}

impl StoredAccount {
    pub fn from_session(session: &Session, password: &str) -> Self {
        Self {
            user_id: session.user_id,
            username: session.nickname.clone(),
            email: session.email.clone(),
            token: session.token.clone(),
            password: password.to_string(),
        }
    }
}

/// Append-under-lock account store shared across actors
#[derive(Debug, Default)]
pub struct SessionPool {
    accounts: Mutex<Vec<StoredAccount>>,
}

impl SessionPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, account: StoredAccount) {
        self.accounts.lock().push(account);
    }

    /// Check out an account that no other actor will receive again
    pub fn take(&self) -> Option<StoredAccount> {
        self.accounts.lock().pop()
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<StoredAccount> {
        self.accounts.lock().clone()
    }

    /// Write the pool as a JSON array
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let accounts = self.snapshot();
        let json = serde_json::to_string_pretty(&accounts)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)?;
        info!(count = accounts.len(), path = %path.display(), "accounts saved");
        Ok(())
    }

    /// Load a previously saved pool
    pub fn load(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        let accounts: Vec<StoredAccount> = serde_json::from_str(&json)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        info!(count = accounts.len(), path = %path.display(), "accounts loaded");
        Ok(Self {
            accounts: Mutex::new(accounts),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(user_id: i64) -> StoredAccount {
        StoredAccount {
            user_id,
            username: format!("Player_{}", user_id),
            email: format!("loadtest_{}@test.com", user_id),
            token: "token".to_string(),
            password: "NewPass123456!".to_string(),
        }
    }

    #[test]
    fn test_append_and_take() {
        let pool = SessionPool::new();
        assert!(pool.is_empty());

        pool.append(account(1));
        pool.append(account(2));
        assert_eq!(pool.len(), 2);

        let taken = pool.take().unwrap();
        assert_eq!(taken.user_id, 2);
        assert_eq!(pool.len(), 1);

        pool.take().unwrap();
        assert!(pool.take().is_none());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.json");

        let pool = SessionPool::new();
        pool.append(account(7));
        pool.append(account(8));
        pool.save(&path).unwrap();

        let loaded = SessionPool::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        let snapshot = loaded.snapshot();
        assert_eq!(snapshot[0].user_id, 7);
        assert_eq!(snapshot[1].email, "loadtest_8@test.com");
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(SessionPool::load(Path::new("/nonexistent/accounts.json")).is_err());
    }
}
