//! LMDB-backed key/value store.
//!
//! Uses heed (Rust bindings for LMDB) so cached responses and the theme
//! preference survive restarts. Keys and values are stored as UTF-8 strings
//! in a single unnamed database.

use std::path::Path;

use cryptoboard_core::StorageError;
use heed::types::Str;
use heed::{Database, Env, EnvOpenOptions};

use crate::store::KeyValueStore;

/// Error type for opening an LMDB store.
#[derive(Debug, thiserror::Error)]
pub enum LmdbStoreError {
    /// Failed to open or create the LMDB environment.
    #[error("Failed to open LMDB environment: {0}")]
    EnvOpen(String),

    /// Failed to open the database within the environment.
    #[error("Failed to open database: {0}")]
    DbOpen(String),

    /// Transaction error.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LmdbStoreError> for StorageError {
    fn from(e: LmdbStoreError) -> Self {
        StorageError::WriteFailed {
            key: String::new(),
            reason: e.to_string(),
        }
    }
}

/// LMDB-backed store. Cloning shares the same environment.
#[derive(Clone)]
pub struct LmdbStore {
    env: Env,
    db: Database<Str, Str>,
}

impl LmdbStore {
    /// Open (or create) a store in `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory where LMDB files will be stored
    /// * `max_size_mb` - Maximum size of the database in megabytes
    pub fn open<P: AsRef<Path>>(path: P, max_size_mb: usize) -> Result<Self, LmdbStoreError> {
        std::fs::create_dir_all(&path)?;

        // The environment is opened once per path by this process.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(max_size_mb * 1024 * 1024)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(|e| LmdbStoreError::EnvOpen(e.to_string()))?;

        let mut wtxn = env
            .write_txn()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        let db: Database<Str, Str> = env
            .create_database(&mut wtxn, None)
            .map_err(|e| LmdbStoreError::DbOpen(e.to_string()))?;

        wtxn.commit()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        tracing::debug!(path = %path.as_ref().display(), max_size_mb, "opened LMDB store");

        Ok(Self { env, db })
    }

    /// Number of stored keys.
    pub fn len(&self) -> Result<u64, StorageError> {
        let rtxn = self.env.read_txn().map_err(|e| StorageError::ReadFailed {
            key: String::new(),
            reason: e.to_string(),
        })?;
        self.db.len(&rtxn).map_err(|e| StorageError::ReadFailed {
            key: String::new(),
            reason: e.to_string(),
        })
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for LmdbStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let read_failed = |reason: String| StorageError::ReadFailed {
            key: key.to_string(),
            reason,
        };
        let rtxn = self.env.read_txn().map_err(|e| read_failed(e.to_string()))?;
        let value = self
            .db
            .get(&rtxn, key)
            .map_err(|e| read_failed(e.to_string()))?;
        Ok(value.map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_failed = |reason: String| StorageError::WriteFailed {
            key: key.to_string(),
            reason,
        };
        let mut wtxn = self.env.write_txn().map_err(|e| write_failed(e.to_string()))?;
        self.db
            .put(&mut wtxn, key, value)
            .map_err(|e| write_failed(e.to_string()))?;
        wtxn.commit().map_err(|e| write_failed(e.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let remove_failed = |reason: String| StorageError::RemoveFailed {
            key: key.to_string(),
            reason,
        };
        let mut wtxn = self.env.write_txn().map_err(|e| remove_failed(e.to_string()))?;
        self.db
            .delete(&mut wtxn, key)
            .map_err(|e| remove_failed(e.to_string()))?;
        wtxn.commit().map_err(|e| remove_failed(e.to_string()))
    }
}
