//! LMDB-backed persistence for roadmap snapshots.
//!
//! Each environment lives in a `<name>.lmdb` directory and holds one named
//! database of string keys to string values. The tracker uses a single key
//! (`storageKey`, default `leetcodeRoadmap`) as its snapshot slot; every write
//! is its own committed transaction, so a reader never observes a torn value.

use std::fs;
use std::path::{Path, PathBuf};

use lmdb::{Database, DatabaseFlags, Environment, Error as LmdbError, Transaction, WriteFlags};
use log::{info, warn};

use crate::app_response::AppResponse;
use crate::config::TrackerConfig;
use crate::store::SnapshotStore;

const SNAPSHOT_DB: &str = "roadmap_snapshots";

pub struct AppDbState {
    env: Environment,
    db: Database,
    path: PathBuf,
    storage_key: String,
    closed: bool,
}

/// Directory used for the environment called `name`.
pub fn db_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{name}.lmdb"))
}

impl AppDbState {
    /// Opens (or creates) the environment `name` with default settings.
    pub fn init(name: String) -> Result<Self, AppResponse> {
        Self::open(&TrackerConfig::with_db_name(name))
    }

    /// Opens (or creates) the environment described by `config`.
    pub fn open(config: &TrackerConfig) -> Result<Self, AppResponse> {
        if config.db_name.trim().is_empty() {
            return Err(AppResponse::BadRequest("Database name must not be empty".to_string()));
        }
        if config.storage_key.is_empty() {
            return Err(AppResponse::BadRequest("Storage key must not be empty".to_string()));
        }

        let path = db_path(&config.db_name);
        fs::create_dir_all(&path)?;

        let env = Environment::new()
            .set_max_dbs(1)
            .set_map_size(config.map_size)
            .open(&path)?;
        let db = env.create_db(Some(SNAPSHOT_DB), DatabaseFlags::empty())?;

        info!("Opened LMDB environment at {}", path.display());

        Ok(Self {
            env,
            db,
            path,
            storage_key: config.storage_key.clone(),
            closed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn push(&self, key: &str, value: &str) -> Result<(), AppResponse> {
        self.ensure_open()?;
        if key.is_empty() {
            return Err(AppResponse::ValidationError("Key must not be empty".to_string()));
        }

        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        Ok(())
    }

    pub fn get_by_id(&self, key: &str) -> Result<Option<String>, AppResponse> {
        self.ensure_open()?;
        if key.is_empty() {
            return Ok(None);
        }

        let txn = self.env.begin_ro_txn()?;
        let bytes = match txn.get(self.db, &key) {
            Ok(bytes) => bytes.to_vec(),
            Err(LmdbError::NotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| {
                AppResponse::SerializationError(format!("Stored value for '{key}' is not UTF-8: {e}"))
            })
    }

    /// Removes `key`. Returns `false` when there was nothing to remove.
    pub fn delete_by_id(&self, key: &str) -> Result<bool, AppResponse> {
        self.ensure_open()?;
        if key.is_empty() {
            return Ok(false);
        }

        let mut txn = self.env.begin_rw_txn()?;
        let removed = match txn.del(self.db, &key, None) {
            Ok(()) => true,
            Err(LmdbError::NotFound) => false,
            Err(e) => return Err(e.into()),
        };
        txn.commit()?;
        Ok(removed)
    }

    /// Flushes to disk and marks this handle unusable.
    ///
    /// The environment itself is released when the value is dropped.
    pub fn close_database(&mut self) -> Result<(), AppResponse> {
        if self.closed {
            return Ok(());
        }
        self.env.sync(true)?;
        self.closed = true;
        info!("Closed LMDB environment at {}", self.path.display());
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), AppResponse> {
        if self.closed {
            warn!("Operation on closed database {}", self.path.display());
            return Err(AppResponse::BadRequest("Database connection is closed".to_string()));
        }
        Ok(())
    }
}

impl SnapshotStore for AppDbState {
    fn read(&self) -> Result<Option<String>, AppResponse> {
        self.get_by_id(&self.storage_key)
    }

    fn write(&mut self, payload: &str) -> Result<(), AppResponse> {
        self.push(&self.storage_key, payload)
    }

    fn clear(&mut self) -> Result<(), AppResponse> {
        self.delete_by_id(&self.storage_key).map(|_| ())
    }
}
