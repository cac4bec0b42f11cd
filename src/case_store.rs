//! Slot storage: one serialized blob per named key.
//!
//! [`SlotStore`] is the persistence boundary of the repository. It knows
//! nothing about cases; it stores raw bytes under keys, synchronously and
//! whole, the way browser local storage does. Decoding is left to the caller,
//! so a slot holding garbage still reads back as that garbage. [`LmdbStore`] keeps the slots in
//! an LMDB environment on disk, [`MemoryStore`] keeps them in process.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use lmdb::{Database, DatabaseFlags, Environment, Error as LmdbError, Transaction, WriteFlags};
use log::{debug, info, warn};

use crate::app_response::AppResponse;
use crate::config::TrackerConfig;

pub trait SlotStore {
    /// Returns `None` when the slot has never been written.
    fn read_slot(&self, key: &str) -> Result<Option<Vec<u8>>, AppResponse>;

    /// Replaces the slot. Either the whole value lands or nothing does.
    fn write_slot(&self, key: &str, value: &[u8]) -> Result<(), AppResponse>;

    /// Returns whether a slot was removed.
    fn remove_slot(&self, key: &str) -> Result<bool, AppResponse>;

    /// Flushes pending writes. Stores that write synchronously need nothing.
    fn close(&mut self) -> Result<(), AppResponse> {
        Ok(())
    }
}

const SLOT_DB_NAME: &str = "slots";

pub struct LmdbStore {
    env: Environment,
    db: Database,
    path: PathBuf,
}

impl LmdbStore {
    /// Opens (creating if needed) the environment at `<name>.lmdb`.
    pub fn open(config: &TrackerConfig) -> Result<Self, AppResponse> {
        let path = config.store_path();
        fs::create_dir_all(&path)?;

        let env = Environment::new()
            .set_max_dbs(1)
            .set_map_size(config.map_size)
            .open(&path)?;
        let db = env.create_db(Some(SLOT_DB_NAME), DatabaseFlags::empty())?;

        info!("Opened case store at {}", path.display());
        Ok(Self { env, db, path })
    }
}

impl SlotStore for LmdbStore {
    fn read_slot(&self, key: &str) -> Result<Option<Vec<u8>>, AppResponse> {
        let txn = self.env.begin_ro_txn()?;
        let bytes = match txn.get(self.db, &key) {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(LmdbError::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        txn.abort();
        Ok(bytes)
    }

    fn write_slot(&self, key: &str, value: &[u8]) -> Result<(), AppResponse> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        debug!("Wrote {} bytes to slot '{}'", value.len(), key);
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> Result<bool, AppResponse> {
        let mut txn = self.env.begin_rw_txn()?;
        let removed = match txn.del(self.db, &key, None) {
            Ok(()) => true,
            Err(LmdbError::NotFound) => false,
            Err(e) => return Err(e.into()),
        };
        txn.commit()?;
        Ok(removed)
    }

    fn close(&mut self) -> Result<(), AppResponse> {
        if let Err(e) = self.env.sync(true) {
            warn!("Failed to sync case store at {}: {e}", self.path.display());
            return Err(e.into());
        }
        info!("Closed case store at {}", self.path.display());
        Ok(())
    }
}

/// Process-local slots. Nothing survives the value being dropped.
#[derive(Default)]
pub struct MemoryStore {
    slots: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `key` slot already holds `value`.
    pub fn with_slot(key: &str, value: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store.slots.borrow_mut().insert(key.to_string(), value.into());
        store
    }
}

impl SlotStore for MemoryStore {
    fn read_slot(&self, key: &str) -> Result<Option<Vec<u8>>, AppResponse> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &[u8]) -> Result<(), AppResponse> {
        self.slots.borrow_mut().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> Result<bool, AppResponse> {
        Ok(self.slots.borrow_mut().remove(key).is_some())
    }
}
