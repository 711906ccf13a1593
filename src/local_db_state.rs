//! LMDB-backed [`ComplaintStore`].
//!
//! One environment per store, living in `<name>.lmdb/`, with a single named
//! database. The complaint collection and the session are two independent
//! keys inside it; each write is its own committed transaction.

use std::fs;
use std::path::Path;

use lmdb::{Database, DatabaseFlags, Environment, Transaction, WriteFlags};
use log::{debug, info, warn};

use crate::app_response::AppResponse;
use crate::config::StoreConfig;
use crate::local_db_model::{decode_record, encode_record, Complaint, Session};
use crate::store::{ComplaintStore, COMPLAINTS_KEY, SESSION_KEY};

const DB_NAME: &str = "dreamclean";

pub struct AppDbState {
    env: Option<Environment>,
    db: Database,
    config: StoreConfig,
}

impl AppDbState {
    /// Opens (or creates) the store `<name>.lmdb` with default settings.
    pub fn init(name: String) -> Result<Self, AppResponse> {
        Self::with_config(StoreConfig::named(name))
    }

    pub fn with_config(config: StoreConfig) -> Result<Self, AppResponse> {
        config.validate()?;

        let dir = config.lmdb_dir();
        fs::create_dir_all(&dir)?;

        let env = Environment::new()
            .set_max_dbs(1)
            .set_map_size(config.map_size)
            .open(Path::new(&dir))
            .map_err(|e| {
                warn!("Failed to open LMDB environment at {dir}: {e}");
                AppResponse::from(e)
            })?;
        let db = env.create_db(Some(DB_NAME), DatabaseFlags::empty())?;

        info!("Opened complaint store at {dir}");
        Ok(Self {
            env: Some(env),
            db,
            config,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.env.is_some()
    }

    fn env(&self) -> Result<&Environment, AppResponse> {
        self.env
            .as_ref()
            .ok_or_else(|| AppResponse::DatabaseError("Database connection is closed".to_string()))
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, AppResponse> {
        let txn = self.env()?.begin_ro_txn()?;
        let value = match txn.get(self.db, &key) {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(lmdb::Error::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        txn.abort();
        Ok(value)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), AppResponse> {
        let mut txn = self.env()?.begin_rw_txn()?;
        txn.put(self.db, &key, &bytes, WriteFlags::empty())?;
        txn.commit()?;
        debug!("Committed {} bytes under '{key}'", bytes.len());
        Ok(())
    }

    /// Deletes `key`; `false` when it was not present.
    fn remove(&self, key: &str) -> Result<bool, AppResponse> {
        let mut txn = self.env()?.begin_rw_txn()?;
        match txn.del(self.db, &key, None) {
            Ok(()) => {
                txn.commit()?;
                Ok(true)
            }
            Err(lmdb::Error::NotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Raw envelope bytes under `key`, as stored.
    pub fn raw(&self, key: &str) -> Result<Option<Vec<u8>>, AppResponse> {
        self.read(key)
    }

    /// Overwrites `key` with arbitrary bytes, bypassing the envelope.
    pub fn put_raw(&self, key: &str, bytes: &[u8]) -> Result<(), AppResponse> {
        self.write(key, bytes)
    }

    /// Drops the complaint collection and the session.
    ///
    /// Returns how many complaints were discarded; an unreadable collection
    /// counts as zero.
    pub fn clear_all_records(&self) -> Result<usize, AppResponse> {
        let discarded = self.load_complaints().map(|c| c.len()).unwrap_or(0);

        let mut txn = self.env()?.begin_rw_txn()?;
        txn.clear_db(self.db)?;
        txn.commit()?;

        info!("Cleared store {} ({discarded} complaints)", self.config.name);
        Ok(discarded)
    }

    /// Closes the environment, deletes its directory and reopens an empty
    /// store under `name`.
    /// A rejected name leaves the current store open and untouched.
    pub fn reset_database(&mut self, name: &str) -> Result<bool, AppResponse> {
        let mut config = self.config.clone();
        config.name = name.to_string();
        config.validate()?;

        let old_dir = self.config.lmdb_dir();
        self.close_database()?;

        if Path::new(&old_dir).exists() {
            fs::remove_dir_all(&old_dir)?;
            info!("Removed database directory {old_dir}");
        }

        let new_dir = config.lmdb_dir();
        if new_dir != old_dir && Path::new(&new_dir).exists() {
            fs::remove_dir_all(&new_dir)?;
        }

        *self = Self::with_config(config)?;
        Ok(true)
    }

    /// Flushes and releases the environment. Later calls fail with
    /// [`AppResponse::DatabaseError`]; closing twice is a no-op.
    pub fn close_database(&mut self) -> Result<(), AppResponse> {
        if let Some(env) = self.env.take() {
            env.sync(true)?;
            info!("Closed complaint store {}", self.config.name);
        }
        Ok(())
    }
}

impl ComplaintStore for AppDbState {
    fn load_complaints(&self) -> Result<Vec<Complaint>, AppResponse> {
        match self.read(COMPLAINTS_KEY)? {
            Some(bytes) => decode_record(&bytes, COMPLAINTS_KEY),
            None => Ok(Vec::new()),
        }
    }

    fn save_complaints(&self, complaints: &[Complaint]) -> Result<(), AppResponse> {
        let bytes = encode_record(&complaints)?;
        self.write(COMPLAINTS_KEY, &bytes)
    }

    fn load_session(&self) -> Result<Option<Session>, AppResponse> {
        self.read(SESSION_KEY)?
            .map(|bytes| decode_record(&bytes, SESSION_KEY))
            .transpose()
    }

    fn save_session(&self, session: &Session) -> Result<(), AppResponse> {
        let bytes = encode_record(session)?;
        self.write(SESSION_KEY, &bytes)
    }

    fn clear_session(&self) -> Result<(), AppResponse> {
        self.remove(SESSION_KEY).map(|_| ())
    }
}
