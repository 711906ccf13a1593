//! Persistence boundary for complaints and the active session.
//!
//! Consumers receive a [`ComplaintStore`] explicitly; nothing in the core
//! keeps a global collection. Every write replaces the whole record, so two
//! callers working from the same stale snapshot overwrite each other (last
//! writer wins).

use std::cell::RefCell;
use std::collections::HashMap;

use log::debug;

use crate::app_response::AppResponse;
use crate::local_db_model::{decode_record, encode_record, Complaint, Session};

/// Key holding the complaint collection.
pub const COMPLAINTS_KEY: &str = "complaints";

/// Key holding the signed-in identity.
pub const SESSION_KEY: &str = "auth_user";

pub trait ComplaintStore {
    /// Reads the durable collection. An absent record is an empty collection;
    /// unreadable bytes surface as [`AppResponse::CorruptState`].
    fn load_complaints(&self) -> Result<Vec<Complaint>, AppResponse>;

    /// Replaces the durable collection in a single write.
    fn save_complaints(&self, complaints: &[Complaint]) -> Result<(), AppResponse>;

    fn load_session(&self) -> Result<Option<Session>, AppResponse>;

    fn save_session(&self, session: &Session) -> Result<(), AppResponse>;

    fn clear_session(&self) -> Result<(), AppResponse>;
}

impl<S: ComplaintStore + ?Sized> ComplaintStore for &S {
    fn load_complaints(&self) -> Result<Vec<Complaint>, AppResponse> {
        (**self).load_complaints()
    }

    fn save_complaints(&self, complaints: &[Complaint]) -> Result<(), AppResponse> {
        (**self).save_complaints(complaints)
    }

    fn load_session(&self) -> Result<Option<Session>, AppResponse> {
        (**self).load_session()
    }

    fn save_session(&self, session: &Session) -> Result<(), AppResponse> {
        (**self).save_session(session)
    }

    fn clear_session(&self) -> Result<(), AppResponse> {
        (**self).clear_session()
    }
}

/// Store that keeps the encoded records in process memory.
///
/// Records go through the same envelope encoding as the LMDB store, so
/// corrupt or foreign bytes behave identically.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes stored under `key`.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.records.borrow().get(key).cloned()
    }

    /// Overwrites `key` with arbitrary bytes.
    pub fn put_raw(&self, key: &str, bytes: Vec<u8>) {
        self.records.borrow_mut().insert(key.to_string(), bytes);
    }
}

impl ComplaintStore for MemoryStore {
    fn load_complaints(&self) -> Result<Vec<Complaint>, AppResponse> {
        match self.raw(COMPLAINTS_KEY) {
            Some(bytes) => decode_record(&bytes, COMPLAINTS_KEY),
            None => Ok(Vec::new()),
        }
    }

    fn save_complaints(&self, complaints: &[Complaint]) -> Result<(), AppResponse> {
        let bytes = encode_record(&complaints)?;
        debug!("Writing {} complaints to memory store", complaints.len());
        self.put_raw(COMPLAINTS_KEY, bytes);
        Ok(())
    }

    fn load_session(&self) -> Result<Option<Session>, AppResponse> {
        self.raw(SESSION_KEY)
            .map(|bytes| decode_record(&bytes, SESSION_KEY))
            .transpose()
    }

    fn save_session(&self, session: &Session) -> Result<(), AppResponse> {
        let bytes = encode_record(session)?;
        self.put_raw(SESSION_KEY, bytes);
        Ok(())
    }

    fn clear_session(&self) -> Result<(), AppResponse> {
        self.records.borrow_mut().remove(SESSION_KEY);
        Ok(())
    }
}
