//! # DreamClean Core
//!
//! Local complaint store and waste classification index behind the DreamClean
//! citizen reporting apps. Citizens file complaints about uncollected waste,
//! an administrator triages them, and a public dashboard shows progress; the
//! apps drive all of it through this crate.
//!
//! ## Features
//!
//! - **LMDB-based storage**: complaints and the signed-in session are kept in a
//!   local LMDB environment, one committed transaction per write
//! - **Versioned records**: every stored record carries a schema version and is
//!   rejected, not guessed at, when it does not match
//! - **Complaint lifecycle**: validation, status changes, worker assignment
//! - **Waste lookup**: a three-stage search over the household waste guide
//! - **FFI-optimized**: JSON in, JSON out, for Flutter and other shells
//!
//! ## Quick Start
//!
//! ```no_run
//! use dreamclean_core::{create_db, submit_complaint, free_response};
//! use std::ffi::CString;
//!
//! let db_name = CString::new("dreamclean").unwrap();
//! let db_state = create_db(db_name.as_ptr());
//!
//! let json = CString::new(r#"{
//!     "title": "Overflowing bin",
//!     "description": "Not emptied for a week",
//!     "locationAddress": "5th Cross, Indiranagar",
//!     "category": "overflow",
//!     "reporterName": "Asha",
//!     "reporterEmail": "asha@example.com"
//! }"#).unwrap();
//! let result = submit_complaint(db_state, json.as_ptr());
//! free_response(result);
//! ```
//!
//! ## FFI Functions
//!
//! Every function except [`create_db`] and [`create_db_with_config`] returns a
//! JSON-encoded [`AppResponse`]; release it with [`free_response`].
//!
//! - [`create_db`], [`create_db_with_config`] - open a store
//! - [`submit_complaint`], [`get_complaints`], [`complaint_stats`] - citizen and public views
//! - [`update_status`], [`assign_worker`], [`delete_complaint`] - administrator only
//! - [`classify_waste`], [`list_waste_items`] - waste guide
//! - [`sign_in`], [`sign_up`], [`sign_out`], [`current_session`] - session
//! - [`clear_all_records`], [`reset_database`], [`close_database`] - maintenance

pub mod app_response;
pub mod config;
pub mod lifecycle;
pub mod local_db_model;
pub mod local_db_state;
pub mod session;
pub mod stats;
pub mod store;
pub mod waste_index;
mod test;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use log::{info, warn};
use serde::{Deserialize, Serialize};

pub use crate::app_response::AppResponse;
use crate::config::StoreConfig;
use crate::lifecycle::ComplaintManager;
use crate::local_db_model::{ComplaintCategory, ComplaintStatus, NewComplaint};
use crate::local_db_state::AppDbState;
use crate::session::{Authenticator, FixedCredentialAuthenticator, SessionManager};
use crate::stats::{filter_by_category, newest_first, ComplaintStats};

/// Opens (or creates) the store `<name>.lmdb` with default settings.
///
/// # Parameters
///
/// * `name` - A null-terminated C string containing the database name
///
/// # Returns
///
/// Returns a pointer to the [`AppDbState`] instance on success, or a null pointer on failure.
/// The caller owns the returned pointer.
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use dreamclean_core::create_db;
///
/// let name = CString::new("ward_12").unwrap();
/// let db_state = create_db(name.as_ptr());
///
/// if !db_state.is_null() {
///     // Store opened
/// }
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_db(name: *const c_char) -> *mut AppDbState {
    if name.is_null() {
        warn!("Null name pointer passed to create_db");
        return std::ptr::null_mut();
    }

    let name_str = match unsafe { CStr::from_ptr(name).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in name parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    open_store(StoreConfig::named(name_str))
}

/// Opens a store from a JSON [`StoreConfig`].
///
/// Missing fields take their defaults:
///
/// ```json
/// {
///   "name": "ward_12",
///   "mapSize": 1073741824,
///   "maxImageBytes": 5242880,
///   "adminEmail": "admin@dreamclean.com",
///   "adminPassword": "admin123"
/// }
/// ```
///
/// Returns a null pointer when the JSON is invalid or the store cannot be opened.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_db_with_config(config_json: *const c_char) -> *mut AppDbState {
    if config_json.is_null() {
        warn!("Null config pointer passed to create_db_with_config");
        return std::ptr::null_mut();
    }

    let json = match unsafe { CStr::from_ptr(config_json).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in config parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    match StoreConfig::from_json(json) {
        Ok(config) => open_store(config),
        Err(e) => {
            warn!("Rejected store config: {e}");
            std::ptr::null_mut()
        }
    }
}

fn open_store(config: StoreConfig) -> *mut AppDbState {
    let lmdb_dir = config.lmdb_dir();
    info!("Attempting to create/open database at: {}", lmdb_dir);

    match AppDbState::with_config(config) {
        Ok(state) => {
            info!("✅ Database initialized successfully");
            Box::into_raw(Box::new(state))
        }
        Err(e) => {
            warn!("❌ Failed to initialize database: {e}");
            warn!("Attempted path: {}", lmdb_dir);
            std::ptr::null_mut()
        }
    }
}

/// Files a new complaint.
///
/// # Parameters
///
/// * `state` - Pointer to the database state instance
/// * `json_ptr` - Null-terminated C string with the submission fields
///
/// # Returns
///
/// `Ok` carrying the stored complaint (with its generated `id`, `status` and
/// `createdAt`), or `ValidationError` naming the missing fields.
///
/// # JSON Format
///
/// ```json
/// {
///   "title": "Overflowing bin",
///   "description": "Not emptied for a week",
///   "locationAddress": "5th Cross, Indiranagar",
///   "category": "overflow",
///   "latitude": 12.9716,
///   "longitude": 77.5946,
///   "imageRef": "data:image/jpeg;base64,...",
///   "reporterName": "Asha",
///   "reporterEmail": "asha@example.com",
///   "reporterPhone": "98450 00000"
/// }
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn submit_complaint(state: *mut AppDbState, json_ptr: *const c_char) -> *const c_char {
    let state = match state_ref(state, "submit_complaint") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(err) => return err,
    };

    let fields: NewComplaint = match serde_json::from_str(&json_str) {
        Ok(f) => f,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    respond(complaints(state).submit(fields))
}

/// Lists complaints, most recent first.
///
/// # Parameters
///
/// * `state` - Pointer to the database state instance
/// * `category` - Optional category filter (`overflow`, `littering`, ...).
///   Null or `"all"` returns every complaint.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_complaints(state: *mut AppDbState, category: *const c_char) -> *const c_char {
    let state = match state_ref(state, "get_complaints") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let filter = if category.is_null() {
        None
    } else {
        match c_ptr_to_string(category, "category") {
            Ok(value) if value == "all" => None,
            Ok(value) => match ComplaintCategory::parse(&value) {
                Some(c) => Some(c),
                None => {
                    let error = AppResponse::BadRequest(format!("Unknown category: {value}"));
                    return response_to_c_string(&error);
                }
            },
            Err(err) => return err,
        }
    };

    respond(
        complaints(state)
            .snapshot()
            .map(|all| newest_first(filter_by_category(all, filter))),
    )
}

/// Counts per status plus completion and in-progress percentages.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn complaint_stats(state: *mut AppDbState) -> *const c_char {
    let state = match state_ref(state, "complaint_stats") {
        Ok(s) => s,
        Err(err) => return err,
    };

    respond(
        complaints(state)
            .snapshot()
            .map(|all| ComplaintStats::from_complaints(&all)),
    )
}

/// Changes a complaint's status. Requires an administrator session.
///
/// # Parameters
///
/// * `state` - Pointer to the database state instance
/// * `id` - Complaint id
/// * `status` - `pending`, `in_progress` or `resolved`
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn update_status(
    state: *mut AppDbState,
    id: *const c_char,
    status: *const c_char,
) -> *const c_char {
    let state = match state_ref(state, "update_status") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let id_str = match c_ptr_to_string(id, "id") {
        Ok(id) => id,
        Err(err) => return err,
    };

    let status_str = match c_ptr_to_string(status, "status") {
        Ok(status) => status,
        Err(err) => return err,
    };

    let Some(new_status) = ComplaintStatus::parse(&status_str) else {
        let error = AppResponse::BadRequest(format!("Unknown status: {status_str}"));
        return response_to_c_string(&error);
    };

    let result = sessions(state)
        .require_admin()
        .and_then(|_| complaints(state).update_status(&id_str, new_status))
        .map(|_| format!("Complaint {id_str} is now {}", new_status.as_str()));
    respond_message(result)
}

#[derive(Debug, Deserialize)]
struct WorkerAssignment {
    id: String,
    name: String,
    contact: String,
    #[serde(default)]
    department: Option<String>,
}

/// Assigns a field worker. Requires an administrator session.
///
/// # JSON Format
///
/// ```json
/// { "id": "complaint id", "name": "Ravi", "contact": "98450 00000", "department": "Ward 80" }
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn assign_worker(state: *mut AppDbState, json_ptr: *const c_char) -> *const c_char {
    let state = match state_ref(state, "assign_worker") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(err) => return err,
    };

    let assignment: WorkerAssignment = match serde_json::from_str(&json_str) {
        Ok(a) => a,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    let result = sessions(state)
        .require_admin()
        .and_then(|_| {
            complaints(state).assign_worker(
                &assignment.id,
                &assignment.name,
                &assignment.contact,
                assignment.department.as_deref(),
            )
        })
        .map(|_| format!("Worker assigned to complaint {}", assignment.id));
    respond_message(result)
}

/// Deletes a complaint. Requires an administrator session; unknown ids are
/// not an error.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn delete_complaint(state: *mut AppDbState, id: *const c_char) -> *const c_char {
    let state = match state_ref(state, "delete_complaint") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let id_str = match c_ptr_to_string(id, "id") {
        Ok(id) => id,
        Err(err) => return err,
    };

    let result = sessions(state)
        .require_admin()
        .and_then(|_| complaints(state).remove(&id_str))
        .map(|_| format!("Complaint {id_str} deleted"));
    respond_message(result)
}

/// Looks a free-text query up in the waste guide.
///
/// `Ok` carries the matching item, or `null` when nothing matches.
///
/// ```no_run
/// use std::ffi::CString;
/// use dreamclean_core::{classify_waste, free_response};
///
/// let query = CString::new("plastic bottle").unwrap();
/// let result = classify_waste(query.as_ptr());
/// free_response(result);
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn classify_waste(query: *const c_char) -> *const c_char {
    let query_str = match c_ptr_to_string(query, "query") {
        Ok(q) => q,
        Err(err) => return err,
    };

    respond(Ok(waste_index::classify(&query_str)))
}

/// The whole waste guide in display order.
#[no_mangle]
pub extern "C" fn list_waste_items() -> *const c_char {
    respond(Ok(waste_index::waste_items()))
}

/// Signs in and stores the session. `Unauthorized` when refused.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn sign_in(
    state: *mut AppDbState,
    email: *const c_char,
    password: *const c_char,
) -> *const c_char {
    let state = match state_ref(state, "sign_in") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let email_str = match c_ptr_to_string(email, "email") {
        Ok(e) => e,
        Err(err) => return err,
    };

    let password_str = match c_ptr_to_string(password, "password") {
        Ok(p) => p,
        Err(err) => return err,
    };

    respond(sessions(state).sign_in(&email_str, &password_str))
}

/// Registers a citizen account and stores the session.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn sign_up(
    state: *mut AppDbState,
    email: *const c_char,
    password: *const c_char,
    full_name: *const c_char,
) -> *const c_char {
    let state = match state_ref(state, "sign_up") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let email_str = match c_ptr_to_string(email, "email") {
        Ok(e) => e,
        Err(err) => return err,
    };

    let password_str = match c_ptr_to_string(password, "password") {
        Ok(p) => p,
        Err(err) => return err,
    };

    let name_str = match c_ptr_to_string(full_name, "full name") {
        Ok(n) => n,
        Err(err) => return err,
    };

    respond(sessions(state).sign_up(&email_str, &password_str, &name_str))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn sign_out(state: *mut AppDbState) -> *const c_char {
    let state = match state_ref(state, "sign_out") {
        Ok(s) => s,
        Err(err) => return err,
    };

    respond_message(sessions(state).sign_out().map(|_| "Signed out".to_string()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionView {
    email: String,
    id: String,
    is_admin: bool,
}

/// The stored session with its privilege flag, or `null` when signed out.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn current_session(state: *mut AppDbState) -> *const c_char {
    let state = match state_ref(state, "current_session") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let authenticator = state.config().authenticator();
    let result = sessions(state).current().map(|current| {
        current.map(|session| SessionView {
            is_admin: authenticator.is_privileged(&session),
            email: session.email,
            id: session.id,
        })
    });
    respond(result)
}

/// Drops every complaint and the session; `Ok` carries the number of
/// complaints discarded.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn clear_all_records(db_state: *mut AppDbState) -> *const c_char {
    let db_state = match state_ref(db_state, "clear_all_records") {
        Ok(s) => s,
        Err(err) => return err,
    };

    respond(db_state.clear_all_records())
}

/// Deletes the store's directory and reopens an empty store named `name_ptr`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn reset_database(db_state: *mut AppDbState, name_ptr: *const c_char) -> *const c_char {
    let db_state = match unsafe { db_state.as_mut() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to reset_database".to_string());
            return response_to_c_string(&error);
        }
    };

    let name = match c_ptr_to_string(name_ptr, "name") {
        Ok(name) => name,
        Err(err) => return err,
    };

    respond_message(
        db_state
            .reset_database(&name)
            .map(|_| format!("Database '{name}' was reset successfully")),
    )
}

/// Flushes and closes the environment. The pointer stays valid (and must
/// still be freed by the owner) but every further call reports a closed
/// database.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_database(db_state: *mut AppDbState) -> *const c_char {
    let db_state = match unsafe { db_state.as_mut() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest("Null state pointer passed to close_database".to_string());
            return response_to_c_string(&error);
        }
    };

    respond_message(
        db_state
            .close_database()
            .map(|_| "Database connection closed successfully".to_string()),
    )
}

/// Releases a string returned by any function in this crate.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(ptr as *mut c_char) });
}

fn complaints(state: &AppDbState) -> ComplaintManager<&AppDbState> {
    ComplaintManager::new(state).with_max_image_bytes(state.config().max_image_bytes)
}

fn sessions(state: &AppDbState) -> SessionManager<&AppDbState, FixedCredentialAuthenticator> {
    SessionManager::new(state, state.config().authenticator())
}

fn state_ref<'a>(state: *mut AppDbState, fn_name: &str) -> Result<&'a AppDbState, *const c_char> {
    match unsafe { state.as_ref() } {
        Some(s) => Ok(s),
        None => {
            let error = AppResponse::BadRequest(format!("Null state pointer passed to {fn_name}"));
            Err(response_to_c_string(&error))
        }
    }
}

/// Wraps a serializable result as `Ok(<json>)` or the error itself.
fn respond<T: Serialize>(result: Result<T, AppResponse>) -> *const c_char {
    let response = match result {
        Ok(value) => match serde_json::to_string(&value) {
            Ok(json) => AppResponse::Ok(json),
            Err(e) => AppResponse::SerializationError(format!("Failed to serialize result: {e}")),
        },
        Err(e) => e,
    };
    response_to_c_string(&response)
}

fn respond_message(result: Result<String, AppResponse>) -> *const c_char {
    let response = result.map(AppResponse::Ok).unwrap_or_else(|e| e);
    response_to_c_string(&response)
}

/// Converts an [`AppResponse`] to a C-compatible string.
///
/// Returns a null pointer if serialization or C string creation fails.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// Converts a C string pointer to a Rust String.
///
/// * `Ok(String)` - If conversion was successful
/// * `Err(*const c_char)` - `BadRequest` response ready to hand back to the caller
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}
