//! # End-to-end test suite for DreamClean Core
//!
//! Unit tests live next to each module; this suite drives the crate the way
//! the apps do, against real LMDB environments.
//!
//! ## Test Categories
//!
//! ### 1. Lifecycle against LMDB
//! - Submission, status changes (including re-opening), assignment, removal
//! - Snapshot isolation between independently loaded views
//!
//! ### 2. Persistence contract
//! - Idempotent write-back of an unmodified read
//! - Lost update when two writers work from the same snapshot
//! - Corrupt and foreign-version records treated as empty
//!
//! ### 3. FFI Function Tests
//! - JSON envelopes for every exported function
//! - Administrator gating, null pointers, invalid JSON
//!
//! ## Running the Tests
//!
//! ```bash
//! cargo test
//! cargo test test_ffi_     # FFI tests only
//! ```

#[cfg(test)]
pub mod tests {
    use std::ffi::{CStr, CString};
    use std::os::raw::c_char;

    use log::info;
    use tempfile::TempDir;

    use crate::app_response::AppResponse;
    use crate::config::DEFAULT_MAX_IMAGE_BYTES;
    use crate::lifecycle::ComplaintManager;
    use crate::local_db_model::{
        encode_record, Complaint, ComplaintCategory, ComplaintStatus, ImageRef, NewComplaint,
    };
    use crate::local_db_state::AppDbState;
    use crate::session::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};
    use crate::stats::{completion_percentage, ComplaintStats};
    use crate::store::{ComplaintStore, COMPLAINTS_KEY};
    use crate::waste_index::classify;

    fn open_db(dir: &TempDir, name: &str) -> AppDbState {
        let path = dir.path().join(name);
        AppDbState::init(path.to_string_lossy().to_string()).expect("open test database")
    }

    fn new_complaint(title: &str, category: ComplaintCategory) -> NewComplaint {
        NewComplaint {
            title: title.to_string(),
            description: format!("{title} near the market"),
            location_address: "Gandhi Bazaar Main Road".to_string(),
            category,
            reporter_name: "Kiran".to_string(),
            reporter_email: "kiran@example.com".to_string(),
            reporter_phone: Some("90000 12345".to_string()),
            ..NewComplaint::default()
        }
    }

    // ===============================
    // LIFECYCLE AGAINST LMDB
    // ===============================

    #[test]
    fn test_submitted_ids_are_unique_and_pending() {
        let dir = TempDir::new().unwrap();
        let db = open_db(&dir, "unique_ids");
        let manager = ComplaintManager::new(&db);

        let mut ids = Vec::new();
        for i in 0..25 {
            let complaint = manager
                .submit(new_complaint(&format!("bin {i}"), ComplaintCategory::Overflow))
                .unwrap();
            assert_eq!(complaint.status, ComplaintStatus::Pending);
            assert!(!ids.contains(&complaint.id));
            ids.push(complaint.id);
        }

        assert_eq!(db.load_complaints().unwrap().len(), 25);
    }

    #[test]
    fn test_status_round_trip_through_store() {
        let dir = TempDir::new().unwrap();
        let db = open_db(&dir, "status");
        let manager = ComplaintManager::new(&db);
        let id = manager
            .submit(new_complaint("dumping", ComplaintCategory::IllegalDumping))
            .unwrap()
            .id;

        for status in [
            ComplaintStatus::InProgress,
            ComplaintStatus::Resolved,
            ComplaintStatus::Pending,
        ] {
            manager.update_status(&id, status).unwrap();
            let stored = db.load_complaints().unwrap();
            assert_eq!(stored[0].status, status);
        }
    }

    #[test]
    fn test_remove_absent_id_leaves_collection_unchanged() {
        let dir = TempDir::new().unwrap();
        let db = open_db(&dir, "remove_absent");
        let manager = ComplaintManager::new(&db);
        manager.submit(new_complaint("a", ComplaintCategory::Littering)).unwrap();
        manager.submit(new_complaint("b", ComplaintCategory::Littering)).unwrap();

        let before = db.raw(COMPLAINTS_KEY).unwrap();
        manager.remove("does-not-exist").unwrap();
        assert_eq!(db.raw(COMPLAINTS_KEY).unwrap(), before);
        assert_eq!(db.load_complaints().unwrap().len(), 2);
    }

    #[test]
    fn test_snapshots_go_stale_until_reloaded() {
        let dir = TempDir::new().unwrap();
        let db = open_db(&dir, "stale");
        let citizen = ComplaintManager::new(&db);
        let admin = ComplaintManager::new(&db);

        let public_view = admin.snapshot().unwrap();
        citizen.submit(new_complaint("new", ComplaintCategory::BrokenBin)).unwrap();

        assert!(public_view.is_empty());
        assert_eq!(admin.snapshot().unwrap().len(), 1);
    }

    #[test]
    fn test_dashboard_stats_follow_admin_actions() {
        let dir = TempDir::new().unwrap();
        let db = open_db(&dir, "stats");
        let manager = ComplaintManager::new(&db);

        let ids: Vec<String> = (0..4)
            .map(|i| {
                manager
                    .submit(new_complaint(&format!("c{i}"), ComplaintCategory::WasteCollection))
                    .unwrap()
                    .id
            })
            .collect();
        assert_eq!(completion_percentage(&manager.snapshot().unwrap()), 0);

        manager.update_status(&ids[0], ComplaintStatus::Resolved).unwrap();
        manager.update_status(&ids[1], ComplaintStatus::Resolved).unwrap();
        manager.update_status(&ids[2], ComplaintStatus::InProgress).unwrap();

        let stats = ComplaintStats::from_complaints(&manager.snapshot().unwrap());
        assert_eq!(stats.counts.total, 4);
        assert_eq!(stats.counts.resolved, 2);
        assert_eq!(stats.completion_percentage, 50);
        assert_eq!(stats.in_progress_percentage, 25);
    }

    // ===============================
    // PERSISTENCE CONTRACT
    // ===============================

    #[test]
    fn test_write_back_of_unmodified_read_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let db = open_db(&dir, "idempotent");
        let manager = ComplaintManager::new(&db);
        let id = manager.submit(new_complaint("x", ComplaintCategory::Other)).unwrap().id;
        manager
            .assign_worker(&id, "Ravi", "98450 00000", Some("Solid Waste Dept"))
            .unwrap();
        manager.submit(new_complaint("y", ComplaintCategory::Overflow)).unwrap();

        // Full-precision coordinates, not just the six digits the address shows.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for i in 0..200 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let lat = (seed % 180_000_000) as f64 / 1_000_000.0 - 90.0 + 1.0 / 3.0e7;
            let lng = ((seed >> 20) % 360_000_000) as f64 / 1_000_000.0 - 180.0 + 1.0 / 7.0e7;
            let located = new_complaint(&format!("gps {i}"), ComplaintCategory::Littering)
                .with_gps_location(lat, lng);
            manager.submit(located).unwrap();
        }

        let before = db.raw(COMPLAINTS_KEY).unwrap().unwrap();
        let loaded = db.load_complaints().unwrap();
        db.save_complaints(&loaded).unwrap();
        let after = db.raw(COMPLAINTS_KEY).unwrap().unwrap();

        assert_eq!(before, after);

        let reloaded = db.load_complaints().unwrap();
        assert_eq!(reloaded, loaded);
    }

    #[test]
    fn test_maximum_size_images_stay_manageable() {
        let dir = TempDir::new().unwrap();
        let db = open_db(&dir, "max_image");
        let manager = ComplaintManager::new(&db);
        let photo = vec![7u8; DEFAULT_MAX_IMAGE_BYTES];

        let mut ids = Vec::new();
        for i in 0..3 {
            let mut fields = new_complaint(&format!("photo {i}"), ComplaintCategory::IllegalDumping);
            fields.image_ref =
                Some(ImageRef::from_bytes("image/jpeg", &photo, DEFAULT_MAX_IMAGE_BYTES).unwrap());
            ids.push(manager.submit(fields).unwrap().id);

            for id in &ids {
                manager.update_status(id, ComplaintStatus::InProgress).unwrap();
            }
        }

        manager
            .assign_worker(&ids[0], "Ravi", "98450 00000", None)
            .unwrap();
        manager.update_status(&ids[0], ComplaintStatus::Resolved).unwrap();

        let stored = manager.get(&ids[0]).unwrap().unwrap();
        assert_eq!(stored.status, ComplaintStatus::Resolved);
        let (mime, bytes) = stored.image_ref.unwrap().decode().unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes.len(), DEFAULT_MAX_IMAGE_BYTES);
    }

    #[test]
    fn test_concurrent_writers_lose_the_earlier_update() {
        let dir = TempDir::new().unwrap();
        let db = open_db(&dir, "lost_update");
        let manager = ComplaintManager::new(&db);
        for i in 0..3 {
            manager
                .submit(new_complaint(&format!("seed {i}"), ComplaintCategory::Littering))
                .unwrap();
        }

        // Both writers read the same N = 3 snapshot.
        let mut writer_a = db.load_complaints().unwrap();
        let mut writer_b = db.load_complaints().unwrap();
        let n = writer_a.len();

        let from_b = Complaint {
            id: "from-b".to_string(),
            ..writer_b[0].clone()
        };
        writer_b.insert(0, from_b);
        db.save_complaints(&writer_b).unwrap();

        let from_a = Complaint {
            id: "from-a".to_string(),
            ..writer_a[0].clone()
        };
        writer_a.insert(0, from_a);
        db.save_complaints(&writer_a).unwrap();

        let stored = db.load_complaints().unwrap();
        assert_eq!(stored.len(), n + 1);
        assert!(stored.iter().any(|c| c.id == "from-a"));
        assert!(!stored.iter().any(|c| c.id == "from-b"));
    }

    #[test]
    fn test_corrupt_collection_is_recovered_as_empty() {
        let dir = TempDir::new().unwrap();
        let db = open_db(&dir, "corrupt");
        db.put_raw(COMPLAINTS_KEY, b"[{\"id\": 1,").unwrap();

        assert!(matches!(db.load_complaints(), Err(AppResponse::CorruptState(_))));

        let manager = ComplaintManager::new(&db);
        assert!(manager.snapshot().unwrap().is_empty());
        assert!(manager.update_status("1", ComplaintStatus::Resolved).is_err());
    }

    #[test]
    fn test_future_schema_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let db = open_db(&dir, "future_schema");
        let valid = encode_record(&Vec::<Complaint>::new()).unwrap();
        let text = String::from_utf8(valid).unwrap().replace("\"schemaVersion\":1", "\"schemaVersion\":2");
        db.put_raw(COMPLAINTS_KEY, text.as_bytes()).unwrap();

        match db.load_complaints() {
            Err(AppResponse::CorruptState(msg)) => assert!(msg.contains("schema version 2")),
            other => panic!("expected corrupt state, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_examples() {
        assert_eq!(classify("plastic bottle").unwrap().name, "Plastic Bottles (PET)");
        assert_eq!(classify("wet waste").unwrap().category, "Biodegradable Wet Waste");
        assert_eq!(classify("chips").unwrap().name, "Plastic Bags, Wrappers, Chips Packets");
        assert!(classify("xyzzy").is_none());
    }

    // ===============================
    // FFI FUNCTION TESTS
    // ===============================

    fn c(value: &str) -> CString {
        CString::new(value).unwrap()
    }

    fn take_response(ptr: *const c_char) -> AppResponse {
        assert!(!ptr.is_null(), "Result should not be null");
        let json = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        crate::free_response(ptr);
        serde_json::from_str(&json).unwrap()
    }

    fn ok_payload(response: AppResponse) -> serde_json::Value {
        match response {
            AppResponse::Ok(json) => serde_json::from_str(&json).unwrap(),
            other => panic!("expected Ok response, got {other:?}"),
        }
    }

    fn ffi_db(dir: &TempDir, name: &str) -> *mut AppDbState {
        let path = c(&dir.path().join(name).to_string_lossy());
        let db = crate::create_db(path.as_ptr());
        assert!(!db.is_null());
        db
    }

    fn ffi_submit(db: *mut AppDbState, title: &str, category: &str) -> String {
        let json = serde_json::json!({
            "title": title,
            "description": "Garbage piling up",
            "locationAddress": "Location: 12.971600, 77.594600",
            "latitude": 12.9716,
            "longitude": 77.5946,
            "category": category,
            "reporterName": "Asha",
            "reporterEmail": "asha@example.com"
        });
        let payload = ok_payload(take_response(crate::submit_complaint(db, c(&json.to_string()).as_ptr())));
        payload["id"].as_str().unwrap().to_string()
    }

    fn ffi_sign_in_admin(db: *mut AppDbState) {
        let response = take_response(crate::sign_in(
            db,
            c(DEFAULT_ADMIN_EMAIL).as_ptr(),
            c(DEFAULT_ADMIN_PASSWORD).as_ptr(),
        ));
        assert!(response.is_ok());
    }

    fn ffi_drop(db: *mut AppDbState) {
        unsafe {
            let _db = Box::from_raw(db);
        }
    }

    #[test]
    fn test_ffi_create_db_null_pointer() {
        assert!(crate::create_db(std::ptr::null()).is_null());
        assert!(crate::create_db_with_config(std::ptr::null()).is_null());
    }

    #[test]
    fn test_ffi_create_db_with_config() {
        let dir = TempDir::new().unwrap();
        let name = dir.path().join("configured").to_string_lossy().to_string();
        let config = serde_json::json!({ "name": name, "maxImageBytes": 3 }).to_string();
        let db = crate::create_db_with_config(c(&config).as_ptr());
        assert!(!db.is_null());
        assert_eq!(unsafe { &*db }.config().max_image_bytes, 3);
        ffi_drop(db);

        assert!(crate::create_db_with_config(c("{\"name\":\"\"}").as_ptr()).is_null());
    }

    #[test]
    fn test_ffi_submit_and_list_newest_first() {
        let dir = TempDir::new().unwrap();
        let db = ffi_db(&dir, "ffi_list");

        let first = ffi_submit(db, "first", "overflow");
        let second = ffi_submit(db, "second", "littering");

        let all = ok_payload(take_response(crate::get_complaints(db, std::ptr::null())));
        let ids: Vec<&str> = all.as_array().unwrap().iter().map(|c| c["id"].as_str().unwrap()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&first.as_str()) && ids.contains(&second.as_str()));
        assert_eq!(all[0]["status"], "pending");
        assert_eq!(all[0]["latitude"], 12.9716);

        let overflow = ok_payload(take_response(crate::get_complaints(db, c("overflow").as_ptr())));
        assert_eq!(overflow.as_array().unwrap().len(), 1);
        assert_eq!(overflow[0]["id"], first.as_str());

        let everything = ok_payload(take_response(crate::get_complaints(db, c("all").as_ptr())));
        assert_eq!(everything.as_array().unwrap().len(), 2);

        let bad = take_response(crate::get_complaints(db, c("recycling").as_ptr()));
        assert!(matches!(bad, AppResponse::BadRequest(_)));

        ffi_drop(db);
    }

    #[test]
    fn test_ffi_submit_validation_and_bad_json() {
        let dir = TempDir::new().unwrap();
        let db = ffi_db(&dir, "ffi_validation");

        let missing = take_response(crate::submit_complaint(db, c(r#"{"title":"only title"}"#).as_ptr()));
        assert!(matches!(missing, AppResponse::ValidationError(ref m) if m.contains("description")));

        let bad_json = take_response(crate::submit_complaint(db, c("{not json").as_ptr()));
        assert!(matches!(bad_json, AppResponse::SerializationError(_)));

        let null_state = take_response(crate::submit_complaint(std::ptr::null_mut(), c("{}").as_ptr()));
        assert!(matches!(null_state, AppResponse::BadRequest(_)));

        ffi_drop(db);
    }

    #[test]
    fn test_ffi_admin_operations_require_admin_session() {
        let dir = TempDir::new().unwrap();
        let db = ffi_db(&dir, "ffi_admin_gate");
        let id = ffi_submit(db, "gate", "broken_bin");

        let citizen = take_response(crate::sign_in(db, c("asha@example.com").as_ptr(), c("pw").as_ptr()));
        assert!(citizen.is_ok());

        let denied = take_response(crate::update_status(db, c(&id).as_ptr(), c("resolved").as_ptr()));
        assert!(matches!(denied, AppResponse::Unauthorized(_)));
        let denied = take_response(crate::delete_complaint(db, c(&id).as_ptr()));
        assert!(matches!(denied, AppResponse::Unauthorized(_)));

        let wrong_password = take_response(crate::sign_in(
            db,
            c(DEFAULT_ADMIN_EMAIL).as_ptr(),
            c("wrong").as_ptr(),
        ));
        assert!(matches!(wrong_password, AppResponse::Unauthorized(_)));

        ffi_drop(db);
    }

    #[test]
    fn test_ffi_admin_workflow() {
        let dir = TempDir::new().unwrap();
        let db = ffi_db(&dir, "ffi_admin_flow");
        let id = ffi_submit(db, "workflow", "overflow");
        let other = ffi_submit(db, "other", "overflow");
        ffi_sign_in_admin(db);

        let session = ok_payload(take_response(crate::current_session(db)));
        assert_eq!(session["isAdmin"], true);

        let unknown_status = take_response(crate::update_status(db, c(&id).as_ptr(), c("closed").as_ptr()));
        assert!(matches!(unknown_status, AppResponse::BadRequest(_)));

        let missing = take_response(crate::update_status(db, c("nope").as_ptr(), c("resolved").as_ptr()));
        assert!(matches!(missing, AppResponse::NotFound(_)));

        assert!(take_response(crate::update_status(db, c(&id).as_ptr(), c("resolved").as_ptr())).is_ok());

        let assignment = serde_json::json!({
            "id": id,
            "name": "Ravi",
            "contact": "98450 00000",
            "department": "Ward 80"
        });
        assert!(take_response(crate::assign_worker(db, c(&assignment.to_string()).as_ptr())).is_ok());

        let incomplete = serde_json::json!({ "id": id, "name": "Ravi", "contact": "" });
        let rejected = take_response(crate::assign_worker(db, c(&incomplete.to_string()).as_ptr()));
        assert!(matches!(rejected, AppResponse::ValidationError(_)));

        let stats = ok_payload(take_response(crate::complaint_stats(db)));
        assert_eq!(stats["total"], 2);
        assert_eq!(stats["resolved"], 1);
        assert_eq!(stats["completionPercentage"], 50);

        let all = ok_payload(take_response(crate::get_complaints(db, std::ptr::null())));
        let resolved = all
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["id"] == id.as_str())
            .unwrap();
        assert_eq!(resolved["status"], "resolved");
        assert_eq!(resolved["assignedWorker"]["department"], "Ward 80");

        assert!(take_response(crate::delete_complaint(db, c(&other).as_ptr())).is_ok());
        assert!(take_response(crate::delete_complaint(db, c("never-existed").as_ptr())).is_ok());
        let remaining = ok_payload(take_response(crate::get_complaints(db, std::ptr::null())));
        assert_eq!(remaining.as_array().unwrap().len(), 1);

        assert!(take_response(crate::sign_out(db)).is_ok());
        let session = ok_payload(take_response(crate::current_session(db)));
        assert!(session.is_null());

        ffi_drop(db);
    }

    #[test]
    fn test_ffi_sign_up_is_never_admin() {
        let dir = TempDir::new().unwrap();
        let db = ffi_db(&dir, "ffi_sign_up");

        let session = ok_payload(take_response(crate::sign_up(
            db,
            c("new@example.com").as_ptr(),
            c("pw").as_ptr(),
            c("New Citizen").as_ptr(),
        )));
        assert_eq!(session["email"], "new@example.com");

        let current = ok_payload(take_response(crate::current_session(db)));
        assert_eq!(current["isAdmin"], false);

        ffi_drop(db);
    }

    #[test]
    fn test_ffi_classify_waste() {
        let item = ok_payload(take_response(crate::classify_waste(c("Battery").as_ptr())));
        assert_eq!(item["name"], "Used Batteries");
        assert_eq!(item["disposalInstructions"].as_array().unwrap().len(), 5);

        let none = ok_payload(take_response(crate::classify_waste(c("xyzzy").as_ptr())));
        assert!(none.is_null());

        let null_query = take_response(crate::classify_waste(std::ptr::null()));
        assert!(matches!(null_query, AppResponse::BadRequest(_)));

        let items = ok_payload(take_response(crate::list_waste_items()));
        assert_eq!(items.as_array().unwrap().len(), 20);
    }

    #[test]
    fn test_ffi_clear_reset_and_close() {
        let dir = TempDir::new().unwrap();
        let db = ffi_db(&dir, "ffi_maintenance");
        ffi_submit(db, "one", "other");
        ffi_submit(db, "two", "other");

        let cleared = ok_payload(take_response(crate::clear_all_records(db)));
        assert_eq!(cleared, 2);

        ffi_submit(db, "three", "other");
        let blank = take_response(crate::reset_database(db, c("  ").as_ptr()));
        match blank {
            AppResponse::ValidationError(msg) => assert!(!msg.contains("Database error")),
            other => panic!("expected validation error, got {other:?}"),
        }
        let kept = ok_payload(take_response(crate::get_complaints(db, std::ptr::null())));
        assert_eq!(kept.as_array().unwrap().len(), 1);

        let new_name = dir.path().join("ffi_maintenance_reset").to_string_lossy().to_string();
        assert!(take_response(crate::reset_database(db, c(&new_name).as_ptr())).is_ok());
        let all = ok_payload(take_response(crate::get_complaints(db, std::ptr::null())));
        assert!(all.as_array().unwrap().is_empty());

        assert!(take_response(crate::close_database(db)).is_ok());
        let closed = take_response(crate::get_complaints(db, std::ptr::null()));
        assert!(matches!(closed, AppResponse::DatabaseError(_)));
        info!("Store closed, later calls report {closed}");

        ffi_drop(db);
    }
}
