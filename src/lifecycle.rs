//! Complaint lifecycle: submission, status changes, worker assignment and
//! removal.
//!
//! Every mutation reloads the full collection from the store, applies one
//! change and writes the full collection back. Validation always happens
//! before the write, so a rejected call leaves the store untouched.

use chrono::Utc;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::app_response::AppResponse;
use crate::config::DEFAULT_MAX_IMAGE_BYTES;
use crate::local_db_model::{AssignedWorker, Complaint, ComplaintStatus, NewComplaint, Reporter};
use crate::store::ComplaintStore;

pub struct ComplaintManager<S> {
    store: S,
    max_image_bytes: usize,
}

impl<S: ComplaintStore> ComplaintManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current collection in storage order. Unreadable stored data is logged
    /// and treated as an empty collection.
    pub fn snapshot(&self) -> Result<Vec<Complaint>, AppResponse> {
        match self.store.load_complaints() {
            Ok(complaints) => Ok(complaints),
            Err(AppResponse::CorruptState(reason)) => {
                warn!("Ignoring unreadable complaint collection: {reason}");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<Complaint>, AppResponse> {
        Ok(self.snapshot()?.into_iter().find(|c| c.id == id))
    }

    /// Files a new complaint in the `pending` state and returns it.
    pub fn submit(&self, fields: NewComplaint) -> Result<Complaint, AppResponse> {
        let missing = fields.missing_fields();
        if !missing.is_empty() {
            return Err(AppResponse::ValidationError(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
        if let Some(image) = &fields.image_ref {
            image.validate(self.max_image_bytes)?;
        }

        let mut complaints = self.snapshot()?;
        let complaint = Complaint {
            id: unique_id(&complaints),
            title: fields.title,
            description: fields.description,
            location_address: fields.location_address,
            category: fields.category,
            latitude: fields.latitude,
            longitude: fields.longitude,
            image_ref: fields.image_ref,
            status: ComplaintStatus::Pending,
            created_at: Utc::now(),
            reporter: Reporter {
                name: fields.reporter_name,
                email: fields.reporter_email,
                phone: fields.reporter_phone.filter(|p| !p.trim().is_empty()),
            },
            assigned_worker: None,
        };

        complaints.insert(0, complaint.clone());
        self.store.save_complaints(&complaints)?;

        info!("Complaint {} submitted ({})", complaint.id, complaint.category.as_str());
        Ok(complaint)
    }

    /// Overwrites the status. Any transition is allowed, including re-opening
    /// a resolved complaint.
    pub fn update_status(&self, id: &str, status: ComplaintStatus) -> Result<(), AppResponse> {
        self.modify(id, |complaint| complaint.status = status)?;
        info!("Complaint {id} moved to {}", status.as_str());
        Ok(())
    }

    pub fn assign_worker(
        &self,
        id: &str,
        name: &str,
        contact: &str,
        department: Option<&str>,
    ) -> Result<(), AppResponse> {
        if name.trim().is_empty() || contact.trim().is_empty() {
            return Err(AppResponse::ValidationError(
                "Worker name and contact are required".to_string(),
            ));
        }

        let worker = AssignedWorker {
            name: name.to_string(),
            contact: contact.to_string(),
            department: department
                .filter(|d| !d.trim().is_empty())
                .map(str::to_string),
        };
        self.modify(id, move |complaint| complaint.assigned_worker = Some(worker))?;
        info!("Worker {name} assigned to complaint {id}");
        Ok(())
    }

    /// Deletes a complaint. Unknown ids are ignored.
    pub fn remove(&self, id: &str) -> Result<(), AppResponse> {
        let mut complaints = self.snapshot()?;
        let before = complaints.len();
        complaints.retain(|c| c.id != id);

        if complaints.len() == before {
            debug!("Remove ignored, no complaint with id {id}");
            return Ok(());
        }

        self.store.save_complaints(&complaints)?;
        info!("Complaint {id} removed");
        Ok(())
    }

    fn modify(&self, id: &str, change: impl FnOnce(&mut Complaint)) -> Result<(), AppResponse> {
        let mut complaints = self.snapshot()?;
        let complaint = complaints
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppResponse::NotFound(format!("No complaint found with id: {id}")))?;

        change(complaint);
        self.store.save_complaints(&complaints)
    }
}

fn unique_id(existing: &[Complaint]) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if existing.iter().all(|c| c.id != id) {
            return id;
        }
    }
}
