//! Data model definitions for database storage.
//!
//! This module defines the records the core persists: the [`Complaint`]
//! collection and the active [`Session`]. Both are written inside a
//! [`Versioned`] envelope so a reader can tell a record it understands from
//! one written by an incompatible build, instead of parsing it on a best-effort
//! basis.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;

/// Version written into every stored envelope.
pub const SCHEMA_VERSION: u32 = 1;

/// Identity id that marks the privileged (administrator) session.
pub const ADMIN_SESSION_ID: &str = "admin";

/// Kind of issue a citizen reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintCategory {
    #[default]
    WasteCollection,
    IllegalDumping,
    Overflow,
    BrokenBin,
    Littering,
    Other,
}

impl ComplaintCategory {
    pub const ALL: [ComplaintCategory; 6] = [
        ComplaintCategory::WasteCollection,
        ComplaintCategory::IllegalDumping,
        ComplaintCategory::Overflow,
        ComplaintCategory::BrokenBin,
        ComplaintCategory::Littering,
        ComplaintCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintCategory::WasteCollection => "waste_collection",
            ComplaintCategory::IllegalDumping => "illegal_dumping",
            ComplaintCategory::Overflow => "overflow",
            ComplaintCategory::BrokenBin => "broken_bin",
            ComplaintCategory::Littering => "littering",
            ComplaintCategory::Other => "other",
        }
    }

    /// Human readable label used by the reporting form.
    pub fn label(&self) -> &'static str {
        match self {
            ComplaintCategory::WasteCollection => "Waste Collection",
            ComplaintCategory::IllegalDumping => "Illegal Dumping",
            ComplaintCategory::Overflow => "Bin Overflow",
            ComplaintCategory::BrokenBin => "Broken Bin",
            ComplaintCategory::Littering => "Littering",
            ComplaintCategory::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

/// Progress of a complaint. Any value may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Resolved => "resolved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ComplaintStatus::Pending),
            "in_progress" => Some(ComplaintStatus::InProgress),
            "resolved" => Some(ComplaintStatus::Resolved),
            _ => None,
        }
    }
}

/// Citizen who filed the complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reporter {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Field worker an administrator put in charge of a complaint.
///
/// `name` and `contact` are always non-empty; an empty department is stored
/// as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedWorker {
    pub name: String,
    pub contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Inline reference to an uploaded photo, kept as a `data:` URL.
///
/// The core never looks inside the image; it only checks that the payload is
/// an image and fits the configured size limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Encodes raw image bytes into a data URL.
    pub fn from_bytes(mime: &str, bytes: &[u8], max_bytes: usize) -> Result<Self, AppResponse> {
        check_image(mime, bytes.len(), max_bytes)?;
        Ok(Self(format!("data:{mime};base64,{}", STANDARD.encode(bytes))))
    }

    /// Accepts a data URL produced by a shell (e.g. a browser file reader).
    pub fn from_data_url(url: impl Into<String>, max_bytes: usize) -> Result<Self, AppResponse> {
        let image = Self(url.into());
        image.validate(max_bytes)?;
        Ok(image)
    }

    /// Checks that the reference decodes to an image within `max_bytes`.
    pub fn validate(&self, max_bytes: usize) -> Result<(), AppResponse> {
        let (mime, bytes) = self.decode()?;
        check_image(&mime, bytes.len(), max_bytes)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the data URL back into MIME type and raw bytes.
    pub fn decode(&self) -> Result<(String, Vec<u8>), AppResponse> {
        let rest = self
            .0
            .strip_prefix("data:")
            .ok_or_else(|| AppResponse::ValidationError("Image reference is not a data URL".to_string()))?;
        let (mime, encoded) = rest
            .split_once(";base64,")
            .ok_or_else(|| AppResponse::ValidationError("Image data URL must be base64 encoded".to_string()))?;
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| AppResponse::ValidationError(format!("Invalid base64 image data: {e}")))?;
        Ok((mime.to_string(), bytes))
    }
}

fn check_image(mime: &str, len: usize, max_bytes: usize) -> Result<(), AppResponse> {
    if !mime.starts_with("image/") {
        return Err(AppResponse::ValidationError(format!("Unsupported image type: {mime}")));
    }
    if len == 0 {
        return Err(AppResponse::ValidationError("Image is empty".to_string()));
    }
    if len > max_bytes {
        return Err(AppResponse::ValidationError(format!(
            "Image must be at most {max_bytes} bytes, got {len}"
        )));
    }
    Ok(())
}

/// One reported waste-management issue.
///
/// # Structure
///
/// - **id**, **created_at**, **reporter**, **image_ref**: fixed at submission
/// - **status**, **assigned_worker**: changed by the administrator only
///
/// Storage order has no meaning; views sort with
/// [`crate::stats::newest_first`].
///
/// # Serialization
///
/// Field names are camelCase on disk and across the FFI boundary:
///
/// ```json
/// {
///   "id": "4f0c...",
///   "title": "Overflowing bin",
///   "description": "Bin at the corner has not been emptied",
///   "locationAddress": "MG Road, near bus stop",
///   "category": "overflow",
///   "status": "pending",
///   "createdAt": "2024-06-01T10:30:00Z",
///   "reporter": { "name": "Asha", "email": "asha@example.com" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location_address: String,
    pub category: ComplaintCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<ImageRef>,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub reporter: Reporter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_worker: Option<AssignedWorker>,
}

/// Fields a citizen supplies when filing a complaint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub location_address: String,
    pub category: ComplaintCategory,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_ref: Option<ImageRef>,
    pub reporter_name: String,
    pub reporter_email: String,
    pub reporter_phone: Option<String>,
}

impl NewComplaint {
    /// Names of required fields that are empty or whitespace only.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("description", &self.description),
            ("locationAddress", &self.location_address),
            ("reporterName", &self.reporter_name),
            ("reporterEmail", &self.reporter_email),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Fills the address from a GPS fix, keeping the coordinates.
    pub fn with_gps_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location_address = gps_address(latitude, longitude);
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

/// Formats a GPS fix the way the reporting form shows it.
pub fn gps_address(latitude: f64, longitude: f64) -> String {
    format!("Location: {latitude:.6}, {longitude:.6}")
}

/// The single signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub id: String,
}

/// Wrapper written around every stored record.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Versioned<T> {
    pub schema_version: u32,
    pub payload: T,
}

/// Serializes `payload` inside a current-version envelope.
pub fn encode_record<T: Serialize>(payload: &T) -> Result<Vec<u8>, AppResponse> {
    let envelope = Versioned {
        schema_version: SCHEMA_VERSION,
        payload,
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Reads an envelope back, rejecting unknown versions and mismatched payloads
/// with [`AppResponse::CorruptState`].
pub fn decode_record<T: DeserializeOwned>(bytes: &[u8], kind: &str) -> Result<T, AppResponse> {
    let envelope: Versioned<serde_json::Value> = serde_json::from_slice(bytes)
        .map_err(|e| AppResponse::CorruptState(format!("{kind} record is not a valid envelope: {e}")))?;

    if envelope.schema_version != SCHEMA_VERSION {
        return Err(AppResponse::CorruptState(format!(
            "{kind} record has schema version {}, expected {SCHEMA_VERSION}",
            envelope.schema_version
        )));
    }

    serde_json::from_value(envelope.payload)
        .map_err(|e| AppResponse::CorruptState(format!("{kind} payload does not match schema: {e}")))
}
