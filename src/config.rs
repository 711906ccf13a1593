//! Store configuration.
//!
//! A shell either opens a store by name (every other setting defaulted) or
//! hands over a JSON document through [`crate::create_db_with_config`].

use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;
use crate::session::{FixedCredentialAuthenticator, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};

/// Default LMDB map size. The map is reserved address space, not disk.
pub const DEFAULT_MAP_SIZE: usize = 1024 * 1024 * 1024;

/// Largest raw image accepted for a complaint.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// How many maximum-size encoded images the map must hold. A rewrite keeps
/// the old and the new collection live until commit, plus free-page slack.
const MIN_IMAGE_COPIES: usize = 4;

/// Room for the data URL prefix and the surrounding complaint record.
const RECORD_OVERHEAD: usize = 64 * 1024;

/// Bytes one stored image takes once base64 encoded inside a data URL.
pub fn encoded_image_len(raw_bytes: usize) -> usize {
    raw_bytes.div_ceil(3).saturating_mul(4).saturating_add(RECORD_OVERHEAD)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Database name; the environment lives in `<name>.lmdb/`.
    pub name: String,
    pub map_size: usize,
    pub max_image_bytes: usize,
    /// The one privileged credential pair.
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "dreamclean".to_string(),
            map_size: DEFAULT_MAP_SIZE,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parses a JSON config, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, AppResponse> {
        let config: StoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppResponse> {
        if self.name.trim().is_empty() {
            return Err(AppResponse::ValidationError("Database name cannot be empty".to_string()));
        }
        if self.admin_email.trim().is_empty() || self.admin_password.is_empty() {
            return Err(AppResponse::ValidationError("Admin credentials cannot be empty".to_string()));
        }
        if self.map_size == 0 {
            return Err(AppResponse::ValidationError("map_size must be positive".to_string()));
        }
        let required = encoded_image_len(self.max_image_bytes).saturating_mul(MIN_IMAGE_COPIES);
        if self.map_size < required {
            return Err(AppResponse::ValidationError(format!(
                "map_size {} cannot hold a rewrite with a {}-byte image, need at least {required}",
                self.map_size, self.max_image_bytes
            )));
        }
        Ok(())
    }

    pub fn lmdb_dir(&self) -> String {
        format!("{}.lmdb", self.name)
    }

    pub fn authenticator(&self) -> FixedCredentialAuthenticator {
        FixedCredentialAuthenticator::new(self.admin_email.clone(), self.admin_password.clone())
    }
}
