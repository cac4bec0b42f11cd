//! Session configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;

pub const DEFAULT_SLOT: &str = "cases";
pub const DEFAULT_MAP_SIZE: usize = 10 * 1024 * 1024;

/// Where and how a tracker session stores its cases.
///
/// Every field has a default, so `{"name": "shop"}` is a complete JSON
/// configuration.
///
/// ```rust
/// use workshop_case_core::config::TrackerConfig;
///
/// let config = TrackerConfig::new("shop").with_slot("bay_2").without_seed();
/// assert_eq!(config.store_path().to_str(), Some("shop.lmdb"));
/// assert_eq!(config.backup_slot(), "bay_2.corrupt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Store directory stem; the LMDB environment lives at `<name>.lmdb`.
    pub name: String,
    /// Key of the slot holding the case collection.
    pub slot: String,
    pub map_size: usize,
    /// Write the demonstration cases when the slot has never been written.
    pub seed_on_first_load: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            name: "workshop_cases".to_string(),
            slot: DEFAULT_SLOT.to_string(),
            map_size: DEFAULT_MAP_SIZE,
            seed_on_first_load: true,
        }
    }
}

impl TrackerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, AppResponse> {
        let config: TrackerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    pub fn with_map_size(mut self, map_size: usize) -> Self {
        self.map_size = map_size;
        self
    }

    pub fn without_seed(mut self) -> Self {
        self.seed_on_first_load = false;
        self
    }

    pub fn validate(&self) -> Result<(), AppResponse> {
        if self.name.trim().is_empty() {
            return Err(AppResponse::BadRequest("Store name cannot be empty".to_string()));
        }
        if self.slot.is_empty() {
            return Err(AppResponse::BadRequest("Slot key cannot be empty".to_string()));
        }
        if self.map_size == 0 {
            return Err(AppResponse::BadRequest("map_size must be positive".to_string()));
        }
        Ok(())
    }

    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.lmdb", self.name))
    }

    /// Slot that receives a collection blob that failed to parse.
    pub fn backup_slot(&self) -> String {
        format!("{}.corrupt", self.slot)
    }
}
