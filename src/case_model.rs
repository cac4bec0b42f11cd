//! Data model for repair cases.
//!
//! A [`Case`] is one repair ticket: the vehicle, what is wrong with it, who is
//! on it, and an append-only log of [`CaseUpdate`] notes. The serialized form
//! keeps the field names of the shop's existing local storage (`caseNumber`,
//! `licensePlate`, `dateCreated`, ...) so collections written by older
//! front-ends load unchanged.
//!
//! # Examples
//!
//! ```rust
//! use workshop_case_core::case_model::{Case, CaseStatus};
//!
//! let json = r#"{
//!     "caseNumber": "SAK-000001",
//!     "licensePlate": "AB12345",
//!     "description": "Brakes squeal",
//!     "status": "Pågår",
//!     "dateCreated": "2023-05-15T08:30:00Z",
//!     "assignedTo": "",
//!     "possibleSolution": "Replace pads",
//!     "updates": []
//! }"#;
//!
//! let case: Case = serde_json::from_str(json)?;
//! assert_eq!(case.status, CaseStatus::InProgress);
//! assert_eq!(case.assigned_to, None);
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;

/// Lifecycle status of a case.
///
/// Serialized with the shop's localized labels. English variant names are
/// accepted on input so hand-written JSON and FFI callers can use either.
/// Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CaseStatus {
    #[default]
    #[serde(rename = "Åpen", alias = "Open")]
    Open,
    #[serde(rename = "Pågår", alias = "InProgress")]
    InProgress,
    #[serde(rename = "Fullført", alias = "Completed")]
    Completed,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 3] = [CaseStatus::Open, CaseStatus::InProgress, CaseStatus::Completed];

    /// Label shown to users and matched by search.
    pub fn label(self) -> &'static str {
        match self {
            CaseStatus::Open => "Åpen",
            CaseStatus::InProgress => "Pågår",
            CaseStatus::Completed => "Fullført",
        }
    }

    fn english_name(self) -> &'static str {
        match self {
            CaseStatus::Open => "Open",
            CaseStatus::InProgress => "InProgress",
            CaseStatus::Completed => "Completed",
        }
    }
}

impl Display for CaseStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CaseStatus {
    type Err = AppResponse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CaseStatus::ALL
            .into_iter()
            .find(|status| {
                status.label().to_lowercase() == wanted || status.english_name().to_lowercase() == wanted
            })
            .ok_or_else(|| AppResponse::ValidationError(format!("Unknown case status: {s}")))
    }
}

/// A timestamped progress note on a case. Never edited once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseUpdate {
    /// Unique within the parent case.
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A repair ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    /// Primary key, `SAK-` followed by six digits. Immutable.
    pub case_number: String,
    /// Always upper case.
    pub license_plate: String,
    pub description: String,
    pub status: CaseStatus,
    /// Immutable after creation.
    pub date_created: DateTime<Utc>,
    #[serde(default, with = "blank_as_none")]
    pub assigned_to: Option<String>,
    #[serde(default, with = "blank_as_none")]
    pub possible_solution: Option<String>,
    /// Newest first.
    #[serde(default)]
    pub updates: Vec<CaseUpdate>,
}

impl Case {
    pub fn has_update(&self, id: &str) -> bool {
        self.updates.iter().any(|update| update.id == id)
    }
}

/// Input for creating a case. Everything the repository assigns itself
/// (case number, creation date, update log) is absent here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCase {
    pub license_plate: String,
    pub description: String,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default, with = "blank_as_none")]
    pub assigned_to: Option<String>,
    #[serde(default, with = "blank_as_none")]
    pub possible_solution: Option<String>,
}

impl NewCase {
    pub fn new(license_plate: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            license_plate: license_plate.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: CaseStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_assigned_to(mut self, mechanic: impl Into<String>) -> Self {
        self.assigned_to = non_blank(mechanic.into());
        self
    }

    pub fn with_possible_solution(mut self, solution: impl Into<String>) -> Self {
        self.possible_solution = non_blank(solution.into());
        self
    }

    /// Checks the required fields.
    pub fn validate(&self) -> Result<(), AppResponse> {
        if self.license_plate.trim().is_empty() {
            return Err(AppResponse::ValidationError("License plate is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(AppResponse::ValidationError("Description is required".to_string()));
        }
        Ok(())
    }

    /// Builds the stored case: upper-cased plate, blank optionals dropped,
    /// empty update log.
    pub fn into_case(self, case_number: String, date_created: DateTime<Utc>) -> Case {
        Case {
            case_number,
            license_plate: self.license_plate.to_uppercase(),
            description: self.description,
            status: self.status,
            date_created,
            assigned_to: self.assigned_to.and_then(non_blank),
            possible_solution: self.possible_solution.and_then(non_blank),
            updates: Vec::new(),
        }
    }
}

pub(crate) fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Optional text stored as `""` when absent, matching what the shop's
/// front-ends have always written.
mod blank_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value: Option<String> = Option::deserialize(deserializer)?;
        Ok(value.and_then(super::non_blank))
    }
}
