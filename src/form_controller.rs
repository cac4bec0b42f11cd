//! The new-case form.

use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;
use crate::case_model::{Case, CaseStatus, NewCase};
use crate::case_repository::CaseRepository;
use crate::detail_controller::DetailController;

/// Form inputs, addressed by the same names the stored case uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    LicensePlate,
    Description,
    Status,
    AssignedTo,
    PossibleSolution,
}

impl FromStr for FormField {
    type Err = AppResponse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "licensePlate" => Ok(FormField::LicensePlate),
            "description" => Ok(FormField::Description),
            "status" => Ok(FormField::Status),
            "assignedTo" => Ok(FormField::AssignedTo),
            "possibleSolution" => Ok(FormField::PossibleSolution),
            other => Err(AppResponse::BadRequest(format!("Unknown form field: {other}"))),
        }
    }
}

/// Current contents of the form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseForm {
    pub license_plate: String,
    pub description: String,
    pub status: CaseStatus,
    pub assigned_to: String,
    pub possible_solution: String,
}

impl CaseForm {
    fn to_new_case(&self) -> NewCase {
        NewCase::new(self.license_plate.to_uppercase(), self.description.clone())
            .with_status(self.status)
            .with_assigned_to(self.assigned_to.clone())
            .with_possible_solution(self.possible_solution.clone())
    }
}

#[derive(Debug, Default)]
pub struct FormController {
    form: CaseForm,
    open: bool,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &CaseForm {
        &self.form
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Leaves the form. Typed values stay until the next submit.
    pub fn cancel(&mut self) {
        self.open = false;
    }

    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), AppResponse> {
        match field {
            FormField::LicensePlate => self.form.license_plate = value.to_string(),
            FormField::Description => self.form.description = value.to_string(),
            FormField::Status => self.form.status = value.parse()?,
            FormField::AssignedTo => self.form.assigned_to = value.to_string(),
            FormField::PossibleSolution => self.form.possible_solution = value.to_string(),
        }
        Ok(())
    }

    /// Fills every field at once.
    pub fn is_valid(&self) -> bool {
        !self.form.license_plate.trim().is_empty() && !self.form.description.trim().is_empty()
    }

    /// Creates the case, resets and closes the form, and opens the new case in
    /// `detail`. An incomplete form is declined with `None` and left as is.
    pub fn submit(
        &mut self,
        repository: &mut CaseRepository,
        detail: &mut DetailController,
    ) -> Result<Option<Case>, AppResponse> {
        if !self.is_valid() {
            debug!("New case form is incomplete; not submitting");
            return Ok(None);
        }

        let case = repository.create(self.form.to_new_case())?;
        self.form = CaseForm::default();
        self.open = false;
        detail.select(repository, &case.case_number);
        Ok(Some(case))
    }
}
