//! The case detail view: which case is open and what can be done to it.

use log::debug;

use crate::app_response::AppResponse;
use crate::case_model::{Case, CaseStatus};
use crate::case_repository::CaseRepository;

pub const DELETE_PROMPT: &str = "Er du sikker på at du vil slette denne saken?";

/// A yes/no gate put in front of destructive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// A prompt the caller already put to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetAnswer(pub bool);

impl Confirm for PresetAnswer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    NoSelection,
    Viewing(String),
}

/// Holds the selected case by key and forwards detail actions to the
/// repository. Every action is a no-op while nothing is selected.
#[derive(Debug, Default)]
pub struct DetailController {
    selection: Selection,
}

impl DetailController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_case_number(&self) -> Option<&str> {
        match &self.selection {
            Selection::Viewing(case_number) => Some(case_number),
            Selection::NoSelection => None,
        }
    }

    /// The selected case as it is now in the repository. `None` if nothing is
    /// selected or the case has since been removed.
    pub fn selected<'r>(&self, repository: &'r CaseRepository) -> Option<&'r Case> {
        self.selected_case_number().and_then(|case_number| repository.get(case_number))
    }

    /// Opens a case. Unknown keys leave the current selection alone.
    pub fn select<'r>(&mut self, repository: &'r CaseRepository, case_number: &str) -> Option<&'r Case> {
        let case = repository.get(case_number)?;
        self.selection = Selection::Viewing(case.case_number.clone());
        Some(case)
    }

    /// Back to the list.
    pub fn clear(&mut self) {
        self.selection = Selection::NoSelection;
    }

    pub fn change_status(&self, repository: &mut CaseRepository, status: CaseStatus) -> Result<Option<Case>, AppResponse> {
        match self.selected_case_number() {
            Some(case_number) => repository.update_status(case_number, status),
            None => Ok(None),
        }
    }

    pub fn append_update(&self, repository: &mut CaseRepository, text: &str) -> Result<Option<Case>, AppResponse> {
        match self.selected_case_number() {
            Some(case_number) => repository.append_update(case_number, text),
            None => Ok(None),
        }
    }

    /// Deletes the selected case once `confirm` agrees, then returns to the
    /// list. Returns whether a case was deleted.
    pub fn delete(&mut self, repository: &mut CaseRepository, confirm: &impl Confirm) -> Result<bool, AppResponse> {
        let Some(case_number) = self.selected_case_number().map(str::to_owned) else {
            return Ok(false);
        };
        if !repository.contains(&case_number) {
            return Ok(false);
        }
        if !confirm.confirm(DELETE_PROMPT) {
            debug!("Deletion of {case_number} declined");
            return Ok(false);
        }

        repository.delete(&case_number)?;
        self.clear();
        Ok(true)
    }
}
