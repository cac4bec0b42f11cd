//! One tracker session: a repository, its two controllers and the search
//! query. This is what the FFI handle points at.
//!
//! The session derives the visible list and the current screen on demand from
//! the repository, so every read after a mutation sees the new collection.

use log::info;
use serde::Serialize;

use crate::app_response::AppResponse;
use crate::case_model::{Case, CaseStatus};
use crate::case_repository::CaseRepository;
use crate::case_store::{LmdbStore, MemoryStore, SlotStore};
use crate::config::TrackerConfig;
use crate::detail_controller::{Confirm, DetailController};
use crate::form_controller::{CaseForm, FormController, FormField};
use crate::search;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    List,
    NewCase,
    Detail,
}

/// Everything a UI shell needs to draw the current screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerView {
    pub screen: Screen,
    pub query: String,
    pub cases: Vec<Case>,
    pub selected: Option<Case>,
    pub form: CaseForm,
}

pub struct CaseTracker {
    repository: CaseRepository,
    detail: DetailController,
    form: FormController,
    query: String,
}

impl CaseTracker {
    /// Opens an LMDB-backed session.
    pub fn init(config: TrackerConfig) -> Result<Self, AppResponse> {
        config.validate()?;
        let store = LmdbStore::open(&config)?;
        let tracker = Self::with_store(Box::new(store), &config)?;
        info!("Case tracker '{}' ready with {} cases", config.name, tracker.repository.len());
        Ok(tracker)
    }

    /// A session that forgets everything when dropped.
    pub fn in_memory(config: &TrackerConfig) -> Result<Self, AppResponse> {
        Self::with_store(Box::new(MemoryStore::new()), config)
    }

    pub fn with_store(store: Box<dyn SlotStore>, config: &TrackerConfig) -> Result<Self, AppResponse> {
        Ok(Self {
            repository: CaseRepository::open(store, config)?,
            detail: DetailController::new(),
            form: FormController::new(),
            query: String::new(),
        })
    }

    pub fn repository(&self) -> &CaseRepository {
        &self.repository
    }

    pub fn cases(&self) -> &[Case] {
        self.repository.cases()
    }

    pub fn get(&self, case_number: &str) -> Option<&Case> {
        self.repository.get(case_number)
    }

    // Search

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn visible_cases(&self) -> Vec<&Case> {
        search::filter(self.repository.cases(), &self.query)
    }

    // Detail

    pub fn select(&mut self, case_number: &str) -> Option<&Case> {
        self.detail.select(&self.repository, case_number)
    }

    pub fn clear_selection(&mut self) {
        self.detail.clear();
    }

    pub fn selected(&self) -> Option<&Case> {
        self.detail.selected(&self.repository)
    }

    pub fn change_status(&mut self, status: CaseStatus) -> Result<Option<Case>, AppResponse> {
        self.detail.change_status(&mut self.repository, status)
    }

    pub fn append_update(&mut self, text: &str) -> Result<Option<Case>, AppResponse> {
        self.detail.append_update(&mut self.repository, text)
    }

    pub fn delete_selected(&mut self, confirm: &impl Confirm) -> Result<bool, AppResponse> {
        self.detail.delete(&mut self.repository, confirm)
    }

    // Form

    pub fn open_form(&mut self) {
        self.form.open();
    }

    pub fn cancel_form(&mut self) {
        self.form.cancel();
    }

    pub fn form(&self) -> &CaseForm {
        self.form.form()
    }

    pub fn set_form_field(&mut self, field: FormField, value: &str) -> Result<(), AppResponse> {
        self.form.set_field(field, value)
    }

    pub fn submit_form(&mut self) -> Result<Option<Case>, AppResponse> {
        self.form.submit(&mut self.repository, &mut self.detail)
    }

    // Maintenance

    pub fn reset_to_seed(&mut self) -> Result<usize, AppResponse> {
        self.detail.clear();
        Ok(self.repository.reset_to_seed()?.len())
    }

    pub fn clear_all(&mut self) -> Result<usize, AppResponse> {
        self.detail.clear();
        self.repository.clear_all()
    }

    pub fn close(&mut self) -> Result<(), AppResponse> {
        self.repository.close()
    }

    // Screen

    pub fn screen(&self) -> Screen {
        if self.form.is_open() {
            Screen::NewCase
        } else if self.selected().is_some() {
            Screen::Detail
        } else {
            Screen::List
        }
    }

    pub fn view(&self) -> TrackerView {
        TrackerView {
            screen: self.screen(),
            query: self.query.clone(),
            cases: self.visible_cases().into_iter().cloned().collect(),
            selected: self.selected().cloned(),
            form: self.form.form().clone(),
        }
    }
}
