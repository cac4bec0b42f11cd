//! The case collection and its write-through persistence.
//!
//! The repository holds the ordered collection in memory and mirrors it to a
//! single slot of a [`SlotStore`] as one JSON array. Every mutation builds the
//! next collection, writes it whole, and only then replaces the in-memory
//! copy, so a failed write leaves both sides as they were.

use std::collections::HashSet;

use chrono::Utc;
use log::{debug, info, warn};

use crate::app_response::AppResponse;
use crate::case_model::{Case, CaseStatus, CaseUpdate, NewCase};
use crate::case_store::SlotStore;
use crate::config::TrackerConfig;
use crate::identifiers::{generate_case_number, generate_update_id};
use crate::seed::seed_cases;

pub struct CaseRepository {
    store: Box<dyn SlotStore>,
    slot: String,
    backup_slot: String,
    seed_on_first_load: bool,
    cases: Vec<Case>,
}

impl CaseRepository {
    /// Opens the repository and performs the initial [`load_all`](Self::load_all).
    pub fn open(store: Box<dyn SlotStore>, config: &TrackerConfig) -> Result<Self, AppResponse> {
        let mut repository = Self {
            store,
            slot: config.slot.clone(),
            backup_slot: config.backup_slot(),
            seed_on_first_load: config.seed_on_first_load,
            cases: Vec::new(),
        };
        repository.load_all()?;
        Ok(repository)
    }

    /// Reloads the collection from the store.
    ///
    /// A slot that was never written is seeded (or starts empty when seeding
    /// is off) and persisted. A slot that does not parse (including bytes
    /// that are not UTF-8) is copied to the backup slot and replaced by the
    /// seed dataset. A failed backup is logged and does not stop the re-seed.
    pub fn load_all(&mut self) -> Result<&[Case], AppResponse> {
        let loaded = match self.store.read_slot(&self.slot)? {
            None => {
                info!("Slot '{}' is empty; initializing case collection", self.slot);
                let initial = if self.seed_on_first_load { seed_cases() } else { Vec::new() };
                self.persist(&initial)?;
                initial
            }
            Some(raw) => match serde_json::from_slice::<Vec<Case>>(&raw) {
                Ok(cases) => self.dedupe(cases)?,
                Err(e) => {
                    warn!("Slot '{}' does not parse ({e}); re-seeding", self.slot);
                    if let Err(backup_err) = self.store.write_slot(&self.backup_slot, &raw) {
                        warn!("Could not back up slot '{}' to '{}': {backup_err}", self.slot, self.backup_slot);
                    }
                    let seeded = seed_cases();
                    self.persist(&seeded)?;
                    seeded
                }
            },
        };

        self.cases = loaded;
        Ok(&self.cases)
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn get(&self, case_number: &str) -> Option<&Case> {
        self.cases.iter().find(|case| case.case_number == case_number)
    }

    pub fn contains(&self, case_number: &str) -> bool {
        self.get(case_number).is_some()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Creates a case from validated input and puts it first in the collection.
    pub fn create(&mut self, input: NewCase) -> Result<Case, AppResponse> {
        input.validate()?;

        let now = Utc::now();
        let case_number = generate_case_number(now.timestamp_millis(), |candidate| self.contains(candidate))?;
        let case = input.into_case(case_number, now);

        let mut next = Vec::with_capacity(self.cases.len() + 1);
        next.push(case.clone());
        next.extend(self.cases.iter().cloned());
        self.commit(next)?;

        debug!("Created case {}", case.case_number);
        Ok(case)
    }

    /// Sets the status of a case. `None` when the case does not exist.
    pub fn update_status(&mut self, case_number: &str, status: CaseStatus) -> Result<Option<Case>, AppResponse> {
        self.modify(case_number, |case| {
            case.status = status;
        })
    }

    /// Prepends a progress note. `None` when `text` is blank or the case does
    /// not exist; nothing is written in either case.
    pub fn append_update(&mut self, case_number: &str, text: &str) -> Result<Option<Case>, AppResponse> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let now = Utc::now();
        self.modify(case_number, |case| {
            let id = generate_update_id(now.timestamp_millis(), |candidate| case.has_update(candidate));
            case.updates.insert(
                0,
                CaseUpdate {
                    id,
                    text: text.to_string(),
                    timestamp: now.max(case.date_created),
                },
            );
        })
    }

    /// Removes a case and returns what remains. An unknown key changes nothing.
    pub fn delete(&mut self, case_number: &str) -> Result<&[Case], AppResponse> {
        if self.contains(case_number) {
            let next = self
                .cases
                .iter()
                .filter(|case| case.case_number != case_number)
                .cloned()
                .collect();
            self.commit(next)?;
            debug!("Deleted case {case_number}");
        }
        Ok(&self.cases)
    }

    /// Replaces the collection with the demonstration dataset and discards
    /// any backed-up corrupt collection.
    pub fn reset_to_seed(&mut self) -> Result<&[Case], AppResponse> {
        self.commit(seed_cases())?;
        self.discard_backup();
        info!("Case collection reset to seed data");
        Ok(&self.cases)
    }

    /// Empties the collection. The empty collection is persisted, so later
    /// loads do not seed again. Returns how many cases were removed.
    pub fn clear_all(&mut self) -> Result<usize, AppResponse> {
        let removed = self.cases.len();
        self.commit(Vec::new())?;
        self.discard_backup();
        info!("Cleared {removed} cases");
        Ok(removed)
    }

    pub fn close(&mut self) -> Result<(), AppResponse> {
        self.store.close()
    }

    fn modify<F>(&mut self, case_number: &str, change: F) -> Result<Option<Case>, AppResponse>
    where
        F: FnOnce(&mut Case),
    {
        let Some(index) = self.cases.iter().position(|case| case.case_number == case_number) else {
            debug!("No case {case_number}; nothing to change");
            return Ok(None);
        };

        let mut next = self.cases.clone();
        change(&mut next[index]);
        let changed = next[index].clone();
        self.commit(next)?;
        Ok(Some(changed))
    }

    fn commit(&mut self, next: Vec<Case>) -> Result<(), AppResponse> {
        self.persist(&next)?;
        self.cases = next;
        Ok(())
    }

    fn persist(&self, cases: &[Case]) -> Result<(), AppResponse> {
        let json = serde_json::to_vec(cases)?;
        self.store.write_slot(&self.slot, &json)
    }

    // Runs after a commit, so a failure is only logged.
    fn discard_backup(&self) {
        match self.store.remove_slot(&self.backup_slot) {
            Ok(true) => debug!("Removed backup slot '{}'", self.backup_slot),
            Ok(false) => {}
            Err(e) => warn!("Could not remove backup slot '{}': {e}", self.backup_slot),
        }
    }

    /// Drops repeated case numbers, keeping the first, and rewrites the slot
    /// if anything was dropped.
    fn dedupe(&self, cases: Vec<Case>) -> Result<Vec<Case>, AppResponse> {
        let total = cases.len();
        let mut seen = HashSet::with_capacity(total);
        let unique: Vec<Case> = cases
            .into_iter()
            .filter(|case| seen.insert(case.case_number.clone()))
            .collect();

        if unique.len() != total {
            warn!("Dropped {} cases with duplicate case numbers", total - unique.len());
            self.persist(&unique)?;
        }
        Ok(unique)
    }
}
