//! # Workshop Case Core
//!
//! Offline case tracking for an automotive repair shop, packaged as a library
//! a UI shell (Flutter, a web view, a terminal front-end) links against.
//! The crate owns the repair cases, their local persistence, the free-text
//! search, and the state of the detail and new-case screens. The shell only
//! draws what [`current_view`] returns and forwards user actions.
//!
//! ## Features
//!
//! - **Write-through persistence**: the whole case collection lives in one
//!   LMDB slot and is rewritten on every change
//! - **First-run seeding**: an empty store starts with five demonstration cases
//! - **Self-healing loads**: an unreadable collection is backed up and re-seeded
//! - **Live search**: case-insensitive substring search over case number,
//!   license plate, description and status
//! - **Safe error handling**: every failure comes back as an [`AppResponse`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use workshop_case_core::{create_tracker, search_cases, free_response};
//! use std::ffi::CString;
//!
//! let name = CString::new("workshop").unwrap();
//! let tracker = create_tracker(name.as_ptr());
//!
//! let query = CString::new("AB12").unwrap();
//! let result = search_cases(tracker, query.as_ptr());
//! free_response(result as *mut _);
//! ```
//!
//! ## FFI Functions
//!
//! - [`create_tracker`] / [`create_tracker_with_config`] - Open a session
//! - [`get_all_cases`], [`get_case`], [`search_cases`], [`current_view`] - Read
//! - [`select_case`] - Open a case, or go back to the list
//! - [`update_selected_status`], [`append_selected_update`],
//!   [`delete_selected_case`] - Act on the open case
//! - [`open_case_form`], [`set_form_field`], [`submit_case_form`],
//!   [`cancel_case_form`] - Register a new case
//! - [`reset_cases`], [`clear_all_cases`] - Maintenance
//! - [`close_tracker`] - Flush and free the session
//! - [`free_response`] - Release a string returned by any of the above

pub mod app_response;
pub mod case_model;
pub mod case_repository;
pub mod case_store;
pub mod config;
pub mod detail_controller;
pub mod form_controller;
pub mod identifiers;
pub mod search;
pub mod seed;
pub mod tracker_state;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use log::{info, warn};

use crate::app_response::AppResponse;
use crate::case_model::CaseStatus;
use crate::config::TrackerConfig;
use crate::detail_controller::PresetAnswer;
use crate::form_controller::FormField;
use crate::tracker_state::CaseTracker;

/// Opens a tracker session stored at `<name>.lmdb`.
///
/// The first session on a fresh store writes the demonstration cases.
///
/// # Returns
///
/// A pointer to the session, or null when `name` is null, not UTF-8, or the
/// store cannot be opened. Release it with [`close_tracker`].
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use workshop_case_core::create_tracker;
///
/// let name = CString::new("workshop").unwrap();
/// let tracker = create_tracker(name.as_ptr());
/// assert!(!tracker.is_null());
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_tracker(name: *const c_char) -> *mut CaseTracker {
    if name.is_null() {
        warn!("Null name pointer passed to create_tracker");
        return std::ptr::null_mut();
    }

    let name_str = match unsafe { CStr::from_ptr(name).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in name parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    open_tracker(TrackerConfig::new(name_str))
}

/// Opens a tracker session from a JSON [`TrackerConfig`].
///
/// ```json
/// { "name": "workshop", "slot": "cases", "map_size": 10485760, "seed_on_first_load": true }
/// ```
///
/// Every field is optional. Returns null on invalid input or open failure.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_tracker_with_config(config_json: *const c_char) -> *mut CaseTracker {
    if config_json.is_null() {
        warn!("Null config pointer passed to create_tracker_with_config");
        return std::ptr::null_mut();
    }

    let json = match unsafe { CStr::from_ptr(config_json).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in config parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    match TrackerConfig::from_json(json) {
        Ok(config) => open_tracker(config),
        Err(e) => {
            warn!("Rejected tracker config: {e}");
            std::ptr::null_mut()
        }
    }
}

fn open_tracker(config: TrackerConfig) -> *mut CaseTracker {
    let store_path = config.store_path();
    info!("Opening case tracker at: {}", store_path.display());

    match CaseTracker::init(config) {
        Ok(tracker) => Box::into_raw(Box::new(tracker)),
        Err(e) => {
            warn!("Failed to open case tracker at {}: {e}", store_path.display());
            std::ptr::null_mut()
        }
    }
}

/// Returns every case, newest first, as a JSON array inside `Ok`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_all_cases(state: *mut CaseTracker) -> *const c_char {
    let tracker = match tracker_ref(state, "get_all_cases") {
        Ok(t) => t,
        Err(e) => return e,
    };
    response_to_c_string(&AppResponse::json(&tracker.cases()))
}

/// Returns one case by case number, or `NotFound`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_case(state: *mut CaseTracker, case_number: *const c_char) -> *const c_char {
    let tracker = match tracker_ref(state, "get_case") {
        Ok(t) => t,
        Err(e) => return e,
    };
    let case_number = match c_ptr_to_string(case_number, "case_number") {
        Ok(s) => s,
        Err(e) => return e,
    };

    match tracker.get(&case_number) {
        Some(case) => response_to_c_string(&AppResponse::json(case)),
        None => response_to_c_string(&AppResponse::NotFound(format!("No case with number: {case_number}"))),
    }
}

/// Sets the search query and returns the matching cases.
///
/// The query stays in effect for [`current_view`] until replaced. An empty
/// string shows every case.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn search_cases(state: *mut CaseTracker, query: *const c_char) -> *const c_char {
    let tracker = match tracker_mut(state, "search_cases") {
        Ok(t) => t,
        Err(e) => return e,
    };
    let query = match c_ptr_to_string(query, "query") {
        Ok(s) => s,
        Err(e) => return e,
    };

    tracker.set_query(&query);
    response_to_c_string(&AppResponse::json(&tracker.visible_cases()))
}

/// Returns the [`TrackerView`](tracker_state::TrackerView) for the current
/// screen.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn current_view(state: *mut CaseTracker) -> *const c_char {
    let tracker = match tracker_ref(state, "current_view") {
        Ok(t) => t,
        Err(e) => return e,
    };
    response_to_c_string(&AppResponse::json(&tracker.view()))
}

/// Opens a case in the detail screen. A null `case_number` returns to the
/// list. Replies with the current view.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn select_case(state: *mut CaseTracker, case_number: *const c_char) -> *const c_char {
    let tracker = match tracker_mut(state, "select_case") {
        Ok(t) => t,
        Err(e) => return e,
    };

    if case_number.is_null() {
        tracker.clear_selection();
        return response_to_c_string(&AppResponse::json(&tracker.view()));
    }

    let case_number = match c_ptr_to_string(case_number, "case_number") {
        Ok(s) => s,
        Err(e) => return e,
    };

    if tracker.select(&case_number).is_none() {
        return response_to_c_string(&AppResponse::NotFound(format!("No case with number: {case_number}")));
    }
    response_to_c_string(&AppResponse::json(&tracker.view()))
}

/// Changes the status of the open case. `status` accepts the stored labels
/// (`Åpen`, `Pågår`, `Fullført`) or `Open`, `InProgress`, `Completed`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn update_selected_status(state: *mut CaseTracker, status: *const c_char) -> *const c_char {
    let tracker = match tracker_mut(state, "update_selected_status") {
        Ok(t) => t,
        Err(e) => return e,
    };
    let status = match c_ptr_to_string(status, "status") {
        Ok(s) => s,
        Err(e) => return e,
    };
    let status = match status.parse::<CaseStatus>() {
        Ok(s) => s,
        Err(e) => return response_to_c_string(&e),
    };

    match tracker.change_status(status) {
        Ok(Some(case)) => response_to_c_string(&AppResponse::json(&case)),
        Ok(None) => response_to_c_string(&AppResponse::NotFound("No case is open".to_string())),
        Err(e) => response_to_c_string(&e),
    }
}

/// Appends a progress note to the open case. Blank text is declined with
/// `ValidationError` and changes nothing.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn append_selected_update(state: *mut CaseTracker, text: *const c_char) -> *const c_char {
    let tracker = match tracker_mut(state, "append_selected_update") {
        Ok(t) => t,
        Err(e) => return e,
    };
    let text = match c_ptr_to_string(text, "text") {
        Ok(s) => s,
        Err(e) => return e,
    };

    if text.trim().is_empty() {
        return response_to_c_string(&AppResponse::ValidationError("Update text is required".to_string()));
    }

    match tracker.append_update(&text) {
        Ok(Some(case)) => response_to_c_string(&AppResponse::json(&case)),
        Ok(None) => response_to_c_string(&AppResponse::NotFound("No case is open".to_string())),
        Err(e) => response_to_c_string(&e),
    }
}

/// Deletes the open case.
///
/// `confirmed` carries the user's answer to the shell's confirmation dialog;
/// `false` leaves everything as it is. On deletion the session returns to the
/// list and the reply is the current view.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn delete_selected_case(state: *mut CaseTracker, confirmed: bool) -> *const c_char {
    let tracker = match tracker_mut(state, "delete_selected_case") {
        Ok(t) => t,
        Err(e) => return e,
    };

    if tracker.selected().is_none() {
        return response_to_c_string(&AppResponse::NotFound("No case is open".to_string()));
    }

    match tracker.delete_selected(&PresetAnswer(confirmed)) {
        Ok(_) => response_to_c_string(&AppResponse::json(&tracker.view())),
        Err(e) => response_to_c_string(&e),
    }
}

/// Shows the new-case form. Replies with the current view.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn open_case_form(state: *mut CaseTracker) -> *const c_char {
    let tracker = match tracker_mut(state, "open_case_form") {
        Ok(t) => t,
        Err(e) => return e,
    };
    tracker.open_form();
    response_to_c_string(&AppResponse::json(&tracker.view()))
}

/// Leaves the new-case form without saving. Replies with the current view.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn cancel_case_form(state: *mut CaseTracker) -> *const c_char {
    let tracker = match tracker_mut(state, "cancel_case_form") {
        Ok(t) => t,
        Err(e) => return e,
    };
    tracker.cancel_form();
    response_to_c_string(&AppResponse::json(&tracker.view()))
}

/// Sets one form input. `field` is one of `licensePlate`, `description`,
/// `status`, `assignedTo`, `possibleSolution`. Replies with the form.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn set_form_field(
    state: *mut CaseTracker,
    field: *const c_char,
    value: *const c_char,
) -> *const c_char {
    let tracker = match tracker_mut(state, "set_form_field") {
        Ok(t) => t,
        Err(e) => return e,
    };
    let field = match c_ptr_to_string(field, "field") {
        Ok(s) => s,
        Err(e) => return e,
    };
    let value = match c_ptr_to_string(value, "value") {
        Ok(s) => s,
        Err(e) => return e,
    };

    let result = field
        .parse::<FormField>()
        .and_then(|field| tracker.set_form_field(field, &value));

    match result {
        Ok(()) => response_to_c_string(&AppResponse::json(tracker.form())),
        Err(e) => response_to_c_string(&e),
    }
}

/// Saves the form as a new case and opens it.
///
/// An incomplete form (blank license plate or description) is declined with
/// `ValidationError` and stays as typed.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn submit_case_form(state: *mut CaseTracker) -> *const c_char {
    let tracker = match tracker_mut(state, "submit_case_form") {
        Ok(t) => t,
        Err(e) => return e,
    };

    match tracker.submit_form() {
        Ok(Some(case)) => response_to_c_string(&AppResponse::json(&case)),
        Ok(None) => response_to_c_string(&AppResponse::ValidationError(
            "License plate and description are required".to_string(),
        )),
        Err(e) => response_to_c_string(&e),
    }
}

/// Replaces every case with the demonstration dataset.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn reset_cases(state: *mut CaseTracker) -> *const c_char {
    let tracker = match tracker_mut(state, "reset_cases") {
        Ok(t) => t,
        Err(e) => return e,
    };

    match tracker.reset_to_seed() {
        Ok(count) => response_to_c_string(&AppResponse::success(format!("Reset to {count} seed cases"))),
        Err(e) => response_to_c_string(&e),
    }
}

/// Removes every case. The store stays empty on the next open.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn clear_all_cases(state: *mut CaseTracker) -> *const c_char {
    let tracker = match tracker_mut(state, "clear_all_cases") {
        Ok(t) => t,
        Err(e) => return e,
    };

    match tracker.clear_all() {
        Ok(count) => response_to_c_string(&AppResponse::success(format!("Cleared {count} cases"))),
        Err(e) => response_to_c_string(&e),
    }
}

/// Flushes the store and frees the session. `state` must not be used again.
///
/// # Notes
///
/// The session is freed even when the flush fails; the reply carries the
/// flush error.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_tracker(state: *mut CaseTracker) -> *const c_char {
    if state.is_null() {
        let error = AppResponse::BadRequest("Null state pointer passed to close_tracker".to_string());
        return response_to_c_string(&error);
    }

    let mut tracker = unsafe { Box::from_raw(state) };
    match tracker.close() {
        Ok(()) => response_to_c_string(&AppResponse::success("Case tracker closed")),
        Err(e) => response_to_c_string(&e),
    }
}

/// Releases a string returned by any function of this crate.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(response: *mut c_char) {
    if response.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(response) });
}

fn tracker_ref<'a>(state: *mut CaseTracker, caller: &str) -> Result<&'a CaseTracker, *const c_char> {
    match unsafe { state.as_ref() } {
        Some(t) => Ok(t),
        None => {
            let error = AppResponse::BadRequest(format!("Null state pointer passed to {caller}"));
            Err(response_to_c_string(&error))
        }
    }
}

fn tracker_mut<'a>(state: *mut CaseTracker, caller: &str) -> Result<&'a mut CaseTracker, *const c_char> {
    match unsafe { state.as_mut() } {
        Some(t) => Ok(t),
        None => {
            let error = AppResponse::BadRequest(format!("Null state pointer passed to {caller}"));
            Err(response_to_c_string(&error))
        }
    }
}

/// Converts an [`AppResponse`] to a C string owned by the caller.
///
/// Returns null if the response cannot be serialized.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// Converts a C string argument to a `String`, replying with `BadRequest`
/// for null pointers and invalid UTF-8.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            warn!("Invalid UTF-8 in {field_name}: {e}");
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}
