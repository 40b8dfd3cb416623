//! # Study Tracker Core
//!
//! The state engine behind a local-first study roadmap: topics, sub-topics and
//! practice problems, each carrying the user's progress. Designed for FFI
//! integration with Flutter and other UI layers, with progress persisted in
//! LMDB (Lightning Memory-Mapped Database).
//!
//! ## Features
//!
//! - **Schema reconciliation**: on startup the shipped roadmap is merged with the
//!   last persisted snapshot; added content appears, removed content disappears,
//!   and user progress on surviving nodes is kept
//! - **Corruption tolerant**: an unreadable snapshot resets to the shipped roadmap
//!   instead of failing
//! - **Pure mutations**: every UI intent produces a new roadmap value which is
//!   written back as a whole
//! - **Safe error handling**: No `unwrap()` calls in production code
//!
//! ## Quick Start
//!
//! ```no_run
//! use study_tracker_core::{close_tracker, create_tracker, free_response, toggle_topic};
//! use std::ffi::CString;
//!
//! let name = CString::new("my_roadmap").unwrap();
//! let tracker = create_tracker(name.as_ptr());
//!
//! let topic = CString::new("arrays_hashing").unwrap();
//! let result = toggle_topic(tracker, topic.as_ptr());
//! free_response(result);
//!
//! free_response(close_tracker(tracker));
//! ```
//!
//! ## FFI Functions
//!
//! Every function returns a JSON-encoded [`AppResponse`](app_response::AppResponse)
//! that must be released with [`free_response`].
//!
//! - [`create_tracker`] / [`create_tracker_with_config`] - Open the store and reconcile
//! - [`get_roadmap`] - Current merged roadmap
//! - [`get_filtered_roadmap`] - Roadmap filtered by search text and difficulty
//! - [`get_progress`] - Completion figures
//! - [`get_problem`] - One problem by id
//! - [`toggle_topic`] - Expand/collapse a topic
//! - [`toggle_sub_topic_completion`] - Mark a sub-topic done/undone
//! - [`update_sub_topic_notes`] - Replace a sub-topic's notes
//! - [`save_problem_details`] - Replace a problem record from the editor
//! - [`reset_progress`] - Discard all progress
//! - [`close_tracker`] - Flush, close and free the handle

pub mod app_response;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod local_db_state;
pub mod merge_policy;
pub mod mutation;
pub mod progress;
pub mod reconcile;
pub mod roadmap_model;
pub mod snapshot;
pub mod store;
pub mod tracker;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use log::{info, warn};
use serde::Serialize;

use crate::app_response::AppResponse;
use crate::config::TrackerConfig;
use crate::filter::DifficultyFilter;
use crate::roadmap_model::Problem;
use crate::tracker::Tracker;

/// Opens a tracker backed by the LMDB environment `name`, using the shipped roadmap.
///
/// # Returns
///
/// A tracker handle, or a null pointer if the name is invalid or the
/// environment cannot be opened. Release it with [`close_tracker`].
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use study_tracker_core::create_tracker;
///
/// let name = CString::new("roadmap").unwrap();
/// let tracker = create_tracker(name.as_ptr());
/// assert!(!tracker.is_null());
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_tracker(name: *const c_char) -> *mut Tracker {
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

    open_tracker(&TrackerConfig::with_db_name(name_str))
}

/// Opens a tracker from a JSON [`TrackerConfig`]; omitted fields take defaults.
///
/// ```json
/// { "dbName": "roadmap", "storageKey": "leetcodeRoadmap", "validation": "strict" }
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_tracker_with_config(config_json: *const c_char) -> *mut Tracker {
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
        Ok(config) => open_tracker(&config),
        Err(e) => {
            warn!("Invalid tracker config: {e}");
            std::ptr::null_mut()
        }
    }
}

fn open_tracker(config: &TrackerConfig) -> *mut Tracker {
    info!("Opening tracker database '{}'", config.db_name);

    match Tracker::open_lmdb(catalog::initial_roadmap(), config) {
        Ok(tracker) => {
            info!("✅ Tracker initialized successfully");
            Box::into_raw(Box::new(tracker))
        }
        Err(e) => {
            warn!("❌ Failed to initialize tracker: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Returns the current merged roadmap as a JSON array of topics.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_roadmap(state: *mut Tracker) -> *const c_char {
    let tracker = match tracker_ref(state, "get_roadmap") {
        Ok(t) => t,
        Err(err) => return err,
    };
    json_response(tracker.roadmap())
}

/// Returns the roadmap filtered for display.
///
/// `difficulty` is one of `"All"`, `"Easy"`, `"Medium"`, `"Hard"`. The stored
/// roadmap is not changed.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_filtered_roadmap(
    state: *mut Tracker,
    search: *const c_char,
    difficulty: *const c_char,
) -> *const c_char {
    let tracker = match tracker_ref(state, "get_filtered_roadmap") {
        Ok(t) => t,
        Err(err) => return err,
    };
    let search = match c_ptr_to_string(search, "search") {
        Ok(s) => s,
        Err(err) => return err,
    };
    let difficulty = match c_ptr_to_string(difficulty, "difficulty") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let difficulty: DifficultyFilter =
        match serde_json::from_value(serde_json::Value::String(difficulty)) {
            Ok(d) => d,
            Err(e) => {
                let error = AppResponse::BadRequest(format!("Unknown difficulty filter: {e}"));
                return response_to_c_string(&error);
            }
        };

    json_response(&filter::filter_roadmap(tracker.roadmap(), &search, difficulty))
}

/// Returns per-topic completion and solved-problem counts.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_progress(state: *mut Tracker) -> *const c_char {
    let tracker = match tracker_ref(state, "get_progress") {
        Ok(t) => t,
        Err(err) => return err,
    };
    json_response(&tracker.progress())
}

/// Returns one problem by id, or a `NotFound` response.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_problem(state: *mut Tracker, problem_id: *const c_char) -> *const c_char {
    let tracker = match tracker_ref(state, "get_problem") {
        Ok(t) => t,
        Err(err) => return err,
    };
    let problem_id = match c_ptr_to_string(problem_id, "problem_id") {
        Ok(s) => s,
        Err(err) => return err,
    };

    match tracker.find_problem(&problem_id) {
        Some(problem) => json_response(problem),
        None => {
            let error = AppResponse::NotFound(format!("No problem found with id: {problem_id}"));
            response_to_c_string(&error)
        }
    }
}

/// Expands or collapses a topic and returns the updated roadmap.
///
/// An unknown topic id leaves the roadmap unchanged.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn toggle_topic(state: *mut Tracker, topic_id: *const c_char) -> *const c_char {
    let tracker = match tracker_mut(state, "toggle_topic") {
        Ok(t) => t,
        Err(err) => return err,
    };
    let topic_id = match c_ptr_to_string(topic_id, "topic_id") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let result = tracker.toggle_topic(&topic_id);
    mutation_response(tracker, result)
}

/// Flips a sub-topic's completion flag and returns the updated roadmap.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn toggle_sub_topic_completion(
    state: *mut Tracker,
    topic_id: *const c_char,
    sub_topic_id: *const c_char,
) -> *const c_char {
    let tracker = match tracker_mut(state, "toggle_sub_topic_completion") {
        Ok(t) => t,
        Err(err) => return err,
    };
    let topic_id = match c_ptr_to_string(topic_id, "topic_id") {
        Ok(s) => s,
        Err(err) => return err,
    };
    let sub_topic_id = match c_ptr_to_string(sub_topic_id, "sub_topic_id") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let result = tracker.toggle_sub_topic_completion(&topic_id, &sub_topic_id);
    mutation_response(tracker, result)
}

/// Replaces a sub-topic's notes and returns the updated roadmap.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn update_sub_topic_notes(
    state: *mut Tracker,
    topic_id: *const c_char,
    sub_topic_id: *const c_char,
    notes: *const c_char,
) -> *const c_char {
    let tracker = match tracker_mut(state, "update_sub_topic_notes") {
        Ok(t) => t,
        Err(err) => return err,
    };
    let topic_id = match c_ptr_to_string(topic_id, "topic_id") {
        Ok(s) => s,
        Err(err) => return err,
    };
    let sub_topic_id = match c_ptr_to_string(sub_topic_id, "sub_topic_id") {
        Ok(s) => s,
        Err(err) => return err,
    };
    let notes = match c_ptr_to_string(notes, "notes") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let result = tracker.update_sub_topic_notes(&topic_id, &sub_topic_id, &notes);
    mutation_response(tracker, result)
}

/// Replaces a problem record with the JSON committed by the problem editor.
///
/// The JSON must be a complete problem record in the roadmap's camelCase
/// shape. Its `id` and context ids are pinned to the target problem.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn save_problem_details(
    state: *mut Tracker,
    topic_id: *const c_char,
    sub_topic_id: *const c_char,
    problem_id: *const c_char,
    problem_json: *const c_char,
) -> *const c_char {
    let tracker = match tracker_mut(state, "save_problem_details") {
        Ok(t) => t,
        Err(err) => return err,
    };
    let topic_id = match c_ptr_to_string(topic_id, "topic_id") {
        Ok(s) => s,
        Err(err) => return err,
    };
    let sub_topic_id = match c_ptr_to_string(sub_topic_id, "sub_topic_id") {
        Ok(s) => s,
        Err(err) => return err,
    };
    let problem_id = match c_ptr_to_string(problem_id, "problem_id") {
        Ok(s) => s,
        Err(err) => return err,
    };
    let json = match c_ptr_to_string(problem_json, "JSON") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let updated: Problem = match serde_json::from_str(&json) {
        Ok(p) => p,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid problem JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    let result = tracker.save_problem_details(&topic_id, &sub_topic_id, &problem_id, &updated);
    mutation_response(tracker, result)
}

/// Discards all user progress and returns the shipped roadmap.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn reset_progress(state: *mut Tracker) -> *const c_char {
    let tracker = match tracker_mut(state, "reset_progress") {
        Ok(t) => t,
        Err(err) => return err,
    };
    let result = tracker.reset_progress();
    mutation_response(tracker, result)
}

/// Flushes the store, closes it and frees the tracker handle.
///
/// The handle must not be used after this call, whatever the result.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_tracker(state: *mut Tracker) -> *const c_char {
    if state.is_null() {
        let error =
            AppResponse::BadRequest("Null state pointer passed to close_tracker".to_string());
        return response_to_c_string(&error);
    }

    let mut tracker = unsafe { Box::from_raw(state) };

    match tracker.store_mut().close_database() {
        Ok(_) => response_to_c_string(&AppResponse::success("Tracker closed successfully")),
        Err(e) => response_to_c_string(&e),
    }
}

/// Releases a string returned by any function in this library.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(ptr as *mut c_char) });
}

fn tracker_ref<'a>(state: *mut Tracker, caller: &str) -> Result<&'a Tracker, *const c_char> {
    match unsafe { state.as_ref() } {
        Some(t) => Ok(t),
        None => {
            let error = AppResponse::BadRequest(format!("Null state pointer passed to {caller}"));
            Err(response_to_c_string(&error))
        }
    }
}

fn tracker_mut<'a>(state: *mut Tracker, caller: &str) -> Result<&'a mut Tracker, *const c_char> {
    match unsafe { state.as_mut() } {
        Some(t) => Ok(t),
        None => {
            let error = AppResponse::BadRequest(format!("Null state pointer passed to {caller}"));
            Err(response_to_c_string(&error))
        }
    }
}

/// Responds with the roadmap after a mutation, or the persistence error.
fn mutation_response(tracker: &Tracker, result: Result<(), AppResponse>) -> *const c_char {
    match result {
        Ok(()) => json_response(tracker.roadmap()),
        Err(e) => response_to_c_string(&e),
    }
}

fn json_response<T: Serialize + ?Sized>(value: &T) -> *const c_char {
    match serde_json::to_string(value) {
        Ok(json) => response_to_c_string(&AppResponse::Ok(json)),
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Error serializing to JSON: {e}"));
            response_to_c_string(&error)
        }
    }
}

/// Converts an [`AppResponse`] to a C string owned by the caller.
///
/// Returns a null pointer if serialization or C string creation fails.
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

/// Converts a C string pointer to a Rust `String`.
///
/// On a null pointer or invalid UTF-8, returns the error response already
/// encoded for the caller.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}
