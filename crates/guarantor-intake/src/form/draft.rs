//! Client-local draft persistence for not-yet-submitted forms.
//!
//! The controller only ever reads and writes one slot, keyed by
//! [`DRAFT_KEY`]. A value that fails to deserialize is treated as absent so a
//! corrupted draft can never wedge the form.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::warn;

use crate::guarantors::domain::GuarantorFormData;

/// Fixed key under which the single in-progress draft is stored.
pub const DRAFT_KEY: &str = "guarantor_form_draft";

/// Minimal key-value surface the controller needs from local storage. Kept
/// string-typed so the controller owns (de)serialization and can fail open.
pub trait DraftStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Load and decode the draft slot. Malformed content is logged and discarded.
pub fn load_draft(store: &dyn DraftStore) -> Option<GuarantorFormData> {
    let raw = store.get(DRAFT_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(data) => Some(data),
        Err(error) => {
            warn!(%error, "discarding malformed form draft");
            None
        }
    }
}

/// Serialize and overwrite the draft slot.
pub fn save_draft(store: &dyn DraftStore, data: &GuarantorFormData) {
    match serde_json::to_string(data) {
        Ok(raw) => store.set(DRAFT_KEY, &raw),
        Err(error) => warn!(%error, "failed to serialize form draft"),
    }
}

pub fn clear_draft(store: &dyn DraftStore) {
    store.remove(DRAFT_KEY);
}

/// Test and demo double backed by a mutex-guarded map.
#[derive(Default)]
pub struct InMemoryDraftStore {
    slots: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

impl DraftStore for InMemoryDraftStore {
    fn get(&self, key: &str) -> Option<String> {
        self.slots
            .lock()
            .expect("draft store mutex poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.slots
            .lock()
            .expect("draft store mutex poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.slots
            .lock()
            .expect("draft store mutex poisoned")
            .remove(key);
    }
}

/// Draft store persisting each key as `<dir>/<key>.json`. Read and write
/// failures degrade to "no draft" with a warning, matching the fails-open
/// policy for local state.
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DraftStore for FileDraftStore {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Some(raw),
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => {
                warn!(%error, key, "failed to read draft file");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(error) = fs::create_dir_all(&self.dir) {
            warn!(%error, "failed to create draft directory");
            return;
        }
        if let Err(error) = fs::write(self.path_for(key), value) {
            warn!(%error, key, "failed to write draft file");
        }
    }

    fn remove(&self, key: &str) {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => warn!(%error, key, "failed to remove draft file"),
        }
    }
}
