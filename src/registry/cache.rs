use parking_lot::Mutex;
use std::collections::HashMap;

use crate::domain::{GeneRecord, ValidatedRecord};
use crate::utils::hash_text;

// Process-lifetime memoization of a validation run, keyed by a
// fingerprint of the full input record sequence. No eviction.
#[derive(Default)]
pub struct ValidationCache {
    entries: Mutex<HashMap<String, Vec<ValidatedRecord>>>,
}

impl ValidationCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(records: &[GeneRecord]) -> Option<String> {
        serde_json::to_string(records).ok().map(|payload| hash_text(&payload))
    }

    pub fn get(&self, records: &[GeneRecord]) -> Option<Vec<ValidatedRecord>> {
        let key = Self::key(records)?;
        self.entries.lock().get(&key).cloned()
    }

    pub fn store(&self, records: &[GeneRecord], validated: &[ValidatedRecord]) {
        if let Some(key) = Self::key(records) {
            self.entries.lock().insert(key, validated.to_vec());
        }
    }
}
