//! TuningRegistry resource providing per-character tuning lookups.

use bevy::prelude::*;
use std::collections::HashMap;

use super::GrindTuning;
use super::data::TuningDef;

/// Tuning entries keyed by character id.
#[derive(Resource, Debug, Default)]
pub struct TuningRegistry {
    pub entries: HashMap<String, TuningDef>,
}

impl TuningRegistry {
    /// Registry holding only the built-in tuning for `id`.
    pub fn builtin(id: &str) -> Self {
        let mut registry = Self::default();
        registry.insert(TuningDef::builtin(id));
        registry
    }

    /// Insert or replace the entry with the same id.
    pub fn insert(&mut self, def: TuningDef) {
        if self.entries.insert(def.id.clone(), def).is_some() {
            debug!("Tuning entry replaced by a later source");
        }
    }

    pub fn get(&self, id: &str) -> Option<&TuningDef> {
        self.entries.get(id)
    }

    /// Runtime tuning for a character. Unknown ids get an empty tuning, which
    /// leaves the character with unmodified host locomotion.
    pub fn tuning_for(&self, id: &str) -> GrindTuning {
        match self.entries.get(id) {
            Some(def) => GrindTuning::from(def),
            None => {
                warn!("No tuning for character '{}', grinding disabled", id);
                GrindTuning::default()
            }
        }
    }

    /// Returns a summary of loaded entries for logging.
    pub fn summary(&self) -> String {
        let mut ids: Vec<_> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        format!(
            "TuningRegistry loaded {} entries: {}",
            self.entries.len(),
            ids.join(", ")
        )
    }
}
