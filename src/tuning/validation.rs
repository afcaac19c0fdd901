//! Validation for loaded tuning values.

use super::data::TuningDef;
use super::registry::TuningRegistry;

/// A tuning value that is present but unusable.
#[derive(Debug, PartialEq)]
pub struct TuningValidationError {
    pub tuning_id: String,
    pub field: &'static str,
    pub reason: &'static str,
}

impl std::fmt::Display for TuningValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tuning '{}' field '{}' {}",
            self.tuning_id, self.field, self.reason
        )
    }
}

/// Validate a single tuning entry.
pub fn validate_def(def: &TuningDef) -> Vec<TuningValidationError> {
    let mut errors = Vec::new();
    let mut push = |field, reason| {
        errors.push(TuningValidationError {
            tuning_id: def.id.clone(),
            field,
            reason,
        })
    };

    for (field, value) in def.numeric_fields() {
        let Some(value) = value else { continue };
        if !value.is_finite() {
            push(field, "is not finite");
        } else if value < 0.0 {
            push(field, "is negative");
        }
    }

    if def.super_jump == Some(0.0) {
        push("super_jump", "is zero and would cancel every jump boost");
    }

    if let Some(rgb) = def.spark_color {
        if rgb.iter().any(|c| !(0.0..=1.0).contains(c)) {
            push("spark_color", "has a channel outside [0, 1]");
        }
    }

    errors
}

/// Validate every entry in the registry.
/// Returns a list of validation errors, empty if all values are usable.
pub fn validate_tuning(registry: &TuningRegistry) -> Vec<TuningValidationError> {
    let mut ids: Vec<_> = registry.entries.keys().collect();
    ids.sort();
    ids.into_iter()
        .flat_map(|id| validate_def(&registry.entries[id]))
        .collect()
}
