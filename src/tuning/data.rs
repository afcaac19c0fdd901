//! Tuning domain: serializable tuning definitions.

use serde::{Deserialize, Serialize};

/// Top-level wrapper for list-style RON data files.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile<T> {
    pub schema_version: u32,
    pub items: Vec<T>,
}

// ============================================================================
// Grind tuning (grind_tuning.ron, characters/*.json)
// ============================================================================

/// Per-character tuning entry. Every value may be absent; absence disables
/// the feature that depends on it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TuningDef {
    pub id: String,
    #[serde(default)]
    pub coyote_boost: Option<f32>,
    #[serde(default)]
    pub grind_x_speed: Option<f32>,
    #[serde(default)]
    pub grind_y_speed: Option<f32>,
    #[serde(default)]
    pub grind_vine_speed: Option<f32>,
    #[serde(default)]
    pub normal_x_speed: Option<f32>,
    #[serde(default)]
    pub normal_y_speed: Option<f32>,
    #[serde(default)]
    pub super_jump: Option<f32>,
    /// sRGB components in [0, 1]
    #[serde(default)]
    pub spark_color: Option<[f32; 3]>,
}

impl TuningDef {
    /// Tuning used when no data files could be read.
    pub fn builtin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            coyote_boost: Some(4.0),
            grind_x_speed: Some(10.0),
            grind_y_speed: Some(8.0),
            grind_vine_speed: Some(1.5),
            normal_x_speed: Some(1.0),
            normal_y_speed: Some(1.0),
            super_jump: Some(1.25),
            spark_color: Some([1.0, 0.85, 0.4]),
        }
    }

    /// Named numeric values, for validation and logging.
    pub fn numeric_fields(&self) -> [(&'static str, Option<f32>); 7] {
        [
            ("coyote_boost", self.coyote_boost),
            ("grind_x_speed", self.grind_x_speed),
            ("grind_y_speed", self.grind_y_speed),
            ("grind_vine_speed", self.grind_vine_speed),
            ("normal_x_speed", self.normal_x_speed),
            ("normal_y_speed", self.normal_y_speed),
            ("super_jump", self.super_jump),
        ]
    }
}
