//! Tuning domain: per-character grind and jump parameters.
//!
//! Values come from data files and are optional per key. What a missing key
//! disables:
//!
//! | Missing key | Effect |
//! |---|---|
//! | any of `grind_x_speed`, `grind_y_speed`, `grind_vine_speed`, `normal_x_speed`, `normal_y_speed` | no grinding; host locomotion untouched |
//! | `super_jump` or `coyote_boost` | jumps pass through unmodified |
//! | `spark_color` | sparks fall back to [`DEFAULT_SPARK_COLOR`] |

use bevy::prelude::*;
use std::path::Path;

mod data;
mod loader;
mod registry;
mod validation;


pub use data::{DataFile, TuningDef};
pub use loader::{
    FEATURE_PREFIX, ParsedCharacter, TuningLoadError, load_all_tuning, load_character_file,
    load_tuning_file, parse_character_json, parse_tuning_ron,
};
pub use registry::TuningRegistry;
pub use validation::{TuningValidationError, validate_def, validate_tuning};

use crate::character::SpeedFactors;

/// Directory scanned for tuning files at startup.
pub const TUNING_DATA_DIR: &str = "assets/data";

/// Character id used when nothing else is configured.
pub const DEFAULT_CHARACTER_ID: &str = "grinder";

pub const DEFAULT_SPARK_COLOR: Color = Color::WHITE;

/// Runtime tuning attached to each character.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct GrindTuning {
    pub coyote_boost: Option<f32>,
    pub grind_x_speed: Option<f32>,
    pub grind_y_speed: Option<f32>,
    pub grind_vine_speed: Option<f32>,
    pub normal_x_speed: Option<f32>,
    pub normal_y_speed: Option<f32>,
    pub super_jump: Option<f32>,
    pub spark_color: Option<Color>,
}

/// Speeds needed for grinding; all present or grinding is off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrindSpeeds {
    pub grind_x: f32,
    pub grind_y: f32,
    pub grind_vine: f32,
    pub normal_x: f32,
    pub normal_y: f32,
}

impl GrindSpeeds {
    /// Speed factors for ordinary, non-grinding movement.
    pub fn normal_factors(&self) -> SpeedFactors {
        SpeedFactors {
            run: self.normal_x,
            climb: self.normal_y,
        }
    }
}

/// Values the trick jump needs; both present or jumps pass through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrickTuning {
    pub coyote_boost: f32,
    pub super_jump: f32,
}

impl GrindTuning {
    pub fn grind_speeds(&self) -> Option<GrindSpeeds> {
        Some(GrindSpeeds {
            grind_x: self.grind_x_speed?,
            grind_y: self.grind_y_speed?,
            grind_vine: self.grind_vine_speed?,
            normal_x: self.normal_x_speed?,
            normal_y: self.normal_y_speed?,
        })
    }

    pub fn trick(&self) -> Option<TrickTuning> {
        Some(TrickTuning {
            coyote_boost: self.coyote_boost?,
            super_jump: self.super_jump?,
        })
    }

    pub fn spark_color(&self) -> Color {
        self.spark_color.unwrap_or(DEFAULT_SPARK_COLOR)
    }
}

impl From<&TuningDef> for GrindTuning {
    fn from(def: &TuningDef) -> Self {
        Self {
            coyote_boost: def.coyote_boost,
            grind_x_speed: def.grind_x_speed,
            grind_y_speed: def.grind_y_speed,
            grind_vine_speed: def.grind_vine_speed,
            normal_x_speed: def.normal_x_speed,
            normal_y_speed: def.normal_y_speed,
            super_jump: def.super_jump,
            spark_color: def.spark_color.map(|[r, g, b]| Color::srgb(r, g, b)),
        }
    }
}

pub struct TuningPlugin;

impl Plugin for TuningPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_tuning);
    }
}

/// Load tuning files into the registry, falling back to built-in values.
fn load_tuning(mut commands: Commands) {
    let registry = match load_all_tuning(Path::new(TUNING_DATA_DIR)) {
        Ok(registry) => registry,
        Err(errors) => {
            for e in &errors {
                error!("{}", e);
            }
            warn!("Using built-in tuning for '{}'", DEFAULT_CHARACTER_ID);
            TuningRegistry::builtin(DEFAULT_CHARACTER_ID)
        }
    };

    for e in validate_tuning(&registry) {
        warn!("{}", e);
    }

    info!("{}", registry.summary());
    commands.insert_resource(registry);
}
