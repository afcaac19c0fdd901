//! Loader for tuning files at startup.
//!
//! Two formats are read: the list-style `grind_tuning.ron`, and one JSON file
//! per character under `characters/` whose `features` map holds
//! `"rail_grind/<key>"` entries.

use bevy::prelude::*;
use ron::Options;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::data::*;
use super::registry::TuningRegistry;

/// Prefix of the feature keys this crate understands in character JSON files.
pub const FEATURE_PREFIX: &str = "rail_grind/";

/// Error type for tuning loading failures.
#[derive(Debug)]
pub struct TuningLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for TuningLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

fn read_file(path: &Path) -> Result<String, TuningLoadError> {
    fs::read_to_string(path).map_err(|e| TuningLoadError {
        file: path.display().to_string(),
        message: format!("IO error: {}", e),
    })
}

/// Parse the contents of a list-style RON tuning file.
pub fn parse_tuning_ron(contents: &str, file: &str) -> Result<Vec<TuningDef>, TuningLoadError> {
    let data: DataFile<TuningDef> =
        ron_options()
            .from_str(contents)
            .map_err(|e| TuningLoadError {
                file: file.to_string(),
                message: format!("Parse error: {}", e),
            })?;

    Ok(data.items)
}

/// Load a list-style RON tuning file.
pub fn load_tuning_file(path: &Path) -> Result<Vec<TuningDef>, TuningLoadError> {
    let contents = read_file(path)?;
    parse_tuning_ron(&contents, &path.display().to_string())
}

/// Raw character JSON structure.
#[derive(Deserialize)]
struct CharacterJson {
    id: String,
    #[serde(default)]
    features: HashMap<String, Value>,
}

/// A character file's tuning plus any of our feature keys it did not recognize.
#[derive(Debug)]
pub struct ParsedCharacter {
    pub tuning: TuningDef,
    pub unknown_features: Vec<String>,
}

/// Parse a character JSON document.
/// Features owned by other mods (different prefix) are ignored.
pub fn parse_character_json(contents: &str, file: &str) -> Result<ParsedCharacter, TuningLoadError> {
    let error = |message: String| TuningLoadError {
        file: file.to_string(),
        message,
    };

    let raw: CharacterJson =
        serde_json::from_str(contents).map_err(|e| error(format!("Parse error: {}", e)))?;

    let mut tuning = TuningDef {
        id: raw.id,
        ..Default::default()
    };
    let mut unknown_features = Vec::new();

    for (key, value) in &raw.features {
        let Some(name) = key.strip_prefix(FEATURE_PREFIX) else {
            continue;
        };

        let slot = match name {
            "coyote_boost" => &mut tuning.coyote_boost,
            "grind_x_speed" => &mut tuning.grind_x_speed,
            "grind_y_speed" => &mut tuning.grind_y_speed,
            "grind_vine_speed" => &mut tuning.grind_vine_speed,
            "normal_x_speed" => &mut tuning.normal_x_speed,
            "normal_y_speed" => &mut tuning.normal_y_speed,
            "super_jump" => &mut tuning.super_jump,
            "spark_color" => {
                tuning.spark_color = Some(
                    parse_color(value)
                        .ok_or_else(|| error(format!("Feature '{}' is not a color", key)))?,
                );
                continue;
            }
            _ => {
                unknown_features.push(key.clone());
                continue;
            }
        };

        let number = value
            .as_f64()
            .ok_or_else(|| error(format!("Feature '{}' is not a number", key)))?;
        *slot = Some(number as f32);
    }

    unknown_features.sort();
    Ok(ParsedCharacter {
        tuning,
        unknown_features,
    })
}

/// Accepts `"RRGGBB"` / `"#RRGGBB"` strings or `[r, g, b]` arrays in [0, 1].
fn parse_color(value: &Value) -> Option<[f32; 3]> {
    match value {
        Value::String(hex) => {
            let color = Srgba::hex(hex.trim_start_matches('#')).ok()?;
            Some([color.red, color.green, color.blue])
        }
        Value::Array(items) if items.len() == 3 => {
            let mut rgb = [0.0; 3];
            for (channel, item) in rgb.iter_mut().zip(items) {
                *channel = item.as_f64()? as f32;
            }
            Some(rgb)
        }
        _ => None,
    }
}

/// Load a single character JSON file.
pub fn load_character_file(path: &Path) -> Result<ParsedCharacter, TuningLoadError> {
    let contents = read_file(path)?;
    parse_character_json(&contents, &path.display().to_string())
}

/// Load `grind_tuning.ron` and every `characters/*.json` under `base_path`.
/// Character files override RON entries with the same id.
pub fn load_all_tuning(base_path: &Path) -> Result<TuningRegistry, Vec<TuningLoadError>> {
    let mut registry = TuningRegistry::default();
    let mut errors = Vec::new();

    match load_tuning_file(&base_path.join("grind_tuning.ron")) {
        Ok(items) => {
            for item in items {
                registry.insert(item);
            }
        }
        Err(e) => errors.push(e),
    }

    let characters_dir = base_path.join("characters");
    if characters_dir.is_dir() {
        let entries = fs::read_dir(&characters_dir).map_err(|e| {
            vec![TuningLoadError {
                file: characters_dir.display().to_string(),
                message: format!("IO error: {}", e),
            }]
        })?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            match load_character_file(&path) {
                Ok(parsed) => {
                    for key in &parsed.unknown_features {
                        warn!("{}: unknown feature '{}'", path.display(), key);
                    }
                    registry.insert(parsed.tuning);
                }
                Err(e) => errors.push(e),
            }
        }
    }

    if errors.is_empty() {
        Ok(registry)
    } else {
        Err(errors)
    }
}
