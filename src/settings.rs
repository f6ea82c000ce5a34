use std::fmt;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::note_map::RangeMap;
use crate::files::{read_json, write_json};
use crate::model::DEFAULT_VELOCITY;

// ── Error type ──────────────────────────────────────────────────────

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "I/O error: {e}"),
            SettingsError::Json(e) => write!(f, "JSON error: {e}"),
            SettingsError::Invalid(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Json(e)
    }
}

// ── Conversion settings ─────────────────────────────────────────────

const SETTINGS_VERSION: u32 = 1;

/// Default breakpoints: twelve even steps over the 8-bit range.
pub const DEFAULT_BREAKPOINTS: [i32; 12] = [0, 21, 42, 63, 84, 105, 126, 147, 168, 189, 210, 231];
/// Default notes: C major over two octaves starting at middle C.
pub const DEFAULT_NOTES: [u8; 12] = [60, 62, 64, 65, 67, 69, 71, 72, 74, 75, 79, 81];

/// Column step between the starting points of successive fixed-range tracks.
pub const DEFAULT_TRACK_SPACING: u32 = 4;

/// Conversion settings, optionally loaded from a JSON file. Every field may
/// be omitted; missing fields take the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Settings {
    pub version: u32,
    /// Ascending thresholds. A value maps to the note of the first
    /// breakpoint that is greater than or equal to it.
    pub breakpoints: Vec<i32>,
    /// One MIDI note number (0-127) per breakpoint.
    pub notes: Vec<u8>,
    /// Velocity written for every note event (1-127).
    pub velocity: u8,
    /// Fixed-range mode: column step between track starting points.
    pub track_spacing: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            breakpoints: DEFAULT_BREAKPOINTS.to_vec(),
            notes: DEFAULT_NOTES.to_vec(),
            velocity: DEFAULT_VELOCITY,
            track_spacing: DEFAULT_TRACK_SPACING,
        }
    }
}

impl Settings {
    /// Check every invariant the converter relies on.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.version != SETTINGS_VERSION {
            return Err(SettingsError::Invalid(format!(
                "unsupported settings version {} (expected {SETTINGS_VERSION})",
                self.version
            )));
        }
        if let Some(note) = self.notes.iter().find(|n| **n > 127) {
            return Err(SettingsError::Invalid(format!(
                "note {note} is outside the MIDI range 0-127"
            )));
        }
        if !(1..=127).contains(&self.velocity) {
            return Err(SettingsError::Invalid(format!(
                "velocity {} is outside 1-127",
                self.velocity
            )));
        }
        self.note_map().map(|_| ())
    }

    /// Build the breakpoint table these settings describe.
    pub fn note_map(&self) -> Result<RangeMap<i32, u8>, SettingsError> {
        RangeMap::new(self.breakpoints.clone(), self.notes.clone()).map_err(SettingsError::Invalid)
    }
}

/// Load and validate settings from a JSON file.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let settings: Settings = read_json(path)?;
    settings.validate()?;
    Ok(settings)
}

/// Write settings as pretty-printed JSON (atomic write).
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    write_json(path, settings)
}

/// JSON schema of the settings file.
pub fn settings_schema() -> Result<String, SettingsError> {
    let schema = schemars::schema_for!(Settings);
    Ok(serde_json::to_string_pretty(&schema)?)
}
