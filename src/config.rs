//! Converter configuration, loaded from a TOML file.
//!
//! ```toml
//! tempo = 120
//! pattern_length = 384
//! input_file = "groove.musicxml"
//! output_file = "groove.h2pattern"
//! timing = "flat"
//!
//! [drum_mappings]
//! C4 = "Kick"
//! D4 = "Snare"
//!
//! [volume_levels]
//! Kick = 100
//! Snare = 90
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// How note positions are derived before grid scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimingMode {
    /// Every note sits at position 0 (the converter's historical output).
    #[default]
    Flat,
    /// Positions are the running sum of prior durations within each part.
    Accumulated,
}

/// Typed converter settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tempo in BPM carried on the pattern
    pub tempo: i32,
    /// Pitch key ("C4") → instrument name
    pub drum_mappings: HashMap<String, String>,
    /// Reserved: grid length requested by the user (output is always 384)
    pub pattern_length: i32,
    /// Reserved: grid division
    pub division: i32,
    /// Reserved: swing amount
    pub swing: f64,
    /// Instrument name → volume on the 0–127 scale
    pub volume_levels: HashMap<String, i32>,
    pub input_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub timing: TimingMode,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// YAML files (`.yaml`/`.yml`) are refused with a hint: the keys are the
    /// same but the file must be rewritten as TOML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        ) {
            return Err(ConvertError::Config(format!(
                "'{}' is YAML; configuration is read as TOML with the same keys \
                 (e.g. `tempo = 120`, `[drum_mappings]`)",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path).map_err(|e| {
            ConvertError::Config(format!("Failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ConvertError::Config(e.to_string()))
    }

    /// Instrument mapped to a pitch key, if any.
    pub fn instrument_for(&self, pitch_key: &str) -> Option<&str> {
        self.drum_mappings.get(pitch_key).map(String::as_str)
    }

    /// Volume of an instrument; unlisted instruments are silent.
    pub fn volume_for(&self, instrument: &str) -> i32 {
        self.volume_levels.get(instrument).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg = Config::from_toml_str(
            r#"
            tempo = 96
            pattern_length = 192
            division = 4
            swing = 0.25
            input_file = "in.musicxml"
            output_file = "out.h2pattern"
            timing = "accumulated"

            [drum_mappings]
            C4 = "Kick"

            [volume_levels]
            Kick = 110
            "#,
        )
        .unwrap();

        assert_eq!(cfg.tempo, 96);
        assert_eq!(cfg.division, 4);
        assert_eq!(cfg.timing, TimingMode::Accumulated);
        assert_eq!(cfg.instrument_for("C4"), Some("Kick"));
        assert_eq!(cfg.volume_for("Kick"), 110);
        assert_eq!(cfg.input_file.as_deref(), Some(Path::new("in.musicxml")));
    }

    #[test]
    fn missing_keys_take_defaults() {
        let cfg = Config::from_toml_str("tempo = 120").unwrap();
        assert_eq!(cfg.timing, TimingMode::Flat);
        assert!(cfg.drum_mappings.is_empty());
        assert_eq!(cfg.volume_for("Snare"), 0);
        assert_eq!(cfg.instrument_for("C4"), None);
        assert!(cfg.output_file.is_none());
    }

    #[test]
    fn rejects_bad_types() {
        let err = Config::from_toml_str("tempo = \"fast\"").unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }

    #[test]
    fn load_refuses_yaml_with_a_hint() {
        let err = Config::load("config.yaml").unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
        let msg = err.to_string();
        assert!(msg.contains("config.yaml"));
        assert!(msg.contains("TOML"));
        assert!(Config::load("settings.yml").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load("/nonexistent/drumgrid.toml").unwrap_err();
        assert!(err.to_string().contains("drumgrid.toml"));
    }
}
