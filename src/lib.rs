//! drumgrid — converts MusicXML scores into Hydrogen drum patterns.
//!
//! Supports both uncompressed MusicXML (.musicxml) and compressed MXL (.mxl) files.
//! Pitches are mapped onto drum instruments through the [`Config`] tables and
//! the resulting hits are laid out on a 384-tick pattern grid.
//!
//! # Example
//! ```no_run
//! use drumgrid::{build_and_export, parse_file_with_config, Config};
//!
//! let config = Config::load("config.toml").unwrap();
//! let notes = parse_file_with_config("groove.musicxml", &config).unwrap();
//! let pattern = build_and_export(&notes, config.tempo, "groove.h2pattern").unwrap();
//! println!("Tracks: {}", pattern.tracks.len());
//! ```

pub mod config;
pub mod error;
pub mod hydrogen;
pub mod mapper;
pub mod model;
pub mod mxl;
pub mod parser;
pub mod pattern;

use std::path::Path;

pub use config::{Config, TimingMode};
pub use error::{ConvertError, Result};
pub use hydrogen::{document_to_json, render_document, DrumkitPattern, InstrumentNote};
pub use mapper::{map_notes, map_score};
pub use model::*;
pub use mxl::parse_mxl;
pub use parser::parse_musicxml;
pub use pattern::{DrumPattern, PatternNote, Track, PATTERN_LENGTH};

/// Parse a MusicXML file from a file path.
/// Automatically detects format based on file extension:
/// - `.musicxml` or `.xml` → uncompressed MusicXML
/// - `.mxl` → compressed MXL (ZIP archive)
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ScoreNotes> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| {
        ConvertError::Parse(format!("Failed to read file '{}': {e}", path.display()))
    })?;

    parse_bytes(&data, path.extension().and_then(|e| e.to_str()))
}

/// Parse MusicXML from raw bytes with an optional format hint.
/// If `extension` is None, tries to auto-detect the format.
pub fn parse_bytes(data: &[u8], extension: Option<&str>) -> Result<ScoreNotes> {
    match extension {
        Some("mxl") => parse_mxl(data),
        Some("musicxml") | Some("xml") => {
            let xml = std::str::from_utf8(data).map_err(|e| {
                ConvertError::Parse(format!("Invalid UTF-8 in MusicXML file: {e}"))
            })?;
            parse_musicxml(xml)
        }
        _ => {
            // Auto-detect: try as XML first, then as MXL
            if let Ok(xml) = std::str::from_utf8(data) {
                if xml.trim_start().starts_with('<') {
                    return parse_musicxml(xml);
                }
            }
            parse_mxl(data)
        }
    }
}

/// Parse a score and map its notes onto drum instruments.
pub fn parse_file_with_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<Vec<MappedNote>> {
    let score = parse_file(path)?;
    Ok(map_score(&score, config))
}

/// Lay mapped notes out on the pattern grid and write them as a `.h2pattern` file.
pub fn build_and_export<P: AsRef<Path>>(
    notes: &[MappedNote],
    tempo: i32,
    output: P,
) -> Result<DrumPattern> {
    let pattern = DrumPattern::from_notes(notes, tempo, PATTERN_LENGTH);
    pattern.export_to_file(output)?;
    Ok(pattern)
}

/// Run the whole pipeline: parse `input`, map it with `config`, export to `output`.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
    config: &Config,
    input: P,
    output: Q,
) -> Result<DrumPattern> {
    let notes = parse_file_with_config(input, config)?;
    build_and_export(&notes, config.tempo, output)
}
