//! Data model for notes flowing through the conversion pipeline.
//!
//! `RawNote` is what the score reader sees, `MappedNote` is what the
//! instrument mapper hands to the pattern builder.

use serde::{Deserialize, Serialize};

/// Pitch of a note as written in the score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitch {
    /// Note name: A, B, C, D, E, F, G (empty when the score omits it)
    pub step: String,
    /// Octave number (middle C = C4)
    pub octave: i32,
}

impl Pitch {
    pub fn new(step: impl Into<String>, octave: i32) -> Self {
        Self {
            step: step.into(),
            octave,
        }
    }

    /// Lookup key for the drum mapping table, e.g. "C4".
    pub fn key(&self) -> String {
        format!("{}{}", self.step, self.octave)
    }
}

/// A note or rest exactly as encountered in the score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNote {
    /// Written pitch; zero-valued for rests and pitchless notes
    pub pitch: Pitch,
    /// Duration in divisions
    pub duration: i32,
    /// Whether the note carries a `<rest/>` marker
    pub rest: bool,
    /// Whether this note sounds together with the previous one
    pub chord: bool,
}

impl RawNote {
    pub fn note(step: &str, octave: i32, duration: i32) -> Self {
        Self {
            pitch: Pitch::new(step, octave),
            duration,
            rest: false,
            chord: false,
        }
    }

    pub fn rest(duration: i32) -> Self {
        Self {
            pitch: Pitch::default(),
            duration,
            rest: true,
            chord: false,
        }
    }
}

/// A note resolved to a drum instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedNote {
    /// Instrument name (key into the pattern's track map)
    pub instrument: String,
    /// Position in input ticks
    pub position: i64,
    /// Volume on the 0–127 scale
    pub volume: i32,
    /// Duration in divisions
    pub duration: i32,
}

/// A part of the score, reduced to its note transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartNotes {
    /// Part identifier (e.g., "P1")
    pub id: String,
    pub notes: Vec<RawNote>,
}

/// The note transcript of a whole score, parts in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreNotes {
    pub parts: Vec<PartNotes>,
}

impl ScoreNotes {
    /// All notes of all parts, concatenated in encounter order.
    pub fn flatten(&self) -> Vec<RawNote> {
        self.parts
            .iter()
            .flat_map(|p| p.notes.iter().cloned())
            .collect()
    }

    /// Total number of notes and rests across all parts.
    pub fn note_count(&self) -> usize {
        self.parts.iter().map(|p| p.notes.len()).sum()
    }
}
