//! Pattern builder — groups mapped notes into per-instrument tracks on a
//! fixed tick grid.

use serde::Serialize;

use crate::model::MappedNote;

/// Output grid size in ticks. Hydrogen patterns are always exported at 384.
pub const PATTERN_LENGTH: i64 = 384;

/// Sentinel length meaning "play the full sample".
pub const DEFAULT_NOTE_LENGTH: i32 = -1;

/// A note placed on the output grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatternNote {
    /// Tick on the output grid
    pub position: i64,
    /// Volume on the 0–127 scale
    pub volume: i32,
    /// Always `DEFAULT_NOTE_LENGTH`
    pub duration: i32,
}

/// All notes played by one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    pub instrument: String,
    pub notes: Vec<PatternNote>,
}

/// A drum pattern under construction.
///
/// Tracks keep the order in which their instrument was first added, which
/// also fixes the numeric instrument IDs in the exported file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrumPattern {
    pub tempo: i32,
    pub length: i64,
    pub tracks: Vec<Track>,
}

impl DrumPattern {
    pub fn new(tempo: i32, length: i64) -> Self {
        Self {
            tempo,
            length,
            tracks: Vec::new(),
        }
    }

    /// Build a pattern from mapped notes, rescaling their positions onto
    /// a grid of `length` ticks.
    ///
    /// The scaling denominator is the largest input position across all
    /// notes. When that is 0 every note lands on tick 0.
    pub fn from_notes(notes: &[MappedNote], tempo: i32, length: i64) -> Self {
        let max_ticks = notes.iter().map(|n| n.position).max().unwrap_or(0);

        let mut pattern = Self::new(tempo, length);
        for note in notes {
            let position = if max_ticks > 0 {
                note.position * length / max_ticks
            } else {
                0
            };
            pattern.add_note_at_position(&note.instrument, note, position);
        }

        tracing::debug!(
            notes = notes.len(),
            tracks = pattern.tracks.len(),
            max_ticks,
            "built drum pattern"
        );
        pattern
    }

    /// Append a note to an instrument's track at an explicit grid position.
    pub fn add_note_at_position(&mut self, instrument: &str, note: &MappedNote, position: i64) {
        let pattern_note = PatternNote {
            position,
            volume: note.volume,
            duration: DEFAULT_NOTE_LENGTH,
        };

        match self.tracks.iter_mut().find(|t| t.instrument == instrument) {
            Some(track) => track.notes.push(pattern_note),
            None => self.tracks.push(Track {
                instrument: instrument.to_string(),
                notes: vec![pattern_note],
            }),
        }
    }

    /// Instrument names paired with their numeric IDs, `0..K`.
    pub fn instrument_ids(&self) -> impl Iterator<Item = (usize, &str)> {
        self.tracks
            .iter()
            .enumerate()
            .map(|(id, t)| (id, t.instrument.as_str()))
    }

    pub fn track(&self, instrument: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.instrument == instrument)
    }

    pub fn note_count(&self) -> usize {
        self.tracks.iter().map(|t| t.notes.len()).sum()
    }
}
