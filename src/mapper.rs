//! Instrument mapping — turns the score's note transcript into drum hits.
//!
//! Rests and notes without a drum mapping are dropped here; nothing
//! downstream ever sees them.

use crate::config::{Config, TimingMode};
use crate::model::{MappedNote, RawNote, ScoreNotes};

/// Map a flat note sequence with every position at 0.
pub fn map_notes(notes: &[RawNote], config: &Config) -> Vec<MappedNote> {
    notes
        .iter()
        .filter_map(|note| map_note(note, 0, config))
        .collect()
}

/// Map a whole score, deriving positions according to `config.timing`.
pub fn map_score(score: &ScoreNotes, config: &Config) -> Vec<MappedNote> {
    let mapped = match config.timing {
        TimingMode::Flat => map_notes(&score.flatten(), config),
        TimingMode::Accumulated => score
            .parts
            .iter()
            .flat_map(|part| {
                onsets(&part.notes)
                    .into_iter()
                    .zip(&part.notes)
                    .filter_map(move |(onset, note)| map_note(note, onset, config))
            })
            .collect(),
    };

    tracing::debug!(
        mapped = mapped.len(),
        total = score.note_count(),
        timing = ?config.timing,
        "mapped notes to instruments"
    );
    mapped
}

/// Onset of each note: the running sum of prior durations.
///
/// A chord note starts with the note before it and does not advance time.
fn onsets(notes: &[RawNote]) -> Vec<i64> {
    let mut clock: i64 = 0;
    let mut last_onset: i64 = 0;
    notes
        .iter()
        .map(|note| {
            if note.chord {
                return last_onset;
            }
            last_onset = clock;
            clock += i64::from(note.duration.max(0));
            last_onset
        })
        .collect()
}

fn map_note(note: &RawNote, position: i64, config: &Config) -> Option<MappedNote> {
    if note.rest {
        return None;
    }

    let pitch = note.pitch.key();
    let Some(instrument) = config.instrument_for(&pitch) else {
        tracing::warn!("No mapping for pitch: {pitch}");
        return None;
    };

    Some(MappedNote {
        instrument: instrument.to_string(),
        position,
        volume: config.volume_for(instrument),
        duration: note.duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PartNotes;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Shared sink for formatted log lines.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn config() -> Config {
        let mut cfg = Config::default();
        cfg.drum_mappings.insert("C4".into(), "Kick".into());
        cfg.drum_mappings.insert("D4".into(), "Snare".into());
        cfg.drum_mappings.insert("F4".into(), "Hat".into());
        cfg.volume_levels.insert("Kick".into(), 100);
        cfg
    }

    #[test]
    fn drops_rests_and_unmapped_pitches() {
        let notes = vec![
            RawNote::note("C", 4, 100),
            RawNote::rest(50),
            RawNote::note("E", 4, 50),
            RawNote::note("D", 4, 25),
        ];
        let mapped = map_notes(&notes, &config());
        let names: Vec<&str> = mapped.iter().map(|n| n.instrument.as_str()).collect();
        assert_eq!(names, vec!["Kick", "Snare"]);
    }

    #[test]
    fn unmapped_pitch_logs_a_warning() {
        let mut cfg = Config::default();
        cfg.drum_mappings.insert("C4".into(), "Kick".into());

        let logs = capture_logs(|| {
            let mapped = map_notes(&[RawNote::note("C", 4, 100), RawNote::note("D", 4, 50)], &cfg);
            assert_eq!(mapped.len(), 1);
        });
        let warnings: Vec<&str> = logs.lines().filter(|l| l.contains("No mapping")).collect();
        assert_eq!(warnings.len(), 1, "logs: {logs}");
        assert!(warnings[0].contains("WARN"));
        assert!(warnings[0].contains("No mapping for pitch: D4"));
    }

    #[test]
    fn mapped_pitch_logs_nothing() {
        let mut cfg = Config::default();
        cfg.drum_mappings.insert("C4".into(), "Kick".into());

        let logs = capture_logs(|| {
            map_notes(&[RawNote::note("C", 4, 100), RawNote::rest(10)], &cfg);
        });
        assert!(!logs.contains("No mapping"), "logs: {logs}");
    }

    #[test]
    fn rest_is_dropped_even_when_its_key_is_mapped() {
        let mut cfg = config();
        cfg.drum_mappings.insert("0".into(), "Kick".into());
        assert!(map_notes(&[RawNote::rest(4)], &cfg).is_empty());
    }

    #[test]
    fn volume_defaults_to_zero_for_unlisted_instrument() {
        let mapped = map_notes(&[RawNote::note("C", 4, 1), RawNote::note("D", 4, 2)], &config());
        assert_eq!(mapped[0].volume, 100);
        assert_eq!(mapped[1].volume, 0);
        assert_eq!(mapped[1].duration, 2);
    }

    #[test]
    fn flat_mode_places_everything_at_zero() {
        let score = ScoreNotes {
            parts: vec![PartNotes {
                id: "P1".into(),
                notes: vec![RawNote::note("C", 4, 8), RawNote::note("D", 4, 8)],
            }],
        };
        let mapped = map_score(&score, &config());
        assert!(mapped.iter().all(|n| n.position == 0));
    }

    #[test]
    fn accumulated_mode_sums_prior_durations_per_part() {
        let mut chord = RawNote::note("D", 4, 4);
        chord.chord = true;
        let score = ScoreNotes {
            parts: vec![
                PartNotes {
                    id: "P1".into(),
                    notes: vec![
                        RawNote::note("C", 4, 4),
                        RawNote::rest(2),
                        RawNote::note("E", 4, 2),
                        RawNote::note("C", 4, 4),
                        chord,
                        RawNote::note("D", 4, 1),
                    ],
                },
                PartNotes {
                    id: "P2".into(),
                    notes: vec![RawNote::note("F", 4, 3)],
                },
            ],
        };
        let mut cfg = config();
        cfg.timing = TimingMode::Accumulated;

        let positions: Vec<(String, i64)> = map_score(&score, &cfg)
            .into_iter()
            .map(|n| (n.instrument, n.position))
            .collect();
        assert_eq!(
            positions,
            vec![
                ("Kick".to_string(), 0),
                ("Kick".to_string(), 8),
                ("Snare".to_string(), 8),
                ("Snare".to_string(), 12),
                ("Hat".to_string(), 0),
            ]
        );
    }
}
