//! MusicXML parser — extracts the note transcript of a score.
//!
//! Only the part → measure → note hierarchy is read. Everything else in the
//! document (credits, part-list, directions, harmonies, ...) is skipped.

use roxmltree::{Document, Node};

use crate::error::{ConvertError, Result};
use crate::model::*;

/// Parse a MusicXML XML string into its note transcript.
pub fn parse_musicxml(xml: &str) -> Result<ScoreNotes> {
    // MusicXML files include a DOCTYPE declaration, so we must allow DTDs
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = Document::parse_with_options(xml, options)
        .map_err(|e| ConvertError::Parse(format!("XML parse error: {e}")))?;
    let root = doc.root_element();

    // Any root is accepted; one without <part> children has no notes.
    let mut score = ScoreNotes::default();
    for child in elements(&root) {
        if child.tag_name().name() == "part" {
            score.parts.push(parse_part(&child)?);
        }
    }

    tracing::debug!(
        parts = score.parts.len(),
        notes = score.note_count(),
        "parsed MusicXML"
    );
    Ok(score)
}

// ─── Part ────────────────────────────────────────────────────────────

fn parse_part(node: &Node) -> Result<PartNotes> {
    let mut part = PartNotes {
        id: node.attribute("id").unwrap_or("").to_string(),
        notes: Vec::new(),
    };

    for measure in elements(node).filter(|n| n.tag_name().name() == "measure") {
        for note in elements(&measure).filter(|n| n.tag_name().name() == "note") {
            part.notes.push(parse_note(&note)?);
        }
    }

    Ok(part)
}

// ─── Note ────────────────────────────────────────────────────────────

fn parse_note(node: &Node) -> Result<RawNote> {
    let mut note = RawNote::default();

    for child in elements(node) {
        match child.tag_name().name() {
            "pitch" => note.pitch = parse_pitch(&child)?,
            "duration" => note.duration = parse_int(&child)?,
            "rest" => note.rest = true,
            "chord" => note.chord = true,
            _ => {}
        }
    }

    Ok(note)
}

fn parse_pitch(node: &Node) -> Result<Pitch> {
    let mut pitch = Pitch::default();
    for child in elements(node) {
        match child.tag_name().name() {
            "step" => pitch.step = child.text().unwrap_or("").trim().to_string(),
            "octave" => pitch.octave = parse_int(&child)?,
            _ => {}
        }
    }
    Ok(pitch)
}

// ─── Helpers ─────────────────────────────────────────────────────────

fn elements<'a, 'input>(node: &Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

/// An element with no text reads as 0. Otherwise the trimmed text must be
/// an integer, so whitespace-only text is rejected.
fn parse_int(node: &Node) -> Result<i32> {
    let raw = node.text().unwrap_or("");
    if raw.is_empty() {
        return Ok(0);
    }
    let text = raw.trim();
    text.parse().map_err(|e| {
        ConvertError::Parse(format!(
            "invalid <{}> value '{text}': {e}",
            node.tag_name().name()
        ))
    })
}
