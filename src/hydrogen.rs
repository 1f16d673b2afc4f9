//! Hydrogen `.h2pattern` export.
//!
//! The exported document is a single `<drumkit_pattern>` whose note list
//! is flattened across all tracks; the `instrument` field is the only link
//! back to a track.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{ConvertError, Result};
use crate::pattern::DrumPattern;

pub const FORMAT_VERSION: &str = "0.2";
pub const DRUMKIT_NAME: &str = "GMkit";
pub const PATTERN_NAME: &str = "Generated Pattern";
pub const PATTERN_CATEGORY: &str = "Uncategorized";
/// Declared pattern size, independent of the builder's grid length.
pub const PATTERN_SIZE: i64 = 384;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" ?>\n";
const INDENT: &str = "  ";

// ═══════════════════════════════════════════════════════════════════════
// Document model
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrumkitPattern {
    pub version: String,
    pub pattern_for_drumkit: String,
    pub pattern: PatternBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternBlock {
    pub name: String,
    pub category: String,
    pub size: i64,
    pub notes: Vec<InstrumentNote>,
}

/// One `<note>` record, fields in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentNote {
    pub position: i64,
    pub leadlag: i32,
    pub velocity: f64,
    pub pan_l: f64,
    pub pan_r: f64,
    pub pitch: i32,
    pub key: String,
    pub length: i32,
    pub instrument: usize,
}

impl DrumPattern {
    /// Convert the pattern into its exported document.
    pub fn to_document(&self) -> DrumkitPattern {
        let notes = self
            .tracks
            .iter()
            .enumerate()
            .flat_map(|(id, track)| {
                track.notes.iter().map(move |note| InstrumentNote {
                    position: note.position,
                    leadlag: 0,
                    velocity: f64::from(note.volume) / 127.0,
                    pan_l: 0.5,
                    pan_r: 0.5,
                    pitch: 0,
                    key: "C0".to_string(),
                    length: note.duration,
                    instrument: id,
                })
            })
            .collect();

        DrumkitPattern {
            version: FORMAT_VERSION.to_string(),
            pattern_for_drumkit: DRUMKIT_NAME.to_string(),
            pattern: PatternBlock {
                name: PATTERN_NAME.to_string(),
                category: PATTERN_CATEGORY.to_string(),
                size: PATTERN_SIZE,
                notes,
            },
        }
    }

    /// Write the pattern as a `.h2pattern` file.
    pub fn export_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = render_document(&self.to_document())?;

        let io_error = |source: std::io::Error| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(text.as_bytes()).map_err(io_error)?;
        writer.flush().map_err(io_error)?;

        tracing::info!(
            path = %path.display(),
            notes = self.note_count(),
            "exported pattern"
        );
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════════

/// Render the document as `.h2pattern` text.
pub fn render_document(doc: &DrumkitPattern) -> Result<String> {
    let mut xml = XmlBuilder::new();
    xml.open("drumkit_pattern", &[("version", doc.version.as_str())])?;
    xml.leaf("pattern_for_drumkit", &doc.pattern_for_drumkit)?;

    let pattern = &doc.pattern;
    xml.open("pattern", &[])?;
    xml.leaf("pattern_name", &pattern.name)?;
    xml.leaf("category", &pattern.category)?;
    xml.leaf("size", pattern.size)?;

    if pattern.notes.is_empty() {
        xml.empty("noteList")?;
    } else {
        xml.open("noteList", &[])?;
        for note in &pattern.notes {
            xml.open("note", &[])?;
            xml.leaf("position", note.position)?;
            xml.leaf("leadlag", note.leadlag)?;
            xml.leaf("velocity", note.velocity)?;
            xml.leaf("pan_L", note.pan_l)?;
            xml.leaf("pan_R", note.pan_r)?;
            xml.leaf("pitch", note.pitch)?;
            xml.leaf("key", &note.key)?;
            xml.leaf("length", note.length)?;
            xml.leaf("instrument", note.instrument)?;
            xml.close()?;
        }
        xml.close()?;
    }

    xml.close()?;
    xml.close()?;
    Ok(xml.build())
}

/// Pretty JSON form of the document, for inspection.
pub fn document_to_json(doc: &DrumkitPattern) -> Result<String> {
    serde_json::to_string_pretty(doc)
        .map_err(|e| ConvertError::Serialization(format!("JSON serialization error: {e}")))
}

/// Accumulates indented XML elements.
struct XmlBuilder {
    out: String,
    open: Vec<&'static str>,
}

impl XmlBuilder {
    fn new() -> Self {
        Self {
            out: String::from(XML_DECLARATION),
            open: Vec::new(),
        }
    }

    fn build(self) -> String {
        self.out
    }

    fn line_start(&mut self) {
        if !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        for _ in 0..self.open.len() {
            self.out.push_str(INDENT);
        }
    }

    fn open(&mut self, tag: &'static str, attrs: &[(&str, &str)]) -> Result<()> {
        self.line_start();
        write!(self.out, "<{tag}").map_err(fmt_error)?;
        for (name, value) in attrs {
            write!(self.out, " {name}=\"{}\"", escape(value)).map_err(fmt_error)?;
        }
        self.out.push('>');
        self.open.push(tag);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let tag = self
            .open
            .pop()
            .ok_or_else(|| ConvertError::Serialization("unbalanced element close".to_string()))?;
        self.line_start();
        write!(self.out, "</{tag}>").map_err(fmt_error)
    }

    fn leaf(&mut self, tag: &str, value: impl std::fmt::Display) -> Result<()> {
        self.line_start();
        let text = value.to_string();
        write!(self.out, "<{tag}>{}</{tag}>", escape(&text)).map_err(fmt_error)
    }

    fn empty(&mut self, tag: &str) -> Result<()> {
        self.line_start();
        write!(self.out, "<{tag}></{tag}>").map_err(fmt_error)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&#34;")
        .replace('\'', "&#39;")
}

fn fmt_error(e: std::fmt::Error) -> ConvertError {
    ConvertError::Serialization(format!("failed to encode XML: {e}"))
}
