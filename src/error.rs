//! Error taxonomy for the conversion pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures that abort a conversion.
///
/// Unmapped pitches are not errors: they are logged and the note is dropped.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input score could not be read or is structurally malformed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The destination could not be created or written.
    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The exported document could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The configuration file could not be read or decoded.
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
