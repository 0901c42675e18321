use std::path::PathBuf;
use thiserror::Error;

/// The main error type for boxscope operations.
///
/// Only structural failures live here. Field-level anomalies inside an
/// otherwise well-formed document are tolerated by the parsers (records
/// dropped, fields defaulted) and never surface as errors.
#[derive(Debug, Error)]
pub enum BoxscopeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON from {name}: {source}")]
    JsonParse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("XML parse failed for {name}: {message}")]
    XmlParse { name: String, message: String },

    #[error("Failed to read image {path}: {message}")]
    ImageRead { path: PathBuf, message: String },

    #[error("Image not found. {attempted}")]
    ImageNotFound { attempted: String },

    #[error("Unsupported annotation format: {0}")]
    UnsupportedFormat(String),

    #[error("Nothing to export: an image and at least one box are required")]
    NothingToExport,
}
