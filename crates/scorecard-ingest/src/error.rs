//! Error types for score card source ingestion.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three required input categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    Spreadsheet,
    Schema,
    Pmml,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Spreadsheet => "spreadsheet (.xlsx)",
            InputKind::Schema => "schema (.txt)",
            InputKind::Pmml => "PMML (.pmml)",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal errors: the run cannot start without the affected input.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required input category has no file.
    #[error("no {kind} file found")]
    MissingInput { kind: InputKind },

    /// Failed to read a required file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Spreadsheet Errors ===
    /// The workbook could not be opened or decoded.
    #[error("failed to open workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// The workbook has no sheet with the expected name.
    #[error("sheet '{sheet}' not found in {path}")]
    SheetNotFound { path: PathBuf, sheet: String },

    /// The data sheet has no header row.
    #[error("sheet '{sheet}' in {path} is empty")]
    EmptySheet { path: PathBuf, sheet: String },

    /// Required column not found in the header row.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Why a spreadsheet lookup produced no usable method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No row references the name.
    #[error("parameter '{name}' not found in spreadsheet")]
    NotFound { name: String },

    /// Rows reference the name but every method cell is empty.
    #[error("parameter '{name}' has {rows} spreadsheet row(s) but no method")]
    NoMethod { name: String, rows: usize },
}
