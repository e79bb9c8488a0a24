//! Error taxonomy for schema resolution, row mapping, and source reading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the import core. Every variant is fatal to the call that
/// produced it; there is no partial-result recovery.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The source extension has no parsing backend.
    #[error("the file type of '{extension}' is not supported")]
    UnsupportedFormat { extension: String },

    /// No output header carries the requested name.
    #[error("no output header named '{name}'")]
    LookupFailure { name: String },

    /// A geometry accessor needs exactly one header with `tag`.
    #[error("expected exactly one '{tag}' column but found {found}")]
    MissingGeometryColumn { tag: String, found: usize },

    /// A data record is shorter than an ordinal registered by the header pass.
    #[error("record {line} has {fields} field(s) but column ordinal {ordinal} was registered")]
    MalformedRecord {
        line: usize,
        ordinal: usize,
        fields: usize,
    },

    /// A row was bound before the header pass finished.
    #[error("schema has not been resolved against a source header")]
    SchemaUnresolved,

    /// A write to an undeclared column under the reject policy.
    #[error("column '{name}' is not a declared output header")]
    UndeclaredColumn { name: String },

    /// A point geometry coordinate could not be read as a number.
    #[error("coordinate '{value}' in column '{column}' is not numeric")]
    InvalidCoordinate { column: String, value: String },

    /// A shape row whose WKT column was never written or is blank.
    #[error("geometry column '{column}' has no value")]
    MissingGeometryValue { column: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse delimited source {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("record {line} is not valid {encoding} text")]
    Decode { line: usize, encoding: String },

    #[error("unknown encoding '{label}'")]
    UnknownEncoding { label: String },

    #[error("failed to open workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("workbook {path} has no worksheets")]
    EmptyWorkbook { path: PathBuf },

    #[error("invalid settings {path}: {message}")]
    Settings { path: PathBuf, message: String },
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;
