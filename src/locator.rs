use std::path::Path;

use crate::error::{ImportError, Result};

const DELIMITED_EXTENSIONS: &[&str] = &[".csv"];
const WORKBOOK_EXTENSIONS: &[&str] = &[".xlsx", ".xlsm", ".xlsb", ".xls", ".ods"];

/// Parsing backend selected from a source's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited,
    Workbook,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = file_type(path);
        if DELIMITED_EXTENSIONS.contains(&extension.as_str()) {
            Ok(SourceFormat::Delimited)
        } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            Ok(SourceFormat::Workbook)
        } else {
            Err(ImportError::UnsupportedFormat { extension })
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceFormat::Delimited => "delimited",
            SourceFormat::Workbook => "workbook",
        }
    }
}

/// Lowercase extension of `path` including the leading dot, or an empty
/// string when the path has none.
pub fn file_type(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}
