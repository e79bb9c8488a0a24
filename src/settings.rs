//! Import settings: where the source lives and which output columns to build.
//!
//! Settings are usually loaded from YAML:
//!
//! ```yaml
//! source: Data/tvstations.csv
//! output: TVStations.shp
//! headers:
//!   - { name: "Licensed State", type: TEXT }
//!   - { name: "Latitude (degrees)", type: X }
//!   - { name: "Longitude (degrees)", type: Y }
//! ```
//!
//! A relative `source` resolves against the directory holding the settings
//! file.

use std::{
    collections::HashSet,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ImportError, Result},
    features::ShapeKind,
    io_utils,
    schema::{Header, HeaderType, Schema, UndeclaredColumnPolicy},
};

/// Web Mercator, the spatial reference the import has always targeted.
pub const DEFAULT_PROJECTION: u32 = 3785;

fn default_projection() -> u32 {
    DEFAULT_PROJECTION
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub source: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default = "default_projection")]
    pub projection: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default)]
    pub undeclared_columns: UndeclaredColumnPolicy,
    #[serde(default)]
    pub headers: Vec<Header>,
}

impl Settings {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: None,
            projection: DEFAULT_PROJECTION,
            encoding: None,
            undeclared_columns: UndeclaredColumnPolicy::default(),
            headers: Vec::new(),
        }
    }

    pub fn with_output_file_name(mut self, name: impl Into<String>) -> Self {
        self.output = Some(name.into());
        self
    }

    /// Appends `(name, type)` pairs to the declared output headers.
    pub fn set_headers<I, N, T>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<HeaderType>,
    {
        self.headers
            .extend(pairs.into_iter().map(|(name, tag)| Header::new(name, tag)));
    }

    pub fn imported_file_location(&self) -> &Path {
        &self.source
    }

    pub fn output_file_name(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Settings =
            serde_yaml::from_reader(BufReader::new(file)).map_err(|err| ImportError::Settings {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        if settings.source.is_relative()
            && let Some(base) = path.parent()
        {
            settings.source = base.join(&settings.source);
        }
        settings.validate().map_err(|message| ImportError::Settings {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(settings)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.headers.is_empty() {
            return Err("at least one output header must be declared".to_string());
        }
        if self.headers.iter().any(|h| h.name.trim().is_empty()) {
            return Err("output header names cannot be empty".to_string());
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.headers.iter().find(|h| !seen.insert(h.name.as_str())) {
            return Err(format!("output header '{}' is declared more than once", dup.name));
        }
        Ok(())
    }

    pub fn input_encoding(&self) -> Result<&'static Encoding> {
        io_utils::resolve_encoding(self.encoding.as_deref())
    }

    pub fn shape_kind(&self) -> ShapeKind {
        ShapeKind::from_headers(&self.headers)
    }

    /// A fresh, unresolved schema for these settings.
    pub fn schema(&self) -> Schema {
        Schema::new(self.headers.clone()).with_undeclared_policy(self.undeclared_columns)
    }
}
