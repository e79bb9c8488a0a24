//! Output header declarations and source-column resolution.
//!
//! A [`Schema`] owns two independent pieces of state:
//!
//! - the caller-declared, ordered list of output [`Header`]s, fixed at
//!   construction;
//! - the imported-column map from raw source-column name to its zero-based
//!   ordinal, filled in by a reader's header pass.
//!
//! A source column only contributes to rows when its name also appears as an
//! output header. Re-registering a source column overwrites the earlier
//! ordinal (last write wins).
//!
//! Reading is two-phase. The schema starts [`SchemaState::Unresolved`]; a
//! reader calls [`Schema::begin_resolution`], registers every header field,
//! then [`Schema::mark_resolved`]. [`Schema::bound_columns`] refuses to hand
//! out ordinals before that transition.

use std::{
    collections::BTreeMap,
    fmt,
    str::FromStr,
    sync::Arc,
};

use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ImportError, Result};

/// Type tag of an output header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HeaderType {
    X,
    Y,
    Wkt,
    /// A plain attribute; carries the declared type string (e.g. `TEXT`).
    Attribute(String),
}

impl HeaderType {
    pub fn is_geometry(&self) -> bool {
        !matches!(self, HeaderType::Attribute(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            HeaderType::X => "X",
            HeaderType::Y => "Y",
            HeaderType::Wkt => "WKT",
            HeaderType::Attribute(kind) => kind.as_str(),
        }
    }
}

impl fmt::Display for HeaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeaderType {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match value {
            "X" => HeaderType::X,
            "Y" => HeaderType::Y,
            "WKT" => HeaderType::Wkt,
            other => HeaderType::Attribute(other.to_string()),
        })
    }
}

impl From<&str> for HeaderType {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(tag) => tag,
            Err(never) => match never {},
        }
    }
}

impl Serialize for HeaderType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HeaderType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(HeaderType::from(raw.as_str()))
    }
}

/// A declared output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    #[serde(rename = "type")]
    pub tag: HeaderType,
}

impl Header {
    pub fn new(name: impl Into<String>, tag: impl Into<HeaderType>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
        }
    }
}

/// What a [`crate::rows::Row`] does with a write to an undeclared column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndeclaredColumnPolicy {
    /// Discard the value and succeed. Source columns that are not output
    /// headers are routinely present, so this is the default.
    #[default]
    Ignore,
    /// Fail with [`ImportError::UndeclaredColumn`].
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaState {
    #[default]
    Unresolved,
    Resolved,
}

#[derive(Debug, Clone)]
pub struct Schema {
    headers: Arc<[Header]>,
    imported_columns: BTreeMap<String, usize>,
    state: SchemaState,
    undeclared_policy: UndeclaredColumnPolicy,
}

impl Schema {
    pub fn new(headers: Vec<Header>) -> Self {
        Self {
            headers: headers.into(),
            imported_columns: BTreeMap::new(),
            state: SchemaState::Unresolved,
            undeclared_policy: UndeclaredColumnPolicy::default(),
        }
    }

    pub fn with_undeclared_policy(mut self, policy: UndeclaredColumnPolicy) -> Self {
        self.undeclared_policy = policy;
        self
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub(crate) fn shared_headers(&self) -> Arc<[Header]> {
        Arc::clone(&self.headers)
    }

    pub fn imported_columns(&self) -> &BTreeMap<String, usize> {
        &self.imported_columns
    }

    pub fn state(&self) -> SchemaState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        self.state == SchemaState::Resolved
    }

    pub fn undeclared_policy(&self) -> UndeclaredColumnPolicy {
        self.undeclared_policy
    }

    /// Registers the ordinal of a source column, replacing any earlier one.
    pub fn add(&mut self, column_name: impl Into<String>, ordinal: usize) {
        let column_name = column_name.into();
        if let Some(previous) = self.imported_columns.insert(column_name.clone(), ordinal) {
            debug!("Source column '{column_name}' moved from ordinal {previous} to {ordinal}");
        }
    }

    pub fn get(&self, name: &str) -> Result<&Header> {
        self.headers
            .iter()
            .find(|header| header.name == name)
            .ok_or_else(|| ImportError::LookupFailure {
                name: name.to_string(),
            })
    }

    /// Resolves the output header for the source column registered at
    /// `ordinal`. `Ok(None)` means nothing is registered there.
    pub fn get_by_index(&self, ordinal: usize) -> Result<Option<&Header>> {
        match self
            .imported_columns
            .iter()
            .find(|(_, registered)| **registered == ordinal)
        {
            Some((name, _)) => self.get(name).map(Some),
            None => Ok(None),
        }
    }

    /// Highest ordinal registered by the header pass; every data record must
    /// reach it.
    pub fn max_registered_ordinal(&self) -> Option<usize> {
        self.imported_columns.values().copied().max()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.headers.iter().any(|header| header.name == name)
    }

    /// Starts a header pass: drops columns imported by a previous pass.
    pub fn begin_resolution(&mut self) {
        self.imported_columns.clear();
        self.state = SchemaState::Unresolved;
    }

    pub fn mark_resolved(&mut self) {
        self.state = SchemaState::Resolved;
        let unmatched = self
            .headers
            .iter()
            .filter(|header| !self.imported_columns.contains_key(&header.name))
            .map(|header| header.name.as_str())
            .collect::<Vec<_>>();
        if !unmatched.is_empty() {
            debug!("Output header(s) with no source column: {unmatched:?}");
        }
    }

    /// Source columns that feed an output header, ordered by ordinal.
    pub fn bound_columns(&self) -> Result<Vec<(&str, usize)>> {
        if !self.is_resolved() {
            return Err(ImportError::SchemaUnresolved);
        }
        let mut bound = self
            .imported_columns
            .iter()
            .filter(|(name, _)| self.is_declared(name))
            .map(|(name, ordinal)| (name.as_str(), *ordinal))
            .collect::<Vec<_>>();
        bound.sort_by_key(|(_, ordinal)| *ordinal);
        Ok(bound)
    }
}
