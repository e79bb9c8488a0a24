//! Schema-keyed rows and the geometry accessors the feature sink relies on.
//!
//! A [`Row`] has exactly one slot per declared output header, created as
//! [`Value::Unset`]. Writes to names outside that set follow the schema's
//! [`UndeclaredColumnPolicy`].

use std::{fmt, sync::Arc};

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    data::Value,
    error::{ImportError, Result},
    schema::{Header, HeaderType, Schema, UndeclaredColumnPolicy},
};

#[derive(Debug, Clone)]
pub struct Row {
    headers: Arc<[Header]>,
    values: Vec<Value>,
    policy: UndeclaredColumnPolicy,
}

impl Row {
    pub fn new(schema: &Schema) -> Self {
        let headers = schema.shared_headers();
        let values = vec![Value::Unset; headers.len()];
        Self {
            headers,
            values,
            policy: schema.undeclared_policy(),
        }
    }

    /// Builds a row from one physical record using the schema's bound
    /// ordinals. `line` is the 1-based record number used in errors and
    /// `width` the record's field count, which must reach every registered
    /// ordinal whether or not it feeds an output header.
    pub fn from_record<F>(schema: &Schema, line: usize, width: usize, mut cell: F) -> Result<Self>
    where
        F: FnMut(usize) -> Option<Value>,
    {
        let bound = schema.bound_columns()?;
        if let Some(ordinal) = schema.max_registered_ordinal()
            && width <= ordinal
        {
            return Err(ImportError::MalformedRecord {
                line,
                ordinal,
                fields: width,
            });
        }
        let mut row = Row::new(schema);
        for (name, ordinal) in bound {
            let value = cell(ordinal).ok_or(ImportError::MalformedRecord {
                line,
                ordinal,
                fields: width,
            })?;
            row.add(name, value)?;
        }
        Ok(row)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header.name == name)
    }

    pub fn add(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        match self.position(name) {
            Some(idx) => {
                self.values[idx] = value.into();
                Ok(())
            }
            None => match self.policy {
                UndeclaredColumnPolicy::Ignore => Ok(()),
                UndeclaredColumnPolicy::Reject => Err(ImportError::UndeclaredColumn {
                    name: name.to_string(),
                }),
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.position(name).map(|idx| &self.values[idx])
    }

    /// Name/value pairs in declared header order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.headers
            .iter()
            .map(|header| header.name.as_str())
            .zip(self.values.iter())
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    fn tagged_value(&self, tag: &HeaderType) -> Result<&Value> {
        let mut matches = self
            .headers
            .iter()
            .enumerate()
            .filter(|(_, header)| &header.tag == tag);
        match (matches.next(), matches.count()) {
            (Some((idx, _)), 0) => Ok(&self.values[idx]),
            (first, rest) => Err(ImportError::MissingGeometryColumn {
                tag: tag.to_string(),
                found: usize::from(first.is_some()) + rest,
            }),
        }
    }

    /// Returns `(x_tagged, y_tagged)` regardless of declaration order.
    pub fn point_values(&self) -> Result<(&Value, &Value)> {
        let x = self.tagged_value(&HeaderType::X)?;
        let y = self.tagged_value(&HeaderType::Y)?;
        Ok((x, y))
    }

    pub fn wkt_value(&self) -> Result<&Value> {
        self.tagged_value(&HeaderType::Wkt)
    }

    /// Attribute values for `columns`, in the caller's order. Geometry
    /// columns and names without an output header are skipped.
    pub fn non_shape_values<S: AsRef<str>>(&self, columns: &[S]) -> Vec<&Value> {
        columns
            .iter()
            .filter_map(|name| {
                let idx = self.position(name.as_ref())?;
                (!self.headers[idx].tag.is_geometry()).then(|| &self.values[idx])
            })
            .collect()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row | ")?;
        for (name, value) in self.values() {
            write!(f, "{name} = {value} | ")?;
        }
        Ok(())
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.values() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station_schema() -> Schema {
        Schema::new(vec![
            Header::new("Lon", "Y"),
            Header::new("Lat", "X"),
            Header::new("Name", "TEXT"),
        ])
    }

    #[test]
    fn new_row_starts_unset() {
        let row = Row::new(&station_schema());
        assert!(row.values().all(|(_, value)| value.is_unset()));
        assert_eq!(row.values().count(), 3);
    }

    #[test]
    fn add_overwrites_declared_columns() {
        let schema = Schema::new(vec![
            Header::new("Id", "TEXT"),
            Header::new("Latitude", "X"),
            Header::new("Longitude", "Y"),
        ]);
        let mut first = Row::new(&schema);
        first.add("Id", 19020).unwrap();
        first.add("Longitude", 45.123456).unwrap();
        let mut second = Row::new(&schema);
        second.add("Id", 19022).unwrap();
        second.add("Latitude", 90.123445).unwrap();

        assert_eq!(first.get("Id"), Some(&Value::Integer(19020)));
        assert_eq!(second.get("Id"), Some(&Value::Integer(19022)));
        assert_eq!(first.get("Longitude"), Some(&Value::Float(45.123456)));
        assert_eq!(second.get("Latitude"), Some(&Value::Float(90.123445)));
        assert!(first.get("Latitude").unwrap().is_unset());
    }

    #[test]
    fn add_undeclared_is_noop_by_default() {
        let mut row = Row::new(&station_schema());
        row.add("Name", "Mast").unwrap();
        let before = row.to_string();
        row.add("Ghost", 42).unwrap();
        assert_eq!(row.to_string(), before);
        assert!(row.get("Ghost").is_none());
    }

    #[test]
    fn add_undeclared_fails_under_reject_policy() {
        let schema = station_schema().with_undeclared_policy(UndeclaredColumnPolicy::Reject);
        let mut row = Row::new(&schema);
        let err = row.add("Ghost", 42).unwrap_err();
        assert!(matches!(err, ImportError::UndeclaredColumn { name } if name == "Ghost"));
    }

    #[test]
    fn point_values_route_x_then_y_regardless_of_declaration() {
        let mut row = Row::new(&station_schema());
        row.add("Lat", 10).unwrap();
        row.add("Lon", 20).unwrap();
        let (x, y) = row.point_values().unwrap();
        assert_eq!(x, &Value::Integer(10));
        assert_eq!(y, &Value::Integer(20));
    }

    #[test]
    fn point_values_reject_missing_and_duplicate_tags() {
        let missing = Row::new(&Schema::new(vec![Header::new("Lat", "X")]));
        assert!(matches!(
            missing.point_values(),
            Err(ImportError::MissingGeometryColumn { tag, found: 0 }) if tag == "Y"
        ));

        let ambiguous = Row::new(&Schema::new(vec![
            Header::new("Lat", "X"),
            Header::new("Lat2", "X"),
            Header::new("Lon", "Y"),
        ]));
        assert!(matches!(
            ambiguous.point_values(),
            Err(ImportError::MissingGeometryColumn { tag, found: 2 }) if tag == "X"
        ));
    }

    #[test]
    fn wkt_value_requires_wkt_header() {
        let row = Row::new(&station_schema());
        assert!(matches!(
            row.wkt_value(),
            Err(ImportError::MissingGeometryColumn { tag, .. }) if tag == "WKT"
        ));

        let schema = Schema::new(vec![
            Header::new("Country", "TEXT"),
            Header::new("Shape", "WKT"),
        ]);
        let mut row = Row::new(&schema);
        row.add("Shape", "POLYGON ((0 0, 1 0, 1 1, 0 0))").unwrap();
        assert_eq!(
            row.wkt_value().unwrap().as_str(),
            Some("POLYGON ((0 0, 1 0, 1 1, 0 0))")
        );
    }

    #[test]
    fn non_shape_values_keep_caller_order_and_skip_geometry() {
        let schema = Schema::new(vec![
            Header::new("Lon", "Y"),
            Header::new("Lat", "X"),
            Header::new("Name", "TEXT"),
            Header::new("State", "TEXT"),
        ]);
        let mut row = Row::new(&schema);
        row.add("Lat", 10).unwrap();
        row.add("Lon", 20).unwrap();
        row.add("Name", "WKOW").unwrap();
        row.add("State", "WI").unwrap();

        let values = row.non_shape_values(&["Lat", "Name", "Lon"]);
        assert_eq!(values, vec![&Value::from("WKOW")]);

        let values = row.non_shape_values(&["State", "Unknown", "Name"]);
        assert_eq!(values, vec![&Value::from("WI"), &Value::from("WKOW")]);
    }

    #[test]
    fn from_record_fails_before_resolution() {
        let schema = station_schema();
        let err = Row::from_record(&schema, 2, 0, |_| None).unwrap_err();
        assert!(matches!(err, ImportError::SchemaUnresolved));
    }

    #[test]
    fn from_record_checks_width_against_unbound_ordinals() {
        let mut schema = station_schema();
        schema.begin_resolution();
        schema.add("Name", 0);
        schema.add("Operator", 2);
        schema.mark_resolved();

        let fields = ["KFOX".to_string(), "UHF".to_string()];
        let err = Row::from_record(&schema, 4, fields.len(), |idx| {
            fields.get(idx).map(|s| Value::from(s.as_str()))
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ImportError::MalformedRecord {
                line: 4,
                ordinal: 2,
                fields: 2
            }
        ));
    }

    #[test]
    fn from_record_reports_short_records() {
        let mut schema = station_schema();
        schema.begin_resolution();
        schema.add("Name", 0);
        schema.add("Lat", 3);
        schema.mark_resolved();

        let fields = ["KFOX".to_string()];
        let err = Row::from_record(&schema, 2, fields.len(), |idx| {
            fields.get(idx).map(|s| Value::from(s.as_str()))
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ImportError::MalformedRecord {
                line: 2,
                ordinal: 3,
                fields: 1
            }
        ));
    }

    #[test]
    fn display_lists_columns_in_header_order() {
        let mut row = Row::new(&station_schema());
        row.add("Name", "WKOW").unwrap();
        assert_eq!(
            row.to_string(),
            "Row | Lon = null | Lat = null | Name = WKOW | "
        );
    }

    #[test]
    fn serializes_as_ordered_map() {
        let mut row = Row::new(&station_schema());
        row.add("Lat", "43.05").unwrap();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"Lon":null,"Lat":"43.05","Name":null}"#);
    }
}
