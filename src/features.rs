//! Feature records: the hand-off from rows to a geometry sink.
//!
//! The sink declares its attribute columns once from the output headers,
//! then per row collects attribute values with
//! [`Row::non_shape_values`] and geometry with [`Row::point_values`] or
//! [`Row::wkt_value`].

use serde::Serialize;

use crate::{
    data::Value,
    error::{ImportError, Result},
    rows::Row,
    schema::{Header, HeaderType},
};

/// Geometry column kind for an import, decided from the declared headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShapeKind {
    Point,
    Shape,
    Unknown,
}

impl ShapeKind {
    /// Any X or Y header makes a point import; otherwise any WKT header makes
    /// a shape import.
    pub fn from_headers(headers: &[Header]) -> Self {
        if headers
            .iter()
            .any(|h| matches!(h.tag, HeaderType::X | HeaderType::Y))
        {
            ShapeKind::Point
        } else if headers.iter().any(|h| h.tag == HeaderType::Wkt) {
            ShapeKind::Shape
        } else {
            ShapeKind::Unknown
        }
    }
}

/// Names of the non-geometry headers, in declared order.
pub fn attribute_columns(headers: &[Header]) -> Vec<String> {
    headers
        .iter()
        .filter(|h| !h.tag.is_geometry())
        .map(|h| h.name.clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Geometry {
    Point { x: f64, y: f64 },
    Wkt(String),
}

impl Geometry {
    pub fn to_wkt(&self) -> String {
        match self {
            Geometry::Point { x, y } => format!("POINT ({x} {y})"),
            Geometry::Wkt(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub attributes: Vec<Value>,
    pub geometry: Geometry,
}

impl FeatureRecord {
    pub fn from_row<S: AsRef<str>>(row: &Row, kind: ShapeKind, columns: &[S]) -> Result<Self> {
        let attributes = row.non_shape_values(columns).into_iter().cloned().collect();
        let geometry = match kind {
            ShapeKind::Point => {
                let (x_tagged, y_tagged) = row.point_values()?;
                // The X-tagged value becomes the vertex y coordinate and the
                // Y-tagged value the vertex x coordinate.
                Geometry::Point {
                    x: coordinate(row, HeaderType::Y, y_tagged)?,
                    y: coordinate(row, HeaderType::X, x_tagged)?,
                }
            }
            ShapeKind::Shape => Geometry::Wkt(shape_text(row)?),
            ShapeKind::Unknown => {
                return Err(ImportError::MissingGeometryColumn {
                    tag: "X/Y or WKT".to_string(),
                    found: 0,
                });
            }
        };
        Ok(Self {
            attributes,
            geometry,
        })
    }
}

fn shape_text(row: &Row) -> Result<String> {
    let value = row.wkt_value()?;
    let text = match value {
        Value::Unset => String::new(),
        other => other.as_display(),
    };
    if text.trim().is_empty() {
        return Err(ImportError::MissingGeometryValue {
            column: tagged_column(row, HeaderType::Wkt),
        });
    }
    Ok(text)
}

fn tagged_column(row: &Row, tag: HeaderType) -> String {
    row.headers()
        .iter()
        .find(|h| h.tag == tag)
        .map(|h| h.name.clone())
        .unwrap_or_default()
}

fn coordinate(row: &Row, tag: HeaderType, value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| ImportError::InvalidCoordinate {
        column: tagged_column(row, tag),
        value: value.as_display(),
    })
}
