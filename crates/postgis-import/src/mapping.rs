//! Abstract table mapping consumed by [`PostGis::init`](crate::PostGis).
//!
//! The mapping is produced by the surrounding import pipeline; this crate
//! only reads it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Dialect-independent description of all feature tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mapping {
    /// Tables keyed by table name.
    #[serde(default)]
    pub tables: BTreeMap<String, TableMapping>,
}

impl Mapping {
    /// Build a mapping from a list of tables, keyed by their names.
    pub fn from_tables(tables: impl IntoIterator<Item = TableMapping>) -> Self {
        Self {
            tables: tables
                .into_iter()
                .map(|t| (t.name.clone(), t))
                .collect(),
        }
    }
}

/// One feature table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMapping {
    /// Table name.
    pub name: String,

    /// Geometry kind (point, linestring, polygon, ...).
    #[serde(rename = "type")]
    pub geometry_type: String,

    /// Fields in column order.
    #[serde(default)]
    pub fields: Vec<FieldMapping>,
}

impl TableMapping {
    pub fn new(name: impl Into<String>, geometry_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geometry_type: geometry_type.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    pub fn field(mut self, name: impl Into<String>, field_type: impl Into<String>) -> Self {
        self.fields.push(FieldMapping {
            name: name.into(),
            field_type: field_type.into(),
        });
        self
    }
}

/// One field of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub name: String,

    /// Abstract type name resolved through [`crate::typemap`].
    #[serde(rename = "type")]
    pub field_type: String,
}
