//! Table specifications derived from the mapping.

use tracing::warn;

use crate::config::Config;
use crate::mapping::TableMapping;
use crate::typemap::{self, TypeDescriptor};

/// Geometry column name used when the mapping declares no geometry field.
pub const GEOMETRY_COLUMN: &str = "geometry";

/// One column of a table, in bind order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub descriptor: TypeDescriptor,
}

/// Immutable description of one target table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Table name.
    pub name: String,

    /// Schema name, always the configured schema.
    pub schema: String,

    /// Columns in mapping field order. Geometry-typed fields are kept for
    /// INSERT binding but skipped by `CREATE TABLE`; the first one names the
    /// column registered through `AddGeometryColumn`.
    pub columns: Vec<ColumnSpec>,

    /// Geometry kind (point, linestring, polygon, ...).
    pub geometry_type: String,

    /// SRID of the geometry column.
    pub srid: i32,
}

impl TableSpec {
    /// Build the spec for a mapped table.
    pub fn new(config: &Config, table: &TableMapping) -> Self {
        let columns = table
            .fields
            .iter()
            .map(|field| ColumnSpec {
                name: field.name.clone(),
                descriptor: typemap::resolve(&field.name, &field.field_type),
            })
            .collect::<Vec<ColumnSpec>>();

        let geometry_fields = columns.iter().filter(|c| c.descriptor.is_geometry()).count();
        if geometry_fields > 1 {
            warn!(
                "Table '{}' maps {} geometry fields, only the first gets a geometry column",
                table.name, geometry_fields
            );
        }

        Self {
            name: table.name.clone(),
            schema: config.schema.clone(),
            columns,
            geometry_type: table.geometry_type.clone(),
            srid: config.srid,
        }
    }

    /// Get the fully qualified table name.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Name of the spatial column: the first geometry-typed field, or
    /// [`GEOMETRY_COLUMN`].
    pub fn geometry_column(&self) -> &str {
        self.columns
            .iter()
            .find(|c| c.descriptor.is_geometry())
            .map_or(GEOMETRY_COLUMN, |c| c.name.as_str())
    }

    /// Columns emitted by `CREATE TABLE`.
    pub fn plain_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| !c.descriptor.is_geometry())
    }
}
