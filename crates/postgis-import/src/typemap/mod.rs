//! Type mapping from abstract mapping field types to PostGIS column types.

mod template;

pub use template::{TemplateError, ValueTemplate};

use tracing::warn;

/// SQL type used for fields whose abstract type is not known.
pub const DEFAULT_SQL_TYPE: &str = "VARCHAR";

/// SQL type of spatial columns.
pub const GEOMETRY_SQL_TYPE: &str = "GEOMETRY";

const GEOMETRY_TEMPLATE: &str = "ST_GeomFromWKB({index}, {srid})";

/// Target column type for an abstract field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// PostgreSQL type name used in CREATE TABLE.
    pub sql_type: &'static str,
    /// Placeholder expression used in INSERT instead of a bare `$n`.
    pub template: Option<ValueTemplate>,
}

impl TypeDescriptor {
    /// Descriptor binding a plain `$n` placeholder.
    pub fn plain(sql_type: &'static str) -> Self {
        Self {
            sql_type,
            template: None,
        }
    }

    /// Whether this column is registered through AddGeometryColumn rather than CREATE TABLE.
    pub fn is_geometry(&self) -> bool {
        self.sql_type == GEOMETRY_SQL_TYPE
    }

    /// Placeholder text for the given 1-based position.
    pub fn placeholder(&self, index: usize, srid: i32) -> String {
        match &self.template {
            Some(template) => template.render(index, srid),
            None => format!("${}", index),
        }
    }
}

/// Look up the descriptor for an abstract type name.
pub fn lookup(abstract_type: &str) -> Option<TypeDescriptor> {
    let sql_type = match abstract_type.to_lowercase().as_str() {
        // Text
        "string" | "name" => "VARCHAR",

        // Boolean
        "bool" => "BOOL",
        "boolint" => "SMALLINT",

        // Identifiers
        "id" | "osm_id" => "BIGINT",

        // Integer types
        "integer" | "zorder" | "wayzorder" => "INTEGER",
        "direction" => "SMALLINT",

        // Floating point
        "pseudoarea" | "float" => "REAL",

        // Spatial
        "geometry" => {
            return Some(TypeDescriptor {
                sql_type: GEOMETRY_SQL_TYPE,
                template: ValueTemplate::parse(GEOMETRY_TEMPLATE).ok(),
            })
        }

        _ => return None,
    };
    Some(TypeDescriptor::plain(sql_type))
}

/// Resolve an abstract type, falling back to [`DEFAULT_SQL_TYPE`] for unknown names.
///
/// Unknown types are logged but never fail the import.
pub fn resolve(field: &str, abstract_type: &str) -> TypeDescriptor {
    lookup(abstract_type).unwrap_or_else(|| {
        warn!(
            "Field {}: unhandled type '{}', using {}",
            field, abstract_type, DEFAULT_SQL_TYPE
        );
        TypeDescriptor::plain(DEFAULT_SQL_TYPE)
    })
}
