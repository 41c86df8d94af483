//! PostGIS SQL text generation.
//!
//! Every function here is pure: the same [`TableSpec`] always yields the same
//! statement text.

use crate::core::spec::TableSpec;

/// Quote a PostgreSQL identifier.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a PostgreSQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Qualify a table name with schema.
pub fn qualify_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

/// `CREATE TABLE` for all non-geometry columns plus a serial primary key.
pub fn create_table_sql(spec: &TableSpec) -> String {
    let mut cols = vec!["id SERIAL PRIMARY KEY".to_string()];
    cols.extend(
        spec.plain_columns()
            .map(|c| format!("{} {}", quote_ident(&c.name), c.descriptor.sql_type)),
    );

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({});",
        qualify_table(&spec.schema, &spec.name),
        cols.join(",")
    )
}

/// `INSERT` binding one placeholder per column, in column order.
pub fn insert_sql(spec: &TableSpec) -> String {
    let cols: Vec<String> = spec.columns.iter().map(|c| quote_ident(&c.name)).collect();
    let placeholders: Vec<String> = spec
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| c.descriptor.placeholder(i + 1, spec.srid))
        .collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        qualify_table(&spec.schema, &spec.name),
        cols.join(","),
        placeholders.join(",")
    )
}

/// Drop a table if present.
pub fn drop_table_sql(schema: &str, table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", qualify_table(schema, table))
}

/// Register the spatial column of a table under [`TableSpec::geometry_column`].
pub fn add_geometry_column_sql(spec: &TableSpec) -> String {
    format!(
        "SELECT AddGeometryColumn({}, {}, {}, {}, {}, 2);",
        quote_literal(&spec.schema),
        quote_literal(&spec.name),
        quote_literal(spec.geometry_column()),
        spec.srid,
        quote_literal(&spec.geometry_type.to_uppercase())
    )
}

/// Schema existence check; binds the schema name as `$1`.
pub fn schema_exists_sql() -> &'static str {
    "SELECT EXISTS(SELECT schema_name FROM information_schema.schemata WHERE schema_name = $1)"
}

/// Create a schema.
pub fn create_schema_sql(schema: &str) -> String {
    format!("CREATE SCHEMA {}", quote_ident(schema))
}
