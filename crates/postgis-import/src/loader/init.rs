//! Destructive schema rebuild.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::PostGis;
use crate::config::DEFAULT_SCHEMA;
use crate::core::spec::TableSpec;
use crate::core::traits::Connection;
use crate::error::{ImportError, Result};
use crate::mapping::Mapping;
use crate::sql;

impl<C: Connection> PostGis<C> {
    /// Create the schema if needed, then drop and recreate every mapped table.
    ///
    /// This is a full-reimport operation: existing tables and their data are
    /// discarded. The first failing statement aborts the call; tables created
    /// before it are left in place and the registry stays empty, so no insert
    /// can target a half-initialized database.
    pub async fn init(&mut self, mapping: &Mapping) -> Result<()> {
        self.tables.clear();

        self.ensure_schema().await?;

        let tables: BTreeMap<String, TableSpec> = mapping
            .tables
            .iter()
            .map(|(name, table)| (name.clone(), TableSpec::new(&self.config, table)))
            .collect();

        for spec in tables.values() {
            self.create_table(spec).await?;
        }

        info!(
            "Initialized {} tables in schema '{}'",
            tables.len(),
            self.config.schema
        );
        self.tables = tables;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        let schema = self.config.schema.as_str();
        if schema == DEFAULT_SCHEMA {
            return Ok(());
        }

        let exists_sql = sql::schema_exists_sql();
        let exists = self
            .conn
            .query_bool(exists_sql, &[schema])
            .await
            .map_err(|e| ImportError::Schema {
                sql: exists_sql.to_string(),
                source: e,
            })?;
        if exists {
            debug!("Schema '{}' already exists", schema);
            return Ok(());
        }

        let create_sql = sql::create_schema_sql(schema);
        self.conn
            .execute(&create_sql)
            .await
            .map_err(|e| ImportError::Schema {
                sql: create_sql.clone(),
                source: e,
            })?;

        info!("Created schema '{}'", schema);
        Ok(())
    }

    async fn create_table(&self, spec: &TableSpec) -> Result<()> {
        let statements = [
            sql::drop_table_sql(&spec.schema, &spec.name),
            sql::create_table_sql(spec),
            sql::add_geometry_column_sql(spec),
        ];

        for statement in &statements {
            self.conn
                .execute(statement)
                .await
                .map_err(|e| ImportError::table_creation(&spec.name, statement, e))?;
        }

        debug!(
            "Created table {} ({} columns, {} geometry)",
            spec.full_name(),
            spec.columns.len(),
            spec.geometry_type
        );
        Ok(())
    }
}
