//! Error types for schema initialization and batch loading.

use std::fmt;

use thiserror::Error;

use crate::core::value::Row;

/// Boxed error reported by a [`Connection`](crate::core::Connection) implementation.
pub type DbError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Transaction lifecycle step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStage {
    Begin,
    Commit,
}

impl fmt::Display for TxStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStage::Begin => f.write_str("begin"),
            TxStage::Commit => f.write_str("commit"),
        }
    }
}

/// Main error type for import operations.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The database could not be reached or failed the liveness check.
    #[error("Connection error: {context}: {source}")]
    Connection {
        context: String,
        #[source]
        source: DbError,
    },

    /// Invalid configuration (unsupported backend, bad connection params, etc.)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Schema existence check or creation failed.
    #[error("Schema error: {source} in query {sql}")]
    Schema {
        sql: String,
        #[source]
        source: DbError,
    },

    /// Drop, create or geometry registration failed for a table.
    #[error("Table creation failed for {table}: {source} in query {sql}")]
    TableCreation {
        table: String,
        sql: String,
        #[source]
        source: DbError,
    },

    /// Insert target was never registered by `init`.
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// The insert statement could not be prepared.
    #[error("Prepare failed for {table}: {source} in query {sql}")]
    Prepare {
        table: String,
        sql: String,
        #[source]
        source: DbError,
        /// Set when the rollback issued after the failure failed as well.
        rollback_error: Option<String>,
    },

    /// A row of a batch failed; the whole batch was rolled back.
    #[error("Insert failed for {table} at row {row_index}: {source} in query {sql} ({row:?})")]
    Insert {
        table: String,
        sql: String,
        row_index: usize,
        row: Row,
        #[source]
        source: DbError,
        /// Set when the rollback issued after the failure failed as well.
        rollback_error: Option<String>,
    },

    /// Begin or commit of a batch transaction failed.
    #[error("Transaction {stage} failed for {table}: {source}")]
    Transaction {
        table: String,
        stage: TxStage,
        #[source]
        source: DbError,
    },

    /// IO error (config file loading)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ImportError {
    /// Create a Connection error with context about where it occurred
    pub fn connection(context: impl Into<String>, source: impl Into<DbError>) -> Self {
        ImportError::Connection {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Create a TableCreation error
    pub fn table_creation(
        table: impl Into<String>,
        sql: impl Into<String>,
        source: impl Into<DbError>,
    ) -> Self {
        ImportError::TableCreation {
            table: table.into(),
            sql: sql.into(),
            source: source.into(),
        }
    }

    /// SQL text of the failing statement, if the error carries one.
    pub fn sql(&self) -> Option<&str> {
        match self {
            ImportError::Schema { sql, .. }
            | ImportError::TableCreation { sql, .. }
            | ImportError::Prepare { sql, .. }
            | ImportError::Insert { sql, .. } => Some(sql),
            _ => None,
        }
    }

    /// The offending row of an insert failure.
    pub fn row(&self) -> Option<&Row> {
        match self {
            ImportError::Insert { row, .. } => Some(row),
            _ => None,
        }
    }

    /// Failure of the rollback that followed a prepare or insert error.
    pub fn rollback_error(&self) -> Option<&str> {
        match self {
            ImportError::Prepare { rollback_error, .. }
            | ImportError::Insert { rollback_error, .. } => rollback_error.as_deref(),
            _ => None,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        if let Some(rollback) = self.rollback_error() {
            output.push_str(&format!("\nRollback also failed: {}", rollback));
        }

        output
    }
}

/// Result type alias for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Value;

    #[test]
    fn test_insert_error_exposes_sql_and_row() {
        let err = ImportError::Insert {
            table: "roads".into(),
            sql: "INSERT INTO \"osm\".\"roads\" (\"name\") VALUES ($1)".into(),
            row_index: 2,
            row: vec![Value::from("Main St")],
            source: "value too long".into(),
            rollback_error: None,
        };

        assert_eq!(
            err.sql(),
            Some("INSERT INTO \"osm\".\"roads\" (\"name\") VALUES ($1)")
        );
        assert_eq!(err.row(), Some(&vec![Value::from("Main St")]));

        let msg = err.to_string();
        assert!(msg.contains("row 2"));
        assert!(msg.contains("value too long"));
        assert!(msg.contains("Main St"));
    }

    #[test]
    fn test_format_detailed_includes_rollback_failure() {
        let err = ImportError::Insert {
            table: "roads".into(),
            sql: "INSERT".into(),
            row_index: 0,
            row: vec![],
            source: "boom".into(),
            rollback_error: Some("connection reset".into()),
        };

        let detailed = err.format_detailed();
        assert!(detailed.contains("Caused by:\n  1: boom"));
        assert!(detailed.contains("Rollback also failed: connection reset"));
    }

    #[test]
    fn test_format_detailed_includes_rollback_failure_after_prepare() {
        let err = ImportError::Prepare {
            table: "roads".into(),
            sql: "INSERT".into(),
            source: "relation does not exist".into(),
            rollback_error: Some("connection reset".into()),
        };

        assert_eq!(err.rollback_error(), Some("connection reset"));
        let detailed = err.format_detailed();
        assert!(detailed.contains("relation does not exist"));
        assert!(detailed.contains("Rollback also failed: connection reset"));
    }

    #[test]
    fn test_unknown_table_has_no_sql() {
        let err = ImportError::UnknownTable("nope".into());
        assert!(err.sql().is_none());
        assert!(err.row().is_none());
        assert_eq!(err.to_string(), "Unknown table: nope");
    }

    #[test]
    fn test_tx_stage_display() {
        assert_eq!(TxStage::Begin.to_string(), "begin");
        assert_eq!(TxStage::Commit.to_string(), "commit");
    }
}
