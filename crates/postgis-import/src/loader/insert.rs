//! Transactional batch insert.

use tracing::{debug, warn};

use super::PostGis;
use crate::core::traits::{Connection, Transaction};
use crate::core::value::Row;
use crate::error::{DbError, ImportError, Result, TxStage};
use crate::sql;

impl<C: Connection> PostGis<C> {
    /// Insert `rows` into a registered table inside one transaction.
    ///
    /// Either every row is committed or none is. The insert statement is
    /// prepared once and executed per row; the first failing row rolls the
    /// transaction back and is returned in [`ImportError::Insert`].
    pub async fn insert_batch(&self, table: &str, rows: &[Row]) -> Result<u64> {
        let spec = self
            .tables
            .get(table)
            .ok_or_else(|| ImportError::UnknownTable(table.to_string()))?;

        if rows.is_empty() {
            return Ok(0);
        }

        let insert_sql = sql::insert_sql(spec);

        let mut tx = self
            .conn
            .begin()
            .await
            .map_err(|e| ImportError::Transaction {
                table: table.to_string(),
                stage: TxStage::Begin,
                source: e,
            })?;

        let stmt = match tx.prepare(&insert_sql).await {
            Ok(stmt) => stmt,
            Err(e) => {
                let rollback_error = rollback(tx, table).await;
                return Err(ImportError::Prepare {
                    table: table.to_string(),
                    sql: insert_sql,
                    source: e,
                    rollback_error,
                });
            }
        };

        for (row_index, row) in rows.iter().enumerate() {
            let result: std::result::Result<u64, DbError> = if row.len() != spec.columns.len() {
                Err(format!(
                    "row has {} values but {} has {} columns",
                    row.len(),
                    spec.full_name(),
                    spec.columns.len()
                )
                .into())
            } else {
                tx.execute(&stmt, row).await
            };

            if let Err(source) = result {
                let rollback_error = rollback(tx, table).await;
                return Err(ImportError::Insert {
                    table: table.to_string(),
                    sql: insert_sql,
                    row_index,
                    row: row.clone(),
                    source,
                    rollback_error,
                });
            }
        }

        tx.commit().await.map_err(|e| ImportError::Transaction {
            table: table.to_string(),
            stage: TxStage::Commit,
            source: e,
        })?;

        debug!("Inserted {} rows into {}", rows.len(), spec.full_name());
        Ok(rows.len() as u64)
    }
}

/// Roll back after a failure; a rollback error is logged and returned as text.
async fn rollback<T: Transaction>(tx: T, table: &str) -> Option<String> {
    match tx.rollback().await {
        Ok(()) => None,
        Err(e) => {
            warn!("Rollback failed for {}: {}", table, e);
            Some(e.to_string())
        }
    }
}
