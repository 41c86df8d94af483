//! PostgreSQL/PostGIS connection backed by a deadpool-postgres pool.

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Statement};
use tracing::{info, warn};

use crate::config::{redact_connection_params, Config};
use crate::core::traits::{Connection, Transaction};
use crate::core::value::Value;
use crate::drivers::tls::SslMode;
use crate::error::{DbError, ImportError, Result};

/// Pooled PostgreSQL connection.
#[derive(Clone)]
pub struct PgConnection {
    pool: Pool,
}

impl PgConnection {
    /// Build the pool and verify the server answers.
    pub async fn connect(config: &Config) -> Result<Self> {
        let pg_config = config.pg_config()?;
        let ssl_mode = SslMode::parse(&config.ssl_mode)?;

        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let mgr = match ssl_mode.connector() {
            None => Manager::from_config(pg_config, NoTls, mgr_config),
            Some(tls) => Manager::from_config(pg_config, tls, mgr_config),
        };
        let pool = Pool::builder(mgr)
            .max_size(config.max_connections)
            .build()
            .map_err(|e| ImportError::connection("creating PostgreSQL pool", e))?;

        let conn = Self { pool };
        conn.ping()
            .await
            .map_err(|e| ImportError::Connection {
                context: "testing PostgreSQL connection".into(),
                source: e,
            })?;

        info!(
            "Connected to PostGIS: {}",
            redact_connection_params(&config.connection_params)
        );
        Ok(conn)
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

#[async_trait]
impl Connection for PgConnection {
    type Transaction = PgTransaction;

    async fn ping(&self) -> std::result::Result<(), DbError> {
        let client = self.pool.get().await?;
        client.simple_query("SELECT 1").await?;
        Ok(())
    }

    async fn execute(&self, sql: &str) -> std::result::Result<u64, DbError> {
        let client = self.pool.get().await?;
        Ok(client.execute(sql, &[]).await?)
    }

    async fn query_bool(&self, sql: &str, params: &[&str]) -> std::result::Result<bool, DbError> {
        let client = self.pool.get().await?;
        let params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        let row = client.query_one(sql, &params).await?;
        Ok(row.try_get::<_, bool>(0)?)
    }

    async fn begin(&self) -> std::result::Result<PgTransaction, DbError> {
        let client = self.pool.get().await?;
        client.batch_execute("BEGIN").await?;
        Ok(PgTransaction {
            client: Some(client),
        })
    }
}

/// Transaction holding a pooled client until commit or rollback.
///
/// A transaction dropped while still open detaches its client from the pool;
/// closing that connection makes the server abort the transaction.
pub struct PgTransaction {
    client: Option<Object>,
}

impl PgTransaction {
    fn client(&self) -> std::result::Result<&Object, DbError> {
        self.client
            .as_ref()
            .ok_or_else(|| "transaction already finished".into())
    }

    async fn finish(mut self, command: &str) -> std::result::Result<(), DbError> {
        let client = self.client.take().ok_or("transaction already finished")?;
        match client.batch_execute(command).await {
            Ok(()) => Ok(()),
            Err(e) => {
                // The session state is unknown, never hand it back to the pool.
                drop(Object::take(client));
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    type Statement = Statement;

    async fn prepare(&mut self, sql: &str) -> std::result::Result<Statement, DbError> {
        Ok(self.client()?.prepare(sql).await?)
    }

    async fn execute(
        &mut self,
        stmt: &Statement,
        params: &[Value],
    ) -> std::result::Result<u64, DbError> {
        let params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|v| v as &(dyn ToSql + Sync)).collect();
        Ok(self.client()?.execute(stmt, &params).await?)
    }

    async fn commit(self) -> std::result::Result<(), DbError> {
        self.finish("COMMIT").await
    }

    async fn rollback(self) -> std::result::Result<(), DbError> {
        self.finish("ROLLBACK").await
    }
}

impl Drop for PgTransaction {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            warn!("Transaction dropped while open, discarding its connection");
            drop(Object::take(client));
        }
    }
}
