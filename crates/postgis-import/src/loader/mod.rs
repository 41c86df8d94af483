//! The database handle exposed to the import pipeline.
//!
//! [`PostGis`] owns the configuration, the connection and the table registry.
//! It offers exactly two operations: [`init`](PostGis::init) (destructive
//! schema rebuild from a [`Mapping`]) and [`insert_batch`](PostGis::insert_batch)
//! (atomic load of decoded rows).
//!
//! The registry is replaced by `init`, which takes `&mut self`; inserts only
//! read it through `&self`, so a shared handle can run batches concurrently
//! once initialization is done.

mod init;
mod insert;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::config::{Config, POSTGRES_BACKEND};
use crate::core::spec::TableSpec;
use crate::core::traits::Connection;
use crate::core::value::Row;
use crate::drivers::PgConnection;
use crate::error::{ImportError, Result};
use crate::mapping::Mapping;

/// Can (re)create the target tables for a mapping.
#[async_trait]
pub trait Initializable {
    async fn init(&mut self, mapping: &Mapping) -> Result<()>;
}

/// Can load a batch of rows atomically.
#[async_trait]
pub trait BatchInsertable {
    /// Insert every row or none; returns the number of rows written.
    async fn insert_batch(&self, table: &str, rows: &[Row]) -> Result<u64>;
}

/// A backend usable by the import pipeline.
pub trait Database: Initializable + BatchInsertable + Send + Sync {}

impl<T> Database for T where T: Initializable + BatchInsertable + Send + Sync {}

/// Open a database handle for the configured backend.
///
/// The configuration is validated before any connection is attempted.
pub async fn open(config: Config) -> Result<Box<dyn Database>> {
    config.validate()?;
    match config.r#type.as_str() {
        POSTGRES_BACKEND => Ok(Box::new(PostGis::connect(config).await?)),
        other => Err(ImportError::Configuration(format!(
            "unsupported database type '{}'",
            other
        ))),
    }
}

/// PostGIS database handle.
pub struct PostGis<C: Connection = PgConnection> {
    config: Config,
    conn: C,
    tables: BTreeMap<String, TableSpec>,
}

impl PostGis<PgConnection> {
    /// Validate the configuration, open the pool and check the connection.
    pub async fn connect(config: Config) -> Result<Self> {
        config.validate()?;
        let conn = PgConnection::connect(&config).await?;
        Ok(Self {
            config,
            conn,
            tables: BTreeMap::new(),
        })
    }
}

impl<C: Connection> PostGis<C> {
    /// Wrap an existing connection.
    ///
    /// Runs the same validation and liveness check as [`PostGis::connect`].
    pub async fn with_connection(config: Config, conn: C) -> Result<Self> {
        config.validate()?;
        conn.ping()
            .await
            .map_err(|e| ImportError::connection("liveness check", e))?;
        Ok(Self {
            config,
            conn,
            tables: BTreeMap::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// Registered spec for a table.
    pub fn table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.get(name)
    }

    /// All registered specs, ordered by table name.
    pub fn tables(&self) -> impl Iterator<Item = &TableSpec> {
        self.tables.values()
    }
}

#[async_trait]
impl<C: Connection> Initializable for PostGis<C> {
    async fn init(&mut self, mapping: &Mapping) -> Result<()> {
        PostGis::init(self, mapping).await
    }
}

#[async_trait]
impl<C: Connection> BatchInsertable for PostGis<C> {
    async fn insert_batch(&self, table: &str, rows: &[Row]) -> Result<u64> {
        PostGis::insert_batch(self, table, rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_rejects_unsupported_backend_without_connecting() {
        let mut config = Config::new("host=127.0.0.1 port=1");
        config.r#type = "spatialite".into();

        let err = open(config).await.err().unwrap();
        match err {
            ImportError::Configuration(msg) => assert!(msg.contains("spatialite")),
            other => panic!("expected configuration error, got {:?}", other),
        }
    }
}
