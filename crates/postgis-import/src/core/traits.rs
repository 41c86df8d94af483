//! Connection seam between the loader and the database driver.
//!
//! - [`Connection`]: runs DDL/catalog statements and opens transactions
//! - [`Transaction`]: prepared-statement execution inside one transaction
//!
//! The PostgreSQL implementation lives in `drivers::postgres`; tests plug in
//! recording fakes.

use async_trait::async_trait;

use super::value::Value;
use crate::error::DbError;

/// A database connection (or pool) the loader issues statements against.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Transaction type returned by [`Connection::begin`].
    type Transaction: Transaction;

    /// Trivial liveness query.
    async fn ping(&self) -> Result<(), DbError>;

    /// Execute a statement outside of an explicit transaction.
    ///
    /// Any rows the statement returns are discarded.
    async fn execute(&self, sql: &str) -> Result<u64, DbError>;

    /// Run a query returning a single boolean, binding `params` as text.
    async fn query_bool(&self, sql: &str, params: &[&str]) -> Result<bool, DbError>;

    /// Open a transaction on a dedicated connection.
    async fn begin(&self) -> Result<Self::Transaction, DbError>;
}

/// An open transaction.
///
/// Dropping a transaction without calling [`commit`](Transaction::commit) or
/// [`rollback`](Transaction::rollback) must leave no partial writes behind.
#[async_trait]
pub trait Transaction: Send {
    /// Prepared statement handle.
    type Statement: Send + Sync;

    /// Prepare a statement for repeated execution.
    async fn prepare(&mut self, sql: &str) -> Result<Self::Statement, DbError>;

    /// Execute a prepared statement with positional parameters.
    async fn execute(&mut self, stmt: &Self::Statement, params: &[Value]) -> Result<u64, DbError>;

    /// Commit the transaction.
    async fn commit(self) -> Result<(), DbError>;

    /// Roll the transaction back.
    async fn rollback(self) -> Result<(), DbError>;
}
