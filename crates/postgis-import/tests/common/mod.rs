//! In-memory `Connection` that records every statement it receives.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use postgis_import::{Connection, DbError, Row, Transaction, Value};

/// Shared state of a [`RecordingConnection`] and its transactions.
#[derive(Debug, Default)]
pub struct State {
    /// Statements in execution order; transaction steps are recorded as
    /// `BEGIN`, `PREPARE <sql>`, `EXECUTE`, `COMMIT` and `ROLLBACK`.
    pub log: Vec<String>,
    /// Rows made visible by committed transactions.
    pub committed: Vec<Row>,
    /// Answer of the schema existence query.
    pub schema_exists: bool,
    /// Fail any statement containing this text.
    pub fail_sql: Option<String>,
    /// Fail row execution when the row contains this value.
    pub fail_value: Option<Value>,
    pub fail_ping: bool,
    pub fail_commit: bool,
    pub fail_rollback: bool,
}

#[derive(Clone, Default)]
pub struct RecordingConnection {
    state: Arc<Mutex<State>>,
}

impl RecordingConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn log(&self) -> Vec<String> {
        self.state().log.clone()
    }

    pub fn clear_log(&self) {
        self.state().log.clear();
    }

    pub fn committed(&self) -> Vec<Row> {
        self.state().committed.clone()
    }

    fn record(&self, sql: &str) -> Result<(), DbError> {
        let mut state = self.state();
        state.log.push(sql.to_string());
        match &state.fail_sql {
            Some(needle) if sql.contains(needle.as_str()) => {
                Err(format!("injected failure for: {}", sql).into())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Connection for RecordingConnection {
    type Transaction = RecordingTransaction;

    async fn ping(&self) -> Result<(), DbError> {
        if self.state().fail_ping {
            return Err("connection refused".into());
        }
        Ok(())
    }

    async fn execute(&self, sql: &str) -> Result<u64, DbError> {
        self.record(sql)?;
        Ok(0)
    }

    async fn query_bool(&self, sql: &str, _params: &[&str]) -> Result<bool, DbError> {
        self.record(sql)?;
        Ok(self.state().schema_exists)
    }

    async fn begin(&self) -> Result<RecordingTransaction, DbError> {
        self.record("BEGIN")?;
        Ok(RecordingTransaction {
            conn: self.clone(),
            pending: Vec::new(),
        })
    }
}

pub struct RecordingTransaction {
    conn: RecordingConnection,
    pending: Vec<Row>,
}

#[async_trait]
impl Transaction for RecordingTransaction {
    type Statement = String;

    async fn prepare(&mut self, sql: &str) -> Result<String, DbError> {
        self.conn.record(&format!("PREPARE {}", sql))?;
        Ok(sql.to_string())
    }

    async fn execute(&mut self, _stmt: &String, params: &[Value]) -> Result<u64, DbError> {
        self.conn.record("EXECUTE")?;
        let fail = match &self.conn.state().fail_value {
            Some(value) => params.contains(value),
            None => false,
        };
        if fail {
            return Err("value rejected by server".into());
        }
        self.pending.push(params.to_vec());
        Ok(1)
    }

    async fn commit(self) -> Result<(), DbError> {
        let mut state = self.conn.state();
        state.log.push("COMMIT".to_string());
        if state.fail_commit {
            return Err("could not serialize access".into());
        }
        state.committed.extend(self.pending);
        Ok(())
    }

    async fn rollback(self) -> Result<(), DbError> {
        let mut state = self.conn.state();
        state.log.push("ROLLBACK".to_string());
        if state.fail_rollback {
            return Err("connection reset during rollback".into());
        }
        Ok(())
    }
}
