//! Configuration type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend identifier accepted by [`crate::open`].
pub const POSTGRES_BACKEND: &str = "postgres";

/// Schema that always exists and is never created.
pub const DEFAULT_SCHEMA: &str = "public";

/// Database configuration for an import run.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database type (only "postgres" is supported).
    #[serde(default = "default_postgres")]
    pub r#type: String,

    /// tokio-postgres connection string, key/value (`host=... dbname=...`)
    /// or URL (`postgresql://user@host/db`) form.
    pub connection_params: String,

    /// Spatial reference id of all geometry columns (default: 3857).
    #[serde(default = "default_srid")]
    pub srid: i32,

    /// Target schema (default: "public").
    #[serde(default = "default_public_schema")]
    pub schema: String,

    /// SSL mode: disable, require, verify-ca, verify-full (default: "disable").
    #[serde(default = "default_disable")]
    pub ssl_mode: String,

    /// Maximum pooled connections (default: 4).
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Connect timeout in seconds (default: 30).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Config {
    /// Configuration with defaults for everything but the connection string.
    pub fn new(connection_params: impl Into<String>) -> Self {
        Self {
            r#type: default_postgres(),
            connection_params: connection_params.into(),
            srid: default_srid(),
            schema: default_public_schema(),
            ssl_mode: default_disable(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }

    /// Set the target schema.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Set the SRID.
    pub fn with_srid(mut self, srid: i32) -> Self {
        self.srid = srid;
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("type", &self.r#type)
            .field(
                "connection_params",
                &redact_connection_params(&self.connection_params),
            )
            .field("srid", &self.srid)
            .field("schema", &self.schema)
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// Hide passwords in key/value and URL connection strings.
pub(crate) fn redact_connection_params(params: &str) -> String {
    if let Some(scheme_end) = params.find("://") {
        let rest = &params[scheme_end + 3..];
        let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
        if let Some(at) = rest[..authority_end].rfind('@') {
            let userinfo = &rest[..at];
            if let Some(colon) = userinfo.find(':') {
                return format!(
                    "{}{}:[REDACTED]{}",
                    &params[..scheme_end + 3],
                    &userinfo[..colon],
                    &rest[at..]
                );
            }
        }
        return params.to_string();
    }

    redact_key_value(params)
}

/// Redact `password` in a libpq key/value string. Values may be
/// single-quoted and contain backslash escapes.
fn redact_key_value(params: &str) -> String {
    let mut pairs = Vec::new();
    let mut chars = params.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=' && !c.is_whitespace()) {
            key.push(c);
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.next_if_eq(&'=').is_none() {
            pairs.push(key);
            continue;
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut value = String::new();
        let quoted = chars.next_if_eq(&'\'').is_some();
        if quoted {
            value.push('\'');
        }
        while let Some(c) = chars.next_if(|c| quoted || !c.is_whitespace()) {
            value.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    value.push(escaped);
                }
            } else if quoted && c == '\'' {
                break;
            }
        }

        if key.eq_ignore_ascii_case("password") {
            pairs.push(format!("{}=[REDACTED]", key));
        } else {
            pairs.push(format!("{}={}", key, value));
        }
    }

    pairs.join(" ")
}

fn default_postgres() -> String {
    POSTGRES_BACKEND.to_string()
}

fn default_srid() -> i32 {
    3857
}

fn default_public_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_disable() -> String {
    "disable".to_string()
}

fn default_max_connections() -> usize {
    4
}

fn default_connect_timeout() -> u64 {
    30
}
