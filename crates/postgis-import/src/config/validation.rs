//! Configuration validation.
//!
//! Runs before any pool or socket is created so that a bad backend or
//! connection string never acquires resources.

use super::{Config, POSTGRES_BACKEND};
use crate::drivers::tls::SslMode;
use crate::error::{ImportError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.r#type != POSTGRES_BACKEND {
        return Err(ImportError::Configuration(format!(
            "unsupported database type '{}', expected '{}'",
            config.r#type, POSTGRES_BACKEND
        )));
    }

    if config.connection_params.trim().is_empty() {
        return Err(ImportError::Configuration(
            "connection_params is required".into(),
        ));
    }
    config.pg_config()?;

    if config.schema.is_empty() {
        return Err(ImportError::Configuration("schema is required".into()));
    }
    if config.schema.contains('\0') {
        return Err(ImportError::Configuration(
            "schema must not contain NUL characters".into(),
        ));
    }

    if config.srid <= 0 {
        return Err(ImportError::Configuration(format!(
            "srid must be positive, got {}",
            config.srid
        )));
    }

    SslMode::parse(&config.ssl_mode)?;

    if config.max_connections == 0 {
        return Err(ImportError::Configuration(
            "max_connections must be at least 1".into(),
        ));
    }

    Ok(())
}
