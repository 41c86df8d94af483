//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use tokio_postgres::Config as PgConfig;

use crate::error::{ImportError, Result};

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Parse the connection string for tokio-postgres.
    pub fn pg_config(&self) -> Result<PgConfig> {
        let mut pg_config = PgConfig::from_str(&self.connection_params).map_err(|e| {
            ImportError::Configuration(format!("invalid connection_params: {}", e))
        })?;
        pg_config.connect_timeout(Duration::from_secs(self.connect_timeout_secs));
        pg_config.keepalives(true);
        Ok(pg_config)
    }
}
