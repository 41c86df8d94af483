//! # postgis-import
//!
//! Mapping-driven table builder and transactional bulk loader for PostGIS.
//!
//! Given an abstract [`Mapping`] of feature tables, the loader:
//!
//! - **Resolves field types** to PostgreSQL column types ([`typemap`])
//! - **Rebuilds tables** (drop, create, `AddGeometryColumn`) in the target schema
//! - **Loads batches** of decoded rows atomically, one transaction per batch
//!
//! ## Example
//!
//! ```rust,no_run
//! use postgis_import::{Config, Mapping, PostGis, TableMapping, Value};
//!
//! #[tokio::main]
//! async fn main() -> postgis_import::Result<()> {
//!     let config = Config::new("host=localhost dbname=osm user=osm")
//!         .with_schema("import")
//!         .with_srid(3857);
//!     let mapping = Mapping::from_tables([TableMapping::new("roads", "linestring")
//!         .field("name", "string")
//!         .field("class", "string")]);
//!
//!     let mut db = PostGis::connect(config).await?;
//!     db.init(&mapping).await?;
//!     let rows = vec![vec![Value::from("Main St"), Value::from("residential")]];
//!     db.insert_batch("roads", &rows).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod drivers;
pub mod error;
pub mod loader;
pub mod mapping;
pub mod sql;
pub mod typemap;

// Re-exports for convenient access
pub use config::Config;
pub use crate::core::{ColumnSpec, Connection, Row, TableSpec, Transaction, Value};
pub use error::{DbError, ImportError, Result, TxStage};
pub use loader::{open, BatchInsertable, Database, Initializable, PostGis};
pub use mapping::{FieldMapping, Mapping, TableMapping};
pub use typemap::{TypeDescriptor, ValueTemplate};
