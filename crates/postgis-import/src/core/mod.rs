//! Core abstractions shared by the loader and the drivers:
//!
//! - [`spec`]: table and column specifications built from the mapping
//! - [`value`]: row values and their PostgreSQL encoding
//! - [`traits`]: the connection/transaction seam

pub mod spec;
pub mod traits;
pub mod value;

pub use spec::{ColumnSpec, TableSpec, GEOMETRY_COLUMN};
pub use traits::{Connection, Transaction};
pub use value::{Row, Value};
