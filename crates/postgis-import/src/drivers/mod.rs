//! Database drivers.
//!
//! - [`postgres`]: pooled PostgreSQL/PostGIS [`Connection`](crate::core::Connection)
//! - [`tls`]: rustls setup for the pool

pub mod postgres;
pub mod tls;

pub use postgres::{PgConnection, PgTransaction};
pub use tls::SslMode;
