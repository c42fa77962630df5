//! # urpearl-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for all UrPearl SHOP entities.
//!
//! Repositories never open transactions. Methods come in two flavors:
//! pool-backed for standalone reads and writes, and `*_in_tx` variants
//! taking a `&mut PgConnection` so services can compose several steps
//! into one atomic unit.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
