//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the directory core.
//! - Apply schema migrations in deterministic order.
//! - Provide optional sample data for demos and manual testing.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before migrations succeed.

use thiserror::Error;

pub mod migrations;
mod open;
mod seed;

pub use open::{open_db, open_db_in_memory};
pub use seed::seed_sample_data;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}
