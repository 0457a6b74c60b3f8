//! Store layer: repository contracts and their implementations.
//!
//! # Responsibility
//! - Define the minimal store contracts consumed by the services.
//! - Provide SQLite-backed and in-memory implementations of each contract.
//! - Isolate SQL details from service/business orchestration.
//!
//! # Invariants
//! - `list()` returns records in storage (insertion) order.
//! - Lookups report absence with `Ok(None)`; only transport or data errors
//!   are surfaced as `Err`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

pub mod country_repo;
pub mod person_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic store error for persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("record not found: {0}")]
    NotFound(Uuid),
    #[error("record already exists: {0}")]
    DuplicateId(Uuid),
    #[error("name already stored: {0}")]
    DuplicateName(String),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    #[error("connection schema version {actual_version} is behind required {expected_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` is missing")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Verifies that `conn` is migrated and exposes `table` with `columns`.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable(table));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in columns {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
