//! Ordered schema migrations tracked through `PRAGMA user_version`.
//!
//! # Invariants
//! - Versions start at 1 and grow by exactly one per entry.
//! - All pending steps run inside one transaction; a failure leaves the
//!   database at its previous version.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "tax_identification_number",
        sql: include_str!("0002_tax_identification_number.sql"),
    },
    Migration {
        version: 3,
        name: "unique_country_name",
        sql: include_str!("0003_unique_country_name.sql"),
    },
];

/// Highest schema version this build can produce.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_user_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        debug!(
            "event=db_migration module=db status=applied version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from_version} to_version={latest}");
    Ok(())
}

/// Schema version recorded in the database header.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
