//! Connection bootstrap.
//!
//! Every connection handed out by this module has `foreign_keys=ON`, a busy
//! timeout, and the full migration set applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

enum Target<'a> {
    File(&'a Path),
    Memory,
}

impl Target<'_> {
    fn label(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }

    fn connect(&self) -> rusqlite::Result<Connection> {
        match self {
            Self::File(path) => Connection::open(path),
            Self::Memory => Connection::open_in_memory(),
        }
    }
}

/// Opens (creating if needed) a database file and migrates it.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open(Target::File(path.as_ref()))
}

/// Opens a fresh, private in-memory database and migrates it.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open(Target::Memory)
}

fn open(target: Target<'_>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = target
        .connect()
        .map_err(DbError::from)
        .and_then(|mut conn| configure(&mut conn).map(|()| conn));

    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok target={} duration_ms={duration_ms}",
            target.label()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error target={} duration_ms={duration_ms} error={err}",
            target.label()
        ),
    }
    result
}

fn configure(conn: &mut Connection) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
