//! Ordered catalogue schema steps, tracked through `PRAGMA user_version`.
//!
//! Steps run in one transaction, so a database is either left at its old
//! version or moved to `latest_version()`; never in between.
//!
//! - `1` catalogue: planets, activities, planet_activities link table.
//! - `2` users: identity subjects with an admin flag.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

/// One schema step; `version` is the `user_version` after it runs.
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "catalogue",
        sql: include_str!("0001_catalogue.sql"),
    },
    SchemaStep {
        version: 2,
        name: "users",
        sql: include_str!("0002_users.sql"),
    },
];

/// Schema version this build migrates databases to.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to `latest_version()`.
///
/// Fails with `DbError::UnsupportedSchemaVersion` when the database was
/// written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let to = latest_version();
    if from > to {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        });
    }

    let pending = SCHEMA_STEPS.iter().filter(|step| step.version > from);
    let tx = conn.transaction()?;
    let mut applied = 0;
    for step in pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        debug!(
            "event=db_migrate module=db status=ok version={} step={}",
            step.version, step.name
        );
        applied += 1;
    }
    tx.commit()?;

    if applied > 0 {
        info!("event=db_migrate module=db status=ok from={from} to={to} steps={applied}");
    }
    Ok(())
}
