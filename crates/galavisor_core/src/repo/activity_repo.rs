//! Activity store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist activities and their single planet link.
//! - Surface duplicate-name inserts as `RepoError::UniquenessViolation` so
//!   callers can resolve creation races without string matching.
//!
//! # Invariants
//! - `activities.name` is the primary key; uniqueness is arbitrated by SQLite.
//! - `planet_activities.activity_name` is unique, so an activity has at most
//!   one planet. Delete and rename cascade to the link row.
//! - `planet_activities.planet_name` references `planets.name`. Linking to an
//!   unknown planet fails with `RepoError::MissingReference`; planet rename and
//!   delete cascade to the link row.
//! - Write paths call `Activity::validate()` before SQL mutations.

use super::error::{RepoError, RepoResult};
use super::schema::ensure_tables;
use crate::model::activity::Activity;
use rusqlite::{params, Connection, OptionalExtension, Row};

const ACTIVITY_SELECT_SQL: &str = "SELECT
    a.name AS name,
    pa.planet_name AS planet_name
FROM activities a
LEFT JOIN planet_activities pa ON pa.activity_name = a.name";

/// Persistence contract used by the activity association service.
pub trait ActivityStore {
    /// Looks up one activity by exact name.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Activity>>;
    /// Inserts a new activity and its link when `planet_name` is set.
    ///
    /// Fails with `RepoError::UniquenessViolation` when the name exists and
    /// with `RepoError::MissingReference` when the planet does not.
    fn insert(&self, activity: &Activity) -> RepoResult<Activity>;
    /// Renames an activity. Returns `false` when `old_name` does not exist.
    fn update_name(&self, old_name: &str, new_name: &str) -> RepoResult<bool>;
    /// Sets or overwrites the planet link. Returns `false` when the activity
    /// does not exist; fails with `RepoError::MissingReference` when the
    /// planet does not.
    fn set_planet_link(&self, name: &str, planet_name: &str) -> RepoResult<bool>;
    /// Deletes an activity and its link. Returns `false` when absent.
    fn delete(&self, name: &str) -> RepoResult<bool>;
    /// Lists all activities ordered by name.
    fn list_all(&self) -> RepoResult<Vec<Activity>>;
    /// Lists activities linked to `planet_name`, ordered by name.
    fn list_by_planet(&self, planet_name: &str) -> RepoResult<Vec<Activity>>;
}

/// SQLite-backed activity store.
pub struct SqliteActivityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActivityRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["activities", "planet_activities"])?;
        Ok(Self { conn })
    }
}

impl ActivityStore for SqliteActivityRepository<'_> {
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Activity>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACTIVITY_SELECT_SQL} WHERE a.name = ?1;"))?;
        let activity = stmt
            .query_row([name], parse_activity_row)
            .optional()?;
        Ok(activity)
    }

    fn insert(&self, activity: &Activity) -> RepoResult<Activity> {
        activity.validate()?;

        // Activity row and link row become visible together.
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO activities (name) VALUES (?1);",
            [activity.name.as_str()],
        )
        .map_err(|err| RepoError::from_write(err, "activities", &activity.name))?;

        if let Some(planet_name) = activity.planet_name.as_deref() {
            tx.execute(
                "INSERT INTO planet_activities (activity_name, planet_name) VALUES (?1, ?2);",
                params![activity.name.as_str(), planet_name],
            )
            .map_err(|err| RepoError::from_reference(err, "planets", planet_name))?;
        }
        tx.commit()?;

        Ok(activity.clone())
    }

    fn update_name(&self, old_name: &str, new_name: &str) -> RepoResult<bool> {
        Activity::new(new_name).validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE activities
                 SET
                    name = ?2,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE name = ?1;",
                params![old_name, new_name],
            )
            .map_err(|err| RepoError::from_write(err, "activities", new_name))?;

        Ok(changed > 0)
    }

    fn set_planet_link(&self, name: &str, planet_name: &str) -> RepoResult<bool> {
        Activity::linked(name, planet_name).validate()?;

        let changed = self
            .conn
            .execute(
                "INSERT INTO planet_activities (activity_name, planet_name)
                 SELECT name, ?2
                 FROM activities
                 WHERE name = ?1
                 ON CONFLICT (activity_name) DO UPDATE SET
                    planet_name = excluded.planet_name,
                    linked_at = (strftime('%s', 'now') * 1000);",
                params![name, planet_name],
            )
            .map_err(|err| RepoError::from_reference(err, "planets", planet_name))?;

        Ok(changed > 0)
    }

    fn delete(&self, name: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM activities WHERE name = ?1;", [name])?;
        Ok(changed > 0)
    }

    fn list_all(&self) -> RepoResult<Vec<Activity>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACTIVITY_SELECT_SQL} ORDER BY a.name ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut activities = Vec::new();
        while let Some(row) = rows.next()? {
            activities.push(parse_activity_row(row)?);
        }
        Ok(activities)
    }

    fn list_by_planet(&self, planet_name: &str) -> RepoResult<Vec<Activity>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ACTIVITY_SELECT_SQL}
             WHERE pa.planet_name = ?1
             ORDER BY a.name ASC;"
        ))?;
        let mut rows = stmt.query([planet_name])?;
        let mut activities = Vec::new();
        while let Some(row) = rows.next()? {
            activities.push(parse_activity_row(row)?);
        }
        Ok(activities)
    }
}

fn parse_activity_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        name: row.get("name")?,
        planet_name: row.get("planet_name")?,
    })
}
