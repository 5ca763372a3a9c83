//! Identity resolver contract and implementations.

use crate::repo::{bool_to_int, ensure_tables};
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;

/// Resolves a subject identifier to admin privilege.
///
/// Implementations answer `false` for unknown subjects; errors are reserved
/// for transport failures.
pub trait IdentityResolver {
    fn is_admin(&self, subject: &str) -> RepoResult<bool>;
}

/// Looks subjects up in the `users` table.
pub struct SqliteIdentityResolver<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteIdentityResolver<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users"])?;
        Ok(Self { conn })
    }

    /// Creates or updates the user row for `subject`.
    pub fn register_subject(
        &self,
        subject: &str,
        user_name: Option<&str>,
        is_admin: bool,
    ) -> RepoResult<()> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(RepoError::InvalidData("subject must not be blank".to_string()));
        }
        self.conn.execute(
            "INSERT INTO users (google_subject, user_name, is_admin)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (google_subject) DO UPDATE SET
                user_name = COALESCE(excluded.user_name, users.user_name),
                is_admin = excluded.is_admin;",
            params![subject, user_name, bool_to_int(is_admin)],
        )?;
        Ok(())
    }
}

impl IdentityResolver for SqliteIdentityResolver<'_> {
    fn is_admin(&self, subject: &str) -> RepoResult<bool> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Ok(false);
        }

        let flag = self
            .conn
            .query_row(
                "SELECT is_admin FROM users WHERE google_subject = ?1;",
                [subject],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;

        match flag {
            None | Some(0) => Ok(false),
            Some(1) => Ok(true),
            Some(other) => Err(RepoError::InvalidData(format!(
                "invalid is_admin value `{other}` in users.is_admin"
            ))),
        }
    }
}

/// Fixed allow-list of admin subjects, typically read from config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticAdminList {
    subjects: BTreeSet<String>,
}

impl StaticAdminList {
    pub fn new<I, S>(subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let subjects = subjects
            .into_iter()
            .map(|subject| subject.as_ref().trim().to_string())
            .filter(|subject| !subject.is_empty())
            .collect();
        Self { subjects }
    }

    /// Parses a comma-separated subject list.
    pub fn parse(value: &str) -> Self {
        Self::new(value.split(','))
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

impl IdentityResolver for StaticAdminList {
    fn is_admin(&self, subject: &str) -> RepoResult<bool> {
        Ok(self.subjects.contains(subject.trim()))
    }
}

impl<T: IdentityResolver + ?Sized> IdentityResolver for &T {
    fn is_admin(&self, subject: &str) -> RepoResult<bool> {
        (**self).is_admin(subject)
    }
}

impl<T: IdentityResolver + ?Sized> IdentityResolver for Box<T> {
    fn is_admin(&self, subject: &str) -> RepoResult<bool> {
        (**self).is_admin(subject)
    }
}
