//! Repository error shared by catalogue stores.

use crate::db::{is_foreign_key_violation, is_unique_violation, DbError};
use crate::model::activity::ActivityValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence and query errors for catalogue repositories.
#[derive(Debug)]
pub enum RepoError {
    Validation(ActivityValidationError),
    Db(DbError),
    /// Insert or rename collided with an existing unique key.
    UniquenessViolation {
        table: &'static str,
        value: String,
    },
    /// Write referenced a parent row that does not exist.
    MissingReference {
        table: &'static str,
        value: String,
    },
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl RepoError {
    /// Converts a SQLite failure, mapping constraint collisions on `table`.
    pub(crate) fn from_write(err: rusqlite::Error, table: &'static str, value: &str) -> Self {
        if is_unique_violation(&err) {
            Self::UniquenessViolation {
                table,
                value: value.to_string(),
            }
        } else {
            err.into()
        }
    }

    /// Converts a SQLite failure on a row whose foreign key points at `table`.
    pub(crate) fn from_reference(err: rusqlite::Error, table: &'static str, value: &str) -> Self {
        if is_foreign_key_violation(&err) {
            Self::MissingReference {
                table,
                value: value.to_string(),
            }
        } else {
            err.into()
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UniquenessViolation { table, value } => {
                write!(f, "duplicate key `{value}` in {table}")
            }
            Self::MissingReference { table, value } => {
                write!(f, "no row `{value}` in {table}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table is missing: {table}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ActivityValidationError> for RepoError {
    fn from(value: ActivityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
