//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs report absence as `Option`/`bool`, and duplicate keys
//!   as `RepoError::UniquenessViolation`, never as transport errors.
//! - Constructors refuse connections whose migrations are not applied.

pub mod activity_repo;
pub mod error;
pub mod planet_repo;
mod schema;

pub(crate) use schema::{bool_to_int, ensure_tables};
