//! Catalogue domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep input normalization rules next to the types they guard.
//!
//! # Invariants
//! - Activities are identified by their unique, case-sensitive name.
//! - Deletion is a hard delete; there are no tombstones.

pub mod activity;
pub mod planet;
