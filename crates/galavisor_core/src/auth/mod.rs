//! Identity resolution and admin gating.
//!
//! # Responsibility
//! - Resolve an opaque subject claim to an admin flag (`IdentityResolver`).
//! - Provide the single predicate every planet mutation passes through
//!   (`AdminGate`).
//!
//! # Invariants
//! - Resolution is a pure query; nothing here mutates catalogue data.
//! - Blank subjects are never admin.

pub mod admin_gate;
pub mod identity;
