//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and identity calls into use-case level APIs.
//! - Return typed outcomes so gateways can map validation, not-found and
//!   forbidden results to distinct external signals.

pub mod activity_service;
pub mod planet_service;
