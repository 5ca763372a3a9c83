//! Core domain logic for the Galavisor travel catalogue.
//! This crate is the single source of truth for activity association rules
//! and admin gating of planet mutations.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::admin_gate::{AdminGate, AdminGateError};
pub use auth::identity::{IdentityResolver, SqliteIdentityResolver, StaticAdminList};
pub use config::{ConfigError, ConfigKey, ConfigStore, DEFAULT_CONFIG_FILE};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::activity::{Activity, ActivityValidationError};
pub use model::planet::{NewPlanet, Planet, PlanetId};
pub use repo::activity_repo::{ActivityStore, SqliteActivityRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::planet_repo::{PlanetRepository, SqlitePlanetRepository};
pub use service::activity_service::{
    ActivityService, ActivityServiceError, AddActivityOutcome, LinkActivityOutcome,
};
pub use service::planet_service::{PlanetService, PlanetServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
