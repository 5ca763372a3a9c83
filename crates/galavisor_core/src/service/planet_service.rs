//! Planet use-case service.
//!
//! # Responsibility
//! - Expose planet reads to any caller.
//! - Run planet mutations only for admin subjects.
//!
//! # Invariants
//! - Every mutation calls `AdminGate::require_admin` first, before input
//!   validation or existence checks, so a non-admin always observes
//!   `Forbidden` and storage stays untouched.
//! - Activity links follow a planet's name: rename moves them, delete
//!   removes them (foreign key cascade in `planet_activities`).

use crate::auth::admin_gate::{AdminGate, AdminGateError};
use crate::auth::identity::IdentityResolver;
use crate::model::planet::{NewPlanet, Planet, PlanetId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::planet_repo::PlanetRepository;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for planet use-cases.
#[derive(Debug)]
pub enum PlanetServiceError {
    /// Input rejected before reaching storage.
    Validation(&'static str),
    /// Caller is authenticated but not an admin.
    Forbidden { subject: String },
    /// Another planet already uses this name.
    NameConflict(String),
    /// Persistence or identity-resolution failure.
    Repo(RepoError),
}

impl Display for PlanetServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::Forbidden { .. } => write!(
                f,
                "you cannot access this command, only available to admins"
            ),
            Self::NameConflict(name) => write!(f, "planet already exists: {name}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PlanetServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PlanetServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::UniquenessViolation { value, .. } => Self::NameConflict(value),
            other => Self::Repo(other),
        }
    }
}

impl From<AdminGateError> for PlanetServiceError {
    fn from(value: AdminGateError) -> Self {
        match value {
            AdminGateError::Forbidden { subject } => Self::Forbidden { subject },
            AdminGateError::Resolver(err) => Self::Repo(err),
        }
    }
}

/// Planet service facade with admin-gated mutations.
pub struct PlanetService<R: PlanetRepository, I: IdentityResolver> {
    repo: R,
    gate: AdminGate<I>,
}

impl<R: PlanetRepository, I: IdentityResolver> PlanetService<R, I> {
    pub fn new(repo: R, resolver: I) -> Self {
        Self {
            repo,
            gate: AdminGate::new(resolver),
        }
    }

    pub fn get_all_planets(&self) -> RepoResult<Vec<Planet>> {
        self.repo.list_planets()
    }

    pub fn get_planet_by_id(&self, id: PlanetId) -> Result<Option<Planet>, PlanetServiceError> {
        ensure_non_negative_id(id)?;
        Ok(self.repo.get_planet(id)?)
    }

    pub fn get_planet_by_name(&self, name: &str) -> RepoResult<Option<Planet>> {
        self.repo.get_planet_by_name(name.trim())
    }

    /// Adds a planet. Admin only.
    pub fn add_planet(
        &self,
        subject: &str,
        planet: &NewPlanet,
    ) -> Result<Planet, PlanetServiceError> {
        self.gate.require_admin(subject)?;

        let planet = NewPlanet {
            name: normalize_planet_name(&planet.name)?,
            description: planet.description.clone(),
        };
        let created = self.repo.insert_planet(&planet)?;
        info!(
            "event=planet_add module=service status=ok planet_id={}",
            created.id
        );
        Ok(created)
    }

    /// Replaces name and description of a planet. Admin only.
    ///
    /// Returns `Ok(false)` when no planet has `planet.id`.
    pub fn update_planet(
        &self,
        subject: &str,
        planet: &Planet,
    ) -> Result<bool, PlanetServiceError> {
        self.gate.require_admin(subject)?;
        ensure_non_negative_id(planet.id)?;

        let planet = Planet {
            id: planet.id,
            name: normalize_planet_name(&planet.name)?,
            description: planet.description.clone(),
        };
        let updated = self.repo.update_planet(&planet)?;
        info!(
            "event=planet_update module=service status=ok planet_id={} updated={updated}",
            planet.id
        );
        Ok(updated)
    }

    /// Deletes a planet. Admin only.
    ///
    /// Returns `Ok(false)` when no planet has `id`.
    pub fn delete_planet(&self, subject: &str, id: PlanetId) -> Result<bool, PlanetServiceError> {
        self.gate.require_admin(subject)?;
        ensure_non_negative_id(id)?;

        let deleted = self.repo.delete_planet(id)?;
        info!("event=planet_delete module=service status=ok planet_id={id} deleted={deleted}");
        Ok(deleted)
    }
}

fn ensure_non_negative_id(id: PlanetId) -> Result<(), PlanetServiceError> {
    if id < 0 {
        return Err(PlanetServiceError::Validation("planet id cannot be negative"));
    }
    Ok(())
}

fn normalize_planet_name(name: &str) -> Result<String, PlanetServiceError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PlanetServiceError::Validation("planet name is required"));
    }
    Ok(trimmed.to_string())
}
