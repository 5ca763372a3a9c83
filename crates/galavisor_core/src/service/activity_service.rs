//! Activity association use-case service.
//!
//! # Responsibility
//! - Create-or-reuse activities and link them to planets idempotently.
//! - Report whether a call changed state (`is_newly_created`,
//!   `is_newly_linked`) so callers can tell a first application apart from
//!   a repeat.
//!
//! # Invariants
//! - `add_activity` never changes an existing activity's planet link.
//! - A lost insert race resolves to the stored row with
//!   `is_newly_created = false`; it is never surfaced as an error.
//! - Linking requires an existing activity; it never creates one.
//! - Links only point at stored planets; an unknown planet is
//!   `PlanetNotFound` and leaves the store unchanged.
//! - Renaming onto another activity's name is rejected, leaving both rows
//!   unchanged.
//! - Activity operations are not admin-gated.

use crate::model::activity::{
    normalize_activity_name, normalize_optional_planet_name, normalize_planet_name, Activity,
    ActivityValidationError,
};
use crate::repo::activity_repo::ActivityStore;
use crate::repo::error::{RepoError, RepoResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for activity use-cases.
#[derive(Debug)]
pub enum ActivityServiceError {
    /// Required input is missing or blank.
    Validation(ActivityValidationError),
    /// Target activity does not exist where existence is required.
    ActivityNotFound(String),
    /// Link target planet does not exist.
    PlanetNotFound(String),
    /// Rename target is already used by another activity.
    NameConflict(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ActivityServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ActivityNotFound(name) => write!(f, "activity not found: {name}"),
            Self::PlanetNotFound(name) => write!(f, "planet not found: {name}"),
            Self::NameConflict(name) => write!(f, "activity already exists: {name}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ActivityServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ActivityValidationError> for ActivityServiceError {
    fn from(value: ActivityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ActivityServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::MissingReference {
                table: "planets",
                value,
            } => Self::PlanetNotFound(value),
            other => Self::Repo(other),
        }
    }
}

/// Result of `add_activity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddActivityOutcome {
    /// Stored activity: the new row, or the pre-existing one unchanged.
    pub activity: Activity,
    pub is_newly_created: bool,
}

/// Result of `link_activity_to_planet`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkActivityOutcome {
    /// Activity as linked after the call.
    pub activity: Activity,
    pub is_newly_linked: bool,
}

/// Activity association service over an `ActivityStore`.
pub struct ActivityService<S: ActivityStore> {
    store: S,
}

impl<S: ActivityStore> ActivityService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Inserts the activity unless one with the same name exists.
    ///
    /// A blank `planet_name` creates an unlinked activity. A named planet
    /// must already exist.
    pub fn add_activity(
        &self,
        name: &str,
        planet_name: Option<&str>,
    ) -> Result<AddActivityOutcome, ActivityServiceError> {
        let name = normalize_activity_name(name)?;

        if let Some(existing) = self.store.find_by_name(&name)? {
            info!("event=activity_add module=service status=ok created=false");
            return Ok(AddActivityOutcome {
                activity: existing,
                is_newly_created: false,
            });
        }

        let candidate = Activity {
            name,
            planet_name: normalize_optional_planet_name(planet_name),
        };
        match self.store.insert(&candidate) {
            Ok(activity) => {
                info!("event=activity_add module=service status=ok created=true");
                Ok(AddActivityOutcome {
                    activity,
                    is_newly_created: true,
                })
            }
            Err(RepoError::UniquenessViolation { .. }) => {
                warn!("event=activity_add module=service status=race_recovered created=false");
                let existing = self.refetch_after_race(&candidate.name)?;
                Ok(AddActivityOutcome {
                    activity: existing,
                    is_newly_created: false,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Links an existing activity to `planet_name`, overwriting any
    /// previous link.
    ///
    /// Fails with `ActivityNotFound` or `PlanetNotFound` when either side is
    /// missing.
    pub fn link_activity_to_planet(
        &self,
        activity_name: &str,
        planet_name: &str,
    ) -> Result<LinkActivityOutcome, ActivityServiceError> {
        let activity_name = normalize_activity_name(activity_name)?;
        let planet_name = normalize_planet_name(planet_name)?;

        let current = self
            .store
            .find_by_name(&activity_name)?
            .ok_or_else(|| ActivityServiceError::ActivityNotFound(activity_name.clone()))?;

        if current.is_linked_to(&planet_name) {
            info!("event=activity_link module=service status=ok linked=false");
            return Ok(LinkActivityOutcome {
                activity: current,
                is_newly_linked: false,
            });
        }

        if !self.store.set_planet_link(&activity_name, &planet_name)? {
            // Deleted between lookup and write.
            return Err(ActivityServiceError::ActivityNotFound(activity_name));
        }

        info!("event=activity_link module=service status=ok linked=true");
        Ok(LinkActivityOutcome {
            activity: Activity::linked(activity_name, planet_name),
            is_newly_linked: true,
        })
    }

    /// Renames an activity in place.
    ///
    /// Returns `Ok(false)` when `current_name` does not exist.
    pub fn update_activity(
        &self,
        current_name: &str,
        new_name: &str,
    ) -> Result<bool, ActivityServiceError> {
        let new_name = normalize_activity_name(new_name)?;
        let current_name = current_name.trim();

        if current_name == new_name {
            return Ok(self.store.find_by_name(current_name)?.is_some());
        }

        match self.store.update_name(current_name, &new_name) {
            Ok(renamed) => {
                info!("event=activity_update module=service status=ok renamed={renamed}");
                Ok(renamed)
            }
            Err(RepoError::UniquenessViolation { value, .. }) => {
                info!("event=activity_update module=service status=conflict renamed=false");
                Err(ActivityServiceError::NameConflict(value))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes an activity and its link. Returns `Ok(false)` when absent.
    pub fn delete_activity(&self, name: &str) -> Result<bool, ActivityServiceError> {
        let deleted = self.store.delete(name.trim())?;
        info!("event=activity_delete module=service status=ok deleted={deleted}");
        Ok(deleted)
    }

    /// Lists activities linked to `planet_name`.
    pub fn get_activities_by_planet(&self, planet_name: &str) -> RepoResult<Vec<Activity>> {
        self.store.list_by_planet(planet_name.trim())
    }

    /// Lists every activity.
    pub fn get_all_activities(&self) -> RepoResult<Vec<Activity>> {
        self.store.list_all()
    }

    fn refetch_after_race(&self, name: &str) -> Result<Activity, ActivityServiceError> {
        // The winning row can only disappear through a concurrent delete.
        self.store
            .find_by_name(name)?
            .ok_or_else(|| ActivityServiceError::ActivityNotFound(name.to_string()))
    }
}
