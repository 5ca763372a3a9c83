//! Activity domain model.
//!
//! # Responsibility
//! - Define the canonical activity record and its optional planet link.
//! - Normalize and validate caller-provided names before persistence.
//!
//! # Invariants
//! - `name` is case-sensitive, trimmed and never blank.
//! - `planet_name` is either `None` or a trimmed non-blank planet name.
//! - An activity carries at most one planet association.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Named point-of-interest entity, optionally linked to one planet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Unique identifier within the store.
    pub name: String,
    /// Identifying name of the linked planet, absent when unlinked.
    pub planet_name: Option<String>,
}

/// Validation errors for activity input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    BlankName,
    BlankPlanetName,
}

impl Display for ActivityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "activity name is required"),
            Self::BlankPlanetName => write!(f, "planet name is required"),
        }
    }
}

impl Error for ActivityValidationError {}

impl Activity {
    /// Creates an unlinked activity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            planet_name: None,
        }
    }

    /// Creates an activity linked to `planet_name`.
    pub fn linked(name: impl Into<String>, planet_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            planet_name: Some(planet_name.into()),
        }
    }

    /// Returns whether this activity is linked to exactly `planet_name`.
    pub fn is_linked_to(&self, planet_name: &str) -> bool {
        self.planet_name.as_deref() == Some(planet_name)
    }

    /// Checks the record shape before it reaches the store.
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        if self.name.trim().is_empty() {
            return Err(ActivityValidationError::BlankName);
        }
        if let Some(planet_name) = self.planet_name.as_deref() {
            if planet_name.trim().is_empty() {
                return Err(ActivityValidationError::BlankPlanetName);
            }
        }
        Ok(())
    }
}

/// Trims a required activity name.
pub fn normalize_activity_name(name: &str) -> Result<String, ActivityValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ActivityValidationError::BlankName);
    }
    Ok(trimmed.to_string())
}

/// Trims a required planet name.
pub fn normalize_planet_name(planet_name: &str) -> Result<String, ActivityValidationError> {
    let trimmed = planet_name.trim();
    if trimmed.is_empty() {
        return Err(ActivityValidationError::BlankPlanetName);
    }
    Ok(trimmed.to_string())
}

/// Maps an optional planet input to an association.
///
/// Blank values mean "unlinked", matching clients that send `""` for a
/// standalone activity.
pub fn normalize_optional_planet_name(planet_name: Option<&str>) -> Option<String> {
    planet_name
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
