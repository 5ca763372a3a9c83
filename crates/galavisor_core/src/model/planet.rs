//! Planet domain model.

use serde::{Deserialize, Serialize};

/// Store-assigned planet identifier.
pub type PlanetId = i64;

/// Catalogue planet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    pub id: PlanetId,
    /// Unique display name, also used as the activity link key.
    pub name: String,
    pub description: Option<String>,
}

/// Insert payload for a planet that has no id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlanet {
    pub name: String,
    pub description: Option<String>,
}

impl NewPlanet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}
