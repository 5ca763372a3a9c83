//! Planet repository contract and SQLite implementation.
//!
//! Planet storage is plain lookup/insert/update/delete. Authorization for
//! mutations lives in `PlanetService`, never here.

use super::error::{RepoError, RepoResult};
use super::schema::ensure_tables;
use crate::model::planet::{NewPlanet, Planet, PlanetId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const PLANET_SELECT_SQL: &str = "SELECT id, name, description FROM planets";

/// Repository interface for planet rows.
pub trait PlanetRepository {
    fn get_planet(&self, id: PlanetId) -> RepoResult<Option<Planet>>;
    fn get_planet_by_name(&self, name: &str) -> RepoResult<Option<Planet>>;
    fn list_planets(&self) -> RepoResult<Vec<Planet>>;
    /// Fails with `RepoError::UniquenessViolation` when the name is taken.
    fn insert_planet(&self, planet: &NewPlanet) -> RepoResult<Planet>;
    /// Returns `false` when no planet has `planet.id`.
    fn update_planet(&self, planet: &Planet) -> RepoResult<bool>;
    /// Returns `false` when no planet has `id`.
    fn delete_planet(&self, id: PlanetId) -> RepoResult<bool>;
}

/// SQLite-backed planet repository.
pub struct SqlitePlanetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePlanetRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["planets"])?;
        Ok(Self { conn })
    }
}

impl PlanetRepository for SqlitePlanetRepository<'_> {
    fn get_planet(&self, id: PlanetId) -> RepoResult<Option<Planet>> {
        let planet = self
            .conn
            .query_row(
                &format!("{PLANET_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_planet_row,
            )
            .optional()?;
        Ok(planet)
    }

    fn get_planet_by_name(&self, name: &str) -> RepoResult<Option<Planet>> {
        let planet = self
            .conn
            .query_row(
                &format!("{PLANET_SELECT_SQL} WHERE name = ?1;"),
                [name],
                parse_planet_row,
            )
            .optional()?;
        Ok(planet)
    }

    fn list_planets(&self) -> RepoResult<Vec<Planet>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PLANET_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut planets = Vec::new();
        while let Some(row) = rows.next()? {
            planets.push(parse_planet_row(row)?);
        }
        Ok(planets)
    }

    fn insert_planet(&self, planet: &NewPlanet) -> RepoResult<Planet> {
        self.conn
            .execute(
                "INSERT INTO planets (name, description) VALUES (?1, ?2);",
                params![planet.name.as_str(), planet.description.as_deref()],
            )
            .map_err(|err| RepoError::from_write(err, "planets", &planet.name))?;

        Ok(Planet {
            id: self.conn.last_insert_rowid(),
            name: planet.name.clone(),
            description: planet.description.clone(),
        })
    }

    fn update_planet(&self, planet: &Planet) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE planets
                 SET
                    name = ?2,
                    description = ?3,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1;",
                params![planet.id, planet.name.as_str(), planet.description.as_deref()],
            )
            .map_err(|err| RepoError::from_write(err, "planets", &planet.name))?;
        Ok(changed > 0)
    }

    fn delete_planet(&self, id: PlanetId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM planets WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_planet_row(row: &Row<'_>) -> rusqlite::Result<Planet> {
    Ok(Planet {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
    })
}
