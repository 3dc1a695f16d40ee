use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::tables::{
    FILMS, FILM_JUNCTIONS, PEOPLE, PLANETS, SPECIES, SPECIES_JUNCTIONS, STARSHIPS,
    STARSHIP_JUNCTIONS, VEHICLES, VEHICLE_JUNCTIONS,
};
use super::types::TableSchema;
use crate::error::QueryError;

/// The six resource types exposed by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Planets,
    People,
    Films,
    Species,
    Vehicles,
    Starships,
}

impl Resource {
    /// Ingestion order: planets first so homeworld references point at loaded rows
    pub const ALL: [Resource; 6] = [
        Resource::Planets,
        Resource::People,
        Resource::Films,
        Resource::Species,
        Resource::Vehicles,
        Resource::Starships,
    ];

    /// Order in which search results are grouped
    pub const SEARCH_PRIORITY: [Resource; 6] = [
        Resource::People,
        Resource::Films,
        Resource::Planets,
        Resource::Species,
        Resource::Vehicles,
        Resource::Starships,
    ];

    /// Endpoint path segment and table name
    pub const fn as_str(self) -> &'static str {
        match self {
            Resource::Planets => "planets",
            Resource::People => "people",
            Resource::Films => "films",
            Resource::Species => "species",
            Resource::Vehicles => "vehicles",
            Resource::Starships => "starships",
        }
    }

    pub fn table(self) -> &'static TableSchema {
        match self {
            Resource::Planets => &PLANETS,
            Resource::People => &PEOPLE,
            Resource::Films => &FILMS,
            Resource::Species => &SPECIES,
            Resource::Vehicles => &VEHICLES,
            Resource::Starships => &STARSHIPS,
        }
    }

    /// Column searched and shown as the entity's name
    pub const fn display_column(self) -> &'static str {
        match self {
            Resource::Films => "title",
            Resource::Planets
            | Resource::People
            | Resource::Species
            | Resource::Vehicles
            | Resource::Starships => "name",
        }
    }

    /// Junction tables filled from this resource's embedded reference arrays
    pub fn junctions(self) -> &'static [&'static TableSchema] {
        match self {
            Resource::Films => &FILM_JUNCTIONS,
            Resource::Species => &SPECIES_JUNCTIONS,
            Resource::Starships => &STARSHIP_JUNCTIONS,
            Resource::Vehicles => &VEHICLE_JUNCTIONS,
            Resource::Planets | Resource::People => &[],
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| QueryError::InvalidResourceType(s.to_string()))
    }
}
