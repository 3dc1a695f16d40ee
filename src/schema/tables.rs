//! Table schema definitions for the six SWAPI resources and their junctions

use super::resource::Resource;
use super::types::*;

// =============================================================================
// Entity Tables
// =============================================================================

pub static PLANETS: TableSchema = TableSchema {
    name: "planets",
    columns: &[
        Column::id(),
        Column::text("name"),
        Column::text("rotation_period"),
        Column::text("orbital_period"),
        Column::text("diameter"),
        Column::text("climate"),
        Column::text("gravity"),
        Column::text("terrain"),
        Column::text("surface_water"),
        Column::text("population"),
        Column::text("created"),
        Column::text("edited"),
        Column::text("url"),
    ],
    primary_key: &["id"],
    foreign_keys: &[],
    link_source: None,
};

pub static PEOPLE: TableSchema = TableSchema {
    name: "people",
    columns: &[
        Column::id(),
        Column::text("name"),
        Column::text("height"),
        Column::text("mass"),
        Column::text("hair_color"),
        Column::text("skin_color"),
        Column::text("eye_color"),
        Column::text("birth_year"),
        Column::text("gender"),
        Column::reference("homeworld_id", "homeworld"),
        Column::text("created"),
        Column::text("edited"),
        Column::text("url"),
    ],
    primary_key: &["id"],
    foreign_keys: &[ForeignKey::new("homeworld_id", "planets")],
    link_source: None,
};

pub static FILMS: TableSchema = TableSchema {
    name: "films",
    columns: &[
        Column::id(),
        Column::text("title"),
        Column::new("episode_id", ColumnType::Integer),
        Column::text("opening_crawl"),
        Column::text("director"),
        Column::text("producer"),
        Column::text("release_date"),
        Column::text("created"),
        Column::text("edited"),
        Column::text("url"),
    ],
    primary_key: &["id"],
    foreign_keys: &[],
    link_source: None,
};

pub static SPECIES: TableSchema = TableSchema {
    name: "species",
    columns: &[
        Column::id(),
        Column::text("name"),
        Column::text("classification"),
        Column::text("designation"),
        Column::text("average_height"),
        Column::text("skin_colors"),
        Column::text("hair_colors"),
        Column::text("eye_colors"),
        Column::text("average_lifespan"),
        Column::text("language"),
        Column::reference("homeworld_id", "homeworld"),
        Column::text("created"),
        Column::text("edited"),
        Column::text("url"),
    ],
    primary_key: &["id"],
    foreign_keys: &[ForeignKey::new("homeworld_id", "planets")],
    link_source: None,
};

pub static VEHICLES: TableSchema = TableSchema {
    name: "vehicles",
    columns: &[
        Column::id(),
        Column::text("name"),
        Column::text("model"),
        Column::text("manufacturer"),
        Column::text("cost_in_credits"),
        Column::text("length"),
        Column::text("max_atmosphering_speed"),
        Column::text("crew"),
        Column::text("passengers"),
        Column::text("cargo_capacity"),
        Column::text("consumables"),
        Column::text("vehicle_class"),
        Column::text("created"),
        Column::text("edited"),
        Column::text("url"),
    ],
    primary_key: &["id"],
    foreign_keys: &[],
    link_source: None,
};

pub static STARSHIPS: TableSchema = TableSchema {
    name: "starships",
    columns: &[
        Column::id(),
        Column::text("name"),
        Column::text("model"),
        Column::text("manufacturer"),
        Column::text("cost_in_credits"),
        Column::text("length"),
        Column::text("max_atmosphering_speed"),
        Column::text("crew"),
        Column::text("passengers"),
        Column::text("cargo_capacity"),
        Column::text("consumables"),
        Column::text("hyperdrive_rating"),
        Column::text("MGLT"),
        Column::text("starship_class"),
        Column::text("created"),
        Column::text("edited"),
        Column::text("url"),
    ],
    primary_key: &["id"],
    foreign_keys: &[],
    link_source: None,
};

// =============================================================================
// Junction Tables
// =============================================================================

/// Junction keyed by (owner, target); both columns reference entity ids
macro_rules! junction_table {
    ($name:ident, $link:ident, $table:expr, $resource:expr, $field:expr,
     ($owner:expr, $owner_table:expr), ($target:expr, $target_table:expr)) => {
        pub static $link: LinkSource = LinkSource {
            table: $table,
            resource: $resource,
            array_field: $field,
            owner_column: $owner,
            target_column: $target,
        };

        pub static $name: TableSchema = TableSchema {
            name: $table,
            columns: &[
                Column::new($owner, ColumnType::Integer),
                Column::new($target, ColumnType::Integer),
            ],
            primary_key: &[$owner, $target],
            foreign_keys: &[
                ForeignKey::new($owner, $owner_table),
                ForeignKey::new($target, $target_table),
            ],
            link_source: Some(&$link),
        };
    };
}

junction_table!(
    FILM_PEOPLE,
    FILM_PEOPLE_LINK,
    "film_people",
    Resource::Films,
    "characters",
    ("film_id", "films"),
    ("person_id", "people")
);

junction_table!(
    FILM_PLANETS,
    FILM_PLANETS_LINK,
    "film_planets",
    Resource::Films,
    "planets",
    ("film_id", "films"),
    ("planet_id", "planets")
);

junction_table!(
    FILM_STARSHIPS,
    FILM_STARSHIPS_LINK,
    "film_starships",
    Resource::Films,
    "starships",
    ("film_id", "films"),
    ("starship_id", "starships")
);

junction_table!(
    FILM_VEHICLES,
    FILM_VEHICLES_LINK,
    "film_vehicles",
    Resource::Films,
    "vehicles",
    ("film_id", "films"),
    ("vehicle_id", "vehicles")
);

junction_table!(
    FILM_SPECIES,
    FILM_SPECIES_LINK,
    "film_species",
    Resource::Films,
    "species",
    ("film_id", "films"),
    ("species_id", "species")
);

junction_table!(
    SPECIES_PEOPLE,
    SPECIES_PEOPLE_LINK,
    "species_people",
    Resource::Species,
    "people",
    ("species_id", "species"),
    ("person_id", "people")
);

junction_table!(
    STARSHIP_PILOTS,
    STARSHIP_PILOTS_LINK,
    "starship_pilots",
    Resource::Starships,
    "pilots",
    ("starship_id", "starships"),
    ("person_id", "people")
);

junction_table!(
    VEHICLE_PILOTS,
    VEHICLE_PILOTS_LINK,
    "vehicle_pilots",
    Resource::Vehicles,
    "pilots",
    ("vehicle_id", "vehicles"),
    ("person_id", "people")
);

pub static FILM_JUNCTIONS: [&TableSchema; 5] = [
    &FILM_PEOPLE,
    &FILM_PLANETS,
    &FILM_STARSHIPS,
    &FILM_VEHICLES,
    &FILM_SPECIES,
];
pub static SPECIES_JUNCTIONS: [&TableSchema; 1] = [&SPECIES_PEOPLE];
pub static STARSHIP_JUNCTIONS: [&TableSchema; 1] = [&STARSHIP_PILOTS];
pub static VEHICLE_JUNCTIONS: [&TableSchema; 1] = [&VEHICLE_PILOTS];

// =============================================================================
// Schema Registry
// =============================================================================

/// All fourteen tables, entity tables first
pub static ALL_TABLES: &[&TableSchema] = &[
    &PLANETS,
    &PEOPLE,
    &FILMS,
    &SPECIES,
    &VEHICLES,
    &STARSHIPS,
    &FILM_PEOPLE,
    &FILM_PLANETS,
    &FILM_STARSHIPS,
    &FILM_VEHICLES,
    &FILM_SPECIES,
    &SPECIES_PEOPLE,
    &STARSHIP_PILOTS,
    &VEHICLE_PILOTS,
];

/// Get table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}
