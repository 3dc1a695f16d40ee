//! End-to-end tests: ingest a fixture catalog into SQLite, then query it.
//!
//! The fixture mirrors the shape of the live API (reference URLs, string
//! scalars, `unknown` placeholders) but is small enough to reason about.

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use tempfile::NamedTempFile;

use swapi_to_sqlite::query::{detail, detail_by_name, search, Catalog, Relation, RelationKind};
use swapi_to_sqlite::schema::tables::ALL_TABLES;
use swapi_to_sqlite::source::CatalogSource;
use swapi_to_sqlite::writer::{ingest_all, ingest_into, IngestSummary, Outcome, Pass, SqliteWriter};
use swapi_to_sqlite::{QueryError, Resource, SilentUi};

// =============================================================================
// Fixture Catalog
// =============================================================================

const API: &str = "https://swapi.info/api";

fn url(resource: &str, id: i64) -> String {
    format!("{}/{}/{}", API, resource, id)
}

fn urls(resource: &str, ids: &[i64]) -> Vec<String> {
    ids.iter().map(|&id| url(resource, id)).collect()
}

static FIXTURE: Lazy<HashMap<Resource, Vec<Value>>> = Lazy::new(|| {
    let mut data = HashMap::new();

    data.insert(
        Resource::Planets,
        vec![
            json!({
                "name": "Tatooine",
                "climate": "arid",
                "terrain": "desert",
                "population": "200000",
                "url": url("planets", 1)
            }),
            json!({
                "name": "Alderaan",
                "climate": "temperate",
                "population": "2000000000",
                "url": url("planets", 2)
            }),
        ],
    );

    data.insert(
        Resource::People,
        vec![
            json!({
                "name": "Luke Skywalker",
                "height": "172",
                "mass": "77",
                "birth_year": "19BBY",
                "gender": "male",
                "homeworld": url("planets", 1),
                "url": url("people", 1)
            }),
            json!({
                "name": "Leia Organa",
                "gender": "female",
                "homeworld": url("planets", 2),
                "url": url("people", 5)
            }),
            json!({
                "name": "Obi-Wan Kenobi",
                "homeworld": url("planets", 20),
                "url": url("people", 10)
            }),
            json!({
                "name": "R2-D2",
                "homeworld": "unknown",
                "url": url("people", 3)
            }),
        ],
    );

    data.insert(
        Resource::Films,
        vec![
            json!({
                "title": "A New Hope",
                "episode_id": 4,
                "director": "George Lucas",
                "release_date": "1977-05-25",
                "characters": urls("people", &[1, 5, 10, 3, 1]),
                "planets": urls("planets", &[1, 2]),
                "starships": urls("starships", &[12]),
                "vehicles": urls("vehicles", &[4]),
                "species": urls("species", &[1, 2]),
                "url": url("films", 1)
            }),
            json!({
                "title": "The Empire Strikes Back",
                "episode_id": 5,
                "characters": urls("people", &[1, 5]),
                "planets": [],
                "starships": urls("starships", &[12]),
                "vehicles": urls("vehicles", &[14]),
                "species": urls("species", &[1]),
                "url": url("films", 2)
            }),
        ],
    );

    data.insert(
        Resource::Species,
        vec![
            json!({
                "name": "Human",
                "classification": "mammal",
                "homeworld": url("planets", 1),
                "people": urls("people", &[1, 5]),
                "url": url("species", 1)
            }),
            json!({
                "name": "Droid",
                "classification": "artificial",
                "homeworld": null,
                "people": urls("people", &[3]),
                "url": url("species", 2)
            }),
        ],
    );

    data.insert(
        Resource::Vehicles,
        vec![
            json!({
                "name": "Sand Crawler",
                "model": "Digger Crawler",
                "pilots": [],
                "url": url("vehicles", 4)
            }),
            json!({
                "name": "Snowspeeder",
                "pilots": urls("people", &[1]),
                "url": url("vehicles", 14)
            }),
        ],
    );

    data.insert(
        Resource::Starships,
        vec![json!({
            "name": "X-wing",
            "hyperdrive_rating": "1.0",
            "MGLT": "100",
            "pilots": urls("people", &[1]),
            "url": url("starships", 12)
        })],
    );

    data
});

/// Serves the fixture, optionally failing one resource or shuffling record order
#[derive(Default)]
struct FixtureSource {
    failing: Option<Resource>,
    shuffle_seed: Option<u64>,
}

impl CatalogSource for FixtureSource {
    fn fetch(&self, resource: Resource) -> anyhow::Result<Vec<Value>> {
        if self.failing == Some(resource) {
            anyhow::bail!("503 Service Unavailable for {}", resource);
        }

        let mut records = FIXTURE.get(&resource).cloned().unwrap_or_default();
        if let Some(seed) = self.shuffle_seed {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            records.shuffle(&mut rng);
        }
        Ok(records)
    }

    fn describe(&self) -> String {
        "fixture".to_string()
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn ingest(source: &FixtureSource) -> (NamedTempFile, IngestSummary) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let summary = ingest_into(temp_file.path(), source, &mut SilentUi)
        .expect("Ingestion should not fail as a whole");
    (temp_file, summary)
}

fn open(path: &Path) -> Connection {
    Connection::open(path).expect("Failed to open test database")
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}

/// Every table's rows, ordered by primary key
fn dump(conn: &Connection) -> Vec<(String, Vec<Vec<SqlValue>>)> {
    ALL_TABLES
        .iter()
        .map(|table| {
            let sql = format!(
                "SELECT * FROM {} ORDER BY {}",
                table.name,
                table.primary_key.join(", ")
            );
            let mut stmt = conn.prepare(&sql).unwrap();
            let width = stmt.column_count();
            let rows = stmt
                .query_map([], |row| {
                    (0..width)
                        .map(|i| row.get::<_, SqlValue>(i))
                        .collect::<rusqlite::Result<Vec<SqlValue>>>()
                })
                .unwrap()
                .collect::<Result<Vec<Vec<SqlValue>>, _>>()
                .unwrap();
            (table.name.to_string(), rows)
        })
        .collect()
}

fn ids(relation: Option<&Relation>) -> Vec<i64> {
    relation
        .expect("relation slot missing")
        .as_list()
        .iter()
        .map(|e| e.id)
        .collect()
}

// =============================================================================
// Ingestion
// =============================================================================

#[test]
fn test_ingest_populates_every_table() {
    let (db, summary) = ingest(&FixtureSource::default());
    let conn = open(db.path());

    assert!(summary.is_complete());
    assert_eq!(summary.succeeded(Pass::Entities).len(), 6);
    assert_eq!(summary.succeeded(Pass::Relationships).len(), 6);

    assert_eq!(count(&conn, "planets"), 2);
    assert_eq!(count(&conn, "people"), 4);
    assert_eq!(count(&conn, "films"), 2);
    assert_eq!(count(&conn, "species"), 2);
    assert_eq!(count(&conn, "vehicles"), 2);
    assert_eq!(count(&conn, "starships"), 1);

    // A New Hope lists Luke twice; the pair is stored once
    assert_eq!(count(&conn, "film_people"), 6);
    assert_eq!(count(&conn, "film_planets"), 2);
    assert_eq!(count(&conn, "film_starships"), 2);
    assert_eq!(count(&conn, "film_vehicles"), 2);
    assert_eq!(count(&conn, "film_species"), 3);
    assert_eq!(count(&conn, "species_people"), 3);
    assert_eq!(count(&conn, "starship_pilots"), 1);
    assert_eq!(count(&conn, "vehicle_pilots"), 1);
}

#[test]
fn test_reference_columns_resolved() {
    let (db, _) = ingest(&FixtureSource::default());
    let conn = open(db.path());

    let homeworld = |id: i64| -> Option<i64> {
        conn.query_row("SELECT homeworld_id FROM people WHERE id = ?1", [id], |r| r.get(0))
            .unwrap()
    };

    assert_eq!(homeworld(1), Some(1));
    assert_eq!(homeworld(5), Some(2));
    // Dangling: planet 20 was never loaded but the id is kept
    assert_eq!(homeworld(10), Some(20));
    // "unknown" does not resolve
    assert_eq!(homeworld(3), None);

    let episode: i64 = conn
        .query_row("SELECT episode_id FROM films WHERE id = 2", [], |r| r.get(0))
        .unwrap();
    assert_eq!(episode, 5);

    let mass: Option<String> = conn
        .query_row("SELECT mass FROM people WHERE id = 5", [], |r| r.get(0))
        .unwrap();
    assert_eq!(mass, None);
}

#[test]
fn test_reingest_is_idempotent() {
    let (db, _) = ingest(&FixtureSource::default());
    let first = dump(&open(db.path()));

    let again = ingest_into(db.path(), &FixtureSource::default(), &mut SilentUi).unwrap();
    assert!(again.is_complete());
    let second = dump(&open(db.path()));

    assert_eq!(first, second);
}

#[test]
fn test_record_order_does_not_matter() {
    let (db, _) = ingest(&FixtureSource::default());
    let expected = dump(&open(db.path()));

    for seed in [7, 42, 1977] {
        let (shuffled, _) = ingest(&FixtureSource {
            shuffle_seed: Some(seed),
            ..Default::default()
        });
        assert_eq!(dump(&open(shuffled.path())), expected, "seed {}", seed);
    }
}

#[test]
fn test_fetch_failure_is_isolated() {
    let (db, summary) = ingest(&FixtureSource {
        failing: Some(Resource::People),
        ..Default::default()
    });
    let conn = open(db.path());

    assert!(!summary.is_complete());
    let failed = summary.failed(Pass::Entities);
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0, Resource::People);
    assert!(failed[0].1.contains("503"));
    assert!(summary.outcome(Resource::People, Pass::Relationships).is_none());

    assert_eq!(count(&conn, "people"), 0);
    assert_eq!(count(&conn, "planets"), 2);
    assert_eq!(count(&conn, "films"), 2);
    assert_eq!(count(&conn, "starships"), 1);

    // Junction rows pointing at people still load; they simply dangle
    assert_eq!(count(&conn, "film_people"), 6);
    assert_eq!(count(&conn, "species_people"), 3);
}

#[test]
fn test_failed_owner_skips_its_junctions() {
    let (db, summary) = ingest(&FixtureSource {
        failing: Some(Resource::Films),
        ..Default::default()
    });
    let conn = open(db.path());

    assert!(matches!(
        summary.outcome(Resource::Films, Pass::Entities),
        Some(Outcome::Failed { .. })
    ));
    assert!(summary.outcome(Resource::Films, Pass::Relationships).is_none());

    assert_eq!(count(&conn, "films"), 0);
    assert_eq!(count(&conn, "film_people"), 0);
    assert_eq!(count(&conn, "film_species"), 0);
    assert_eq!(count(&conn, "species_people"), 3);
    assert_eq!(count(&conn, "vehicle_pilots"), 1);
}

#[test]
fn test_rebuild_clears_previous_run() {
    let (db, _) = ingest(&FixtureSource::default());

    let mut writer = SqliteWriter::open(db.path()).unwrap();
    let summary = ingest_all(
        &mut writer,
        &FixtureSource {
            failing: Some(Resource::Starships),
            ..Default::default()
        },
        &mut SilentUi,
    )
    .unwrap();
    writer.finalize().unwrap();

    assert_eq!(summary.failed(Pass::Entities).len(), 1);
    let conn = open(db.path());
    assert_eq!(count(&conn, "starships"), 0);
    assert_eq!(count(&conn, "starship_pilots"), 0);
    assert_eq!(count(&conn, "people"), 4);
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_search_blank_is_empty() {
    let (db, _) = ingest(&FixtureSource::default());
    let conn = open(db.path());

    assert!(search(&conn, "").unwrap().is_empty());
    assert!(search(&conn, "   ").unwrap().is_empty());
}

#[test]
fn test_search_is_case_insensitive() {
    let (db, _) = ingest(&FixtureSource::default());
    let conn = open(db.path());

    let upper = search(&conn, "Luke").unwrap();
    let lower = search(&conn, "luke").unwrap();

    let people = upper.get(Resource::People).expect("people group");
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].id, 1);
    assert_eq!(people[0].name.as_deref(), Some("Luke Skywalker"));
    assert_eq!(lower.get(Resource::People), upper.get(Resource::People));

    // No other type matches, and empty groups are left out
    assert_eq!(upper.groups.len(), 1);
    assert!(upper.get(Resource::Films).is_none());
}

#[test]
fn test_search_groups_follow_priority() {
    let (db, _) = ingest(&FixtureSource::default());
    let conn = open(db.path());

    // "an" hits people, planets, species and vehicles
    let results = search(&conn, "an").unwrap();
    let order: Vec<Resource> = results.groups.iter().map(|g| g.resource).collect();

    assert_eq!(
        order,
        vec![
            Resource::People,
            Resource::Planets,
            Resource::Species,
            Resource::Vehicles
        ]
    );
    assert_eq!(results.get(Resource::People).unwrap().len(), 2);

    for group in &results.groups {
        assert!(!group.hits.is_empty());
        let ids: Vec<i64> = group.hits.iter().map(|h| h.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted, "{} hits ordered by id", group.resource);
    }
}

#[test]
fn test_search_matches_film_titles_and_wildcards_literally() {
    let (db, _) = ingest(&FixtureSource::default());
    let conn = open(db.path());

    let films = search(&conn, "empire").unwrap();
    assert_eq!(films.get(Resource::Films).unwrap()[0].id, 2);

    assert!(search(&conn, "%").unwrap().is_empty());
    assert!(search(&conn, "_").unwrap().is_empty());
    assert_eq!(search(&conn, "R2-").unwrap().total(), 1);
}

// =============================================================================
// Detail Expansion
// =============================================================================

#[test]
fn test_person_detail() {
    let (db, _) = ingest(&FixtureSource::default());
    let catalog = Catalog::open(db.path()).unwrap();

    let luke = catalog.detail(Resource::People, 1).unwrap();
    assert_eq!(luke.display_name(), Some("Luke Skywalker"));
    assert_eq!(
        luke.row.get("birth_year").and_then(|v| v.as_str()),
        Some("19BBY")
    );

    let homeworld = luke
        .relation(RelationKind::Homeworld)
        .and_then(Relation::as_single)
        .expect("homeworld");
    assert_eq!(homeworld.id, 1);
    assert_eq!(homeworld.name.as_deref(), Some("Tatooine"));

    assert_eq!(ids(luke.relation(RelationKind::Films)), vec![1, 2]);
    catalog.close().unwrap();
}

#[test]
fn test_person_with_unresolved_or_dangling_homeworld() {
    let (db, _) = ingest(&FixtureSource::default());
    let conn = open(db.path());

    let r2 = detail(&conn, Resource::People, 3).unwrap();
    assert_eq!(r2.relation(RelationKind::Homeworld), Some(&Relation::Single(None)));
    assert_eq!(ids(r2.relation(RelationKind::Films)), vec![1]);

    let obi_wan = detail(&conn, Resource::People, 10).unwrap();
    assert_eq!(
        obi_wan.relation(RelationKind::Homeworld),
        Some(&Relation::Single(None))
    );
}

#[test]
fn test_film_detail() {
    let (db, _) = ingest(&FixtureSource::default());
    let conn = open(db.path());

    let hope = detail(&conn, Resource::Films, 1).unwrap();
    assert_eq!(hope.display_name(), Some("A New Hope"));
    assert_eq!(ids(hope.relation(RelationKind::People)), vec![1, 3, 5, 10]);
    assert_eq!(ids(hope.relation(RelationKind::Planets)), vec![1, 2]);
    assert!(hope.relation(RelationKind::Homeworld).is_none());
}

#[test]
fn test_planet_detail_uses_reverse_key() {
    let (db, _) = ingest(&FixtureSource::default());
    let conn = open(db.path());

    let tatooine = detail(&conn, Resource::Planets, 1).unwrap();
    assert_eq!(ids(tatooine.relation(RelationKind::People)), vec![1]);
    assert_eq!(ids(tatooine.relation(RelationKind::Films)), vec![1]);

    let alderaan = detail(&conn, Resource::Planets, 2).unwrap();
    assert_eq!(ids(alderaan.relation(RelationKind::People)), vec![5]);
}

#[test]
fn test_species_detail() {
    let (db, _) = ingest(&FixtureSource::default());
    let conn = open(db.path());

    let human = detail(&conn, Resource::Species, 1).unwrap();
    assert_eq!(
        human
            .relation(RelationKind::Homeworld)
            .and_then(Relation::as_single)
            .map(|p| p.id),
        Some(1)
    );
    assert_eq!(ids(human.relation(RelationKind::People)), vec![1, 5]);
    assert_eq!(ids(human.relation(RelationKind::Films)), vec![1, 2]);

    let droid = detail(&conn, Resource::Species, 2).unwrap();
    assert_eq!(droid.relation(RelationKind::Homeworld), Some(&Relation::Single(None)));
    assert_eq!(ids(droid.relation(RelationKind::People)), vec![3]);
}

#[test]
fn test_vehicle_and_starship_pilots() {
    let (db, _) = ingest(&FixtureSource::default());
    let conn = open(db.path());

    let snowspeeder = detail(&conn, Resource::Vehicles, 14).unwrap();
    assert_eq!(ids(snowspeeder.relation(RelationKind::People)), vec![1]);
    assert_eq!(ids(snowspeeder.relation(RelationKind::Films)), vec![2]);

    let crawler = detail(&conn, Resource::Vehicles, 4).unwrap();
    assert!(ids(crawler.relation(RelationKind::People)).is_empty());

    let xwing = detail(&conn, Resource::Starships, 12).unwrap();
    assert_eq!(ids(xwing.relation(RelationKind::People)), vec![1]);
    assert_eq!(ids(xwing.relation(RelationKind::Films)), vec![1, 2]);
    assert_eq!(
        xwing.row.get("MGLT").and_then(|v| v.as_str()),
        Some("100")
    );
}

#[test]
fn test_detail_errors() {
    let (db, _) = ingest(&FixtureSource::default());
    let conn = open(db.path());

    assert!(matches!(
        detail(&conn, Resource::Films, 99),
        Err(QueryError::NotFound {
            resource: Resource::Films,
            id: 99
        })
    ));
    assert!(matches!(
        detail_by_name(&conn, "droids", 1),
        Err(QueryError::InvalidResourceType(t)) if t == "droids"
    ));
    assert!(detail_by_name(&conn, "films", 1).is_ok());
}

#[test]
fn test_detail_serializes_row_in_column_order() {
    let (db, _) = ingest(&FixtureSource::default());
    let conn = open(db.path());

    let luke = detail(&conn, Resource::People, 1).unwrap();
    let json = serde_json::to_value(&luke).unwrap();

    assert_eq!(json["resource"], "people");
    assert_eq!(json["row"]["name"], "Luke Skywalker");
    assert_eq!(json["row"]["homeworld_id"], 1);
    assert_eq!(json["row"]["mass"], "77");
    assert_eq!(json["relations"][0]["kind"], "homeworld");
    assert_eq!(json["relations"][0]["relation"]["name"], "Tatooine");

    let text = serde_json::to_string(&luke.row).unwrap();
    let id_pos = text.find("\"id\"").unwrap();
    let url_pos = text.find("\"url\"").unwrap();
    assert!(id_pos < url_pos);
}
