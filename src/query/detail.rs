use rusqlite::{Connection, OptionalExtension};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::search::EntityRef;
use crate::error::QueryError;
use crate::parser::SqlValue;
use crate::schema::{
    LinkSource, Resource, FILM_PEOPLE_LINK, FILM_PLANETS_LINK, FILM_SPECIES_LINK,
    FILM_STARSHIPS_LINK, FILM_VEHICLES_LINK, SPECIES_PEOPLE_LINK, STARSHIP_PILOTS_LINK,
    VEHICLE_PILOTS_LINK,
};

/// Name of a relation slot in a detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Homeworld,
    People,
    Films,
    Planets,
}

impl RelationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            RelationKind::Homeworld => "homeworld",
            RelationKind::People => "people",
            RelationKind::Films => "films",
            RelationKind::Planets => "planets",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Relation {
    Single(Option<EntityRef>),
    List(Vec<EntityRef>),
}

impl Relation {
    pub fn as_single(&self) -> Option<&EntityRef> {
        match self {
            Relation::Single(one) => one.as_ref(),
            Relation::List(_) => None,
        }
    }

    pub fn as_list(&self) -> &[EntityRef] {
        match self {
            Relation::List(many) => many,
            Relation::Single(_) => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationSlot {
    pub kind: RelationKind,
    pub relation: Relation,
}

/// One entity row, columns in table order
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRow {
    pub columns: Vec<(String, SqlValue)>,
}

impl EntityRow {
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

impl Serialize for EntityRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Detail {
    pub resource: Resource,
    pub id: i64,
    pub row: EntityRow,
    pub relations: Vec<RelationSlot>,
}

impl Detail {
    pub fn relation(&self, kind: RelationKind) -> Option<&Relation> {
        self.relations
            .iter()
            .find(|slot| slot.kind == kind)
            .map(|slot| &slot.relation)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.row
            .get(self.resource.display_column())
            .and_then(SqlValue::as_str)
    }
}

/// How one relation slot is read
enum Lookup {
    /// `homeworld_id` on the row itself
    Homeworld,
    /// Rows of `related` joined through a junction table
    Junction {
        related: Resource,
        junction: &'static str,
        /// Junction column holding this entity's id
        self_column: &'static str,
        /// Junction column holding the related id
        related_column: &'static str,
    },
    /// Rows of `related` whose `column` points at this entity
    ReverseKey {
        related: Resource,
        column: &'static str,
    },
}

impl Lookup {
    /// This entity is the link's owner (e.g. a film in `film_people`)
    fn owned(related: Resource, link: &'static LinkSource) -> Self {
        Lookup::Junction {
            related,
            junction: link.table,
            self_column: link.owner_column,
            related_column: link.target_column,
        }
    }

    /// This entity is the link's target (e.g. a person in `film_people`)
    fn owning(related: Resource, link: &'static LinkSource) -> Self {
        Lookup::Junction {
            related,
            junction: link.table,
            self_column: link.target_column,
            related_column: link.owner_column,
        }
    }
}

fn relation_plan(resource: Resource) -> Vec<(RelationKind, Lookup)> {
    use RelationKind::*;

    match resource {
        Resource::People => vec![
            (Homeworld, Lookup::Homeworld),
            (Films, Lookup::owning(Resource::Films, &FILM_PEOPLE_LINK)),
        ],
        Resource::Films => vec![
            (People, Lookup::owned(Resource::People, &FILM_PEOPLE_LINK)),
            (Planets, Lookup::owned(Resource::Planets, &FILM_PLANETS_LINK)),
        ],
        Resource::Planets => vec![
            (
                People,
                Lookup::ReverseKey {
                    related: Resource::People,
                    column: "homeworld_id",
                },
            ),
            (Films, Lookup::owning(Resource::Films, &FILM_PLANETS_LINK)),
        ],
        Resource::Species => vec![
            (Homeworld, Lookup::Homeworld),
            (People, Lookup::owned(Resource::People, &SPECIES_PEOPLE_LINK)),
            (Films, Lookup::owning(Resource::Films, &FILM_SPECIES_LINK)),
        ],
        Resource::Vehicles => vec![
            (People, Lookup::owned(Resource::People, &VEHICLE_PILOTS_LINK)),
            (Films, Lookup::owning(Resource::Films, &FILM_VEHICLES_LINK)),
        ],
        Resource::Starships => vec![
            (People, Lookup::owned(Resource::People, &STARSHIP_PILOTS_LINK)),
            (Films, Lookup::owning(Resource::Films, &FILM_STARSHIPS_LINK)),
        ],
    }
}

/// Load one entity and its direct relations
pub fn detail(conn: &Connection, resource: Resource, id: i64) -> Result<Detail, QueryError> {
    let row = load_row(conn, resource, id)?.ok_or(QueryError::NotFound { resource, id })?;

    let mut relations = Vec::new();
    for (kind, lookup) in relation_plan(resource) {
        let relation = match lookup {
            Lookup::Homeworld => {
                let planet_id = row.get("homeworld_id").and_then(SqlValue::as_i64);
                Relation::Single(match planet_id {
                    Some(planet_id) => load_ref(conn, Resource::Planets, planet_id)?,
                    None => None,
                })
            }
            Lookup::Junction {
                related,
                junction,
                self_column,
                related_column,
            } => {
                let sql = format!(
                    "SELECT r.id, r.{name} FROM {table} r \
                     JOIN {junction} j ON r.id = j.{related_column} \
                     WHERE j.{self_column} = ?1 ORDER BY r.id",
                    name = related.display_column(),
                    table = related.table().name,
                );
                Relation::List(load_refs(conn, &sql, id)?)
            }
            Lookup::ReverseKey { related, column } => {
                let sql = format!(
                    "SELECT id, {name} FROM {table} WHERE {column} = ?1 ORDER BY id",
                    name = related.display_column(),
                    table = related.table().name,
                );
                Relation::List(load_refs(conn, &sql, id)?)
            }
        };
        relations.push(RelationSlot { kind, relation });
    }

    Ok(Detail {
        resource,
        id,
        row,
        relations,
    })
}

/// Type token variant of [`detail`], for callers holding a raw string
pub fn detail_by_name(conn: &Connection, resource: &str, id: i64) -> Result<Detail, QueryError> {
    detail(conn, resource.parse()?, id)
}

fn load_row(conn: &Connection, resource: Resource, id: i64) -> Result<Option<EntityRow>, QueryError> {
    let sql = format!("SELECT * FROM {} WHERE id = ?1", resource.table().name);
    let mut stmt = conn.prepare_cached(&sql)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let row = stmt
        .query_row([id], |row| {
            let mut columns = Vec::with_capacity(names.len());
            for (idx, name) in names.iter().enumerate() {
                columns.push((name.clone(), SqlValue::from(row.get_ref(idx)?)));
            }
            Ok(EntityRow { columns })
        })
        .optional()?;

    Ok(row)
}

fn load_ref(conn: &Connection, resource: Resource, id: i64) -> Result<Option<EntityRef>, QueryError> {
    let sql = format!(
        "SELECT id, {} FROM {} WHERE id = ?1",
        resource.display_column(),
        resource.table().name
    );
    let entity = conn
        .prepare_cached(&sql)?
        .query_row([id], |row| {
            Ok(EntityRef {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .optional()?;
    Ok(entity)
}

fn load_refs(conn: &Connection, sql: &str, id: i64) -> Result<Vec<EntityRef>, QueryError> {
    let mut stmt = conn.prepare_cached(sql)?;
    let refs = stmt
        .query_map([id], |row| {
            Ok(EntityRef {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(refs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::get_table;

    #[test]
    fn test_every_resource_has_a_plan() {
        for resource in Resource::ALL {
            assert!(!relation_plan(resource).is_empty());
        }
    }

    #[test]
    fn test_person_plan_reads_film_people_backwards() {
        let plan = relation_plan(Resource::People);
        let films = plan
            .iter()
            .find(|(kind, _)| *kind == RelationKind::Films)
            .map(|(_, lookup)| lookup)
            .unwrap();

        match films {
            Lookup::Junction {
                self_column,
                related_column,
                junction,
                ..
            } => {
                assert_eq!(*junction, "film_people");
                assert_eq!(*self_column, "person_id");
                assert_eq!(*related_column, "film_id");
            }
            _ => panic!("films should come from a junction"),
        }
    }

    #[test]
    fn test_junction_lookups_name_real_columns() {
        for resource in Resource::ALL {
            for (kind, lookup) in relation_plan(resource) {
                let Lookup::Junction {
                    junction,
                    self_column,
                    related_column,
                    ..
                } = lookup
                else {
                    continue;
                };

                let table = get_table(junction).unwrap();
                let columns = table.column_names();
                assert!(columns.contains(&self_column), "{} {:?}", resource, kind);
                assert!(columns.contains(&related_column), "{} {:?}", resource, kind);
                assert_ne!(self_column, related_column);
            }
        }
    }
}
