use rusqlite::Connection;
use serde::Serialize;

use crate::error::QueryError;
use crate::schema::Resource;

/// An `(id, display name)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRef {
    pub id: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchGroup {
    pub resource: Resource,
    pub hits: Vec<EntityRef>,
}

/// Matches grouped by resource, in search priority order; empty groups never appear
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub groups: Vec<SearchGroup>,
}

impl SearchResults {
    pub fn get(&self, resource: Resource) -> Option<&[EntityRef]> {
        self.groups
            .iter()
            .find(|g| g.resource == resource)
            .map(|g| g.hits.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.hits.len()).sum()
    }
}

/// Case-insensitive substring search across every resource's display name
pub fn search(conn: &Connection, query: &str) -> Result<SearchResults, QueryError> {
    search_in(conn, query, &Resource::SEARCH_PRIORITY)
}

/// Like [`search`], limited to `resources`; groups still follow search priority
pub fn search_in(
    conn: &Connection,
    query: &str,
    resources: &[Resource],
) -> Result<SearchResults, QueryError> {
    let needle = query.trim();
    let mut results = SearchResults::default();
    if needle.is_empty() {
        return Ok(results);
    }

    let pattern = like_pattern(needle);

    for resource in Resource::SEARCH_PRIORITY {
        if !resources.contains(&resource) {
            continue;
        }

        let column = resource.display_column();
        let sql = format!(
            "SELECT id, {col} FROM {table} WHERE {col} LIKE ?1 ESCAPE '\\' ORDER BY id",
            col = column,
            table = resource.table().name
        );

        let mut stmt = conn.prepare_cached(&sql)?;
        let hits = stmt
            .query_map([&pattern], |row| {
                Ok(EntityRef {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if !hits.is_empty() {
            results.groups.push(SearchGroup { resource, hits });
        }
    }

    Ok(results)
}

/// `%needle%` with LIKE wildcards in the needle matched literally
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
