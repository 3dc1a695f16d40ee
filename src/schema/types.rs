use std::collections::HashSet;

use super::resource::Resource;

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    /// Integer id resolved from a reference string (e.g. a `homeworld` URL)
    Reference,
}

impl ColumnType {
    pub const fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Integer | ColumnType::Reference => "INTEGER",
            ColumnType::Text => "TEXT",
        }
    }
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    /// Override JSON field name (default: same as the column name)
    pub json_field: Option<&'static str>,
}

impl Column {
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            json_field: None,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, ColumnType::Text)
    }

    /// Entity key, derived from the record's own `url`
    pub const fn id() -> Self {
        Self::reference("id", "url")
    }

    /// Integer column resolved from a reference string stored under `field`
    pub const fn reference(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            col_type: ColumnType::Reference,
            json_field: Some(field),
        }
    }

    pub fn json_key(&self) -> &'static str {
        self.json_field.unwrap_or(self.name)
    }
}

/// Foreign key reference
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
}

impl ForeignKey {
    pub const fn new(column: &'static str, references_table: &'static str) -> Self {
        Self {
            column,
            references_table,
            references_column: "id",
        }
    }
}

/// Where junction rows come from: `{"url": owner, "<array_field>": [target, ...]}`
#[derive(Debug, Clone)]
pub struct LinkSource {
    /// Junction table the pairs land in
    pub table: &'static str,
    /// Resource whose records embed the reference array
    pub resource: Resource,
    /// JSON field holding the array of reference strings (e.g. "characters")
    pub array_field: &'static str,
    /// Column storing the owning record's id (e.g. "film_id")
    pub owner_column: &'static str,
    /// Column storing each referenced id (e.g. "person_id")
    pub target_column: &'static str,
}

/// Table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub primary_key: &'static [&'static str],
    pub foreign_keys: &'static [ForeignKey],
    /// Set for junction tables only
    pub link_source: Option<&'static LinkSource>,
}

impl TableSchema {
    /// Get all tables this table depends on (FK parents)
    pub fn dependencies(&self) -> HashSet<&'static str> {
        self.foreign_keys
            .iter()
            .map(|fk| fk.references_table)
            .filter(|parent| *parent != self.name)
            .collect()
    }

    pub fn is_junction(&self) -> bool {
        self.link_source.is_some()
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}
