use rusqlite::types::ValueRef;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::reference::extract_id;
use crate::schema::{ColumnType, LinkSource, TableSchema};

/// A parsed row ready for insertion, values in schema column order
#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub id: i64,
    pub values: Vec<SqlValue>,
    /// Reference columns that were present but did not resolve
    pub unresolved: usize,
}

/// Junction pairs parsed from one record's reference array
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLinks {
    /// `(owner_id, target_id)` in array order, duplicates kept
    pub pairs: Vec<(i64, i64)>,
    /// References dropped because the owning record has no id
    pub skipped: usize,
    /// References that did not resolve to an id
    pub unresolved: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(f) => SqlValue::Real(f),
            ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => SqlValue::Text(String::from_utf8_lossy(b).into_owned()),
        }
    }
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Null => write!(f, "-"),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::Real(r) => write!(f, "{}", r),
            SqlValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SqlValue::Null => serializer.serialize_none(),
            SqlValue::Integer(i) => serializer.serialize_i64(*i),
            SqlValue::Real(f) => serializer.serialize_f64(*f),
            SqlValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Parse a catalog record into a row for the given entity table.
///
/// Returns `None` when the record's own `url` carries no id.
pub fn parse_record(json: &Value, schema: &TableSchema) -> Option<ParsedRow> {
    let mut values = Vec::with_capacity(schema.columns.len());
    let mut unresolved = 0;
    let mut id = None;

    for col in schema.columns {
        let raw = json.get(col.json_key());
        let value = extract_value(raw, col.col_type);

        if col.col_type == ColumnType::Reference && value.is_null() && has_content(raw) {
            unresolved += 1;
        }
        if col.name == "id" {
            id = value.as_i64();
        }
        values.push(value);
    }

    Some(ParsedRow {
        id: id?,
        values,
        unresolved,
    })
}

/// Junction pairs for one record, plus the count of references that did not resolve
pub fn parse_links(json: &Value, link: &LinkSource) -> ParsedLinks {
    let references = json
        .get(link.array_field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let Some(owner) = extract_id(json.get("url").and_then(Value::as_str)) else {
        return ParsedLinks {
            skipped: references.len(),
            ..ParsedLinks::default()
        };
    };

    let mut links = ParsedLinks::default();
    for reference in references {
        match extract_id(reference.as_str()) {
            Some(target) => links.pairs.push((owner, target)),
            None => links.unresolved += 1,
        }
    }

    links
}

fn has_content(raw: Option<&Value>) -> bool {
    match raw {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn extract_value(val: Option<&Value>, col_type: ColumnType) -> SqlValue {
    match val {
        None | Some(Value::Null) => SqlValue::Null,
        Some(v) => match col_type {
            ColumnType::Reference => extract_id(v.as_str())
                .map(SqlValue::Integer)
                .unwrap_or(SqlValue::Null),
            ColumnType::Integer => v
                .as_i64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
                .map(SqlValue::Integer)
                .unwrap_or(SqlValue::Null),
            ColumnType::Text => match v {
                Value::String(s) => SqlValue::Text(s.clone()),
                Value::Number(n) => SqlValue::Text(n.to_string()),
                Value::Bool(b) => SqlValue::Text(b.to_string()),
                other => SqlValue::Text(other.to_string()),
            },
        },
    }
}
