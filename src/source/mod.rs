pub mod client;
pub mod dir;

pub use client::*;
pub use dir::*;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::schema::Resource;

/// Where resource listings come from during ingestion
pub trait CatalogSource {
    /// Fetch every record of one resource type
    fn fetch(&self, resource: Resource) -> Result<Vec<Value>>;

    /// Human-readable origin for progress output
    fn describe(&self) -> String;
}

/// Decode a listing: a bare JSON array, or an object carrying a `results` array
pub fn parse_payload(text: &str) -> Result<Vec<Value>> {
    let json: Value = serde_json::from_str(text).context("Failed to parse JSON")?;

    match json {
        Value::Array(records) => Ok(records),
        Value::Object(mut obj) => match obj.remove("results") {
            Some(Value::Array(records)) => Ok(records),
            _ => bail!("Expected a JSON array of records"),
        },
        _ => bail!("Expected a JSON array of records"),
    }
}
