//! Read-only query layer over an ingested database
//!
//! The connection is always passed in explicitly. [`Catalog`] owns one for the
//! length of a query session and closes it when dropped.

pub mod detail;
pub mod search;

pub use detail::*;
pub use search::*;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

use crate::error::QueryError;
use crate::schema::Resource;

/// A read-only query session over one database
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open database {:?}", db_path))?;

        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn search(&self, query: &str) -> Result<SearchResults, QueryError> {
        search(&self.conn, query)
    }

    pub fn search_in(&self, query: &str, resources: &[Resource]) -> Result<SearchResults, QueryError> {
        search_in(&self.conn, query, resources)
    }

    pub fn detail(&self, resource: Resource, id: i64) -> Result<Detail, QueryError> {
        detail(&self.conn, resource, id)
    }

    pub fn detail_by_name(&self, resource: &str, id: i64) -> Result<Detail, QueryError> {
        detail_by_name(&self.conn, resource, id)
    }

    /// Close explicitly, surfacing any error the drop would swallow
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close database")
    }
}
