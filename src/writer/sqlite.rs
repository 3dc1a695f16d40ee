use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use super::schema_gen::{generate_create_table, generate_drop_table, generate_indexes, generate_insert};
use crate::parser::{parse_links, parse_record};
use crate::schema::{DependencyResolver, Resource};

/// Row counts for one resource's load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Rows written (entity rows, or newly inserted junction pairs)
    pub rows: u64,
    /// Records or pairs that could not be keyed and were left out
    pub skipped: u64,
    /// Reference values that yielded no id
    pub unresolved: u64,
}

pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database {:?}", db_path))?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        // Foreign keys stay declarative: junction integrity comes from load order
        conn.execute_batch(
            "PRAGMA foreign_keys = OFF;
             PRAGMA synchronous = NORMAL;",
        )
        .context("Failed to configure database")?;

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Drop all fourteen tables if present, then create them fresh
    pub fn rebuild(&mut self) -> Result<()> {
        let resolver = DependencyResolver::new();
        let drop_order = resolver.drop_order().map_err(anyhow::Error::msg)?;
        let create_order = resolver.creation_order().map_err(anyhow::Error::msg)?;

        let tx = self.conn.transaction()?;

        for schema in &drop_order {
            tx.execute(&generate_drop_table(schema), [])
                .with_context(|| format!("Failed to drop table: {}", schema.name))?;
        }

        for schema in &create_order {
            tx.execute(&generate_create_table(schema), [])
                .with_context(|| format!("Failed to create table: {}", schema.name))?;

            for index_sql in generate_indexes(schema) {
                tx.execute(&index_sql, [])
                    .with_context(|| format!("Failed to create index for: {}", schema.name))?;
            }
        }

        tx.commit()?;
        tracing::debug!(tables = create_order.len(), "schema rebuilt");
        Ok(())
    }

    /// Insert one row per record into the resource's entity table.
    ///
    /// Runs in a single transaction: on error nothing from this resource remains.
    pub fn load_entities(&mut self, resource: Resource, records: &[Value]) -> Result<LoadReport> {
        let schema = resource.table();
        let insert_sql = generate_insert(schema, "REPLACE");
        let mut report = LoadReport::default();

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&insert_sql)?;

            for record in records {
                if !record.is_object() {
                    bail!("{} listing contains a non-object record", resource);
                }

                let Some(row) = parse_record(record, schema) else {
                    tracing::warn!(%resource, url = ?record.get("url"), "record has no id; skipped");
                    report.skipped += 1;
                    continue;
                };

                for (idx, value) in row.values.iter().enumerate() {
                    value.bind_to(idx + 1, &mut stmt)?;
                }
                stmt.raw_execute()
                    .with_context(|| format!("Failed to insert {} {}", resource, row.id))?;

                report.rows += 1;
                report.unresolved += row.unresolved as u64;
            }
        }
        tx.commit()?;

        Ok(report)
    }

    /// Insert junction pairs for every reference array the resource embeds.
    ///
    /// Targets are not checked for existence; a dangling id loads as-is.
    pub fn load_relationships(
        &mut self,
        resource: Resource,
        records: &[Value],
    ) -> Result<LoadReport> {
        let mut report = LoadReport::default();

        let tx = self.conn.transaction()?;
        for junction in resource.junctions() {
            let Some(link) = junction.link_source else {
                continue;
            };
            let mut stmt = tx.prepare_cached(&generate_insert(junction, "IGNORE"))?;

            for record in records {
                let links = parse_links(record, link);
                report.skipped += links.skipped as u64;
                report.unresolved += links.unresolved as u64;

                for (owner, target) in links.pairs {
                    let inserted = stmt
                        .execute([owner, target])
                        .with_context(|| format!("Failed to link {} in {}", owner, junction.name))?;
                    report.rows += inserted as u64;
                }
            }
        }
        tx.commit()?;

        Ok(report)
    }

    /// Finalize the database
    pub fn finalize(self) -> Result<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        Ok(())
    }
}
