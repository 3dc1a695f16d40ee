use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;

use super::sqlite::{LoadReport, SqliteWriter};
use crate::schema::Resource;
use crate::source::CatalogSource;
use crate::ui::{Phase, Ui};

/// The two ingestion passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pass {
    Entities,
    Relationships,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Entities => write!(f, "entities"),
            Pass::Relationships => write!(f, "relationships"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Loaded(LoadReport),
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct PassResult {
    pub resource: Resource,
    pub pass: Pass,
    pub outcome: Outcome,
}

/// Per-resource, per-pass record of one ingestion run
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestSummary {
    pub results: Vec<PassResult>,
}

impl IngestSummary {
    fn record(&mut self, resource: Resource, pass: Pass, outcome: Outcome) {
        self.results.push(PassResult {
            resource,
            pass,
            outcome,
        });
    }

    pub fn outcome(&self, resource: Resource, pass: Pass) -> Option<&Outcome> {
        self.results
            .iter()
            .find(|r| r.resource == resource && r.pass == pass)
            .map(|r| &r.outcome)
    }

    pub fn succeeded(&self, pass: Pass) -> Vec<Resource> {
        self.results
            .iter()
            .filter(|r| r.pass == pass && matches!(r.outcome, Outcome::Loaded(_)))
            .map(|r| r.resource)
            .collect()
    }

    pub fn failed(&self, pass: Pass) -> Vec<(Resource, &str)> {
        self.results
            .iter()
            .filter(|r| r.pass == pass)
            .filter_map(|r| match &r.outcome {
                Outcome::Failed { error } => Some((r.resource, error.as_str())),
                Outcome::Loaded(_) => None,
            })
            .collect()
    }

    pub fn rows(&self, pass: Pass) -> u64 {
        self.results
            .iter()
            .filter(|r| r.pass == pass)
            .map(|r| match &r.outcome {
                Outcome::Loaded(report) => report.rows,
                Outcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn is_complete(&self) -> bool {
        self.failed(Pass::Entities).is_empty() && self.failed(Pass::Relationships).is_empty()
    }
}

impl fmt::Display for IngestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pass in [Pass::Entities, Pass::Relationships] {
            writeln!(f, "{}: {} rows", pass, self.rows(pass))?;
            for result in self.results.iter().filter(|r| r.pass == pass) {
                match &result.outcome {
                    Outcome::Loaded(report) => writeln!(
                        f,
                        "  {:<10} {:>5} rows  {:>3} skipped  {:>3} unresolved",
                        result.resource, report.rows, report.skipped, report.unresolved
                    )?,
                    Outcome::Failed { error } => {
                        writeln!(f, "  {:<10} FAILED: {}", result.resource, error)?
                    }
                }
            }
        }
        Ok(())
    }
}

/// Rebuild the schema and load every resource from `source`.
///
/// Only a failed rebuild is returned as an error. Fetch or load failures
/// are recorded per resource and the remaining resources still load.
pub fn ingest_all(
    writer: &mut SqliteWriter,
    source: &impl CatalogSource,
    ui: &mut impl Ui,
) -> Result<IngestSummary> {
    let mut summary = IngestSummary::default();
    let total = Resource::ALL.len() as u64;

    ui.set_phase(Phase::Rebuilding);
    writer.rebuild()?;
    ui.log("Dropped and recreated all tables");

    // Pass 1: entity tables
    ui.set_phase(Phase::Fetching);
    ui.set_info(format!("Source: {}", source.describe()));
    let mut fetched: Vec<(Resource, Vec<Value>)> = Vec::new();

    for (idx, resource) in Resource::ALL.into_iter().enumerate() {
        ui.set_progress(idx as u64, total, format!("Fetching {}", resource));

        let loaded = source
            .fetch(resource)
            .and_then(|records| Ok((writer.load_entities(resource, &records)?, records)));

        match loaded {
            Ok((report, records)) => {
                tracing::info!(%resource, rows = report.rows, skipped = report.skipped, "entities loaded");
                ui.log(format!("{}: {} rows", resource, report.rows));
                ui.mark(resource, Pass::Entities, true);
                summary.record(resource, Pass::Entities, Outcome::Loaded(report));
                fetched.push((resource, records));
            }
            Err(e) => {
                tracing::warn!(%resource, error = %format!("{:#}", e), "entity load failed");
                ui.log(format!("Error processing {}: {:#}", resource, e));
                ui.mark(resource, Pass::Entities, false);
                summary.record(
                    resource,
                    Pass::Entities,
                    Outcome::Failed {
                        error: format!("{:#}", e),
                    },
                );
            }
        }
    }

    // Pass 2: junction tables, only for resources whose entities loaded
    ui.set_phase(Phase::Linking);
    let linkable = fetched.len() as u64;

    for (idx, (resource, records)) in fetched.iter().enumerate() {
        let resource = *resource;
        ui.set_progress(idx as u64, linkable, format!("Linking {}", resource));

        match writer.load_relationships(resource, records) {
            Ok(report) => {
                tracing::info!(%resource, rows = report.rows, "relationships loaded");
                if !resource.junctions().is_empty() {
                    ui.log(format!("{}: {} links", resource, report.rows));
                }
                ui.mark(resource, Pass::Relationships, true);
                summary.record(resource, Pass::Relationships, Outcome::Loaded(report));
            }
            Err(e) => {
                tracing::warn!(%resource, error = %format!("{:#}", e), "relationship load failed");
                ui.log(format!("Error populating links for {}: {:#}", resource, e));
                ui.mark(resource, Pass::Relationships, false);
                summary.record(
                    resource,
                    Pass::Relationships,
                    Outcome::Failed {
                        error: format!("{:#}", e),
                    },
                );
            }
        }
    }

    ui.clear_progress();
    Ok(summary)
}

/// Open (or create) the database at `db_path` and run a full reload into it
pub fn ingest_into(
    db_path: &Path,
    source: &impl CatalogSource,
    ui: &mut impl Ui,
) -> Result<IngestSummary> {
    let mut writer = SqliteWriter::open(db_path)?;
    let summary = ingest_all(&mut writer, source, ui)?;
    writer.finalize()?;
    Ok(summary)
}
