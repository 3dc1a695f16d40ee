use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

pub use crate::source::DEFAULT_BASE_URL;

pub const DEFAULT_DB_NAME: &str = "starwars.db";

/// Resolved locations for a run: explicit value, else environment, else default
#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: PathBuf,
    pub base_url: String,
}

impl Settings {
    /// `db_path` and `base_url` arrive from clap, which already folds in
    /// `SWAPI_DB` / `SWAPI_BASE_URL`.
    pub fn resolve(db_path: Option<PathBuf>, base_url: Option<String>) -> Result<Self> {
        let db_path = match db_path {
            Some(path) => path,
            None => default_database_path()?,
        };

        Ok(Self {
            db_path,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

/// `starwars.db` inside the per-user data directory, created if missing
pub fn default_database_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "swapi-to-sqlite")
        .context("Could not determine data directory")?;
    let data_dir = proj_dirs.data_dir();

    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join(DEFAULT_DB_NAME))
}
