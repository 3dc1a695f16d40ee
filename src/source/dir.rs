use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::{parse_payload, CatalogSource};
use crate::schema::Resource;

/// Reads `<dir>/<resource>.json` listings saved from the catalog
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn file_path(&self, resource: Resource) -> PathBuf {
        self.dir.join(format!("{}.json", resource))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CatalogSource for DirSource {
    fn fetch(&self, resource: Resource) -> Result<Vec<Value>> {
        let path = self.file_path(resource);
        let text =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
        parse_payload(&text).with_context(|| format!("Malformed payload in {:?}", path))
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_listing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("planets.json"),
            r#"[{"name": "Tatooine", "url": "https://swapi.info/api/planets/1"}]"#,
        )
        .unwrap();

        let source = DirSource::new(dir.path());
        let records = source.fetch(Resource::Planets).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "Tatooine");

        assert!(source.fetch(Resource::People).is_err());
    }
}
