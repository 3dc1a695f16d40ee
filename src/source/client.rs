use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;

use super::{parse_payload, CatalogSource};
use crate::schema::Resource;

pub const DEFAULT_BASE_URL: &str = "https://swapi.info/api";

/// Fetches resource listings from the live catalog API
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url: String = base_url.into();
        let client = Client::builder()
            .user_agent("swapi-to-sqlite")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource)
    }
}

impl CatalogSource for HttpSource {
    fn fetch(&self, resource: Resource) -> Result<Vec<Value>> {
        let url = self.endpoint(resource);
        tracing::debug!(%url, "fetching resource listing");

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?
            .error_for_status()
            .with_context(|| format!("Catalog rejected request for {}", url))?;

        let text = response.text().context("Failed to read response")?;
        parse_payload(&text).with_context(|| format!("Malformed payload from {}", url))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
