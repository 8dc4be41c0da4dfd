use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use rocchio::{Analyzer, Document};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// One result of the Custom Search JSON API.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub title: String,
    #[serde(rename = "displayLink", default)]
    pub display_link: String,
    #[serde(rename = "formattedUrl", default)]
    pub formatted_url: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

impl SearchItem {
    /// Identity of the result across rounds.
    pub fn key(&self) -> &str { &self.link }

    pub fn to_document(&self, analyzer: &Analyzer, body: Option<&str>) -> Document {
        analyzer.document(self.key(), &self.title, &self.snippet, body)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

pub struct SearchClient {
    http: Client,
    api_key: String,
    engine_id: String,
    cache_dir: Option<PathBuf>,
}

impl SearchClient {
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self { http, api_key: api_key.into(), engine_id: engine_id.into(), cache_dir: None })
    }

    /// Keep raw API responses under `dir`. The API is billed per call.
    pub fn with_cache_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cache_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Cache file of `query`: `q_<term>-<term>.json`. Path separators and
    /// `..` never reach the file name.
    pub fn cache_path(&self, query: &str) -> Option<PathBuf> {
        let name = query
            .split_whitespace()
            .map(|t| t.replace(['/', '\\'], "_").replace("..", "_"))
            .collect::<Vec<_>>()
            .join("-");
        self.cache_dir.as_ref().map(|d| d.join(format!("q_{name}.json")))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchItem>> {
        let raw = self.search_raw(query).await?;
        parse_items(&raw)
    }

    async fn search_raw(&self, query: &str) -> Result<String> {
        let cache = self.cache_path(query);
        if let Some(path) = &cache {
            if let Ok(raw) = tokio::fs::read_to_string(path).await {
                tracing::debug!(path = %path.display(), "search cache hit");
                return Ok(raw);
            }
        }

        let url = Url::parse_with_params(ENDPOINT, &[("key", self.api_key.as_str()), ("cx", self.engine_id.as_str()), ("q", query)])?;
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("search API returned {status}: {body}"));
        }
        let raw = resp.text().await?;

        if let Some(path) = &cache {
            if let Some(dir) = path.parent() {
                tokio::fs::create_dir_all(dir).await?;
            }
            tokio::fs::write(path, &raw).await.with_context(|| format!("writing {}", path.display()))?;
        }
        Ok(raw)
    }
}

/// Parse a raw API response. A response without `items` has no results.
pub fn parse_items(raw: &str) -> Result<Vec<SearchItem>> {
    let resp: SearchResponse = serde_json::from_str(raw).context("malformed search response")?;
    Ok(resp.items)
}
