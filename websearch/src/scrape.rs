use anyhow::Result;
use parking_lot::RwLock;
use reqwest::{header, Client};
use scraper::Html;
use sha1::{Digest, Sha1};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinError;

const MAX_BODY: usize = 2 * 1024 * 1024;
const HIDDEN: &[&str] = &["style", "script", "head", "title"];

/// Fetches result pages and keeps their visible text, on disk and in memory.
#[derive(Clone)]
pub struct PageScraper {
    http: Client,
    cache_dir: PathBuf,
    memo: Arc<RwLock<HashMap<String, String>>>,
}

impl PageScraper {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let http = Client::builder()
            .user_agent("relfeed/0.1")
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(12))
            .build()?;
        Ok(Self { http, cache_dir: cache_dir.as_ref().to_path_buf(), memo: Arc::new(RwLock::new(HashMap::new())) })
    }

    pub fn cache_path(&self, url: &str) -> PathBuf {
        let mut hasher = Sha1::new();
        hasher.update(url.as_bytes());
        self.cache_dir.join(format!("{:x}.txt", hasher.finalize()))
    }

    /// Visible text of the page at `url`. Failures degrade to an empty string.
    pub async fn scrape_text(&self, url: &str) -> String {
        if url.is_empty() { return String::new(); }
        if let Some(hit) = self.memo.read().get(url).cloned() {
            return hit;
        }
        let path = self.cache_path(url);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(_) => match self.fetch(url).await {
                Ok(text) => {
                    if let Err(e) = self.store(&path, &text).await {
                        tracing::warn!(url, error = %e, "could not cache scraped page");
                    }
                    text
                }
                Err(e) => {
                    tracing::warn!(url, error = %e, "scrape failed");
                    String::new()
                }
            },
        };
        self.memo.write().insert(url.to_string(), text.clone());
        text
    }

    /// Scrape every url concurrently; the output keeps the input order.
    pub async fn scrape_all(&self, urls: &[String]) -> Vec<String> {
        let handles: Vec<_> = urls
            .iter()
            .map(|u| {
                let this = self.clone();
                let u = u.clone();
                tokio::spawn(async move { this.scrape_text(&u).await })
            })
            .collect();
        let mut out = Vec::with_capacity(handles.len());
        for (h, url) in handles.into_iter().zip(urls) {
            out.push(joined_text(h.await, url));
        }
        out
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let resp = self.http.get(url).send().await?.error_for_status()?;
        if let Some(ct) = resp.headers().get(header::CONTENT_TYPE) {
            if let Ok(v) = ct.to_str() {
                if !v.starts_with("text/html") { anyhow::bail!("not html: {v}"); }
            }
        }
        let bytes = resp.bytes().await?;
        if bytes.len() > MAX_BODY { anyhow::bail!("page too large: {} bytes", bytes.len()); }
        Ok(extract_text(&String::from_utf8_lossy(&bytes)))
    }

    async fn store(&self, path: &Path, text: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        tokio::fs::write(path, text).await?;
        Ok(())
    }
}

fn joined_text(res: Result<String, JoinError>, url: &str) -> String {
    match res {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(url, error = %e, "scrape task failed");
            String::new()
        }
    }
}

/// Text of the nodes a reader would see: no scripts, styles, head or title,
/// no comments.
pub fn extract_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let mut parts = Vec::new();
    for node in doc.tree.nodes() {
        let Some(text) = node.value().as_text() else { continue };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element().map(|e| HIDDEN.contains(&e.name())))
            .unwrap_or(true);
        if hidden { continue; }
        let t = text.trim();
        if !t.is_empty() { parts.push(t.to_string()); }
    }
    parts.join(" ")
}
