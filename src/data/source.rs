//! Data acquisition: turns a source descriptor into raw table text.
//!
//! Providers are tried in order, the first one that yields text wins.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::PERSISTENCE;

/// Where a table comes from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    File(PathBuf),
    Url(String),
}

impl SourceDescriptor {
    /// Interprets free text typed by the user: anything with an http(s) scheme is a URL.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if text.starts_with("http://") || text.starts_with("https://") {
            Some(SourceDescriptor::Url(text.to_string()))
        } else {
            Some(SourceDescriptor::File(PathBuf::from(text)))
        }
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceDescriptor::File(path) => write!(f, "{}", path.display()),
            SourceDescriptor::Url(url) => write!(f, "{}", url),
        }
    }
}

#[async_trait]
pub trait LoadTableText: Send + Sync {
    // Either return the full text OR an anyhow::error. Never partial text.
    async fn load_text(&self) -> Result<String>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

fn ensure_within_limit(len: u64, what: impl fmt::Display) -> Result<()> {
    if len > PERSISTENCE.max_table_bytes as u64 {
        bail!(
            "{} is {} bytes, above the {} byte limit",
            what,
            len,
            PERSISTENCE.max_table_bytes
        );
    }
    Ok(())
}

pub struct LocalFileSource {
    pub path: PathBuf,
}

#[async_trait]
impl LoadTableText for LocalFileSource {
    async fn load_text(&self) -> Result<String> {
        let meta = tokio::fs::metadata(&self.path)
            .await
            .with_context(|| format!("Failed to stat {}", self.path.display()))?;
        ensure_within_limit(meta.len(), self.path.display())?;
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))
    }

    fn signature(&self) -> &'static str {
        "local-file"
    }
}

pub struct HttpSource {
    pub url: String,
}

#[async_trait]
impl LoadTableText for HttpSource {
    async fn load_text(&self) -> Result<String> {
        let response = reqwest::get(&self.url)
            .await
            .with_context(|| format!("Failed to fetch {}", self.url))?
            .error_for_status()
            .with_context(|| format!("Server rejected {}", self.url))?;
        // Advertised size is checked before any body is buffered.
        if let Some(len) = response.content_length() {
            ensure_within_limit(len, &self.url)?;
        }
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {}", self.url))?;
        ensure_within_limit(body.len() as u64, &self.url)?;
        Ok(body)
    }

    fn signature(&self) -> &'static str {
        "http"
    }
}

pub fn providers_for(source: &SourceDescriptor) -> Vec<Box<dyn LoadTableText>> {
    match source {
        SourceDescriptor::File(path) => vec![Box::new(LocalFileSource { path: path.clone() })],
        SourceDescriptor::Url(url) => vec![Box::new(HttpSource { url: url.clone() })],
    }
}

pub async fn get_table_text_async(
    implementations: &[Box<dyn LoadTableText>],
) -> Result<(String, &'static str)> {
    for imp in implementations {
        match imp.load_text().await {
            Ok(text) => {
                let signature = imp.signature();
                return Ok((text, signature));
            }
            Err(e) => {
                log::warn!("Error with a table provider ({}): {:#}", imp.signature(), e);
                // Continue to the next implementation
            }
        }
    }
    Err(anyhow!("All table providers failed to load data"))
}

/// Loads the text for one descriptor.
pub async fn load_source(source: &SourceDescriptor) -> Result<String> {
    let (text, signature) = get_table_text_async(&providers_for(source))
        .await
        .with_context(|| format!("Could not load {}", source))?;
    log::info!("Loaded {} bytes from {} via {}", text.len(), source, signature);
    Ok(text)
}

/// Blocking wrapper for callers off the async runtime (UI background threads).
pub fn load_source_blocking(source: &SourceDescriptor) -> Result<String> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;
    rt.block_on(load_source(source))
}
