//! Documentation source loading with a cache-or-populate file.
//!
//! If the cache file exists it is used verbatim and never refreshed.
//! Otherwise the page is fetched once and written to the cache path before
//! it is returned.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ExtractError, Result};

/// Public documentation page of the bot API.
pub const DEFAULT_SOURCE_URL: &str = "https://core.telegram.org/bots/api";

/// Cache file used when no path is given.
pub const DEFAULT_CACHE_PATH: &str = "bot-api.html";

/// Network timeout for the documentation fetch.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where a loaded document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOrigin {
    Cache,
    Network,
}

/// A loaded documentation page.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub document: String,
    pub origin: SourceOrigin,
    pub path: PathBuf,
}

/// Loads the documentation from the cache file, populating it on a miss.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    url: String,
    cache_path: PathBuf,
    timeout: Duration,
}

impl SourceLoader {
    pub fn new(url: &str, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.to_string(),
            cache_path: cache_path.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the cached document, or fetches and caches it.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Io`] if the cache cannot be read or written,
    /// or [`ExtractError::Fetch`] if the download fails. Nothing is written
    /// to the cache path when the download fails.
    pub fn load(&self) -> Result<LoadedSource> {
        if self.cache_path.is_file() {
            debug!(path = %self.cache_path.display(), "Reading cached documentation");
            let document = fs::read_to_string(&self.cache_path)?;
            return Ok(LoadedSource {
                document,
                origin: SourceOrigin::Cache,
                path: self.cache_path.clone(),
            });
        }

        info!(url = %self.url, path = %self.cache_path.display(), "Cache miss, fetching documentation");
        let document = self.fetch()?;

        if let Some(parent) = self.cache_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.cache_path, &document)?;

        Ok(LoadedSource {
            document,
            origin: SourceOrigin::Network,
            path: self.cache_path.clone(),
        })
    }

    fn fetch(&self) -> Result<String> {
        let response = ureq::get(&self.url)
            .timeout(self.timeout)
            .call()
            .map_err(|e| self.fetch_error(e.to_string()))?;

        response
            .into_string()
            .map_err(|e| self.fetch_error(e.to_string()))
    }

    fn fetch_error(&self, message: String) -> ExtractError {
        ExtractError::Fetch {
            url: self.url.clone(),
            message,
        }
    }
}
