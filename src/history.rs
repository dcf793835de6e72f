//! Persisted history of delivered article ids.
//!
//! The history is a flat JSON array of id strings, oldest first. It is
//! capped to the most recent [`DEFAULT_HISTORY_LIMIT`] entries on every
//! save and written atomically (temporary file + rename), so a crash during
//! a save never leaves a truncated file behind.
//!
//! A missing or unreadable history file is treated as an empty history.
//!
//! The file is not locked: two concurrent runs sharing a history file will
//! race, and the last writer wins.

use crate::models::Article;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Number of ids retained by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Bounded, file-backed list of article ids that were already delivered.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    limit: usize,
}

impl HistoryStore {
    /// Create a store backed by `path`, keeping at most `limit` ids.
    pub fn new(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            path: path.into(),
            limit,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored ids, oldest first.
    ///
    /// Never fails: a missing or corrupt file yields an empty history.
    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    pub async fn load(&self) -> Vec<String> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No history file yet; starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "Failed to read history; treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => {
                debug!(count = ids.len(), "Loaded history");
                ids
            }
            Err(e) => {
                warn!(error = %e, "History file is not a JSON array of strings; treating as empty");
                Vec::new()
            }
        }
    }

    /// Append `new_ids` to the stored history, keep the newest entries and
    /// write the result back.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), new = new_ids.len()))]
    pub async fn save(&self, new_ids: &[String]) -> Result<(), Box<dyn Error>> {
        let mut history = self.load().await;
        history.extend(new_ids.iter().cloned());
        if history.len() > self.limit {
            let excess = history.len() - self.limit;
            history.drain(..excess);
        }

        let json = serde_json::to_string(&history)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;

        info!(total = history.len(), "Saved history");
        Ok(())
    }

    /// Keep only the articles whose id is not in the stored history.
    pub async fn filter_new(&self, articles: Vec<Article>) -> Vec<Article> {
        let history = self.load().await;
        articles
            .into_iter()
            .filter(|article| !history.contains(&article.id))
            .collect()
    }
}
