use crate::analysis::dataset::RawMatch;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Matches collected by earlier crawls of the same queue and tier.
#[derive(Debug, Serialize, Deserialize)]
pub struct CrawlCache {
    pub queue: String,
    pub tier: String,
    pub last_updated: DateTime<Utc>,
    pub matches: Vec<RawMatch>,
    /// Ids fetched once and dropped (other modes, incomplete teams).
    #[serde(default)]
    pub skipped_ids: Vec<String>,
    #[serde(skip)]
    path: PathBuf,
}

impl CrawlCache {
    pub fn new(queue: &str, tier: &str, path: PathBuf) -> Self {
        CrawlCache {
            queue: queue.to_string(),
            tier: tier.to_string(),
            last_updated: Utc::now(),
            matches: Vec::new(),
            skipped_ids: Vec::new(),
            path,
        }
    }

    pub fn default_path(queue: &str, tier: &str) -> PathBuf {
        let cache_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".league_picks");

        cache_dir.join(format!("crawl_{}_{}.json", queue, tier).to_lowercase())
    }

    /// Reads the cache at `path`, starting empty when none exists yet.
    pub fn load(queue: &str, tier: &str, path: &Path) -> Result<Self, AppError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let mut cache: CrawlCache = serde_json::from_str(&content).map_err(|e| {
                    AppError::JsonError(format!("Failed to parse cache: {}", e))
                })?;
                cache.path = path.to_path_buf();
                debug!("Loaded {} cached matches from {}", cache.matches.len(), path.display());
                Ok(cache)
            }
            Err(_) => Ok(CrawlCache::new(queue, tier, path.to_path_buf())),
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::IoError(format!("Failed to create cache dir: {}", e)))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| {
            AppError::JsonError(format!("Failed to serialize cache: {}", e))
        })?;

        fs::write(&self.path, json)
            .map_err(|e| AppError::IoError(format!("Failed to write cache: {}", e)))?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every id already fetched, stored or skipped.
    pub fn known_ids(&self) -> HashSet<String> {
        self.matches
            .iter()
            .map(|m| m.id.clone())
            .chain(self.skipped_ids.iter().cloned())
            .collect()
    }

    pub fn add_skipped(&mut self, ids: Vec<String>) {
        for id in ids {
            if !self.skipped_ids.contains(&id) {
                self.skipped_ids.push(id);
            }
        }
        self.last_updated = Utc::now();
    }

    /// Appends matches not already cached; returns how many were new.
    pub fn add_matches(&mut self, new_matches: Vec<RawMatch>) -> usize {
        let mut existing_ids = self.known_ids();
        let before = self.matches.len();

        for new_match in new_matches {
            if existing_ids.insert(new_match.id.clone()) {
                self.matches.push(new_match);
            }
        }

        self.last_updated = Utc::now();
        self.matches.len() - before
    }
}
