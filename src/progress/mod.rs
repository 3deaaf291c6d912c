//! Resumable import progress.
//!
//! Maps each book's natural key (`"{title}|{authors}"`) to the ISBN and
//! cover URL resolved for it, so a rerun skips books already looked up.
//! The state is saved wholesale; there is no merging and no locking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, ResultExt};

/// Resolved lookup data for one book
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    #[serde(default)]
    pub isbn: String,
    #[serde(rename = "coverURL", default)]
    pub cover_url: String,
}

impl ProgressEntry {
    pub fn is_empty(&self) -> bool {
        self.isbn.is_empty() && self.cover_url.is_empty()
    }
}

/// Everything persisted between runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    #[serde(default)]
    pub processed: BTreeMap<String, ProgressEntry>,
    /// Input index of the last book looked up
    #[serde(default)]
    pub last_index: usize,
}

impl ProgressState {
    /// Drop entries with neither ISBN nor cover so the next run retries them.
    ///
    /// Returns the number of entries removed.
    pub fn prune_empty(&mut self) -> usize {
        let before = self.processed.len();
        self.processed.retain(|_, entry| !entry.is_empty());
        before - self.processed.len()
    }

    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary {
            entries: self.processed.len(),
            with_isbn: self.processed.values().filter(|e| !e.isbn.is_empty()).count(),
            with_cover: self
                .processed
                .values()
                .filter(|e| !e.cover_url.is_empty())
                .count(),
            empty: self.processed.values().filter(|e| e.is_empty()).count(),
            last_index: self.last_index,
        }
    }
}

/// Counts for the `progress` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSummary {
    pub entries: usize,
    pub with_isbn: usize,
    pub with_cover: usize,
    pub empty: usize,
    pub last_index: usize,
}

/// Where progress is loaded from and checkpointed to.
pub trait ProgressStore {
    /// Load the saved state, or a fresh one if nothing was saved yet.
    fn load(&self) -> Result<ProgressState>;

    /// Replace the saved state.
    fn save(&self, state: &ProgressState) -> Result<()>;
}

/// Progress kept in a pretty-printed JSON file
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonProgressStore {
    fn load(&self) -> Result<ProgressState> {
        if !self.path.exists() {
            tracing::debug!("No progress file at {:?}, starting fresh", self.path);
            return Ok(ProgressState::default());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(format!("reading progress file {}", self.path.display()))?;
        let state = serde_json::from_str::<ProgressState>(&contents)
            .with_context(format!("parsing progress file {}", self.path.display()))?;
        Ok(state)
    }

    fn save(&self, state: &ProgressState) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(format!("creating directory {}", dir.display()))?;
        }

        let contents = serde_json::to_string_pretty(state)?;

        // Write to a sibling temp file, then rename over the target
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, contents)
            .with_context(format!("writing {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(format!("replacing {}", self.path.display()))?;

        tracing::debug!("Saved progress to {:?}", self.path);
        Ok(())
    }
}
