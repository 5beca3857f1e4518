//! Most-recently-opened trace files

use std::collections::VecDeque;
use std::path::Path;

/// Bounded most-recent-first list of file paths
#[derive(Debug, Clone, PartialEq)]
pub struct RecentFiles {
    paths: VecDeque<String>,
    limit: usize,
}

fn default_limit() -> usize {
    5
}

impl Default for RecentFiles {
    fn default() -> Self {
        Self::new(default_limit())
    }
}

impl RecentFiles {
    pub fn new(limit: usize) -> Self {
        Self {
            paths: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Move `path` to the front, evicting the oldest entry when full
    pub fn touch(&mut self, path: &str) {
        self.paths.retain(|p| p != path);
        self.paths.push_front(path.to_string());
        self.paths.truncate(self.limit);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Load a persisted list, dropping files that no longer exist
    pub fn load(store: &Path, limit: usize) -> std::io::Result<Self> {
        let mut recent = Self::new(limit);
        if !store.exists() {
            return Ok(recent);
        }
        let content = std::fs::read_to_string(store)?;
        let paths: Vec<String> = serde_json::from_str(&content)?;
        recent.paths = paths
            .into_iter()
            .filter(|p| Path::new(p).is_file())
            .take(recent.limit)
            .collect();
        Ok(recent)
    }

    pub fn save(&self, store: &Path) -> std::io::Result<()> {
        let content = serde_json::to_string_pretty(&self.paths)?;
        std::fs::write(store, content)
    }
}
