//! Provider reading agent trace files from the local filesystem
//!
//! Each line of a trace file holds one root call record. Top-level calls are
//! identified by their 1-based line number; subcalls are re-read from the
//! active file on demand.

use super::recent::RecentFiles;
use super::{parse_trace_line, subcalls_at, summarize_root, CallTreeProvider, ProviderError, Result};
use crate::config::ViewConfig;
use crate::node::NodeId;
use crate::record::{ActiveFile, RecentFile, SubcallsResponse, TopLevelCall};
use async_trait::async_trait;
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
struct FileState {
    active: Option<PathBuf>,
    recent: RecentFiles,
}

/// Local trace-file backend
#[derive(Debug, Default)]
pub struct FileProvider {
    state: RefCell<FileState>,
    recent_store: Option<PathBuf>,
}

impl FileProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a provider whose recent-files list follows the configuration
    pub fn from_config(config: &ViewConfig) -> Self {
        let recent = match &config.recent_files_path {
            Some(store) => RecentFiles::load(store, config.recent_files_limit).unwrap_or_else(|e| {
                tracing::warn!("Ignoring recent files at {}: {}", store.display(), e);
                RecentFiles::new(config.recent_files_limit)
            }),
            None => RecentFiles::new(config.recent_files_limit),
        };
        // The most recent file from an earlier run stays active
        let active = recent.iter().next().map(PathBuf::from);
        Self {
            state: RefCell::new(FileState {
                active,
                recent,
            }),
            recent_store: config.recent_files_path.clone(),
        }
    }

    fn remember(&self, path: &Path) {
        let mut state = self.state.borrow_mut();
        state.active = Some(path.to_path_buf());
        state.recent.touch(&path.to_string_lossy());
        if let Some(store) = &self.recent_store {
            if let Err(e) = state.recent.save(store) {
                tracing::warn!("Failed to save recent files to {}: {}", store.display(), e);
            }
        }
    }

    fn active_path(&self) -> Result<PathBuf> {
        self.state
            .borrow()
            .active
            .clone()
            .ok_or(ProviderError::NoActiveFile)
    }
}

/// Read the `line_number`-th line (1-based) of a file
fn read_line(path: &Path, line_number: u64) -> Result<String> {
    let out_of_range = || ProviderError::LineOutOfRange { line: line_number };
    let index = usize::try_from(line_number)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(out_of_range)?;
    let reader = BufReader::new(File::open(path)?);
    match reader.lines().nth(index) {
        Some(line) => Ok(line?),
        None => Err(out_of_range()),
    }
}

#[async_trait(?Send)]
impl CallTreeProvider for FileProvider {
    async fn recent_files(&self) -> Result<Vec<RecentFile>> {
        Ok(self
            .state
            .borrow()
            .recent
            .iter()
            .map(|path| RecentFile {
                path: path.to_string(),
            })
            .collect())
    }

    async fn top_level_calls(&self, path: &str) -> Result<Vec<TopLevelCall>> {
        let file_path = PathBuf::from(path);
        let content = std::fs::read_to_string(&file_path).map_err(|e| {
            tracing::debug!("Cannot read {}: {}", path, e);
            ProviderError::Unreadable {
                path: path.to_string(),
            }
        })?;
        self.remember(&file_path);

        let mut calls = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line_number = index as u64 + 1;
            if line.trim().is_empty() {
                continue;
            }
            match parse_trace_line(line) {
                Ok(record) => calls.extend(summarize_root(&record, line_number)),
                Err(e) => tracing::warn!("Failed to analyze line {}: {}", line_number, e),
            }
        }
        tracing::debug!("Read {} root calls from {}", calls.len(), path);
        Ok(calls)
    }

    async fn subcalls(&self, id: &NodeId) -> Result<SubcallsResponse> {
        let path = self.active_path()?;
        let line = read_line(&path, id.line())?;
        let record = parse_trace_line(&line)?;
        subcalls_at(&record, id)
    }

    async fn active_file(&self) -> Result<ActiveFile> {
        let path = self.active_path()?;
        Ok(ActiveFile {
            path: path.to_string_lossy().to_string(),
        })
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("Shutdown requested, nothing to stop for local files");
        Ok(())
    }
}
