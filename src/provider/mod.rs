//! Data provider contract consumed by the call-tree engine
//!
//! | Operation        | Request     | Response                       |
//! |------------------|-------------|--------------------------------|
//! | recent files     | -           | `[{path}]`, most recent first  |
//! | top-level calls  | file path   | `[TopLevelCall]`               |
//! | subcalls         | node id     | `{subcalls: [CallRecord]}`     |
//! | active file      | -           | `{path}`                       |
//! | shutdown         | -           | acknowledgment                 |
//!
//! Two implementations ship with the crate: [`FileProvider`] reads agent trace
//! files directly, [`HttpProvider`] talks to a running trace backend.

mod file;
mod http;
mod recent;

pub use file::FileProvider;
pub use http::HttpProvider;
pub use recent::RecentFiles;

use crate::node::NodeId;
use crate::parser::CallTreeParser;
use crate::record::{ActiveFile, CallRecord, RecentFile, SubcallsResponse, TopLevelCall};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while talking to a provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Backend returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("No trace file is active")]
    NoActiveFile,

    #[error("Line {line} is out of range")]
    LineOutOfRange { line: u64 },

    #[error("No call record at {id}")]
    PathNotFound { id: String },

    #[error("Cannot read {path}")]
    Unreadable { path: String },
}

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Source of call-tree data
///
/// Futures are not required to be `Send`: the engine runs on a single
/// cooperative thread.
#[async_trait(?Send)]
pub trait CallTreeProvider {
    async fn recent_files(&self) -> Result<Vec<RecentFile>>;

    /// Open a trace file and list its top-level calls
    async fn top_level_calls(&self, path: &str) -> Result<Vec<TopLevelCall>>;

    /// Subcalls of the record addressed by `id` in the active file
    async fn subcalls(&self, id: &NodeId) -> Result<SubcallsResponse>;

    async fn active_file(&self) -> Result<ActiveFile>;

    async fn shutdown(&self) -> Result<()>;
}

/// Decode one line of an agent trace file
///
/// Lines hold a single root record, optionally wrapped in `[...]`.
pub(crate) fn parse_trace_line(line: &str) -> Result<CallRecord> {
    let line = line.trim();
    if line.starts_with('[') {
        let mut records: Vec<CallRecord> = serde_json::from_str(line)?;
        if records.is_empty() {
            return Ok(CallRecord::default());
        }
        return Ok(records.swap_remove(0));
    }
    Ok(serde_json::from_str(line)?)
}

/// Summarize a root record as a top-level listing entry
pub(crate) fn summarize_root(record: &CallRecord, line_number: u64) -> Option<TopLevelCall> {
    match CallTreeParser::parse_record(record, NodeId::root(line_number)) {
        Ok(node) => Some(TopLevelCall {
            name: node.name,
            duration: node.duration.as_str().to_string(),
            line_number,
            has_child: node.has_children,
        }),
        Err(e) => {
            tracing::warn!("Failed to analyze line {}: {}", line_number, e);
            None
        }
    }
}

/// Subcalls of the record reached by walking `id`'s child path from `root`
pub(crate) fn subcalls_at(root: &CallRecord, id: &NodeId) -> Result<SubcallsResponse> {
    let record = root
        .descend(id.path())
        .ok_or_else(|| ProviderError::PathNotFound { id: id.to_string() })?;
    Ok(SubcallsResponse {
        subcalls: record.children().map(<[CallRecord]>::to_vec).unwrap_or_default(),
    })
}
