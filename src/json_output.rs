//! JSON output format for the visible call tree
//!
//! `--format json` emits the rows exactly as the tree-view sink receives them.

use crate::context::ViewContext;
use crate::view::VisibleRow;
use serde::Serialize;

/// Thresholds the rows were filtered with
#[derive(Debug, Clone, Serialize)]
pub struct JsonThresholds {
    pub root: f64,
    pub nested: f64,
}

/// Summary of the visible sequence
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Number of visible rows
    pub visible_rows: usize,
    /// Number of visible top-level calls
    pub root_calls: usize,
    /// Deepest visible nesting level
    pub max_depth: usize,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// Trace file the rows come from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub thresholds: JsonThresholds,
    /// Visible rows, depth-first
    pub rows: Vec<VisibleRow>,
    pub summary: JsonSummary,
}

impl JsonOutput {
    pub fn new(context: &ViewContext, rows: Vec<VisibleRow>) -> Self {
        let summary = JsonSummary {
            visible_rows: rows.len(),
            root_calls: rows.iter().filter(|r| r.depth == 0).count(),
            max_depth: rows.iter().map(|r| r.depth).max().unwrap_or(0),
        };
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "arbol-json-v1".to_string(),
            file: context.file().map(str::to_string),
            thresholds: JsonThresholds {
                root: context.filter().root_threshold(),
                nested: context.filter().nested_threshold(),
            },
            rows,
            summary,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
