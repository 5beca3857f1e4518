//! Tree-view sink contract
//!
//! The engine never builds widgets. It emits [`ViewUpdate`]s describing which
//! rows appear, where they are inserted, and which rows are hidden; a
//! rendering layer applies them and routes expand/collapse triggers back into
//! the controller.

use crate::node::NodeId;
use crate::percentage::PercentShare;
use crate::severity::Severity;
use serde::Serialize;

/// One displayed call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleRow {
    pub id: NodeId,
    pub name: String,
    pub duration: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<PercentShare>,
    pub has_children: bool,
    pub expanded: bool,
    pub depth: usize,
}

/// Incremental change of the visible sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewUpdate {
    /// The whole view is replaced (file opened or cleared)
    Reset { rows: Vec<VisibleRow> },
    /// A fetch was issued; show a transient indicator under `id`
    Loading { id: NodeId },
    /// Newly materialized rows, inserted in order right after `after`
    Inserted { after: NodeId, rows: Vec<VisibleRow> },
    /// Previously materialized rows made visible again right after `after`
    Shown { after: NodeId, rows: Vec<VisibleRow> },
    /// Rows hidden by collapsing `parent`
    Hidden { parent: NodeId, ids: Vec<NodeId> },
    /// Fetch for `id` failed; the node is collapsed and may be retried
    FetchFailed { id: NodeId, message: String },
}

/// Consumer of view updates
pub trait TreeViewSink {
    fn apply(&mut self, update: &ViewUpdate);
}

/// Sink that keeps every update, for headless use and tests
#[derive(Debug, Default)]
pub struct RecordingSink {
    updates: Vec<ViewUpdate>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> &[ViewUpdate] {
        &self.updates
    }

    pub fn take(&mut self) -> Vec<ViewUpdate> {
        std::mem::take(&mut self.updates)
    }
}

impl TreeViewSink for RecordingSink {
    fn apply(&mut self, update: &ViewUpdate) {
        self.updates.push(update.clone());
    }
}
