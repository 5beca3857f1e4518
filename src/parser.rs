//! Normalizes raw backend records into typed call nodes
//!
//! Children are never parsed eagerly: a record only contributes its own
//! `(name, duration)` pair and whether a `subcalls` list is present. The
//! nested list is materialized later, when the node is expanded.

use crate::duration::DurationValue;
use crate::error::{Result, TreeError};
use crate::node::{CallNode, NodeId};
use crate::record::{CallRecord, RecordEntry, TopLevelCall};

/// Stateless record parser
#[derive(Debug, Clone, Copy, Default)]
pub struct CallTreeParser;

impl CallTreeParser {
    /// Parse one nested record into a node with the given id
    ///
    /// When several non-reserved keys are present the last one wins.
    pub fn parse_record(record: &CallRecord, id: NodeId) -> Result<CallNode> {
        let mut call: Option<(&str, &str)> = None;
        let mut has_children = false;
        let mut replaced: Vec<&str> = Vec::new();
        let mut unusable: Vec<&str> = Vec::new();

        for entry in record.entries() {
            match entry {
                RecordEntry::Children(_) => has_children = true,
                RecordEntry::Call { name, duration } => {
                    if let Some((previous, _)) = call.replace((name.as_str(), duration.as_str())) {
                        replaced.push(previous);
                    }
                }
                RecordEntry::Unusable { key } => unusable.push(key.as_str()),
            }
        }

        let (name, duration) = call.ok_or_else(|| {
            TreeError::malformed(format!("record {} has no name/duration key", id))
        })?;

        if !replaced.is_empty() {
            tracing::warn!(
                node = %id,
                kept = name,
                replaced = ?replaced,
                "Call record has several name keys, keeping the last one"
            );
        }
        if !unusable.is_empty() {
            tracing::debug!(
                node = %id,
                ignored = ?unusable,
                "Ignoring keys without a duration string"
            );
        }

        let duration = DurationValue::parse(duration)
            .map_err(|e| TreeError::malformed(format!("record {}: {}", id, e)))?;

        Ok(CallNode {
            id,
            name: name.to_string(),
            duration,
            has_children,
        })
    }

    /// Parse an entry of the top-level listing
    pub fn parse_top_level(call: &TopLevelCall) -> Result<CallNode> {
        let id = NodeId::root(call.line_number);
        if call.name.is_empty() {
            return Err(TreeError::malformed(format!("root call {} has no name", id)));
        }
        let duration = DurationValue::parse(&call.duration)
            .map_err(|e| TreeError::malformed(format!("root call {}: {}", id, e)))?;

        Ok(CallNode {
            id,
            name: call.name.clone(),
            duration,
            has_children: call.has_child,
        })
    }

    /// Parse the subcalls of `parent`, skipping malformed records
    ///
    /// Each returned node keeps the index of its record among all siblings so
    /// ids stay resolvable by the backend.
    pub fn parse_children(parent: &NodeId, records: &[CallRecord]) -> Vec<CallNode> {
        records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                match Self::parse_record(record, parent.child(index)) {
                    Ok(node) => Some(node),
                    Err(e) => {
                        tracing::warn!("Skipping subcall {} of {}: {}", index, parent, e);
                        None
                    }
                }
            })
            .collect()
    }
}
