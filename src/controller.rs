//! Lazy expansion of the call tree
//!
//! Per node state machine:
//!
//! ```text
//! Unmaterialized --expand--> Loading --fetch ok--> Expanded <--> Collapsed
//!        ^                      |
//!        +------fetch failed----+
//! ```
//!
//! Nodes live in an arena; each keeps the indices of its visible children in
//! provider order. Collapsing only hides a subtree, so re-expanding never
//! fetches again. Expanding a node never expands its children.
//!
//! Fetching is split in two steps so the caller owns the suspension point:
//! [`ExpansionController::expand`] hands out a [`FetchTicket`] and
//! [`ExpansionController::complete_fetch`] splices the response in. Tickets
//! from an older session are rejected as stale.

use crate::context::{SessionToken, ViewContext};
use crate::duration::DurationValue;
use crate::error::{Result, TreeError};
use crate::node::{CallNode, NodeId};
use crate::parser::CallTreeParser;
use crate::percentage::{share_of, PercentShare};
use crate::record::{SubcallsResponse, TopLevelCall};
use crate::severity::{classify, BucketSet, Severity};
use crate::view::{ViewUpdate, VisibleRow};
use std::collections::HashMap;
use std::fmt;

/// Expansion state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionState {
    /// Collapsed, children never fetched
    Unmaterialized,
    /// Fetch in flight
    Loading,
    /// Children materialized and shown
    Expanded,
    /// Children materialized but hidden
    Collapsed,
}

/// Permission to fetch the children of one node, bound to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: NodeId,
    pub token: SessionToken,
}

/// Result of an expand request
#[derive(Debug, Clone, PartialEq)]
pub enum ExpandOutcome {
    /// Children must be fetched, then passed to `complete_fetch`
    Fetch(FetchTicket),
    /// Already materialized subtree shown again
    Shown(ViewUpdate),
    /// A fetch for this node is already in flight
    AlreadyPending,
    /// Node is already expanded
    AlreadyExpanded,
}

impl ExpandOutcome {
    /// Update to forward to the view, if any
    pub fn update(&self) -> Option<ViewUpdate> {
        match self {
            ExpandOutcome::Fetch(ticket) => Some(ViewUpdate::Loading {
                id: ticket.id.clone(),
            }),
            ExpandOutcome::Shown(update) => Some(update.clone()),
            ExpandOutcome::AlreadyPending | ExpandOutcome::AlreadyExpanded => None,
        }
    }
}

#[derive(Debug)]
struct Slot {
    node: CallNode,
    severity: Severity,
    percent: Option<PercentShare>,
    /// Duration of the root call this node descends from
    reference: DurationValue,
    children: Vec<usize>,
    state: ExpansionState,
}

/// Owns the materialized tree and every node's expansion state
pub struct ExpansionController {
    context: ViewContext,
    slots: Vec<Slot>,
    roots: Vec<usize>,
    index: HashMap<NodeId, usize>,
}

impl fmt::Debug for ExpansionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpansionController")
            .field("context", &self.context)
            .field("nodes", &self.slots.len())
            .field("roots", &self.roots.len())
            .finish()
    }
}

impl ExpansionController {
    pub fn new(context: ViewContext) -> Self {
        Self {
            context,
            slots: Vec::new(),
            roots: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn context(&self) -> &ViewContext {
        &self.context
    }

    /// Replace the view with the top-level calls of a newly opened file
    ///
    /// Malformed entries are skipped. Calls at or below the root threshold
    /// are omitted together with their subtrees.
    pub fn open_file(&mut self, path: &str, calls: &[TopLevelCall]) -> ViewUpdate {
        let token = self.reset(Some(path.to_string()));
        tracing::debug!("Opened {} ({}), {} top-level calls", path, token, calls.len());

        for call in calls {
            let node = match CallTreeParser::parse_top_level(call) {
                Ok(node) => node,
                Err(e) => {
                    tracing::warn!("Skipping top-level call at line {}: {}", call.line_number, e);
                    continue;
                }
            };
            if !self.context.filter().admits_root(&node) {
                continue;
            }
            if self.index.contains_key(&node.id) {
                tracing::warn!("Duplicate top-level line {}, keeping the first", node.id);
                continue;
            }
            let reference = node.duration.clone();
            let slot = self.push_slot(node, reference, None);
            self.roots.push(slot);
        }

        ViewUpdate::Reset {
            rows: self.visible_rows(),
        }
    }

    /// Drop every node and start a new, empty session
    pub fn clear(&mut self) -> ViewUpdate {
        self.reset(None);
        ViewUpdate::Reset { rows: Vec::new() }
    }

    fn reset(&mut self, file: Option<String>) -> SessionToken {
        self.slots.clear();
        self.roots.clear();
        self.index.clear();
        self.context.begin(file)
    }

    fn push_slot(
        &mut self,
        node: CallNode,
        reference: DurationValue,
        percent: Option<PercentShare>,
    ) -> usize {
        let slot = self.slots.len();
        self.index.insert(node.id.clone(), slot);
        self.slots.push(Slot {
            severity: classify(node.duration.magnitude(), BucketSet::Duration),
            node,
            percent,
            reference,
            children: Vec::new(),
            state: ExpansionState::Unmaterialized,
        });
        slot
    }

    fn slot_of(&self, id: &NodeId) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| TreeError::UnknownNode { id: id.to_string() })
    }

    /// Request expansion of a node
    pub fn expand(&mut self, id: &NodeId) -> Result<ExpandOutcome> {
        let slot = self.slot_of(id)?;
        if !self.slots[slot].node.has_children {
            return Err(TreeError::NoChildren { id: id.to_string() });
        }

        match self.slots[slot].state {
            ExpansionState::Unmaterialized => {
                self.slots[slot].state = ExpansionState::Loading;
                tracing::debug!("Fetching subcalls of {}", id);
                Ok(ExpandOutcome::Fetch(FetchTicket {
                    id: id.clone(),
                    token: self.context.token(),
                }))
            }
            ExpansionState::Loading => Ok(ExpandOutcome::AlreadyPending),
            ExpansionState::Expanded => Ok(ExpandOutcome::AlreadyExpanded),
            ExpansionState::Collapsed => {
                self.slots[slot].state = ExpansionState::Expanded;
                let mut rows = Vec::new();
                self.collect_visible(slot, &mut rows);
                Ok(ExpandOutcome::Shown(ViewUpdate::Shown {
                    after: id.clone(),
                    rows,
                }))
            }
        }
    }

    /// Splice the outcome of a fetch into the tree
    ///
    /// On success the visible children are inserted right after the node. On
    /// failure the node returns to `Unmaterialized` and the error is returned
    /// as [`TreeError::FetchFailure`]. Tickets from another session, or for a
    /// node that is no longer loading, yield [`TreeError::StaleResponse`].
    pub fn complete_fetch<E: fmt::Display>(
        &mut self,
        ticket: &FetchTicket,
        response: std::result::Result<SubcallsResponse, E>,
    ) -> Result<ViewUpdate> {
        let stale = || TreeError::StaleResponse {
            id: ticket.id.to_string(),
        };
        if !self.context.is_current(ticket.token) {
            tracing::debug!("Discarding response for {} from {}", ticket.id, ticket.token);
            return Err(stale());
        }
        let slot = self.slot_of(&ticket.id).map_err(|_| stale())?;
        if self.slots[slot].state != ExpansionState::Loading {
            return Err(stale());
        }

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                self.slots[slot].state = ExpansionState::Unmaterialized;
                tracing::warn!("Fetching subcalls of {} failed: {}", ticket.id, e);
                return Err(TreeError::FetchFailure {
                    id: ticket.id.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let reference = self.slots[slot].reference.clone();
        let children = CallTreeParser::parse_children(&ticket.id, &response.subcalls);
        let visible = self.context.filter().retain(children);
        tracing::debug!(
            "Materialized {} of {} subcalls under {}",
            visible.len(),
            response.subcalls.len(),
            ticket.id
        );

        let mut child_slots = Vec::with_capacity(visible.len());
        for child in visible {
            let percent = share_of(&child.duration, &reference);
            child_slots.push(self.push_slot(child, reference.clone(), percent));
        }
        self.slots[slot].children = child_slots;
        self.slots[slot].state = ExpansionState::Expanded;

        let rows = self.slots[slot]
            .children
            .iter()
            .map(|&child| self.row(child))
            .collect();
        Ok(ViewUpdate::Inserted {
            after: ticket.id.clone(),
            rows,
        })
    }

    /// Hide the materialized subtree of an expanded node
    ///
    /// Returns `None` when the node is not expanded; an in-flight fetch is
    /// not cancelled.
    pub fn collapse(&mut self, id: &NodeId) -> Result<Option<ViewUpdate>> {
        let slot = self.slot_of(id)?;
        if self.slots[slot].state != ExpansionState::Expanded {
            return Ok(None);
        }

        let mut hidden = Vec::new();
        self.collect_visible(slot, &mut hidden);
        self.slots[slot].state = ExpansionState::Collapsed;
        Ok(Some(ViewUpdate::Hidden {
            parent: id.clone(),
            ids: hidden.into_iter().map(|row| row.id).collect(),
        }))
    }

    pub fn state(&self, id: &NodeId) -> Option<ExpansionState> {
        self.index.get(id).map(|&slot| self.slots[slot].state)
    }

    pub fn node(&self, id: &NodeId) -> Option<&CallNode> {
        self.index.get(id).map(|&slot| &self.slots[slot].node)
    }

    /// Number of nodes materialized so far, visible or not
    pub fn materialized_count(&self) -> usize {
        self.slots.len()
    }

    /// Ids of nodes with a fetch in flight
    pub fn pending(&self) -> Vec<NodeId> {
        self.slots
            .iter()
            .filter(|s| s.state == ExpansionState::Loading)
            .map(|s| s.node.id.clone())
            .collect()
    }

    /// Current visible sequence, depth-first in provider order
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        for &root in &self.roots {
            rows.push(self.row(root));
            self.collect_visible(root, &mut rows);
        }
        rows
    }

    fn collect_visible(&self, slot: usize, out: &mut Vec<VisibleRow>) {
        if self.slots[slot].state != ExpansionState::Expanded {
            return;
        }
        for &child in &self.slots[slot].children {
            out.push(self.row(child));
            self.collect_visible(child, out);
        }
    }

    fn row(&self, slot: usize) -> VisibleRow {
        let s = &self.slots[slot];
        VisibleRow {
            id: s.node.id.clone(),
            name: s.node.name.clone(),
            duration: s.node.duration.as_str().to_string(),
            severity: s.severity,
            percent: s.percent,
            has_children: s.node.has_children,
            expanded: matches!(s.state, ExpansionState::Expanded | ExpansionState::Loading),
            depth: s.node.id.depth(),
        }
    }
}
