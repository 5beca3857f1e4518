//! Duration threshold filtering for call nodes
//!
//! Two independent cutoffs:
//! - root threshold: applies to top-level calls only
//! - nested threshold: applies to every descendant at any depth
//!
//! A node passes when its magnitude is strictly greater than the cutoff. A
//! failing node is dropped from the visible sequence together with its whole
//! subtree; the underlying data is never touched.

use crate::duration::DurationValue;
use crate::node::CallNode;

/// Pure presentation filter deciding which calls are displayed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdFilter {
    root: f64,
    nested: f64,
}

impl ThresholdFilter {
    pub fn new(root: f64, nested: f64) -> Self {
        Self { root, nested }
    }

    /// A filter that shows every call with a positive duration
    pub fn all() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn root_threshold(&self) -> f64 {
        self.root
    }

    pub fn nested_threshold(&self) -> f64 {
        self.nested
    }

    /// Check whether a top-level call should be displayed
    pub fn admits_root(&self, node: &CallNode) -> bool {
        is_visible(&node.duration, self.root)
    }

    /// Check whether a descendant call should be displayed
    pub fn admits_nested(&self, node: &CallNode) -> bool {
        is_visible(&node.duration, self.nested)
    }

    /// Apply the cutoff matching the nodes' depth, preserving order
    pub fn retain(&self, nodes: Vec<CallNode>) -> Vec<CallNode> {
        nodes
            .into_iter()
            .filter(|node| {
                if node.id.is_root() {
                    self.admits_root(node)
                } else {
                    self.admits_nested(node)
                }
            })
            .collect()
    }
}

impl Default for ThresholdFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// `magnitude(duration) > cutoff`, strictly
pub fn is_visible(duration: &DurationValue, cutoff: f64) -> bool {
    duration.magnitude() > cutoff
}
