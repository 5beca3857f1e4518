//! Parsed call nodes and their path-like identifiers

use crate::duration::DurationValue;
use crate::error::TreeError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a call node
///
/// Root calls are identified by the backend line number; descendants append
/// their index among the parent's subcalls, e.g. `12/0/3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    line: u64,
    path: Vec<usize>,
}

impl NodeId {
    pub fn root(line: u64) -> Self {
        Self {
            line,
            path: Vec::new(),
        }
    }

    /// Id of the `index`-th subcall of this node
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.path.clone();
        path.push(index);
        Self {
            line: self.line,
            path,
        }
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Nesting level, 0 for root calls
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.path.split_last()?;
        Some(Self {
            line: self.line,
            path: rest.to_vec(),
        })
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.line)?;
        for index in &self.path {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

impl FromStr for NodeId {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        let line = parts
            .next()
            .and_then(|p| p.parse::<u64>().ok())
            .ok_or_else(|| TreeError::InvalidNodeId(s.to_string()))?;
        let path = parts
            .map(|p| p.parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| TreeError::InvalidNodeId(s.to_string()))?;
        Ok(Self { line, path })
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A parsed call: name, duration, and whether subcalls exist
#[derive(Debug, Clone, PartialEq)]
pub struct CallNode {
    pub id: NodeId,
    pub name: String,
    pub duration: DurationValue,
    pub has_children: bool,
}
