//! Stable node identity.
//!
//! Ids are assigned once, in first-seen order over the full table — never
//! per-slice — so a node keeps its id across every frame of a session.
//! Filtering never introduces new names, which keeps a registry built on
//! the unfiltered table valid for every slice derived from it.

use crate::error::{FlowError, Result};
use crate::table::FlowTable;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Index of a node within a registry, stable for the registry's lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "NodeId(INVALID)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Name → id mapping, frozen after `build`.
///
/// A registry is bound to one table snapshot. Replacing the dataset (rather
/// than filtering it) changes the node vocabulary and requires a rebuild.
#[derive(Debug)]
pub struct NodeRegistry {
    /// NodeId → name (ids are direct indices).
    names: Vec<String>,
    /// Name → NodeId.
    ids: HashMap<String, NodeId>,
}

impl NodeRegistry {
    /// Scan every record's source and target exactly once, assigning ids in
    /// first-seen order. Deterministic for a given row order.
    pub fn build(table: &FlowTable) -> Self {
        let mut names = Vec::new();
        let mut ids = HashMap::new();
        for record in table.iter() {
            for name in [record.source.as_str(), record.target.as_str()] {
                if !ids.contains_key(name) {
                    let id = NodeId(names.len() as u32);
                    ids.insert(name.to_string(), id);
                    names.push(name.to_string());
                }
            }
        }
        tracing::debug!(nodes = names.len(), "node registry built");
        Self { names, ids }
    }

    /// Number of distinct nodes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The id assigned to `name`, or `UnknownNode` when the name was never
    /// seen in the table this registry was built from.
    pub fn id_of(&self, name: &str) -> Result<NodeId> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| FlowError::UnknownNode {
                name: name.to_string(),
            })
    }

    /// The id assigned to `name`, if any.
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.ids.get(name).copied()
    }

    /// Reverse lookup.
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Whether `name` has an id.
    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    /// Iterate over (id, name) pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (NodeId(i as u32), name.as_str()))
    }
}
