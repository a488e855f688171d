//! Ordered index of the distinct time keys in a table.

use crate::table::FlowTable;
use crate::types::TimeKey;

/// Sorted, deduplicated set of time keys extracted from one table.
///
/// An empty index signals an untimed table: the pipeline then builds a
/// single implicit frame with `time = None`. The index is a plain value
/// bound to the table it was built from — nothing is cached across tables,
/// so rebuild it whenever the table changes identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeIndex {
    keys: Vec<TimeKey>,
}

impl TimeIndex {
    /// Collect the distinct time keys of `table`, ascending.
    ///
    /// Returns an empty index when no time column is declared, or when the
    /// declared column has no timed records.
    pub fn build(table: &FlowTable, time_column: Option<&str>) -> Self {
        let Some(column) = time_column else {
            return Self::default();
        };
        let mut keys: Vec<TimeKey> = table.times().cloned().collect();
        keys.sort();
        keys.dedup();
        tracing::debug!(column, keys = keys.len(), "time index built");
        Self { keys }
    }

    /// The keys, ascending.
    pub fn keys(&self) -> &[TimeKey] {
        &self.keys
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True for an untimed table.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key at `index`.
    pub fn get(&self, index: usize) -> Option<&TimeKey> {
        self.keys.get(index)
    }

    /// Iterate over keys, ascending.
    pub fn iter(&self) -> std::slice::Iter<'_, TimeKey> {
        self.keys.iter()
    }
}
