//! Validated in-memory store of flow records.
//!
//! A `FlowTable` is constructed once from raw rows — validating every row up
//! front, failing fast with no partial load — and is never mutated
//! afterwards. Slicing and filtering always produce new tables.

use crate::error::{FlowError, Result};
use crate::types::{FlowRecord, RawRow, TimeKey};

/// Ordered, read-only sequence of flow records.
///
/// Insertion order is preserved and significant: node ids are assigned in
/// first-seen record order, and ties between equal values resolve by
/// position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowTable {
    records: Vec<FlowRecord>,
}

impl FlowTable {
    /// Validate and load raw rows.
    ///
    /// Every row must carry `source`, `target`, and a value coercible to a
    /// non-negative number. The first invalid row fails the whole load with
    /// its index and offending field.
    pub fn from_rows(rows: &[RawRow]) -> Result<Self> {
        let mut records = Vec::with_capacity(rows.len());
        for (row, raw) in rows.iter().enumerate() {
            let source = raw
                .source
                .clone()
                .ok_or(FlowError::MissingField { row, field: "source" })?;
            let target = raw
                .target
                .clone()
                .ok_or(FlowError::MissingField { row, field: "target" })?;
            let cell = raw
                .value
                .as_ref()
                .ok_or(FlowError::MissingField { row, field: "value" })?;
            let value = cell.as_number().ok_or_else(|| FlowError::NonNumeric {
                row,
                field: "value",
                got: cell.to_string(),
            })?;
            if value < 0.0 {
                return Err(FlowError::NegativeValue { row, value });
            }
            records.push(FlowRecord {
                source,
                target,
                value,
                time: raw.time.clone(),
            });
        }
        tracing::debug!(rows = records.len(), "flow table loaded");
        Ok(Self { records })
    }

    /// Load already-typed records, still enforcing the value invariant.
    pub fn from_records(records: Vec<FlowRecord>) -> Result<Self> {
        for (row, record) in records.iter().enumerate() {
            if record.value.is_nan() {
                return Err(FlowError::NonNumeric {
                    row,
                    field: "value",
                    got: "NaN".to_string(),
                });
            }
            if record.value < 0.0 {
                return Err(FlowError::NegativeValue {
                    row,
                    value: record.value,
                });
            }
        }
        Ok(Self { records })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in insertion order.
    pub fn records(&self) -> &[FlowRecord] {
        &self.records
    }

    /// Iterate over records.
    pub fn iter(&self) -> std::slice::Iter<'_, FlowRecord> {
        self.records.iter()
    }

    // ── Column projections ──

    /// The source column.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.source.as_str())
    }

    /// The target column.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.target.as_str())
    }

    /// The value column.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.value)
    }

    /// The time column — only the records that carry a key.
    pub fn times(&self) -> impl Iterator<Item = &TimeKey> {
        self.records.iter().filter_map(|r| r.time.as_ref())
    }

    /// New table holding the records matching `predicate`. `self` is never
    /// mutated.
    pub fn slice(&self, predicate: impl Fn(&FlowRecord) -> bool) -> FlowTable {
        FlowTable {
            records: self
                .records
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }

    /// New table holding only the records at `time`.
    pub fn slice_at_time(&self, time: &TimeKey) -> FlowTable {
        self.slice(|r| r.time.as_ref() == Some(time))
    }
}

impl<'a> IntoIterator for &'a FlowTable {
    type Item = &'a FlowRecord;
    type IntoIter = std::slice::Iter<'a, FlowRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
