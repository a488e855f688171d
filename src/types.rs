//! Core value types shared across the flow pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A key identifying one time slice of a table.
///
/// Keys are totally ordered so a table's distinct keys can be sorted into a
/// time index. The two numeric variants compare numerically with each other
/// (floats via `f64::total_cmp`); mixed non-numeric kinds order by kind
/// (numbers, then text, then timestamps). A table normally carries one kind
/// throughout.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TimeKey {
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl TimeKey {
    fn kind_rank(&self) -> u8 {
        match self {
            TimeKey::Int(_) | TimeKey::Float(_) => 0,
            TimeKey::Text(_) => 1,
            TimeKey::Timestamp(_) => 2,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            TimeKey::Int(v) => Some(*v as f64),
            TimeKey::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl Ord for TimeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
            return a.total_cmp(&b);
        }
        match self.kind_rank().cmp(&other.kind_rank()) {
            Ordering::Equal => match (self, other) {
                (TimeKey::Text(a), TimeKey::Text(b)) => a.cmp(b),
                (TimeKey::Timestamp(a), TimeKey::Timestamp(b)) => a.cmp(b),
                _ => unreachable!("equal kind rank implies equal kind"),
            },
            unequal => unequal,
        }
    }
}

impl PartialOrd for TimeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TimeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimeKey {}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeKey::Int(v) => write!(f, "{}", v),
            TimeKey::Float(v) => write!(f, "{}", v),
            TimeKey::Text(v) => f.write_str(v),
            TimeKey::Timestamp(v) => f.write_str(&v.to_rfc3339()),
        }
    }
}

impl From<i64> for TimeKey {
    fn from(v: i64) -> Self {
        TimeKey::Int(v)
    }
}

impl From<i32> for TimeKey {
    fn from(v: i32) -> Self {
        TimeKey::Int(v as i64)
    }
}

impl From<f64> for TimeKey {
    fn from(v: f64) -> Self {
        TimeKey::Float(v)
    }
}

impl From<&str> for TimeKey {
    fn from(v: &str) -> Self {
        TimeKey::Text(v.to_string())
    }
}

impl From<String> for TimeKey {
    fn from(v: String) -> Self {
        TimeKey::Text(v)
    }
}

impl From<DateTime<Utc>> for TimeKey {
    fn from(v: DateTime<Utc>) -> Self {
        TimeKey::Timestamp(v)
    }
}

/// A raw cell value prior to validation.
///
/// Mirrors the loosely typed tabular sources flow data arrives from: a value
/// column may hold numbers or numeric text. `FlowTable::from_rows` coerces
/// and rejects what doesn't coerce.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Coerce to a number. Text is parsed; NaN never coerces.
    pub fn as_number(&self) -> Option<f64> {
        let v = match self {
            RawValue::Number(v) => *v,
            RawValue::Text(s) => s.trim().parse().ok()?,
        };
        (!v.is_nan()).then_some(v)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(v) => write!(f, "{}", v),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Number(v as f64)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

/// One unvalidated input row.
///
/// Fields may be absent; validation reports the offending row index and
/// field instead of loading partially.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub source: Option<String>,
    pub target: Option<String>,
    pub value: Option<RawValue>,
    pub time: Option<TimeKey>,
}

impl RawRow {
    /// A row with the three required fields set.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        value: impl Into<RawValue>,
    ) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
            value: Some(value.into()),
            time: None,
        }
    }

    /// Set the time key.
    pub fn with_time(mut self, time: impl Into<TimeKey>) -> Self {
        self.time = Some(time.into());
        self
    }
}

/// One source→target transfer of a quantity at an optional point in time.
///
/// Immutable once loaded. `source == target` is allowed — self-loops are the
/// renderer's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRecord {
    pub source: String,
    pub target: String,
    pub value: f64,
    pub time: Option<TimeKey>,
}

impl FlowRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value,
            time: None,
        }
    }

    /// Set the time key.
    pub fn with_time(mut self, time: impl Into<TimeKey>) -> Self {
        self.time = Some(time.into());
        self
    }
}
