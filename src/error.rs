//! Error handling for the flow pipeline
//!
//! This module defines the error type and a Result alias used throughout
//! the crate. All errors surface synchronously to the caller of the
//! operation that triggered them — the pipeline performs no retries and no
//! partial recovery.

use thiserror::Error;

/// Boxed error payload reported by a failing filter.
pub type FilterError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for flow pipeline operations
#[derive(Error, Debug)]
pub enum FlowError {
    /// An input row missing a required field. Fails the whole load — no
    /// partial table is ever produced.
    #[error("row {row}: missing required field `{field}`")]
    MissingField { row: usize, field: &'static str },

    /// An input value that cannot be coerced to a number.
    #[error("row {row}: field `{field}` is not numeric (got `{got}`)")]
    NonNumeric {
        row: usize,
        field: &'static str,
        got: String,
    },

    /// A negative flow value.
    #[error("row {row}: negative flow value {value}")]
    NegativeValue { row: usize, value: f64 },

    /// A node name the registry has never seen. The registry was built from
    /// a different table snapshot and must be rebuilt.
    #[error("unknown node `{name}`: registry does not match this table")]
    UnknownNode { name: String },

    /// A registered filter raised. The filter's name identifies the culprit;
    /// the underlying cause is preserved.
    #[error("filter `{name}` failed: {source}")]
    Filter {
        name: String,
        #[source]
        source: FilterError,
    },
}

/// Result type alias for flow pipeline operations
pub type Result<T> = std::result::Result<T, FlowError>;
