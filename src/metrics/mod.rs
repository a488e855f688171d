//! Derived visual metrics.
//!
//! Value normalization and gradient coloring for histogram-style edges,
//! plus caller-supplied node/edge metric callbacks attached to frames as
//! optional annotations.

pub mod color;
pub mod engine;

pub use color::{min_max, normalize, normalize_value, ColorGradient, ColorScope, Rgba};
pub use engine::{EdgeMetricFn, MetricEngine, NodeMetricFn};
