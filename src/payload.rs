//! The serializable output contract handed to renderer adapters.
//!
//! A `RenderPayload` is the sole boundary renderers depend on: one
//! aggregate frame, the optional per-time-key sequence, and the static
//! configuration. JSON is the wire default, not a mandate — any serde
//! format works.

use crate::pipeline::frame::Frame;
use serde::Serialize;

/// Static configuration the renderer receives alongside the frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderConfig {
    pub source_col: String,
    pub target_col: String,
    pub value_col: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_col: Option<String>,
    pub show_histogram: bool,
    /// Already downgraded to `false` for untimed tables.
    pub show_timeline: bool,
}

/// Everything a renderer adapter consumes for one diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPayload {
    /// The whole (filtered) table aggregated into one frame.
    #[serde(rename = "static")]
    pub static_frame: Frame,
    /// One frame per distinct time key, ascending. Absent for untimed
    /// tables or when the timeline is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeseries: Option<Vec<Frame>>,
    pub config: RenderConfig,
}

impl RenderPayload {
    /// Serialize to the JSON wire default.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Pretty-printed JSON, for embedding in generated documents.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
