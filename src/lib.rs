//! # flowvis-rs: flow-diagram data pipeline
//!
//! Turns tabular flow records (source, target, value, optional time key)
//! into the node/link frame sequences an interactive flow-diagram renderer
//! consumes — with stable node identity across frames, composable filters,
//! derived node/edge metrics, and histogram color normalization.
//!
//! ## Architecture
//!
//! - **Table**: validated, immutable record store ([`FlowTable`])
//! - **Pipeline**: time slicing, filtering, node identity, frame building
//! - **Metrics**: normalization, gradients, node/edge annotations
//! - **Payload**: the serializable `{static, timeseries?, config}` contract
//!
//! Rendering is an external collaborator: adapters consume the
//! [`RenderPayload`], the core never draws. Layout, styling, and UI chrome
//! live on the renderer side of that boundary.
//!
//! ## Example
//!
//! ```
//! use flowvis_rs::{DiagramBuilder, DiagramConfig, FlowTable, RawRow};
//!
//! let table = FlowTable::from_rows(&[
//!     RawRow::new("Solar", "Battery", 100.0),
//!     RawRow::new("Battery", "Grid", 80.0),
//! ])?;
//!
//! let builder = DiagramBuilder::new(table, DiagramConfig::default());
//! let payload = builder.build()?;
//! assert_eq!(payload.static_frame.node_count(), 3);
//! # Ok::<(), flowvis_rs::FlowError>(())
//! ```

pub mod error;
pub mod metrics;
pub mod payload;
pub mod pipeline;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use error::{FilterError, FlowError, Result};
pub use metrics::{normalize, ColorGradient, ColorScope, MetricEngine, Rgba};
pub use payload::{RenderConfig, RenderPayload};
pub use pipeline::{
    filter, DiagramBuilder, DiagramConfig, FilterPipeline, Frame, FrameBuilder, FrameMode, Link,
    Node, NodeId, NodeRegistry, TableFilter, TimeIndex,
};
pub use table::FlowTable;
pub use types::{FlowRecord, RawRow, RawValue, TimeKey};
