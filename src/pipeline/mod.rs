//! The flow transformation pipeline.
//!
//! Tabular records move through the pipeline in stages:
//!
//! ```text
//! raw rows ──► FlowTable ──► TimeIndex ──► slice ──► FilterPipeline ──► FrameBuilder ──► Frame
//!                                │                                           ▲
//!                                └── one slice per distinct time key         │
//!                                    (single implicit slice if untimed)   NodeRegistry
//! ```
//!
//! # Design
//!
//! - **Stable identity** — `NodeRegistry` assigns ids once, from the full
//!   unfiltered table, so a node keeps its id in every frame even when a
//!   slice omits it.
//! - **Immutable data** — tables are never mutated; filters and slices
//!   return new tables.
//! - **Explicit configuration** — `DiagramBuilder` captures a
//!   `DiagramConfig` at construction instead of carrying mutable session
//!   state; "current frame" selection belongs to the renderer.
//! - **Order independence** — time-series frames may be built concurrently,
//!   but the emitted sequence always follows the time index.

pub mod builder;
pub mod filter;
pub mod frame;
pub mod registry;
pub mod time_index;

pub use builder::{DiagramBuilder, DiagramConfig};
pub use filter::{FilterPipeline, TableFilter};
pub use frame::{Frame, FrameBuilder, FrameMode, Link, Node};
pub use registry::{NodeId, NodeRegistry};
pub use time_index::TimeIndex;
