//! Frame construction — per-slice node/link aggregation.

use crate::error::Result;
use crate::pipeline::registry::{NodeId, NodeRegistry};
use crate::table::FlowTable;
use crate::types::TimeKey;
use serde::Serialize;

/// Whether a frame carries every registry node or only the present ones.
///
/// The choice is an explicit builder parameter: animation needs `Complete`
/// so renderer node positions don't jump between frames, while one-shot
/// diagrams can use `Sparse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    /// Every registry node appears; nodes absent from the slice carry zero
    /// flow.
    Complete,
    /// Only nodes with at least one record in the slice.
    Sparse,
}

/// One node of a frame, with its aggregated flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    /// Sum of values over records where this node is the target.
    pub inflow: f64,
    /// Sum of values over records where this node is the source.
    pub outflow: f64,
    /// `max(inflow, outflow)` — the node's rendered magnitude.
    pub total_flow: f64,
    /// Optional node-metric annotation (renderer sizing hint).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

/// One link of a frame.
///
/// Records are never pre-aggregated: duplicate (source, target) pairs yield
/// one link each, rendered as overlapping edges. Aggregation, when wanted,
/// is a filter's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
    pub value: f64,
    pub source_name: String,
    pub target_name: String,
    /// Histogram color, when coloring is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Optional edge-metric annotation (renderer width hint).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

/// The complete node/link graph for one time slice.
///
/// Nodes are ordered by id ascending — deterministic and stable across
/// frames for animation continuity. Links follow slice record order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeKey>,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Frame {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Sum of all link values.
    pub fn total_value(&self) -> f64 {
        self.links.iter().map(|l| l.value).sum()
    }

    /// The node named `name`, if present in this frame.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

/// Builds one frame from a filtered slice and a frozen registry.
#[derive(Debug, Clone, Copy)]
pub struct FrameBuilder {
    mode: FrameMode,
}

impl FrameBuilder {
    pub fn new(mode: FrameMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> FrameMode {
        self.mode
    }

    /// Build the frame for `slice`.
    ///
    /// Fails with `UnknownNode` when the slice names a node the registry has
    /// never seen — a stale registry reused against an incompatible table.
    pub fn build(
        &self,
        slice: &FlowTable,
        registry: &NodeRegistry,
        time: Option<TimeKey>,
    ) -> Result<Frame> {
        let n = registry.len();
        let mut inflow = vec![0.0f64; n];
        let mut outflow = vec![0.0f64; n];
        let mut present = vec![false; n];
        let mut links = Vec::with_capacity(slice.len());

        for record in slice.iter() {
            let source = registry.id_of(&record.source)?;
            let target = registry.id_of(&record.target)?;
            outflow[source.index()] += record.value;
            inflow[target.index()] += record.value;
            present[source.index()] = true;
            present[target.index()] = true;
            links.push(Link {
                source,
                target,
                value: record.value,
                source_name: record.source.clone(),
                target_name: record.target.clone(),
                color: None,
                width: None,
            });
        }

        let mut nodes = Vec::new();
        for (id, name) in registry.iter() {
            let idx = id.index();
            if self.mode == FrameMode::Sparse && !present[idx] {
                continue;
            }
            nodes.push(Node {
                id,
                name: name.to_string(),
                inflow: inflow[idx],
                outflow: outflow[idx],
                total_flow: inflow[idx].max(outflow[idx]),
                size: None,
            });
        }

        Ok(Frame { time, nodes, links })
    }
}
