//! Metric engine — attaches derived visual metrics to frames.

use crate::metrics::color::{min_max, normalize_value, ColorGradient, ColorScope};
use crate::pipeline::frame::Frame;
use crate::table::FlowTable;
use std::collections::HashMap;
use std::fmt;

/// Caller-supplied node metric: slice → node name → value.
pub type NodeMetricFn = Box<dyn Fn(&FlowTable) -> HashMap<String, f64> + Send + Sync>;

/// Caller-supplied edge metric: slice → (source, target) names → value.
pub type EdgeMetricFn = Box<dyn Fn(&FlowTable) -> HashMap<(String, String), f64> + Send + Sync>;

/// Computes derived node sizes, edge widths, and histogram edge colors.
///
/// Metric functions must be pure. Their results become optional annotations:
/// keys a function does not report stay unannotated — never defaulted to
/// zero — so renderers treat `size`/`width` as hints, not guarantees.
pub struct MetricEngine {
    node_metric: Option<NodeMetricFn>,
    edge_metric: Option<EdgeMetricFn>,
    gradient: ColorGradient,
    scope: ColorScope,
}

impl Default for MetricEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricEngine {
    pub fn new() -> Self {
        Self {
            node_metric: None,
            edge_metric: None,
            gradient: ColorGradient::heat(),
            scope: ColorScope::PerFrame,
        }
    }

    /// Set the function computing node sizes.
    pub fn set_node_metric<F>(&mut self, f: F)
    where
        F: Fn(&FlowTable) -> HashMap<String, f64> + Send + Sync + 'static,
    {
        self.node_metric = Some(Box::new(f));
    }

    pub fn clear_node_metric(&mut self) {
        self.node_metric = None;
    }

    /// Set the function computing edge widths.
    pub fn set_edge_metric<F>(&mut self, f: F)
    where
        F: Fn(&FlowTable) -> HashMap<(String, String), f64> + Send + Sync + 'static,
    {
        self.edge_metric = Some(Box::new(f));
    }

    pub fn clear_edge_metric(&mut self) {
        self.edge_metric = None;
    }

    /// Set the coloring gradient.
    pub fn set_gradient(&mut self, gradient: ColorGradient) {
        self.gradient = gradient;
    }

    /// Set the normalization scope for coloring.
    pub fn set_scope(&mut self, scope: ColorScope) {
        self.scope = scope;
    }

    pub fn scope(&self) -> ColorScope {
        self.scope
    }

    /// Attach node/edge metric annotations computed from `slice` onto
    /// `frame`. Unmatched keys are left unannotated.
    pub fn annotate(&self, frame: &mut Frame, slice: &FlowTable) {
        if let Some(metric) = &self.node_metric {
            let sizes = metric(slice);
            for node in &mut frame.nodes {
                if let Some(&v) = sizes.get(&node.name) {
                    node.size = Some(v);
                }
            }
        }
        if let Some(metric) = &self.edge_metric {
            let widths = metric(slice);
            for link in &mut frame.links {
                let key = (link.source_name.clone(), link.target_name.clone());
                if let Some(&v) = widths.get(&key) {
                    link.width = Some(v);
                }
            }
        }
    }

    /// Color every frame's links per the configured scope.
    ///
    /// `PerFrame` normalizes each frame against its own link values;
    /// `Global` takes one min/max across all frames passed in.
    pub fn colorize<'a, I>(&self, frames: I)
    where
        I: IntoIterator<Item = &'a mut Frame>,
    {
        let mut frames: Vec<&'a mut Frame> = frames.into_iter().collect();
        match self.scope {
            ColorScope::PerFrame => {
                for frame in frames.iter_mut() {
                    let values: Vec<f64> = frame.links.iter().map(|l| l.value).collect();
                    let colors = self.gradient.colors_for(&values);
                    for (link, color) in frame.links.iter_mut().zip(colors) {
                        link.color = Some(color);
                    }
                }
            }
            ColorScope::Global => {
                let values: Vec<f64> = frames
                    .iter()
                    .flat_map(|f| f.links.iter().map(|l| l.value))
                    .collect();
                let Some((min, max)) = min_max(&values) else {
                    return;
                };
                for frame in frames.iter_mut() {
                    for link in &mut frame.links {
                        let t = normalize_value(link.value, min, max);
                        link.color = Some(self.gradient.at(t).css());
                    }
                }
            }
        }
    }
}

impl fmt::Debug for MetricEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricEngine")
            .field("node_metric", &self.node_metric.is_some())
            .field("edge_metric", &self.edge_metric.is_some())
            .field("gradient", &self.gradient)
            .field("scope", &self.scope)
            .finish()
    }
}
