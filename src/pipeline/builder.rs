//! Diagram builder — the orchestrator producing the renderer payload.
//!
//! Configuration is an explicit value captured at construction; the builder
//! carries no mutable session state ("current frame" selection belongs to
//! the renderer). Each `build` call runs the full transform: registry from
//! the unfiltered table, time index, filtered slices, frames, metric
//! annotations, colors.
//!
//! Time-series frames are independent of each other once the registry is
//! frozen, so they can fan out to a worker pool; the emitted sequence always
//! follows time-index order regardless of completion order.

use crate::error::Result;
use crate::metrics::MetricEngine;
use crate::payload::{RenderConfig, RenderPayload};
use crate::pipeline::filter::{FilterPipeline, TableFilter};
use crate::pipeline::frame::{Frame, FrameBuilder, FrameMode};
use crate::pipeline::registry::NodeRegistry;
use crate::pipeline::time_index::TimeIndex;
use crate::table::FlowTable;
use crate::types::TimeKey;
use std::collections::HashMap;

/// Immutable build configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramConfig {
    /// Column names, reported to the renderer in the payload config.
    pub source_col: String,
    pub target_col: String,
    pub value_col: String,
    /// Declared time column; `None` means the table is untimed.
    pub time_col: Option<String>,
    /// Enable histogram-style edge coloring.
    pub show_histogram: bool,
    /// Emit one frame per time key (ignored for untimed tables).
    pub show_timeline: bool,
    /// Complete or sparse frames.
    pub frame_mode: FrameMode,
    /// Build time-series frames on a worker pool.
    pub parallel: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            source_col: "source".to_string(),
            target_col: "target".to_string(),
            value_col: "value".to_string(),
            time_col: None,
            show_histogram: false,
            show_timeline: true,
            frame_mode: FrameMode::Complete,
            parallel: false,
        }
    }
}

impl DiagramConfig {
    /// Config for a table timed by `column`.
    pub fn timed(column: impl Into<String>) -> Self {
        Self {
            time_col: Some(column.into()),
            ..Self::default()
        }
    }
}

/// Owns one table and the pipeline pieces, and produces `RenderPayload`s.
pub struct DiagramBuilder {
    table: FlowTable,
    config: DiagramConfig,
    filters: FilterPipeline,
    metrics: MetricEngine,
}

impl DiagramBuilder {
    pub fn new(table: FlowTable, config: DiagramConfig) -> Self {
        Self {
            table,
            config,
            filters: FilterPipeline::new(),
            metrics: MetricEngine::new(),
        }
    }

    // ── Caller-facing configuration surface ──

    /// Register a filter (replacing a same-named one).
    pub fn add_filter<F: TableFilter + 'static>(&mut self, name: impl Into<String>, filter: F) {
        self.filters.register(name, filter);
    }

    /// Remove a filter. Affects the next `build` only.
    pub fn remove_filter(&mut self, name: &str) -> bool {
        self.filters.remove(name)
    }

    /// Set the node metric function.
    pub fn set_node_metric<F>(&mut self, f: F)
    where
        F: Fn(&FlowTable) -> HashMap<String, f64> + Send + Sync + 'static,
    {
        self.metrics.set_node_metric(f);
    }

    /// Set the edge metric function.
    pub fn set_edge_metric<F>(&mut self, f: F)
    where
        F: Fn(&FlowTable) -> HashMap<(String, String), f64> + Send + Sync + 'static,
    {
        self.metrics.set_edge_metric(f);
    }

    pub fn filters_mut(&mut self) -> &mut FilterPipeline {
        &mut self.filters
    }

    pub fn metrics_mut(&mut self) -> &mut MetricEngine {
        &mut self.metrics
    }

    pub fn table(&self) -> &FlowTable {
        &self.table
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    // ── Build ──

    /// Run the full transform and assemble the renderer payload.
    pub fn build(&self) -> Result<RenderPayload> {
        let registry = NodeRegistry::build(&self.table);
        let index = TimeIndex::build(&self.table, self.config.time_col.as_deref());
        let frame_builder = FrameBuilder::new(self.config.frame_mode);

        let timeline = self.config.show_timeline && !index.is_empty();
        if self.config.show_timeline && self.config.time_col.is_some() && index.is_empty() {
            tracing::warn!("time column declared but no record carries a time; timeline disabled");
        }

        let mut static_frame = self.build_slice_frame(&frame_builder, &registry, None)?;
        let mut series = if timeline {
            self.build_timeseries(&frame_builder, &registry, &index)?
        } else {
            Vec::new()
        };

        if self.config.show_histogram {
            self.metrics
                .colorize(std::iter::once(&mut static_frame).chain(series.iter_mut()));
        }

        tracing::info!(
            nodes = registry.len(),
            frames = 1 + series.len(),
            timeline,
            "diagram payload built"
        );

        Ok(RenderPayload {
            static_frame,
            timeseries: timeline.then_some(series),
            config: RenderConfig {
                source_col: self.config.source_col.clone(),
                target_col: self.config.target_col.clone(),
                value_col: self.config.value_col.clone(),
                time_col: self.config.time_col.clone(),
                show_histogram: self.config.show_histogram,
                show_timeline: timeline,
            },
        })
    }

    /// Slice (whole table when `time` is None), filter, build, annotate.
    fn build_slice_frame(
        &self,
        frame_builder: &FrameBuilder,
        registry: &NodeRegistry,
        time: Option<&TimeKey>,
    ) -> Result<Frame> {
        let slice = match time {
            Some(key) => self.table.slice_at_time(key),
            None => self.table.clone(),
        };
        let slice = self.filters.apply(&slice)?;
        let mut frame = frame_builder.build(&slice, registry, time.cloned())?;
        self.metrics.annotate(&mut frame, &slice);
        Ok(frame)
    }

    fn build_timeseries(
        &self,
        frame_builder: &FrameBuilder,
        registry: &NodeRegistry,
        index: &TimeIndex,
    ) -> Result<Vec<Frame>> {
        if !self.config.parallel || index.len() < 2 {
            return index
                .iter()
                .map(|key| self.build_slice_frame(frame_builder, registry, Some(key)))
                .collect();
        }
        self.build_timeseries_parallel(frame_builder, registry, index)
    }

    /// Fan the per-key frame builds out to a worker pool, then reassemble in
    /// index order. A failed slice aborts the build; the lowest-index
    /// failure is reported, deterministically.
    fn build_timeseries_parallel(
        &self,
        frame_builder: &FrameBuilder,
        registry: &NodeRegistry,
        index: &TimeIndex,
    ) -> Result<Vec<Frame>> {
        let jobs = index.len();
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(jobs);
        tracing::debug!(jobs, workers, "building time series on worker pool");

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<usize>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, Result<Frame>)>();
        for i in 0..jobs {
            let _ = job_tx.send(i);
        }
        drop(job_tx);

        let mut collected: Vec<(usize, Result<Frame>)> = Vec::with_capacity(jobs);
        std::thread::scope(|s| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                s.spawn(move || {
                    while let Ok(i) = job_rx.recv() {
                        let frame =
                            self.build_slice_frame(frame_builder, registry, index.get(i));
                        let _ = result_tx.send((i, frame));
                    }
                });
            }
            drop(result_tx);
            collected.extend(result_rx.iter());
        });

        collected.sort_by_key(|&(i, _)| i);
        collected.into_iter().map(|(_, frame)| frame).collect()
    }
}

impl std::fmt::Debug for DiagramBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramBuilder")
            .field("rows", &self.table.len())
            .field("config", &self.config)
            .field("filters", &self.filters)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use crate::pipeline::filter::keep;
    use crate::types::RawRow;

    fn timed_rows() -> Vec<RawRow> {
        vec![
            RawRow::new("Solar", "Battery", 100.0).with_time(1),
            RawRow::new("Wind", "Battery", 80.0).with_time(1),
            RawRow::new("Battery", "Grid", 150.0).with_time(2),
            RawRow::new("Wind", "Grid", 40.0).with_time(2),
        ]
    }

    fn timed_builder() -> DiagramBuilder {
        let table = FlowTable::from_rows(&timed_rows()).unwrap();
        DiagramBuilder::new(table, DiagramConfig::timed("date"))
    }

    #[test]
    fn test_untimed_payload_has_no_timeseries() {
        let table = FlowTable::from_rows(&[RawRow::new("A", "B", 1.0)]).unwrap();
        let builder = DiagramBuilder::new(table, DiagramConfig::default());
        let payload = builder.build().unwrap();

        assert!(payload.timeseries.is_none());
        assert!(!payload.config.show_timeline);
        assert_eq!(payload.static_frame.node_count(), 2);
    }

    #[test]
    fn test_timed_payload_frames_follow_index_order() {
        let payload = timed_builder().build().unwrap();
        let series = payload.timeseries.unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].time, Some(TimeKey::Int(1)));
        assert_eq!(series[1].time, Some(TimeKey::Int(2)));
        assert!(payload.config.show_timeline);
    }

    #[test]
    fn test_static_frame_aggregates_whole_table() {
        let payload = timed_builder().build().unwrap();
        let battery = payload.static_frame.node("Battery").unwrap();
        assert_eq!(battery.inflow, 180.0);
        assert_eq!(battery.outflow, 150.0);
        assert_eq!(battery.total_flow, 180.0);
    }

    #[test]
    fn test_complete_frames_keep_node_ids_stable() {
        let payload = timed_builder().build().unwrap();
        let series = payload.timeseries.unwrap();

        // Solar flows only at t=1 but keeps its id (and zero flow) at t=2.
        let solar_t1 = series[0].node("Solar").unwrap();
        let solar_t2 = series[1].node("Solar").unwrap();
        assert_eq!(solar_t1.id, solar_t2.id);
        assert_eq!(solar_t2.total_flow, 0.0);
    }

    #[test]
    fn test_filters_see_every_slice() {
        let mut builder = timed_builder();
        builder.add_filter("wind_only", keep(|r| r.source == "Wind"));
        let payload = builder.build().unwrap();

        assert_eq!(payload.static_frame.link_count(), 2);
        let series = payload.timeseries.unwrap();
        assert_eq!(series[0].link_count(), 1);
        assert_eq!(series[1].link_count(), 1);
    }

    #[test]
    fn test_filter_failure_aborts_build() {
        let mut builder = timed_builder();
        builder.add_filter(
            "explode",
            |_: &FlowTable| -> std::result::Result<FlowTable, crate::error::FilterError> {
                Err("boom".into())
            },
        );
        assert!(matches!(
            builder.build(),
            Err(FlowError::Filter { name, .. }) if name == "explode"
        ));
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let sequential = timed_builder().build().unwrap();

        let table = FlowTable::from_rows(&timed_rows()).unwrap();
        let config = DiagramConfig {
            parallel: true,
            ..DiagramConfig::timed("date")
        };
        let parallel = DiagramBuilder::new(table, config).build().unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_histogram_colors_applied_when_enabled() {
        let table = FlowTable::from_rows(&timed_rows()).unwrap();
        let config = DiagramConfig {
            show_histogram: true,
            ..DiagramConfig::timed("date")
        };
        let payload = DiagramBuilder::new(table, config).build().unwrap();

        assert!(payload
            .static_frame
            .links
            .iter()
            .all(|l| l.color.is_some()));
    }

    #[test]
    fn test_timeline_disabled_by_config() {
        let table = FlowTable::from_rows(&timed_rows()).unwrap();
        let config = DiagramConfig {
            show_timeline: false,
            ..DiagramConfig::timed("date")
        };
        let payload = DiagramBuilder::new(table, config).build().unwrap();
        assert!(payload.timeseries.is_none());
    }
}
