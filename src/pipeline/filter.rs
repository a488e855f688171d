//! Ordered, named, composable table transforms.
//!
//! Each `apply` call folds the currently registered filters left to right
//! over the original input — the pipeline never re-runs transforms on its
//! own output, so removing or rebinding a filter affects the next `apply`
//! only. Registration order is significant and preserved.

use crate::error::{FilterError, FlowError, Result};
use crate::table::FlowTable;
use crate::types::FlowRecord;

/// A named transform over a table.
///
/// Implementations must be pure: no observable side effect on the input,
/// and no node names in the output that the input did not contain —
/// downstream node identity is keyed on pre-filter names.
pub trait TableFilter: Send + Sync {
    fn apply(&self, table: &FlowTable) -> std::result::Result<FlowTable, FilterError>;
}

impl<F> TableFilter for F
where
    F: Fn(&FlowTable) -> std::result::Result<FlowTable, FilterError> + Send + Sync,
{
    fn apply(&self, table: &FlowTable) -> std::result::Result<FlowTable, FilterError> {
        self(table)
    }
}

/// Filter keeping only the rows matching `predicate`.
pub fn keep<P>(predicate: P) -> impl TableFilter
where
    P: Fn(&FlowRecord) -> bool + Send + Sync,
{
    move |table: &FlowTable| -> std::result::Result<FlowTable, FilterError> {
        Ok(table.slice(&predicate))
    }
}

/// Filter from an infallible whole-table transform.
pub fn from_fn<F>(f: F) -> impl TableFilter
where
    F: Fn(&FlowTable) -> FlowTable + Send + Sync,
{
    move |table: &FlowTable| -> std::result::Result<FlowTable, FilterError> { Ok(f(table)) }
}

struct NamedFilter {
    name: String,
    filter: Box<dyn TableFilter>,
}

/// Ordered collection of named filters.
#[derive(Default)]
pub struct FilterPipeline {
    filters: Vec<NamedFilter>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a filter under `name`.
    ///
    /// Re-registering an existing name replaces the filter in place — last
    /// write wins, the original position is kept. Dashboards rebind filters
    /// interactively, so this is a replace, not an error.
    pub fn register<F: TableFilter + 'static>(&mut self, name: impl Into<String>, filter: F) {
        let name = name.into();
        let boxed: Box<dyn TableFilter> = Box::new(filter);
        if let Some(existing) = self.filters.iter_mut().find(|f| f.name == name) {
            tracing::debug!(name = %existing.name, "filter replaced");
            existing.filter = boxed;
        } else {
            self.filters.push(NamedFilter { name, filter: boxed });
        }
    }

    /// Remove the filter named `name`. Returns whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.filters.len();
        self.filters.retain(|f| f.name != name);
        self.filters.len() != before
    }

    /// Whether a filter named `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.filters.iter().any(|f| f.name == name)
    }

    /// Registered names, in application order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|f| f.name.as_str())
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Fold every registered filter left to right over `table`.
    ///
    /// A failing filter aborts the fold; its name is attached to the error.
    pub fn apply(&self, table: &FlowTable) -> Result<FlowTable> {
        let mut current = table.clone();
        for f in &self.filters {
            current = f.filter.apply(&current).map_err(|source| FlowError::Filter {
                name: f.name.clone(),
                source,
            })?;
        }
        Ok(current)
    }
}

impl std::fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawRow;

    fn table() -> FlowTable {
        FlowTable::from_rows(&[
            RawRow::new("A", "B", 10.0),
            RawRow::new("B", "C", 20.0),
            RawRow::new("C", "D", 30.0),
        ])
        .unwrap()
    }

    fn doubled(table: &FlowTable) -> FlowTable {
        let records: Vec<_> = table
            .iter()
            .map(|r| {
                let mut r = r.clone();
                r.value *= 2.0;
                r
            })
            .collect();
        FlowTable::from_records(records).unwrap()
    }

    #[test]
    fn test_filters_apply_in_registration_order() {
        let mut pipeline = FilterPipeline::new();
        pipeline.register("double", from_fn(doubled));
        pipeline.register("over_30", keep(|r| r.value > 30.0));

        // double then threshold: 20, 40, 60 -> 40, 60
        let out = pipeline.apply(&table()).unwrap();
        assert_eq!(out.len(), 2);

        // Reversed order gives a different result: 30 -> 60
        let mut reversed = FilterPipeline::new();
        reversed.register("over_30", keep(|r| r.value > 30.0));
        reversed.register("double", from_fn(doubled));
        let out = reversed.apply(&table()).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut pipeline = FilterPipeline::new();
        pipeline.register("threshold", keep(|r| r.value > 5.0));
        pipeline.register("double", from_fn(doubled));
        pipeline.register("threshold", keep(|r| r.value > 25.0));

        // Position preserved, behavior replaced: threshold (new) runs first.
        let names: Vec<_> = pipeline.names().collect();
        assert_eq!(names, vec!["threshold", "double"]);
        let out = pipeline.apply(&table()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.records()[0].value, 60.0);
    }

    #[test]
    fn test_remove_affects_next_apply() {
        let mut pipeline = FilterPipeline::new();
        pipeline.register("over_15", keep(|r| r.value > 15.0));

        assert_eq!(pipeline.apply(&table()).unwrap().len(), 2);
        assert!(pipeline.remove("over_15"));
        assert!(!pipeline.remove("over_15"));
        assert_eq!(pipeline.apply(&table()).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let pipeline = FilterPipeline::new();
        assert_eq!(pipeline.apply(&table()).unwrap(), table());
    }

    #[test]
    fn test_reapplying_current_set_is_idempotent() {
        let mut pipeline = FilterPipeline::new();
        pipeline.register("over_15", keep(|r| r.value > 15.0));

        let once = pipeline.apply(&table()).unwrap();
        let twice = pipeline.apply(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_error_carries_filter_name() {
        let mut pipeline = FilterPipeline::new();
        pipeline.register(
            "broken",
            |_: &FlowTable| -> std::result::Result<FlowTable, FilterError> {
                Err("bad threshold".into())
            },
        );

        match pipeline.apply(&table()) {
            Err(FlowError::Filter { name, .. }) => assert_eq!(name, "broken"),
            other => panic!("unexpected: {:?}", other.map(|t| t.len())),
        }
    }
}
