//! Test data builders for flow tables

use flowvis_rs::{FlowTable, RawRow, TimeKey};

/// Builder assembling a FlowTable row by row
pub struct TableBuilder {
    rows: Vec<RawRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn flow(mut self, source: &str, target: &str, value: f64) -> Self {
        self.rows.push(RawRow::new(source, target, value));
        self
    }

    pub fn flow_at(
        mut self,
        source: &str,
        target: &str,
        value: f64,
        time: impl Into<TimeKey>,
    ) -> Self {
        self.rows
            .push(RawRow::new(source, target, value).with_time(time));
        self
    }

    pub fn build(self) -> FlowTable {
        FlowTable::from_rows(&self.rows).expect("test table is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_builder() {
        let table = TableBuilder::new()
            .flow("A", "B", 10.0)
            .flow_at("B", "C", 5.0, 1)
            .build();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].time, Some(TimeKey::Int(1)));
    }
}
