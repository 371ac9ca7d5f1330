//! Generator and layout configuration.
//!
//! The library reads no environment or files; callers construct these
//! directly or take the defaults.

/// Grid used to place nodes that have no stored position on Arrows export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Nodes per row before wrapping.
    pub nodes_per_row: usize,
    /// Distance between neighbouring cells, on both axes.
    pub spacing: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self { nodes_per_row: 5, spacing: 200.0 }
    }
}

impl GridLayout {
    /// Position of the node at `index`. Rows grow downward, i.e. toward negative y.
    pub fn position(&self, index: usize) -> (f64, f64) {
        let per_row = self.nodes_per_row.max(1);
        let row = index / per_row;
        let col = index % per_row;
        (col as f64 * self.spacing, -(row as f64) * self.spacing)
    }
}

/// Settings for generated Cypher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CypherConfig {
    /// Name of the list parameter carrying ingest records.
    pub records_parameter: String,
}

impl Default for CypherConfig {
    fn default() -> Self {
        Self { records_parameter: "records".to_string() }
    }
}

impl CypherConfig {
    pub fn with_records_parameter(mut self, name: impl Into<String>) -> Self {
        self.records_parameter = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_positions() {
        let grid = GridLayout::default();
        assert_eq!(grid.position(0), (0.0, 0.0));
        assert_eq!(grid.position(4), (800.0, 0.0));
        assert_eq!(grid.position(5), (0.0, -200.0));
        assert_eq!(grid.position(6), (200.0, -200.0));
        assert_eq!(grid.position(11), (200.0, -400.0));
    }

    #[test]
    fn test_zero_width_grid_does_not_divide_by_zero() {
        let grid = GridLayout { nodes_per_row: 0, spacing: 10.0 };
        assert_eq!(grid.position(2), (0.0, -20.0));
    }

    #[test]
    fn test_default_records_parameter() {
        assert_eq!(CypherConfig::default().records_parameter, "records");
        assert_eq!(CypherConfig::default().with_records_parameter("rows").records_parameter, "rows");
    }
}
