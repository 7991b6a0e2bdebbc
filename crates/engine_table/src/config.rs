//! Table configuration.

/// Construction-time options for an [`AttributeTable`](crate::AttributeTable).
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Record new/modified/deleted rows and new columns.
    pub track_modifications: bool,
    /// Row capacity the buffer grows to from empty; later growth doubles.
    pub min_row_capacity: usize,
    /// Rows to reserve up front.
    pub row_capacity_hint: usize,
}

impl TableConfig {
    /// The default configuration: tracking on, growth floor of 10 rows.
    #[must_use]
    pub fn new() -> Self {
        Self {
            track_modifications: true,
            min_row_capacity: 10,
            row_capacity_hint: 0,
        }
    }

    /// Enable or disable change tracking.
    #[must_use]
    pub fn with_track_modifications(mut self, track: bool) -> Self {
        self.track_modifications = track;
        self
    }

    /// Override the growth floor. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_min_row_capacity(mut self, rows: usize) -> Self {
        self.min_row_capacity = rows.max(1);
        self
    }

    /// Reserve `rows` rows when the table is created.
    #[must_use]
    pub fn with_row_capacity_hint(mut self, rows: usize) -> Self {
        self.row_capacity_hint = rows;
        self
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}
