//! Row status flags and the change log.

/// Per-row status flags, one entry per allocated row.
#[derive(Debug, Default)]
pub(crate) struct RowStatus {
    pub(crate) modified: Vec<bool>,
    pub(crate) deleted: Vec<bool>,
    pub(crate) new: Vec<bool>,
}

impl RowStatus {
    pub(crate) fn resize(&mut self, capacity: usize) {
        self.modified.resize(capacity, false);
        self.deleted.resize(capacity, false);
        self.new.resize(capacity, false);
    }

    /// Clear every flag, keeping the allocation.
    pub(crate) fn reset(&mut self) {
        self.modified.fill(false);
        self.deleted.fill(false);
        self.new.fill(false);
    }

    pub(crate) fn release(&mut self) {
        *self = Self::default();
    }
}

/// Changes recorded since the last reset.
///
/// `deleted_rows` doubles as the free list consulted by `add_row`.
#[derive(Debug, Default)]
pub(crate) struct ChangeLog {
    pub(crate) new_columns: Vec<usize>,
    pub(crate) new_rows: Vec<usize>,
    pub(crate) deleted_rows: Vec<usize>,
    pub(crate) is_modified: bool,
    pub(crate) rows_modified: bool,
}

impl ChangeLog {
    pub(crate) fn mark_rows_modified(&mut self) {
        self.is_modified = true;
        self.rows_modified = true;
    }

    pub(crate) fn reset(&mut self) {
        self.new_columns.clear();
        self.new_rows.clear();
        self.deleted_rows.clear();
        self.is_modified = false;
        self.rows_modified = false;
    }
}
