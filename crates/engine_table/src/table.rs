//! The attribute table: schema, row lifecycle and change tracking.
//!
//! Rows are addressed by index. An index stays valid for the lifetime of the
//! row; deleted indices are reused last-in first-out by [`AttributeTable::add_row`].
//! Rows are never compacted. Columns are only ever appended, so a column's
//! index is stable too.
//!
//! Any operation that grows the row buffer or widens the row pitch moves the
//! stored cells. Accessors therefore hand out values or borrows tied to
//! `&self`, never pointers that could outlive a reallocation.

use std::collections::HashMap;

use engine_attr::{AccessMode, AttrId, FourCC, ValueType};
use tracing::{debug, trace};

use crate::arena::RowArena;
use crate::column::{CellSlot, Column};
use crate::config::TableConfig;
use crate::entity::Entity;
use crate::error::{TableError, fatal};
use crate::heap::HeapCells;
use crate::layout::RowLayout;
use crate::tracking::{ChangeLog, RowStatus};

#[derive(Debug, Clone, Copy)]
struct PendingColumns {
    record_as_new: bool,
    first_column: usize,
}

/// A columnar, typed, in-memory table with change tracking.
#[derive(Debug)]
pub struct AttributeTable {
    pub(crate) config: TableConfig,
    pub(crate) columns: Vec<Column>,
    column_lookup: HashMap<AttrId, usize>,
    read_write_columns: Vec<usize>,
    pending_columns: Option<PendingColumns>,
    pub(crate) arena: RowArena,
    pub(crate) heap: HeapCells,
    pub(crate) num_rows: usize,
    pub(crate) status: RowStatus,
    pub(crate) log: ChangeLog,
    user_data: Vec<Option<Entity>>,
}

impl AttributeTable {
    /// Create an empty table with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Create an empty table with the given configuration.
    #[must_use]
    pub fn with_config(config: TableConfig) -> Self {
        let hint = config.row_capacity_hint;
        let mut table = Self {
            config,
            columns: Vec::new(),
            column_lookup: HashMap::new(),
            read_write_columns: Vec::new(),
            pending_columns: None,
            arena: RowArena::default(),
            heap: HeapCells::default(),
            num_rows: 0,
            status: RowStatus::default(),
            log: ChangeLog::default(),
            user_data: Vec::new(),
        };
        table.reserve_rows(hint);
        table
    }

    /// Create a table whose schema is `attr_ids`, in order, laid out once.
    #[must_use]
    pub fn from_attr_ids(attr_ids: impl IntoIterator<Item = AttrId>) -> Self {
        let mut table = Self::new();
        table.begin_add_columns(true);
        for attr_id in attr_ids {
            table.add_column(attr_id);
        }
        table.end_add_columns();
        table
    }

    /// The table's current configuration.
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns `true` if change tracking is enabled.
    #[must_use]
    pub fn track_modifications(&self) -> bool {
        self.config.track_modifications
    }

    /// Enable or disable change tracking for subsequent operations.
    pub fn set_track_modifications(&mut self, track: bool) {
        self.config.track_modifications = track;
    }

    // -- Schema --

    /// Append a column, recording it as new unless inside a
    /// [`begin_add_columns`](Self::begin_add_columns) bracket that says
    /// otherwise. Returns the column index.
    ///
    /// # Panics
    ///
    /// Panics if the table already has a column for `attr_id`.
    pub fn add_column(&mut self, attr_id: AttrId) -> usize {
        let record_as_new = self.pending_columns.is_none_or(|p| p.record_as_new);
        self.add_column_with(attr_id, record_as_new)
    }

    /// Append a column, choosing whether it is recorded as new.
    ///
    /// Outside a bracket the row layout is recomputed immediately and every
    /// existing row's new cell is set to the column's default.
    ///
    /// # Panics
    ///
    /// Panics if the table already has a column for `attr_id`.
    pub fn add_column_with(&mut self, attr_id: AttrId, record_as_new: bool) -> usize {
        if self.column_lookup.contains_key(&attr_id) {
            fatal(TableError::DuplicateColumn(attr_id.name().to_string()));
        }

        let index = self.columns.len();
        let capacity = self.arena.capacity();
        let slot = match attr_id.value_type() {
            ValueType::String => CellSlot::Heap {
                store: self.heap.strings.add_column(capacity),
            },
            ValueType::Guid => CellSlot::Heap {
                store: self.heap.guids.add_column(capacity),
            },
            ValueType::Blob => CellSlot::Heap {
                store: self.heap.blobs.add_column(capacity),
            },
            // Real offset is assigned by the next layout pass.
            _ => CellSlot::Packed {
                offset: self.arena.pitch(),
            },
        };

        if attr_id.is_read_write() {
            self.read_write_columns.push(index);
        }
        if self.config.track_modifications && record_as_new {
            self.log.new_columns.push(index);
        }
        self.log.is_modified = true;

        trace!(column = index, name = attr_id.name(), "adding column");
        self.column_lookup.insert(attr_id.clone(), index);
        self.columns.push(Column::new(attr_id, slot));

        if self.pending_columns.is_none() {
            self.update_layout(index);
        }
        index
    }

    /// Start a batch of column additions; the layout is recomputed once, by
    /// [`end_add_columns`](Self::end_add_columns). Until then no row can be
    /// added, read or written.
    ///
    /// # Panics
    ///
    /// Panics if a batch is already open.
    pub fn begin_add_columns(&mut self, record_as_new: bool) {
        if self.pending_columns.is_some() {
            fatal(TableError::NestedAddColumns);
        }
        self.pending_columns = Some(PendingColumns {
            record_as_new,
            first_column: self.columns.len(),
        });
    }

    /// Close the batch opened by [`begin_add_columns`](Self::begin_add_columns).
    ///
    /// # Panics
    ///
    /// Panics if no batch is open.
    pub fn end_add_columns(&mut self) {
        let Some(pending) = self.pending_columns.take() else {
            fatal(TableError::NotAddingColumns);
        };
        if pending.first_column < self.columns.len() {
            self.update_layout(pending.first_column);
        }
    }

    /// Recompute offsets and pitch, move existing rows to the new pitch and
    /// default the cells of columns `first_new..`.
    fn update_layout(&mut self, first_new: usize) {
        let layout = RowLayout::compute(self.columns.iter().map(Column::value_type));
        for (column, offset) in self.columns.iter_mut().zip(&layout.offsets) {
            if let Some(offset) = *offset {
                column.set_offset(offset);
            }
        }

        let old_pitch = self.arena.pitch();
        debug!(
            columns = self.columns.len(),
            old_pitch,
            new_pitch = layout.pitch,
            "row layout updated"
        );
        if layout.pitch != old_pitch {
            if self.arena.capacity() > 0 {
                self.arena
                    .reallocate(layout.pitch, self.arena.capacity(), self.num_rows);
            } else {
                self.arena.set_pitch(layout.pitch);
            }
        }

        for column in first_new..self.columns.len() {
            self.set_column_to_default_values(column);
        }
    }

    /// Number of columns in the schema.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Every column, in index order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The column at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range. So do the `column_*` accessors
    /// below.
    #[must_use]
    #[track_caller]
    pub fn column(&self, index: usize) -> &Column {
        self.check_column(index)
    }

    /// The attribute id the column was created from.
    #[must_use]
    #[track_caller]
    pub fn column_attr_id(&self, index: usize) -> &AttrId {
        self.check_column(index).attr_id()
    }

    /// The column's attribute name.
    #[must_use]
    #[track_caller]
    pub fn column_name(&self, index: usize) -> &str {
        self.check_column(index).name()
    }

    /// The column's four-character code.
    #[must_use]
    #[track_caller]
    pub fn column_fourcc(&self, index: usize) -> FourCC {
        self.check_column(index).fourcc()
    }

    /// Whether the column is read-only or read-write.
    #[must_use]
    #[track_caller]
    pub fn column_access_mode(&self, index: usize) -> AccessMode {
        self.check_column(index).access_mode()
    }

    /// The value type every cell of the column holds.
    #[must_use]
    #[track_caller]
    pub fn column_value_type(&self, index: usize) -> ValueType {
        self.check_column(index).value_type()
    }

    /// Byte offset of the column's cell within a packed row; `None` for
    /// heap-owned columns.
    #[must_use]
    #[track_caller]
    pub fn column_byte_offset(&self, index: usize) -> Option<usize> {
        self.check_column(index).byte_offset()
    }

    /// Index of the column for `attr_id`, if the table has one.
    #[must_use]
    pub fn column_index(&self, attr_id: &AttrId) -> Option<usize> {
        self.column_lookup.get(attr_id).copied()
    }

    /// Like [`column_index`](Self::column_index), reporting a miss as an error.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownColumn`] if the table has no such column.
    pub fn try_column_index(&self, attr_id: &AttrId) -> Result<usize, TableError> {
        self.column_index(attr_id)
            .ok_or_else(|| TableError::UnknownColumn(attr_id.name().to_string()))
    }

    /// Returns `true` if the table has a column for `attr_id`.
    #[must_use]
    pub fn has_column(&self, attr_id: &AttrId) -> bool {
        self.column_lookup.contains_key(attr_id)
    }

    /// Indices of the columns whose access mode is read-write.
    #[must_use]
    pub fn read_write_column_indices(&self) -> &[usize] {
        &self.read_write_columns
    }

    // -- Rows --

    /// Number of row slots in use, deleted ones included.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of rows the buffers currently hold room for.
    #[must_use]
    pub fn allocated_rows(&self) -> usize {
        self.arena.capacity()
    }

    /// Byte stride between rows in the packed buffer.
    #[must_use]
    pub fn row_pitch(&self) -> usize {
        self.arena.pitch()
    }

    /// Add a row with every cell set to its column default and return its
    /// index. The most recently deleted row is reused first; otherwise the
    /// buffer grows by doubling when full.
    ///
    /// # Panics
    ///
    /// Panics inside a [`begin_add_columns`](Self::begin_add_columns) batch.
    #[track_caller]
    pub fn add_row(&mut self) -> usize {
        self.check_layout();
        let row = match self.log.deleted_rows.pop() {
            Some(row) => {
                self.status.deleted[row] = false;
                trace!(row, "reusing deleted row");
                row
            }
            None => {
                if self.num_rows == self.arena.capacity() {
                    let grown = (self.arena.capacity() * 2).max(self.config.min_row_capacity);
                    self.reallocate_rows(grown);
                }
                let row = self.num_rows;
                self.num_rows += 1;
                self.user_data.push(None);
                trace!(row, "appending row");
                row
            }
        };

        if self.config.track_modifications {
            if !self.status.new[row] {
                self.status.new[row] = true;
                self.log.new_rows.push(row);
            }
            self.log.mark_rows_modified();
        }
        self.set_row_to_default_values(row);
        row
    }

    /// Grow the row buffers by `additional` rows without adding any.
    pub fn reserve_rows(&mut self, additional: usize) {
        if additional > 0 {
            self.reallocate_rows(self.arena.capacity() + additional);
        }
    }

    fn reallocate_rows(&mut self, capacity: usize) {
        self.arena
            .reallocate(self.arena.pitch(), capacity, self.num_rows);
        self.heap.resize(capacity);
        self.status.resize(capacity);
    }

    /// Flag `row` as deleted, release its heap cells and make its index
    /// available for reuse.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range or already deleted.
    #[track_caller]
    pub fn delete_row(&mut self, row: usize) {
        self.check_writable_row(row);
        self.log.deleted_rows.push(row);
        self.status.deleted[row] = true;
        if self.config.track_modifications {
            self.log.mark_rows_modified();
        }
        self.user_data[row] = None;
        self.heap.release_row(row);
        trace!(row, "deleted row");
    }

    /// Delete every row that is not already deleted, in ascending order.
    pub fn delete_all_rows(&mut self) {
        for row in 0..self.num_rows {
            if !self.status.deleted[row] {
                self.delete_row(row);
            }
        }
    }

    /// Add a row holding a copy of every cell of `src`. User data is not
    /// copied.
    #[track_caller]
    pub fn copy_row(&mut self, src: usize) -> usize {
        self.check_row(src);
        let dst = self.add_row();
        self.copy_row_to(src, dst);
        dst
    }

    /// Overwrite every cell of `dst` with the cells of `src`.
    ///
    /// # Panics
    ///
    /// Panics if either row is out of range or `dst` is deleted.
    #[track_caller]
    pub fn copy_row_to(&mut self, src: usize, dst: usize) {
        self.check_row(src);
        self.check_writable_row(dst);
        if src != dst {
            self.arena.copy_row(src, dst);
            self.heap.copy_row(src, dst);
        }
        self.touch_row(dst);
    }

    /// Add a row holding the cells of `other_row` in `other`, matching
    /// columns by attribute id. Columns this table lacks are added first
    /// when `create_missing_columns` is set, skipped otherwise.
    #[track_caller]
    pub fn copy_ext_row(
        &mut self,
        other: &AttributeTable,
        other_row: usize,
        create_missing_columns: bool,
    ) -> usize {
        other.check_row(other_row);
        let row = self.add_row();
        for (other_column, column) in other.columns.iter().enumerate() {
            let local = match self.column_index(column.attr_id()) {
                Some(local) => local,
                None if create_missing_columns => self.add_column(column.attr_id().clone()),
                None => continue,
            };
            let value = other.get_value(other_column, other_row);
            self.set_value(local, row, &value);
        }
        row
    }

    /// Reset every cell of `row` to its column default without recording a
    /// modification.
    #[track_caller]
    pub fn set_row_to_default_values(&mut self, row: usize) {
        self.check_row(row);
        for column in 0..self.columns.len() {
            let attr_id = self.columns[column].attr_id().clone();
            self.put_value(column, row, attr_id.default_value());
        }
    }

    /// Reset `column` in every live row to its default without recording a
    /// modification. Deleted rows are left released; they get their
    /// defaults when [`add_row`](Self::add_row) reuses them.
    #[track_caller]
    pub fn set_column_to_default_values(&mut self, column: usize) {
        let attr_id = self.check_column(column).attr_id().clone();
        for row in 0..self.num_rows {
            if !self.status.deleted[row] {
                self.put_value(column, row, attr_id.default_value());
            }
        }
    }

    /// Returns `true` if `row` is in range and not deleted.
    #[must_use]
    pub fn is_valid_row_index(&self, row: usize) -> bool {
        row < self.num_rows && !self.status.deleted[row]
    }

    /// Returns `true` if `row` was added since the last reset.
    #[must_use]
    #[track_caller]
    pub fn is_row_new(&self, row: usize) -> bool {
        self.check_row(row);
        self.status.new[row]
    }

    /// Returns `true` if a cell of `row` was written since the last reset.
    #[must_use]
    #[track_caller]
    pub fn is_row_modified(&self, row: usize) -> bool {
        self.check_row(row);
        self.status.modified[row]
    }

    /// Returns `true` if `row` is deleted and waiting for reuse.
    #[must_use]
    #[track_caller]
    pub fn is_row_deleted(&self, row: usize) -> bool {
        self.check_row(row);
        self.status.deleted[row]
    }

    /// The back-reference attached to `row`, if any.
    #[must_use]
    #[track_caller]
    pub fn row_user_data(&self, row: usize) -> Option<Entity> {
        self.check_row(row);
        self.user_data[row]
    }

    /// Attach a back-reference to `row`. The table never resolves it.
    #[track_caller]
    pub fn set_row_user_data(&mut self, row: usize, entity: Option<Entity>) {
        self.check_row(row);
        self.user_data[row] = entity;
    }

    // -- Change tracking --

    /// Returns `true` if anything changed since the last reset.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.log.is_modified
    }

    /// Returns `true` if any row was added, written or deleted since the
    /// last reset.
    #[must_use]
    pub fn rows_modified(&self) -> bool {
        self.log.rows_modified
    }

    /// Columns recorded as new since the last reset.
    #[must_use]
    pub fn new_column_indices(&self) -> &[usize] {
        &self.log.new_columns
    }

    /// Rows added since the last reset, in order of addition.
    #[must_use]
    pub fn new_row_indices(&self) -> &[usize] {
        &self.log.new_rows
    }

    /// Deleted rows not yet reused, in deletion order.
    #[must_use]
    pub fn deleted_row_indices(&self) -> &[usize] {
        &self.log.deleted_rows
    }

    /// Rows that were written but are neither new nor deleted.
    #[must_use]
    pub fn modified_row_indices(&self) -> Vec<usize> {
        (0..self.num_rows)
            .filter(|&row| {
                self.status.modified[row] && !self.status.new[row] && !self.status.deleted[row]
            })
            .collect()
    }

    /// Forget all recorded changes.
    ///
    /// Deleted rows lose their deleted flag and stop being reused, since the
    /// free list is cleared with the rest of the log.
    pub fn reset_modified_state(&mut self) {
        self.log.reset();
        self.status.reset();
    }

    // -- Teardown --

    /// Release every row and its heap cells. The schema is kept.
    pub fn clear(&mut self) {
        debug!(rows = self.num_rows, "clearing attribute table");
        self.heap.clear();
        self.arena.release();
        self.status.release();
        self.user_data.clear();
        self.log.new_rows.clear();
        self.log.deleted_rows.clear();
        self.num_rows = 0;
    }

    /// Number of heap-owned cells currently holding a value.
    #[must_use]
    pub fn heap_cell_count(&self) -> usize {
        self.heap.live_cells()
    }

    // -- Contract checks --

    #[track_caller]
    pub(crate) fn check_column(&self, column: usize) -> &Column {
        match self.columns.get(column) {
            Some(c) => c,
            None => fatal(TableError::ColumnOutOfRange {
                index: column,
                count: self.columns.len(),
            }),
        }
    }

    #[track_caller]
    pub(crate) fn check_layout(&self) {
        if self.pending_columns.is_some() {
            fatal(TableError::LayoutPending);
        }
    }

    #[track_caller]
    pub(crate) fn check_row(&self, row: usize) {
        self.check_layout();
        if row >= self.num_rows {
            fatal(TableError::RowOutOfRange {
                index: row,
                count: self.num_rows,
            });
        }
    }

    #[track_caller]
    pub(crate) fn check_writable_row(&self, row: usize) {
        self.check_row(row);
        if self.status.deleted[row] {
            fatal(TableError::RowDeleted(row));
        }
    }

    /// Check that `column` holds `value_type` and return where it lives.
    #[track_caller]
    pub(crate) fn check_type(&self, column: usize, value_type: ValueType) -> CellSlot {
        let c = self.check_column(column);
        if c.value_type() != value_type {
            fatal(TableError::TypeMismatch {
                column: c.name().to_string(),
                expected: c.value_type(),
                found: value_type,
            });
        }
        c.slot()
    }

    /// Resolve `attr_id` to its column index.
    #[track_caller]
    pub(crate) fn resolve(&self, attr_id: &AttrId) -> usize {
        match self.column_index(attr_id) {
            Some(column) => column,
            None => fatal(TableError::UnknownColumn(attr_id.name().to_string())),
        }
    }

    /// Record a write to `row`.
    pub(crate) fn touch_row(&mut self, row: usize) {
        if self.config.track_modifications {
            self.status.modified[row] = true;
            self.log.mark_rows_modified();
        }
    }
}

impl Default for AttributeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_attr::{AttrValue, Attribute};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn attr(name: &str, code: &[u8; 4], value_type: ValueType) -> AttrId {
        AttrId::new(name, FourCC::from_bytes(*code), value_type, AccessMode::ReadWrite)
    }

    fn name_id() -> AttrId {
        attr("Name", b"NAME", ValueType::String)
    }

    fn score_id() -> AttrId {
        attr("Score", b"SCOR", ValueType::Int)
    }

    fn name_score_table() -> AttributeTable {
        AttributeTable::from_attr_ids([name_id(), score_id()])
    }

    #[test]
    fn test_new_table_is_empty() {
        let table = AttributeTable::new();
        assert_eq!(table.num_columns(), 0);
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.allocated_rows(), 0);
        assert_eq!(table.row_pitch(), 0);
        assert!(!table.is_modified());
    }

    #[test]
    fn test_add_column_records_schema() {
        let mut table = AttributeTable::new();
        let read_only = AttrId::new(
            "Id",
            FourCC::from_bytes(*b"ID  "),
            ValueType::UInt,
            AccessMode::ReadOnly,
        );
        assert_eq!(table.add_column(read_only.clone()), 0);
        assert_eq!(table.add_column(score_id()), 1);

        assert_eq!(table.column_name(1), "Score");
        assert_eq!(table.column_fourcc(1), FourCC::from_bytes(*b"SCOR"));
        assert_eq!(table.column_value_type(0), ValueType::UInt);
        assert_eq!(table.column_access_mode(0), AccessMode::ReadOnly);
        assert_eq!(table.column_index(&score_id()), Some(1));
        assert!(table.has_column(&read_only));
        assert_eq!(table.read_write_column_indices(), &[1]);
        assert_eq!(table.new_column_indices(), &[0, 1]);
        assert_eq!(table.column_byte_offset(1), Some(4));
        assert_eq!(table.row_pitch(), 8);
    }

    #[test]
    fn test_add_column_without_recording() {
        let mut table = AttributeTable::new();
        table.add_column_with(score_id(), false);
        assert!(table.new_column_indices().is_empty());
        assert!(table.is_modified());
    }

    #[test]
    #[should_panic(expected = "column 'Score' already exists")]
    fn test_duplicate_column_panics() {
        let mut table = AttributeTable::new();
        table.add_column(score_id());
        table.add_column(score_id());
    }

    #[test]
    fn test_try_column_index_reports_unknown() {
        let table = name_score_table();
        let missing = attr("Speed", b"SPED", ValueType::Float);
        assert_eq!(
            table.try_column_index(&missing),
            Err(TableError::UnknownColumn("Speed".into()))
        );
        assert_eq!(table.try_column_index(&score_id()), Ok(1));
    }

    #[test]
    #[should_panic(expected = "already adding columns")]
    fn test_nested_begin_add_columns_panics() {
        let mut table = AttributeTable::new();
        table.begin_add_columns(true);
        table.begin_add_columns(true);
    }

    #[test]
    #[should_panic(expected = "without begin_add_columns")]
    fn test_unbalanced_end_add_columns_panics() {
        let mut table = AttributeTable::new();
        table.end_add_columns();
    }

    #[test]
    fn test_batched_columns_lay_out_once() {
        let mut table = AttributeTable::new();
        table.begin_add_columns(false);
        table.add_column(score_id());
        table.add_column(attr("Pos", b"POS ", ValueType::Vec4));
        table.add_column(attr("Id", b"ID  ", ValueType::UInt64));
        assert_eq!(table.row_pitch(), 0);
        table.end_add_columns();

        assert_eq!(table.row_pitch(), 28);
        assert_eq!(table.column_byte_offset(2), Some(20));
        assert!(table.new_column_indices().is_empty());
    }

    #[test]
    fn test_row_pitch_is_monotonic() {
        let mut table = AttributeTable::new();
        let mut last = table.row_pitch();
        for (i, ty) in ValueType::ALL.into_iter().enumerate() {
            let code = [b'C', b'0' + i as u8, b' ', b' '];
            table.add_column(AttrId::new(
                format!("col{i}"),
                FourCC::from_bytes(code),
                ty,
                AccessMode::ReadWrite,
            ));
            assert!(table.row_pitch() >= last);
            last = table.row_pitch();
        }
        assert_eq!(last, 4 + 4 + 8 + 8 + 4 + 4 + 16 + 64);
    }

    #[test]
    fn test_add_row_fills_defaults() {
        let mut table = AttributeTable::new();
        table.add_column(AttrId::with_default(
            "Health",
            FourCC::from_bytes(*b"HLTH"),
            AccessMode::ReadWrite,
            100_i32,
        ));
        table.add_column(AttrId::with_default(
            "Tag",
            FourCC::from_bytes(*b"TAG "),
            AccessMode::ReadWrite,
            "none",
        ));
        let row = table.add_row();
        assert_eq!(row, 0);
        assert_eq!(table.get_int(0, row), 100);
        assert_eq!(table.get_string(1, row), "none");
    }

    #[test]
    fn test_growth_doubles_from_floor() {
        let mut table = name_score_table();
        table.add_row();
        assert_eq!(table.allocated_rows(), 10);
        for _ in 0..10 {
            table.add_row();
        }
        assert_eq!(table.num_rows(), 11);
        assert_eq!(table.allocated_rows(), 20);
    }

    #[test]
    fn test_configured_growth_floor_and_hint() {
        let config = TableConfig::new()
            .with_min_row_capacity(2)
            .with_row_capacity_hint(3);
        let mut table = AttributeTable::with_config(config);
        table.add_column(score_id());
        assert_eq!(table.allocated_rows(), 3);
        assert_eq!(table.num_rows(), 0);
        for _ in 0..4 {
            table.add_row();
        }
        assert_eq!(table.allocated_rows(), 6);
    }

    #[test]
    fn test_reserve_rows_keeps_row_count() {
        let mut table = name_score_table();
        table.add_row();
        table.reserve_rows(50);
        assert_eq!(table.allocated_rows(), 60);
        assert_eq!(table.num_rows(), 1);
    }

    #[test]
    fn test_add_column_defaults_existing_rows() {
        init_tracing();
        let mut table = name_score_table();
        for i in 0..3 {
            let row = table.add_row();
            table.set_int(1, row, i * 10);
            table.set_string(0, row, &format!("row{i}"));
        }

        let speed = AttrId::with_default(
            "Speed",
            FourCC::from_bytes(*b"SPED"),
            AccessMode::ReadWrite,
            1.5_f32,
        );
        let pitch_before = table.row_pitch();
        let column = table.add_column(speed);
        assert!(table.row_pitch() > pitch_before);

        for row in 0..3 {
            assert_eq!(table.get_float(column, row), 1.5);
            assert_eq!(table.get_int(1, row), row as i32 * 10);
            assert_eq!(table.get_string(0, row), format!("row{row}"));
        }
    }

    #[test]
    fn test_row_reuse_is_lifo() {
        let mut table = name_score_table();
        for _ in 0..6 {
            table.add_row();
        }
        for row in [2, 5, 1] {
            table.delete_row(row);
        }
        assert_eq!(table.deleted_row_indices(), &[2, 5, 1]);
        let reused: Vec<usize> = (0..3).map(|_| table.add_row()).collect();
        assert_eq!(reused, vec![1, 5, 2]);
        assert!(table.deleted_row_indices().is_empty());
        assert_eq!(table.num_rows(), 6);
    }

    #[test]
    fn test_delete_row_flags_and_releases() {
        let mut table = name_score_table();
        let row = table.add_row();
        table.set_string(0, row, "Alice");
        table.set_row_user_data(row, Entity::new(9));
        assert_eq!(table.row_user_data(row).map(Entity::get), Some(9));
        assert_eq!(table.heap_cell_count(), 1);

        table.delete_row(row);
        assert!(table.is_row_deleted(row));
        assert!(!table.is_valid_row_index(row));
        assert_eq!(table.deleted_row_indices(), &[row]);
        assert_eq!(table.row_user_data(row), None);
        assert_eq!(table.heap_cell_count(), 0);
    }

    #[test]
    #[should_panic(expected = "row 0 is deleted")]
    fn test_write_to_deleted_row_panics() {
        let mut table = name_score_table();
        let row = table.add_row();
        table.delete_row(row);
        table.set_int(1, row, 5);
    }

    #[test]
    #[should_panic(expected = "row 0 is deleted")]
    fn test_double_delete_panics() {
        let mut table = name_score_table();
        let row = table.add_row();
        table.delete_row(row);
        table.delete_row(row);
    }

    #[test]
    #[should_panic(expected = "row index 3 out of range")]
    fn test_row_out_of_range_panics() {
        let mut table = name_score_table();
        table.add_row();
        let _ = table.get_int(1, 3);
    }

    #[test]
    fn test_delete_all_rows() {
        let mut table = name_score_table();
        for _ in 0..4 {
            table.add_row();
        }
        table.delete_row(2);
        table.delete_all_rows();
        assert_eq!(table.deleted_row_indices(), &[2, 0, 1, 3]);
        assert!((0..4).all(|row| table.is_row_deleted(row)));
    }

    #[test]
    fn test_copy_row_to_existing() {
        let mut table = name_score_table();
        let a = table.add_row();
        let b = table.add_row();
        table.set_string(0, a, "Alice");
        table.set_int(1, a, 7);
        table.copy_row_to(a, b);
        assert_eq!(table.get_string(0, b), "Alice");
        assert_eq!(table.get_int(1, b), 7);
    }

    #[test]
    fn test_copy_row_resets_user_data() {
        let mut table = name_score_table();
        let src = table.add_row();
        table.set_row_user_data(src, Entity::new(3));
        let dst = table.copy_row(src);
        assert_eq!(table.row_user_data(dst), None);
        assert_eq!(table.row_user_data(src), Entity::new(3));
    }

    #[test]
    fn test_copy_ext_row_matches_by_attr_id() {
        let mut source = AttributeTable::from_attr_ids([
            score_id(),
            attr("Pos", b"POS ", ValueType::Vec4),
            name_id(),
        ]);
        let row = source.add_row();
        source.set_int(0, row, 99);
        source.set_string(2, row, "Eve");

        let mut narrow = AttributeTable::from_attr_ids([name_id()]);
        let copied = narrow.copy_ext_row(&source, row, false);
        assert_eq!(narrow.num_columns(), 1);
        assert_eq!(narrow.get_string(0, copied), "Eve");

        let mut wide = AttributeTable::from_attr_ids([name_id()]);
        let copied = wide.copy_ext_row(&source, row, true);
        assert_eq!(wide.num_columns(), 3);
        let score = wide.column_index(&score_id()).unwrap();
        assert_eq!(wide.get_int(score, copied), 99);
        assert_eq!(wide.get_string(0, copied), "Eve");
    }

    #[test]
    fn test_reset_modified_state() {
        let mut table = name_score_table();
        let a = table.add_row();
        let b = table.add_row();
        table.delete_row(b);
        assert!(table.is_modified());
        assert!(table.is_row_new(a));

        table.reset_modified_state();
        assert!(!table.is_modified());
        assert!(!table.rows_modified());
        assert!(table.new_row_indices().is_empty());
        assert!(table.deleted_row_indices().is_empty());
        assert!(table.new_column_indices().is_empty());
        assert!(!table.is_row_new(a));
        assert!(!table.is_row_deleted(b));
    }

    #[test]
    fn test_modified_rows_exclude_new_and_deleted() {
        let mut table = name_score_table();
        for _ in 0..3 {
            table.add_row();
        }
        table.reset_modified_state();

        table.set_int(1, 0, 1);
        table.set_int(1, 1, 1);
        table.delete_row(1);
        let fresh = table.add_row();
        table.set_int(1, fresh, 2);

        assert!(table.is_row_modified(0));
        assert_eq!(table.modified_row_indices(), vec![0]);
        assert_eq!(table.new_row_indices(), &[1]);
    }

    #[test]
    fn test_tracking_disabled_skips_bookkeeping() {
        let config = TableConfig::new().with_track_modifications(false);
        let mut table = AttributeTable::with_config(config);
        table.add_column(score_id());
        table.reset_modified_state();

        let row = table.add_row();
        table.set_int(0, row, 3);
        assert!(!table.is_modified());
        assert!(!table.is_row_new(row));
        assert!(!table.is_row_modified(row));
        assert!(table.new_row_indices().is_empty());

        table.set_track_modifications(true);
        table.set_int(0, row, 4);
        assert!(table.is_row_modified(row));
    }

    #[test]
    fn test_tracking_disabled_still_reuses_deleted_rows() {
        let config = TableConfig::new().with_track_modifications(false);
        let mut table = AttributeTable::with_config(config);
        table.add_column(score_id());
        let a = table.add_row();
        let b = table.add_row();
        table.reset_modified_state();

        table.delete_row(a);
        assert!(table.is_row_deleted(a));
        assert!(!table.is_valid_row_index(a));
        assert_eq!(table.deleted_row_indices(), &[a]);
        assert!(!table.is_modified());
        assert!(!table.rows_modified());
        assert!(!table.is_row_deleted(b));

        assert_eq!(table.add_row(), a);
        assert!(!table.is_row_deleted(a));
        assert_eq!(table.num_rows(), 2);
    }

    #[test]
    #[should_panic(expected = "until end_add_columns")]
    fn test_write_inside_column_batch_panics() {
        let a = attr("A", b"A   ", ValueType::Int);
        let mut table = AttributeTable::from_attr_ids([a]);
        table.add_row();
        table.add_row();
        table.begin_add_columns(true);
        let b = table.add_column(attr("B", b"B   ", ValueType::Int));
        table.set_int(b, 0, 123);
    }

    #[test]
    #[should_panic(expected = "until end_add_columns")]
    fn test_add_row_inside_column_batch_panics() {
        let mut table = name_score_table();
        table.begin_add_columns(true);
        table.add_column(attr("Speed", b"SPED", ValueType::Float));
        table.add_row();
    }

    #[test]
    fn test_column_batch_keeps_neighbouring_rows() {
        let a = attr("A", b"A   ", ValueType::Int);
        let mut table = AttributeTable::from_attr_ids([a]);
        table.add_row();
        let second = table.add_row();
        table.set_int(0, second, 77);

        table.begin_add_columns(true);
        let b = table.add_column(attr("B", b"B   ", ValueType::Int));
        table.end_add_columns();
        table.set_int(b, 0, 123);

        assert_eq!(table.get_int(0, second), 77);
        assert_eq!(table.get_int(b, second), 0);
        assert_eq!(table.get_int(b, 0), 123);
    }

    #[test]
    fn test_new_column_skips_deleted_rows() {
        let mut table = AttributeTable::from_attr_ids([score_id()]);
        let gone = table.add_row();
        let live = table.add_row();
        table.delete_row(gone);

        let tag = table.add_column(AttrId::with_default(
            "Tag",
            FourCC::from_bytes(*b"TAG "),
            AccessMode::ReadWrite,
            "payload",
        ));
        assert_eq!(table.heap_cell_count(), 1);
        assert_eq!(table.get_string(tag, gone), "");
        assert_eq!(table.get_string(tag, live), "payload");

        assert_eq!(table.add_row(), gone);
        assert_eq!(table.get_string(tag, gone), "payload");
        assert_eq!(table.heap_cell_count(), 2);
    }

    #[test]
    fn test_clear_keeps_schema() {
        let mut table = name_score_table();
        let row = table.add_row();
        table.set_string(0, row, "Zed");
        table.clear();
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.allocated_rows(), 0);
        assert_eq!(table.heap_cell_count(), 0);
        assert_eq!(table.num_columns(), 2);

        let row = table.add_row();
        assert_eq!(row, 0);
        assert_eq!(table.get_string(0, row), "");
    }

    #[test]
    fn test_name_score_scenario() {
        init_tracing();
        let mut table = name_score_table();
        let name = 0;
        let score = 1;

        let first = table.add_row();
        assert_eq!(first, 0);
        assert_eq!(table.get_string(name, first), "");
        assert_eq!(table.get_int(score, first), 0);

        table.set_string(name, first, "Alice");
        table.set_int(score, first, 42);

        let copy = table.copy_row(first);
        assert_eq!(copy, 1);
        assert_eq!(table.get_string(name, copy), "Alice");
        assert_eq!(table.get_int(score, copy), 42);

        table.delete_row(first);
        let reused = table.add_row();
        assert_eq!(reused, 0);
        assert_eq!(table.get_string(name, reused), "");
        assert_eq!(table.get_int(score, reused), 0);

        let predicate = Attribute::new(score_id(), 42_i32).unwrap();
        assert_eq!(table.find_row_index_by_attr(&predicate), Some(1));
        assert_eq!(
            table.get_attr(&score_id(), 1).value(),
            &AttrValue::Int(42)
        );
    }
}
