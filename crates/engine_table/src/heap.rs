//! Stores for heap-owned cells.
//!
//! String, GUID and blob cells do not live in the packed row buffer. Each
//! such column instead owns a vector of optional values, one slot per
//! allocated row, resized in lockstep with the buffer. `None` means the cell
//! has been released (or never written).

use engine_attr::{Blob, Guid};

/// One vector of cells per column of type `T`.
#[derive(Debug)]
pub(crate) struct HeapStore<T> {
    columns: Vec<Vec<Option<T>>>,
}

impl<T> Default for HeapStore<T> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
        }
    }
}

impl<T: Clone> HeapStore<T> {
    /// Add a column with `capacity` empty cells; returns its store index.
    pub(crate) fn add_column(&mut self, capacity: usize) -> usize {
        self.columns.push(std::iter::repeat_with(|| None).take(capacity).collect());
        self.columns.len() - 1
    }

    pub(crate) fn resize(&mut self, capacity: usize) {
        for cells in &mut self.columns {
            cells.resize_with(capacity, || None);
        }
    }

    pub(crate) fn cell(&self, store: usize, row: usize) -> Option<&T> {
        self.columns[store][row].as_ref()
    }

    pub(crate) fn cell_mut(&mut self, store: usize, row: usize) -> &mut Option<T> {
        &mut self.columns[store][row]
    }

    /// Free every cell of `row` across all columns.
    pub(crate) fn release_row(&mut self, row: usize) {
        for cells in &mut self.columns {
            cells[row] = None;
        }
    }

    pub(crate) fn copy_row(&mut self, src: usize, dst: usize) {
        for cells in &mut self.columns {
            let value = cells[src].clone();
            cells[dst] = value;
        }
    }

    /// Free every cell, keeping the columns.
    pub(crate) fn clear(&mut self) {
        for cells in &mut self.columns {
            *cells = Vec::new();
        }
    }

    pub(crate) fn live_cells(&self) -> usize {
        self.columns
            .iter()
            .map(|cells| cells.iter().filter(|c| c.is_some()).count())
            .sum()
    }
}

/// The heap stores of all three heap-owned value types.
#[derive(Debug, Default)]
pub(crate) struct HeapCells {
    pub(crate) strings: HeapStore<String>,
    pub(crate) guids: HeapStore<Guid>,
    pub(crate) blobs: HeapStore<Blob>,
}

impl HeapCells {
    pub(crate) fn resize(&mut self, capacity: usize) {
        self.strings.resize(capacity);
        self.guids.resize(capacity);
        self.blobs.resize(capacity);
    }

    pub(crate) fn release_row(&mut self, row: usize) {
        self.strings.release_row(row);
        self.guids.release_row(row);
        self.blobs.release_row(row);
    }

    pub(crate) fn copy_row(&mut self, src: usize, dst: usize) {
        self.strings.copy_row(src, dst);
        self.guids.copy_row(src, dst);
        self.blobs.copy_row(src, dst);
    }

    pub(crate) fn clear(&mut self) {
        self.strings.clear();
        self.guids.clear();
        self.blobs.clear();
    }

    pub(crate) fn live_cells(&self) -> usize {
        self.strings.live_cells() + self.guids.live_cells() + self.blobs.live_cells()
    }
}
