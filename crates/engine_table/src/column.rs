//! Schema entries.

use engine_attr::{AccessMode, AttrId, FourCC, ValueType};

/// Where a column's cells live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellSlot {
    /// Inside the packed row buffer, at this byte offset within each row.
    Packed { offset: usize },
    /// In the heap store of the column's type, at this store index.
    Heap { store: usize },
}

/// One column of an attribute table.
#[derive(Debug, Clone)]
pub struct Column {
    attr_id: AttrId,
    slot: CellSlot,
}

impl Column {
    pub(crate) fn new(attr_id: AttrId, slot: CellSlot) -> Self {
        Self { attr_id, slot }
    }

    #[must_use]
    pub fn attr_id(&self) -> &AttrId {
        &self.attr_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.attr_id.name()
    }

    #[must_use]
    pub fn fourcc(&self) -> FourCC {
        self.attr_id.fourcc()
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.attr_id.value_type()
    }

    #[must_use]
    pub fn access_mode(&self) -> AccessMode {
        self.attr_id.access_mode()
    }

    #[must_use]
    pub fn slot(&self) -> CellSlot {
        self.slot
    }

    /// Byte offset within a row, `None` for heap-owned columns.
    #[must_use]
    pub fn byte_offset(&self) -> Option<usize> {
        match self.slot {
            CellSlot::Packed { offset } => Some(offset),
            CellSlot::Heap { .. } => None,
        }
    }

    pub(crate) fn set_offset(&mut self, offset: usize) {
        self.slot = CellSlot::Packed { offset };
    }
}
