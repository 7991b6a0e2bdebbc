//! Row layout computation.
//!
//! Packed cells are laid out in column order with no padding between them;
//! every packed type is a multiple of 4 bytes wide, and the row pitch is the
//! sum of the packed sizes rounded up to [`ROW_ALIGN`]. Because columns are
//! only ever appended, recomputing the layout never moves an existing
//! column's offset.

use engine_attr::ValueType;

/// Alignment of the row pitch in bytes.
pub const ROW_ALIGN: usize = 4;

/// Aligns `base` up to `align` and returns it.
pub const fn align_to(base: usize, align: usize) -> usize {
    let misalignment = base % align;
    if misalignment == 0 {
        base
    } else {
        base + (align - misalignment)
    }
}

/// Byte offsets of every column within a row, plus the row pitch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowLayout {
    /// Offset of each column's cell, `None` for heap-owned columns.
    pub offsets: Vec<Option<usize>>,
    /// Stride in bytes between consecutive rows.
    pub pitch: usize,
}

impl RowLayout {
    /// Compute the layout for columns of the given types, in order.
    #[must_use]
    pub fn compute(types: impl IntoIterator<Item = ValueType>) -> Self {
        let mut offset = 0;
        let offsets = types
            .into_iter()
            .map(|ty| {
                if ty.is_heap() {
                    return None;
                }
                let at = offset;
                offset += ty.byte_size();
                Some(at)
            })
            .collect();
        Self {
            offsets,
            pitch: align_to(offset, ROW_ALIGN),
        }
    }
}
