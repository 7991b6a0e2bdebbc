//! Cell codecs.
//!
//! [`PackedCell`] converts fixed-width values to and from their bytes in the
//! packed row buffer. Cells are read and written through byte slices, so
//! vector and matrix cells need no particular alignment within a row.
//!
//! [`CellValue`] is implemented for every type backing a
//! [`ValueType`](engine_attr::ValueType) and routes typed-id access to the
//! matching column accessor.

use engine_attr::{AttrType, Blob, Guid, Mat4, Vec4};

use crate::table::AttributeTable;

/// A fixed-width value stored inline in the packed row buffer.
pub trait PackedCell: AttrType + Copy {
    /// Decode from the first `VALUE_TYPE.byte_size()` bytes of `bytes`.
    fn read(bytes: &[u8]) -> Self;

    /// Encode into the first `VALUE_TYPE.byte_size()` bytes of `bytes`.
    fn write(self, bytes: &mut [u8]);
}

fn read_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut raw = [0u8; N];
    raw.copy_from_slice(&bytes[..N]);
    raw
}

macro_rules! impl_packed_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PackedCell for $ty {
                fn read(bytes: &[u8]) -> Self {
                    <$ty>::from_ne_bytes(read_array(bytes))
                }

                fn write(self, bytes: &mut [u8]) {
                    bytes[..std::mem::size_of::<$ty>()].copy_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

impl_packed_scalar!(i32, u32, i64, u64, f32);

impl PackedCell for bool {
    fn read(bytes: &[u8]) -> Self {
        i32::read(bytes) != 0
    }

    fn write(self, bytes: &mut [u8]) {
        i32::from(self).write(bytes);
    }
}

fn read_floats<const N: usize>(bytes: &[u8]) -> [f32; N] {
    let mut out = [0.0; N];
    for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
        *value = f32::read(chunk);
    }
    out
}

fn write_floats(values: &[f32], bytes: &mut [u8]) {
    for (value, chunk) in values.iter().zip(bytes.chunks_exact_mut(4)) {
        value.write(chunk);
    }
}

impl PackedCell for Vec4 {
    fn read(bytes: &[u8]) -> Self {
        Vec4::from_array(read_floats(bytes))
    }

    fn write(self, bytes: &mut [u8]) {
        write_floats(&self.to_array(), bytes);
    }
}

impl PackedCell for Mat4 {
    fn read(bytes: &[u8]) -> Self {
        Mat4::from_cols_array(&read_floats(bytes))
    }

    fn write(self, bytes: &mut [u8]) {
        write_floats(&self.to_cols_array(), bytes);
    }
}

/// A value type reachable through a [`TypedAttrId`](engine_attr::TypedAttrId).
pub trait CellValue: AttrType {
    /// Read the cell at (`column`, `row`).
    fn load(table: &AttributeTable, column: usize, row: usize) -> Self;

    /// Write the cell at (`column`, `row`).
    fn store(table: &mut AttributeTable, column: usize, row: usize, value: Self);
}

macro_rules! impl_packed_cell_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CellValue for $ty {
                fn load(table: &AttributeTable, column: usize, row: usize) -> Self {
                    table.read_cell(column, row)
                }

                fn store(table: &mut AttributeTable, column: usize, row: usize, value: Self) {
                    table.write_cell(column, row, value);
                }
            }
        )*
    };
}

impl_packed_cell_value!(i32, u32, i64, u64, bool, f32, Vec4, Mat4);

impl CellValue for String {
    fn load(table: &AttributeTable, column: usize, row: usize) -> Self {
        table.get_string(column, row).to_string()
    }

    fn store(table: &mut AttributeTable, column: usize, row: usize, value: Self) {
        table.set_string(column, row, &value);
    }
}

impl CellValue for Guid {
    fn load(table: &AttributeTable, column: usize, row: usize) -> Self {
        table.get_guid(column, row)
    }

    fn store(table: &mut AttributeTable, column: usize, row: usize, value: Self) {
        table.set_guid(column, row, value);
    }
}

impl CellValue for Blob {
    fn load(table: &AttributeTable, column: usize, row: usize) -> Self {
        Blob::from_slice(table.get_blob(column, row))
    }

    fn store(table: &mut AttributeTable, column: usize, row: usize, value: Self) {
        table.set_blob(column, row, &value);
    }
}
