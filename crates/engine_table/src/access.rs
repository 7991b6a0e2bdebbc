//! Cell accessors.
//!
//! Three ways in, fastest first: typed accessors by column index
//! (`get_int`, `set_string`, ...), typed accessors by [`TypedAttrId`], and
//! the generic [`AttrValue`]/[`Attribute`] path for code that only knows the
//! value type at runtime.
//!
//! Every setter checks the column's value type and that the row is not
//! deleted, then records the write if tracking is enabled.

use engine_attr::{AttrId, AttrValue, Attribute, Blob, Guid, Mat4, TypedAttrId, ValueType, Vec4};

use crate::cell::{CellValue, PackedCell};
use crate::column::CellSlot;
use crate::error::fatal;
use crate::table::AttributeTable;

fn assign_string(cell: &mut Option<String>, value: &str) {
    match cell {
        Some(s) => {
            s.clear();
            s.push_str(value);
        }
        None => *cell = Some(value.to_string()),
    }
}

fn assign_blob(cell: &mut Option<Blob>, value: &[u8]) {
    match cell {
        Some(blob) => blob.assign(value),
        None => *cell = Some(Blob::from_slice(value)),
    }
}

impl AttributeTable {
    #[track_caller]
    fn packed_offset(&self, column: usize, value_type: ValueType) -> usize {
        match self.check_type(column, value_type) {
            CellSlot::Packed { offset } => offset,
            CellSlot::Heap { .. } => unreachable!("{value_type} column stored on the heap"),
        }
    }

    #[track_caller]
    fn heap_store(&self, column: usize, value_type: ValueType) -> usize {
        match self.check_type(column, value_type) {
            CellSlot::Heap { store } => store,
            CellSlot::Packed { .. } => unreachable!("{value_type} column stored inline"),
        }
    }

    fn load_packed<T: PackedCell>(&self, row: usize, offset: usize) -> T {
        T::read(self.arena.cell(row, offset, T::VALUE_TYPE.byte_size()))
    }

    fn store_packed<T: PackedCell>(&mut self, row: usize, offset: usize, value: T) {
        value.write(self.arena.cell_mut(row, offset, T::VALUE_TYPE.byte_size()));
    }

    fn string_at(&self, store: usize, row: usize) -> &str {
        self.heap.strings.cell(store, row).map_or("", String::as_str)
    }

    fn guid_at(&self, store: usize, row: usize) -> Guid {
        self.heap.guids.cell(store, row).copied().unwrap_or_default()
    }

    fn blob_at(&self, store: usize, row: usize) -> &[u8] {
        self.heap
            .blobs
            .cell(store, row)
            .map(Blob::as_slice)
            .unwrap_or_default()
    }

    // -- Packed cells by column index --

    /// Read a fixed-width cell.
    ///
    /// # Panics
    ///
    /// Panics if the column or row is out of range, or the column does not
    /// hold `T`.
    #[must_use]
    #[track_caller]
    pub fn read_cell<T: PackedCell>(&self, column: usize, row: usize) -> T {
        let offset = self.packed_offset(column, T::VALUE_TYPE);
        self.check_row(row);
        self.load_packed(row, offset)
    }

    /// Write a fixed-width cell.
    ///
    /// # Panics
    ///
    /// Panics if the column or row is out of range, the row is deleted, or
    /// the column does not hold `T`.
    #[track_caller]
    pub fn write_cell<T: PackedCell>(&mut self, column: usize, row: usize, value: T) {
        let offset = self.packed_offset(column, T::VALUE_TYPE);
        self.check_writable_row(row);
        self.store_packed(row, offset, value);
        self.touch_row(row);
    }

    /// Read an `Int` cell.
    #[must_use]
    #[track_caller]
    pub fn get_int(&self, column: usize, row: usize) -> i32 {
        self.read_cell(column, row)
    }

    /// Write an `Int` cell.
    #[track_caller]
    pub fn set_int(&mut self, column: usize, row: usize, value: i32) {
        self.write_cell(column, row, value);
    }

    /// Read a `UInt` cell.
    #[must_use]
    #[track_caller]
    pub fn get_uint(&self, column: usize, row: usize) -> u32 {
        self.read_cell(column, row)
    }

    /// Write a `UInt` cell.
    #[track_caller]
    pub fn set_uint(&mut self, column: usize, row: usize, value: u32) {
        self.write_cell(column, row, value);
    }

    /// Read an `Int64` cell.
    #[must_use]
    #[track_caller]
    pub fn get_int64(&self, column: usize, row: usize) -> i64 {
        self.read_cell(column, row)
    }

    /// Write an `Int64` cell.
    #[track_caller]
    pub fn set_int64(&mut self, column: usize, row: usize, value: i64) {
        self.write_cell(column, row, value);
    }

    /// Read a `UInt64` cell.
    #[must_use]
    #[track_caller]
    pub fn get_uint64(&self, column: usize, row: usize) -> u64 {
        self.read_cell(column, row)
    }

    /// Write a `UInt64` cell.
    #[track_caller]
    pub fn set_uint64(&mut self, column: usize, row: usize, value: u64) {
        self.write_cell(column, row, value);
    }

    /// Read a `Bool` cell.
    #[must_use]
    #[track_caller]
    pub fn get_bool(&self, column: usize, row: usize) -> bool {
        self.read_cell(column, row)
    }

    /// Write a `Bool` cell.
    #[track_caller]
    pub fn set_bool(&mut self, column: usize, row: usize, value: bool) {
        self.write_cell(column, row, value);
    }

    /// Read a `Float` cell.
    #[must_use]
    #[track_caller]
    pub fn get_float(&self, column: usize, row: usize) -> f32 {
        self.read_cell(column, row)
    }

    /// Write a `Float` cell.
    #[track_caller]
    pub fn set_float(&mut self, column: usize, row: usize, value: f32) {
        self.write_cell(column, row, value);
    }

    /// Read a `Vec4` cell.
    #[must_use]
    #[track_caller]
    pub fn get_vec4(&self, column: usize, row: usize) -> Vec4 {
        self.read_cell(column, row)
    }

    /// Write a `Vec4` cell.
    #[track_caller]
    pub fn set_vec4(&mut self, column: usize, row: usize, value: Vec4) {
        self.write_cell(column, row, value);
    }

    /// Read a `Mat4` cell.
    #[must_use]
    #[track_caller]
    pub fn get_mat4(&self, column: usize, row: usize) -> Mat4 {
        self.read_cell(column, row)
    }

    /// Write a `Mat4` cell.
    #[track_caller]
    pub fn set_mat4(&mut self, column: usize, row: usize, value: Mat4) {
        self.write_cell(column, row, value);
    }

    // -- Heap cells by column index --

    /// Read a string cell. Released cells read as empty.
    #[must_use]
    #[track_caller]
    pub fn get_string(&self, column: usize, row: usize) -> &str {
        let store = self.heap_store(column, ValueType::String);
        self.check_row(row);
        self.string_at(store, row)
    }

    /// Write a string cell, reusing the existing allocation if there is one.
    #[track_caller]
    pub fn set_string(&mut self, column: usize, row: usize, value: &str) {
        let store = self.heap_store(column, ValueType::String);
        self.check_writable_row(row);
        assign_string(self.heap.strings.cell_mut(store, row), value);
        self.touch_row(row);
    }

    /// Read a GUID cell. Released cells read as the nil GUID.
    #[must_use]
    #[track_caller]
    pub fn get_guid(&self, column: usize, row: usize) -> Guid {
        let store = self.heap_store(column, ValueType::Guid);
        self.check_row(row);
        self.guid_at(store, row)
    }

    /// Write a GUID cell.
    #[track_caller]
    pub fn set_guid(&mut self, column: usize, row: usize, value: Guid) {
        let store = self.heap_store(column, ValueType::Guid);
        self.check_writable_row(row);
        *self.heap.guids.cell_mut(store, row) = Some(value);
        self.touch_row(row);
    }

    /// Read a blob cell. Released cells read as empty.
    #[must_use]
    #[track_caller]
    pub fn get_blob(&self, column: usize, row: usize) -> &[u8] {
        let store = self.heap_store(column, ValueType::Blob);
        self.check_row(row);
        self.blob_at(store, row)
    }

    /// Write a blob cell, reusing the existing allocation if there is one.
    #[track_caller]
    pub fn set_blob(&mut self, column: usize, row: usize, value: &[u8]) {
        let store = self.heap_store(column, ValueType::Blob);
        self.check_writable_row(row);
        assign_blob(self.heap.blobs.cell_mut(store, row), value);
        self.touch_row(row);
    }

    // -- Typed attribute ids --

    /// Read the cell of `attr_id`'s column in `row`.
    ///
    /// # Panics
    ///
    /// Panics if the table has no column for `attr_id` or `row` is out of
    /// range.
    #[must_use]
    #[track_caller]
    pub fn get<T: CellValue>(&self, attr_id: &TypedAttrId<T>, row: usize) -> T {
        let column = self.resolve(attr_id.attr_id());
        T::load(self, column, row)
    }

    /// Write the cell of `attr_id`'s column in `row`.
    ///
    /// # Panics
    ///
    /// Panics if the table has no column for `attr_id`, or `row` is out of
    /// range or deleted.
    #[track_caller]
    pub fn set<T: CellValue>(&mut self, attr_id: &TypedAttrId<T>, row: usize, value: T) {
        let column = self.resolve(attr_id.attr_id());
        T::store(self, column, row, value);
    }

    // -- Generic values --

    /// Read any cell as an [`AttrValue`]. Slow path; allocates for heap types.
    #[must_use]
    #[track_caller]
    pub fn get_value(&self, column: usize, row: usize) -> AttrValue {
        let slot = self.check_column(column).slot();
        self.check_row(row);
        match (self.columns[column].value_type(), slot) {
            (ValueType::Int, CellSlot::Packed { offset }) => {
                AttrValue::Int(self.load_packed(row, offset))
            }
            (ValueType::UInt, CellSlot::Packed { offset }) => {
                AttrValue::UInt(self.load_packed(row, offset))
            }
            (ValueType::Int64, CellSlot::Packed { offset }) => {
                AttrValue::Int64(self.load_packed(row, offset))
            }
            (ValueType::UInt64, CellSlot::Packed { offset }) => {
                AttrValue::UInt64(self.load_packed(row, offset))
            }
            (ValueType::Bool, CellSlot::Packed { offset }) => {
                AttrValue::Bool(self.load_packed(row, offset))
            }
            (ValueType::Float, CellSlot::Packed { offset }) => {
                AttrValue::Float(self.load_packed(row, offset))
            }
            (ValueType::Vec4, CellSlot::Packed { offset }) => {
                AttrValue::Vec4(self.load_packed(row, offset))
            }
            (ValueType::Mat4, CellSlot::Packed { offset }) => {
                AttrValue::Mat4(self.load_packed(row, offset))
            }
            (ValueType::String, CellSlot::Heap { store }) => {
                AttrValue::String(self.string_at(store, row).to_string())
            }
            (ValueType::Guid, CellSlot::Heap { store }) => AttrValue::Guid(self.guid_at(store, row)),
            (ValueType::Blob, CellSlot::Heap { store }) => {
                AttrValue::Blob(Blob::from_slice(self.blob_at(store, row)))
            }
            (value_type, slot) => unreachable!("{value_type} column in {slot:?}"),
        }
    }

    /// Write any cell from an [`AttrValue`] of the column's type.
    ///
    /// # Panics
    ///
    /// Panics on a type mismatch, or if the row is out of range or deleted.
    #[track_caller]
    pub fn set_value(&mut self, column: usize, row: usize, value: &AttrValue) {
        self.check_type(column, value.value_type());
        self.check_writable_row(row);
        self.put_value(column, row, value);
        self.touch_row(row);
    }

    /// Store `value` without checks or change tracking. The caller has
    /// verified the column type and row.
    pub(crate) fn put_value(&mut self, column: usize, row: usize, value: &AttrValue) {
        match (self.columns[column].slot(), value) {
            (CellSlot::Packed { offset }, AttrValue::Int(v)) => self.store_packed(row, offset, *v),
            (CellSlot::Packed { offset }, AttrValue::UInt(v)) => self.store_packed(row, offset, *v),
            (CellSlot::Packed { offset }, AttrValue::Int64(v)) => self.store_packed(row, offset, *v),
            (CellSlot::Packed { offset }, AttrValue::UInt64(v)) => {
                self.store_packed(row, offset, *v)
            }
            (CellSlot::Packed { offset }, AttrValue::Bool(v)) => self.store_packed(row, offset, *v),
            (CellSlot::Packed { offset }, AttrValue::Float(v)) => self.store_packed(row, offset, *v),
            (CellSlot::Packed { offset }, AttrValue::Vec4(v)) => self.store_packed(row, offset, *v),
            (CellSlot::Packed { offset }, AttrValue::Mat4(v)) => self.store_packed(row, offset, *v),
            (CellSlot::Heap { store }, AttrValue::String(v)) => {
                assign_string(self.heap.strings.cell_mut(store, row), v);
            }
            (CellSlot::Heap { store }, AttrValue::Guid(v)) => {
                *self.heap.guids.cell_mut(store, row) = Some(*v);
            }
            (CellSlot::Heap { store }, AttrValue::Blob(v)) => {
                assign_blob(self.heap.blobs.cell_mut(store, row), v);
            }
            (slot, value) => unreachable!("{} value in {slot:?}", value.value_type()),
        }
    }

    /// Returns `true` if the cell equals `value`. A value of another type
    /// never matches.
    pub(crate) fn cell_matches(&self, column: usize, row: usize, value: &AttrValue) -> bool {
        if self.columns[column].value_type() != value.value_type() {
            return false;
        }
        match (self.columns[column].slot(), value) {
            (CellSlot::Packed { offset }, AttrValue::Int(v)) => {
                self.load_packed::<i32>(row, offset) == *v
            }
            (CellSlot::Packed { offset }, AttrValue::UInt(v)) => {
                self.load_packed::<u32>(row, offset) == *v
            }
            (CellSlot::Packed { offset }, AttrValue::Int64(v)) => {
                self.load_packed::<i64>(row, offset) == *v
            }
            (CellSlot::Packed { offset }, AttrValue::UInt64(v)) => {
                self.load_packed::<u64>(row, offset) == *v
            }
            (CellSlot::Packed { offset }, AttrValue::Bool(v)) => {
                self.load_packed::<bool>(row, offset) == *v
            }
            (CellSlot::Packed { offset }, AttrValue::Float(v)) => {
                self.load_packed::<f32>(row, offset) == *v
            }
            (CellSlot::Packed { offset }, AttrValue::Vec4(v)) => {
                self.load_packed::<Vec4>(row, offset) == *v
            }
            (CellSlot::Packed { offset }, AttrValue::Mat4(v)) => {
                self.load_packed::<Mat4>(row, offset) == *v
            }
            (CellSlot::Heap { store }, AttrValue::String(v)) => self.string_at(store, row) == v,
            (CellSlot::Heap { store }, AttrValue::Guid(v)) => self.guid_at(store, row) == *v,
            (CellSlot::Heap { store }, AttrValue::Blob(v)) => self.blob_at(store, row) == v.as_slice(),
            _ => false,
        }
    }

    // -- Attributes --

    fn attribute_at(&self, column: usize, row: usize) -> Attribute {
        let attr_id = self.columns[column].attr_id().clone();
        match Attribute::new(attr_id, self.get_value(column, row)) {
            Ok(attr) => attr,
            Err(err) => fatal(err.into()),
        }
    }

    /// Read the cell of `attr_id`'s column in `row` as an [`Attribute`].
    #[must_use]
    #[track_caller]
    pub fn get_attr(&self, attr_id: &AttrId, row: usize) -> Attribute {
        let column = self.resolve(attr_id);
        self.attribute_at(column, row)
    }

    /// Write `attr` into its column in `row`. Slow path.
    #[track_caller]
    pub fn set_attr(&mut self, attr: &Attribute, row: usize) {
        let column = self.resolve(attr.attr_id());
        self.set_value(column, row, attr.value());
    }

    /// Snapshot every cell of `row`, in column order.
    #[must_use]
    #[track_caller]
    pub fn row_attributes(&self, row: usize) -> Vec<Attribute> {
        self.check_row(row);
        (0..self.columns.len())
            .map(|column| self.attribute_at(column, row))
            .collect()
    }
}
