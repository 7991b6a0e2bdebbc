//! Linear-scan lookup by attribute value.
//!
//! No secondary index is kept; every search visits each non-deleted row and
//! compares the predicate cells, so cost is O(rows × predicates).

use engine_attr::{AttrValue, Attribute};

use crate::table::AttributeTable;

impl AttributeTable {
    /// Rows, in ascending order, whose cell matches `attr`.
    ///
    /// # Panics
    ///
    /// Panics if the table has no column for the attribute's id.
    #[must_use]
    #[track_caller]
    pub fn find_row_indices_by_attr(&self, attr: &Attribute, first_match_only: bool) -> Vec<usize> {
        self.find_row_indices_by_attrs(std::slice::from_ref(attr), first_match_only)
    }

    /// Rows, in ascending order, matching every attribute in `attrs`.
    ///
    /// # Panics
    ///
    /// Panics if the table has no column for one of the attribute ids.
    #[must_use]
    #[track_caller]
    pub fn find_row_indices_by_attrs(&self, attrs: &[Attribute], first_match_only: bool) -> Vec<usize> {
        let limit = if first_match_only { 1 } else { usize::MAX };
        self.scan(attrs, limit)
    }

    /// The single row matching `attr`, or `None` if zero or several match.
    #[must_use]
    #[track_caller]
    pub fn find_row_index_by_attr(&self, attr: &Attribute) -> Option<usize> {
        self.find_row_index_by_attrs(std::slice::from_ref(attr))
    }

    /// The single row matching every attribute in `attrs`, or `None` if
    /// zero or several match.
    #[must_use]
    #[track_caller]
    pub fn find_row_index_by_attrs(&self, attrs: &[Attribute]) -> Option<usize> {
        match self.scan(attrs, 2).as_slice() {
            [row] => Some(*row),
            _ => None,
        }
    }

    #[track_caller]
    fn scan(&self, attrs: &[Attribute], limit: usize) -> Vec<usize> {
        self.check_layout();
        let predicates: Vec<(usize, &AttrValue)> = attrs
            .iter()
            .map(|attr| (self.resolve(attr.attr_id()), attr.value()))
            .collect();

        (0..self.num_rows)
            .filter(|&row| !self.status.deleted[row])
            .filter(|&row| {
                predicates
                    .iter()
                    .all(|&(column, value)| self.cell_matches(column, row, value))
            })
            .take(limit)
            .collect()
    }
}
