//! Table error types.
//!
//! Every [`TableError`] is a contract violation by the calling code. The
//! table reports them through [`fatal`], which logs and panics; only the
//! `try_*` probes hand them back as values.

use engine_attr::{AttrError, ValueType};

/// Misuse of an [`AttributeTable`](crate::AttributeTable).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("column index {index} out of range (table has {count} columns)")]
    ColumnOutOfRange { index: usize, count: usize },

    #[error("row index {index} out of range (table has {count} rows)")]
    RowOutOfRange { index: usize, count: usize },

    #[error("row {0} is deleted")]
    RowDeleted(usize),

    #[error("type mismatch on column '{column}': column holds {expected}, accessor uses {found}")]
    TypeMismatch {
        column: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("column '{0}' does not exist")]
    UnknownColumn(String),

    #[error("begin_add_columns called while already adding columns")]
    NestedAddColumns,

    #[error("end_add_columns called without begin_add_columns")]
    NotAddingColumns,

    #[error("rows cannot be accessed until end_add_columns lays out the new columns")]
    LayoutPending,

    #[error(transparent)]
    Attr(#[from] AttrError),
}

/// Report a contract violation: log it, then panic with its message.
#[cold]
#[track_caller]
pub(crate) fn fatal(err: TableError) -> ! {
    tracing::error!(error = %err, "attribute table contract violation");
    panic!("{err}");
}
