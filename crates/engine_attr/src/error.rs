//! Attribute vocabulary error types.

use crate::value_type::ValueType;

/// Errors raised while constructing attribute descriptors or values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttrError {
    /// A four-character code was not exactly four ASCII characters.
    #[error("invalid four-character code: {0:?}")]
    InvalidFourCC(String),

    /// A value type name did not match any [`ValueType`].
    #[error("unknown value type: {0:?}")]
    UnknownValueType(String),

    /// A value's type does not match the type declared by its attribute.
    #[error("type mismatch on attribute '{attr}': expected {expected}, found {found}")]
    TypeMismatch {
        attr: String,
        expected: ValueType,
        found: ValueType,
    },
}
