//! The closed set of attribute value types.
//!
//! Every column of an attribute table holds exactly one [`ValueType`]. Fixed
//! width types are packed into the table's row buffer; the heap-owned types
//! (`String`, `Guid`, `Blob`) are kept in per-column side stores and take no
//! space in the packed row.

use std::fmt;
use std::str::FromStr;

use glam::{Mat4, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::AttrError;
use crate::value::{AttrValue, Blob};

/// The type of value stored in an attribute column.
///
/// Entity references are stored as [`ValueType::UInt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Int,
    UInt,
    Int64,
    UInt64,
    /// Stored as a 4-byte integer to keep rows 4-byte aligned.
    Bool,
    Float,
    Vec4,
    Mat4,
    String,
    Guid,
    Blob,
}

impl ValueType {
    /// Every value type, in declaration order.
    pub const ALL: [ValueType; 11] = [
        ValueType::Int,
        ValueType::UInt,
        ValueType::Int64,
        ValueType::UInt64,
        ValueType::Bool,
        ValueType::Float,
        ValueType::Vec4,
        ValueType::Mat4,
        ValueType::String,
        ValueType::Guid,
        ValueType::Blob,
    ];

    /// Size in bytes of one cell of this type inside the packed row buffer.
    ///
    /// Heap-owned types return `0`.
    #[must_use]
    pub const fn byte_size(self) -> usize {
        match self {
            Self::Int | Self::UInt | Self::Bool | Self::Float => 4,
            Self::Int64 | Self::UInt64 => 8,
            Self::Vec4 => 16,
            Self::Mat4 => 64,
            Self::String | Self::Guid | Self::Blob => 0,
        }
    }

    /// Returns `true` for types whose cells own a heap allocation.
    #[must_use]
    pub const fn is_heap(self) -> bool {
        matches!(self, Self::String | Self::Guid | Self::Blob)
    }

    /// The canonical name of this type (e.g. `"Float"`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::UInt => "UInt",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Bool => "Bool",
            Self::Float => "Float",
            Self::Vec4 => "Vec4",
            Self::Mat4 => "Mat4",
            Self::String => "String",
            Self::Guid => "Guid",
            Self::Blob => "Blob",
        }
    }

    /// The zero value of this type, used when an attribute registers no
    /// default of its own.
    ///
    /// Matrices default to identity rather than all zeros.
    #[must_use]
    pub fn default_value(self) -> AttrValue {
        match self {
            Self::Int => AttrValue::Int(0),
            Self::UInt => AttrValue::UInt(0),
            Self::Int64 => AttrValue::Int64(0),
            Self::UInt64 => AttrValue::UInt64(0),
            Self::Bool => AttrValue::Bool(false),
            Self::Float => AttrValue::Float(0.0),
            Self::Vec4 => AttrValue::Vec4(Vec4::ZERO),
            Self::Mat4 => AttrValue::Mat4(Mat4::IDENTITY),
            Self::String => AttrValue::String(String::new()),
            Self::Guid => AttrValue::Guid(uuid::Uuid::nil()),
            Self::Blob => AttrValue::Blob(Blob::default()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = AttrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| AttrError::UnknownValueType(s.to_string()))
    }
}
