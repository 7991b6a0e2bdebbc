//! Attribute values.
//!
//! [`AttrValue`] is the closed sum type of every cell value an attribute table
//! can hold. [`AttrType`] maps each Rust type that backs a [`ValueType`] to
//! and from its `AttrValue` variant.

use std::fmt;
use std::ops::Deref;

use glam::{Mat4, Vec4};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_type::ValueType;

/// An owned, variable-length byte payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Blob(Vec<u8>);

impl Blob {
    /// Create a blob holding a copy of `bytes`.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Replace the contents with `bytes`, reusing the existing allocation.
    pub fn assign(&mut self, bytes: &[u8]) {
        self.0.clear();
        self.0.extend_from_slice(bytes);
    }

    /// Returns the bytes of this blob.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Consume the blob, returning its bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Blob {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Self {
        Self::from_slice(bytes)
    }
}

/// A single attribute value of any [`ValueType`].
///
/// This is also the boxed "variant" representation used by the generic,
/// slow-path table accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Int(i32),
    UInt(u32),
    Int64(i64),
    UInt64(u64),
    Bool(bool),
    Float(f32),
    Vec4(Vec4),
    Mat4(Mat4),
    String(String),
    Guid(Uuid),
    Blob(Blob),
}

impl AttrValue {
    /// Returns the [`ValueType`] of this value.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Int(_) => ValueType::Int,
            Self::UInt(_) => ValueType::UInt,
            Self::Int64(_) => ValueType::Int64,
            Self::UInt64(_) => ValueType::UInt64,
            Self::Bool(_) => ValueType::Bool,
            Self::Float(_) => ValueType::Float,
            Self::Vec4(_) => ValueType::Vec4,
            Self::Mat4(_) => ValueType::Mat4,
            Self::String(_) => ValueType::String,
            Self::Guid(_) => ValueType::Guid,
            Self::Blob(_) => ValueType::Blob,
        }
    }

    /// Extract a typed copy of this value, or `None` on a type mismatch.
    #[must_use]
    pub fn get<T: AttrType>(&self) -> Option<T> {
        T::from_value(self)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Vec4(v) => write!(f, "{v}"),
            Self::Mat4(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Guid(v) => write!(f, "{v}"),
            Self::Blob(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// A Rust type that backs exactly one [`ValueType`].
pub trait AttrType: Clone + PartialEq + Sized + 'static {
    /// The value type this Rust type represents.
    const VALUE_TYPE: ValueType;

    /// Wrap this value in its [`AttrValue`] variant.
    fn into_value(self) -> AttrValue;

    /// Copy the value out of `value` if it holds this type.
    fn from_value(value: &AttrValue) -> Option<Self>;
}

macro_rules! impl_attr_type {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl AttrType for $ty {
                const VALUE_TYPE: ValueType = ValueType::$variant;

                fn into_value(self) -> AttrValue {
                    AttrValue::$variant(self)
                }

                fn from_value(value: &AttrValue) -> Option<Self> {
                    match value {
                        AttrValue::$variant(v) => Some(Clone::clone(v)),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for AttrValue {
                fn from(value: $ty) -> Self {
                    AttrValue::$variant(value)
                }
            }
        )*
    };
}

impl_attr_type! {
    i32 => Int,
    u32 => UInt,
    i64 => Int64,
    u64 => UInt64,
    bool => Bool,
    f32 => Float,
    Vec4 => Vec4,
    Mat4 => Mat4,
    String => String,
    Uuid => Guid,
    Blob => Blob,
}
