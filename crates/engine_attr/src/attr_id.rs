//! Attribute identifiers.
//!
//! An [`AttrId`] is the immutable descriptor of one attribute column: its
//! name, four-character code, value type, access mode and default value. Ids
//! are shared by reference counting so tables, attributes and predicates can
//! all hold the same descriptor cheaply.
//!
//! [`TypedAttrId`] wraps an `AttrId` whose value type is checked once at
//! construction, so typed accessors need no runtime type argument.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use glam::{Mat4, Vec4};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AttrError;
use crate::fourcc::FourCC;
use crate::value::{AttrType, AttrValue, Blob};
use crate::value_type::ValueType;

/// Whether a column may be written by code outside its owning table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessMode {
    #[default]
    ReadOnly,
    ReadWrite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AttrIdDef {
    name: String,
    fourcc: FourCC,
    value_type: ValueType,
    access_mode: AccessMode,
    default_value: AttrValue,
}

/// Immutable descriptor of an attribute column.
///
/// Two ids are equal when both their name and four-character code match.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "AttrIdDef", into = "AttrIdDef")]
pub struct AttrId(Arc<AttrIdDef>);

impl AttrId {
    /// Create an id whose default is the zero value of `value_type`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        fourcc: FourCC,
        value_type: ValueType,
        access_mode: AccessMode,
    ) -> Self {
        Self(Arc::new(AttrIdDef {
            name: name.into(),
            fourcc,
            value_type,
            access_mode,
            default_value: value_type.default_value(),
        }))
    }

    /// Create an id with an explicit default; the value type is taken from
    /// the default.
    #[must_use]
    pub fn with_default(
        name: impl Into<String>,
        fourcc: FourCC,
        access_mode: AccessMode,
        default_value: impl Into<AttrValue>,
    ) -> Self {
        let default_value = default_value.into();
        Self(Arc::new(AttrIdDef {
            name: name.into(),
            fourcc,
            value_type: default_value.value_type(),
            access_mode,
            default_value,
        }))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    #[must_use]
    pub fn fourcc(&self) -> FourCC {
        self.0.fourcc
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.0.value_type
    }

    #[must_use]
    pub fn access_mode(&self) -> AccessMode {
        self.0.access_mode
    }

    /// Returns `true` if this column may be written externally.
    #[must_use]
    pub fn is_read_write(&self) -> bool {
        self.0.access_mode == AccessMode::ReadWrite
    }

    /// The value every new cell of this column starts with.
    #[must_use]
    pub fn default_value(&self) -> &AttrValue {
        &self.0.default_value
    }
}

impl PartialEq for AttrId {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.fourcc == other.0.fourcc && self.0.name == other.0.name)
    }
}

impl Eq for AttrId {}

impl Hash for AttrId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.fourcc.hash(state);
        self.0.name.hash(state);
    }
}

impl fmt::Debug for AttrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttrId")
            .field("name", &self.0.name)
            .field("fourcc", &self.0.fourcc)
            .field("value_type", &self.0.value_type)
            .field("access_mode", &self.0.access_mode)
            .finish()
    }
}

impl fmt::Display for AttrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

impl TryFrom<AttrIdDef> for AttrId {
    type Error = AttrError;

    fn try_from(def: AttrIdDef) -> Result<Self, Self::Error> {
        let found = def.default_value.value_type();
        if found != def.value_type {
            return Err(AttrError::TypeMismatch {
                attr: def.name,
                expected: def.value_type,
                found,
            });
        }
        Ok(Self(Arc::new(def)))
    }
}

impl From<AttrId> for AttrIdDef {
    fn from(id: AttrId) -> Self {
        Arc::unwrap_or_clone(id.0)
    }
}

/// An [`AttrId`] statically known to hold values of type `T`.
pub struct TypedAttrId<T> {
    id: AttrId,
    _marker: PhantomData<fn() -> T>,
}

pub type IntAttrId = TypedAttrId<i32>;
pub type UIntAttrId = TypedAttrId<u32>;
pub type Int64AttrId = TypedAttrId<i64>;
pub type UInt64AttrId = TypedAttrId<u64>;
pub type BoolAttrId = TypedAttrId<bool>;
pub type FloatAttrId = TypedAttrId<f32>;
pub type Vec4AttrId = TypedAttrId<Vec4>;
pub type Mat4AttrId = TypedAttrId<Mat4>;
pub type StringAttrId = TypedAttrId<String>;
pub type GuidAttrId = TypedAttrId<Uuid>;
pub type BlobAttrId = TypedAttrId<Blob>;

impl<T: AttrType> TypedAttrId<T> {
    /// Wrap `id`, checking that it holds values of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::TypeMismatch`] if the id's value type differs.
    pub fn new(id: AttrId) -> Result<Self, AttrError> {
        if id.value_type() != T::VALUE_TYPE {
            return Err(AttrError::TypeMismatch {
                attr: id.name().to_string(),
                expected: T::VALUE_TYPE,
                found: id.value_type(),
            });
        }
        Ok(Self {
            id,
            _marker: PhantomData,
        })
    }

    /// Create a new id of type `T` with an explicit default.
    #[must_use]
    pub fn with_default(
        name: impl Into<String>,
        fourcc: FourCC,
        access_mode: AccessMode,
        default_value: T,
    ) -> Self {
        Self {
            id: AttrId::with_default(name, fourcc, access_mode, default_value.into_value()),
            _marker: PhantomData,
        }
    }

    /// Returns the untyped descriptor.
    #[must_use]
    pub fn attr_id(&self) -> &AttrId {
        &self.id
    }
}

impl<T> Clone for TypedAttrId<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for TypedAttrId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for TypedAttrId<T> {}

impl<T> fmt::Debug for TypedAttrId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedAttrId").field(&self.id).finish()
    }
}

impl<T> Deref for TypedAttrId<T> {
    type Target = AttrId;

    fn deref(&self) -> &AttrId {
        &self.id
    }
}

impl<T: AttrType> TryFrom<AttrId> for TypedAttrId<T> {
    type Error = AttrError;

    fn try_from(id: AttrId) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl<T> From<TypedAttrId<T>> for AttrId {
    fn from(id: TypedAttrId<T>) -> Self {
        id.id
    }
}
