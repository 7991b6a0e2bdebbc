//! Typed values bound to their attribute id.

use serde::{Deserialize, Serialize};

use crate::attr_id::{AttrId, TypedAttrId};
use crate::error::AttrError;
use crate::value::{AttrType, AttrValue};
use crate::value_type::ValueType;

#[derive(Deserialize)]
struct RawAttribute {
    attr_id: AttrId,
    value: AttrValue,
}

/// An [`AttrValue`] bound to the [`AttrId`] it belongs to.
///
/// The value's type always matches the id's declared value type. Attributes
/// are used for generic row access and as search predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAttribute")]
pub struct Attribute {
    attr_id: AttrId,
    value: AttrValue,
}

impl Attribute {
    /// Bind `value` to `attr_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::TypeMismatch`] if the value's type differs from
    /// the id's declared type.
    pub fn new(attr_id: AttrId, value: impl Into<AttrValue>) -> Result<Self, AttrError> {
        let value = value.into();
        check_type(&attr_id, &value)?;
        Ok(Self { attr_id, value })
    }

    /// Bind a statically typed value; cannot fail.
    #[must_use]
    pub fn typed<T: AttrType>(attr_id: &TypedAttrId<T>, value: T) -> Self {
        Self {
            attr_id: attr_id.attr_id().clone(),
            value: value.into_value(),
        }
    }

    /// An attribute holding the id's registered default value.
    #[must_use]
    pub fn default_for(attr_id: AttrId) -> Self {
        let value = attr_id.default_value().clone();
        Self { attr_id, value }
    }

    #[must_use]
    pub fn attr_id(&self) -> &AttrId {
        &self.attr_id
    }

    #[must_use]
    pub fn value(&self) -> &AttrValue {
        &self.value
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.attr_id.value_type()
    }

    /// Replace the value.
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::TypeMismatch`] if the new value has another type.
    pub fn set_value(&mut self, value: impl Into<AttrValue>) -> Result<(), AttrError> {
        let value = value.into();
        check_type(&self.attr_id, &value)?;
        self.value = value;
        Ok(())
    }

    /// Consume the attribute, returning its value.
    #[must_use]
    pub fn into_value(self) -> AttrValue {
        self.value
    }
}

impl TryFrom<RawAttribute> for Attribute {
    type Error = AttrError;

    fn try_from(raw: RawAttribute) -> Result<Self, Self::Error> {
        Self::new(raw.attr_id, raw.value)
    }
}

fn check_type(attr_id: &AttrId, value: &AttrValue) -> Result<(), AttrError> {
    let found = value.value_type();
    if found != attr_id.value_type() {
        return Err(AttrError::TypeMismatch {
            attr: attr_id.name().to_string(),
            expected: attr_id.value_type(),
            found,
        });
    }
    Ok(())
}
