//! # engine_attr
//!
//! The attribute vocabulary of the engine database: what a column is, which
//! values it may hold, and how a single value is bound to its column.
//!
//! This crate provides:
//!
//! - [`ValueType`]: the closed set of cell types and their storage sizes.
//! - [`FourCC`]: four-character codes identifying attributes.
//! - [`AttrId`]: immutable column descriptor (name, code, type, access, default).
//! - [`TypedAttrId`]: an [`AttrId`] whose value type is known statically.
//! - [`AttrValue`]: a single value of any [`ValueType`].
//! - [`Attribute`]: an [`AttrValue`] bound to its [`AttrId`].

pub mod attr_id;
pub mod attribute;
pub mod error;
pub mod fourcc;
pub mod value;
pub mod value_type;

pub use attr_id::{
    AccessMode, AttrId, BlobAttrId, BoolAttrId, FloatAttrId, GuidAttrId, Int64AttrId, IntAttrId,
    Mat4AttrId, StringAttrId, TypedAttrId, UInt64AttrId, UIntAttrId, Vec4AttrId,
};
pub use attribute::Attribute;
pub use error::AttrError;
pub use fourcc::FourCC;
pub use value::{AttrType, AttrValue, Blob};
pub use value_type::ValueType;

// Re-export the concrete value types so callers need not depend on glam/uuid.
pub use glam::{Mat4, Vec4};
pub use uuid::Uuid as Guid;
