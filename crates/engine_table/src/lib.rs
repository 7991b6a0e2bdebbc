//! # engine_table
//!
//! The row/column storage engine underneath the engine's attribute database.
//!
//! An [`AttributeTable`] owns an append-only column schema, a packed row
//! buffer for fixed-width cells, per-column stores for heap-owned cells
//! (strings, GUIDs, blobs) and the change log used by the persistence layer
//! to compute minimal writes.
//!
//! This crate provides:
//!
//! - [`AttributeTable`]: typed cell access, row/column lifecycle, search.
//! - [`TableConfig`]: construction-time options.
//! - [`RowLayout`]: byte offsets and row pitch computed from a schema.
//! - [`Column`]: one schema entry.
//! - [`Entity`]: the non-owning row user-data handle.
//! - [`TableError`]: the contract violations the table reports.
//!
//! Tables are not synchronised; callers serialise access externally.

pub mod cell;
pub mod column;
pub mod config;
pub mod entity;
pub mod error;
pub mod layout;
pub mod table;

mod access;
mod arena;
mod heap;
mod search;
mod tracking;

pub use cell::{CellValue, PackedCell};
pub use column::{CellSlot, Column};
pub use config::TableConfig;
pub use entity::Entity;
pub use error::TableError;
pub use layout::RowLayout;
pub use table::AttributeTable;
