//! Row user-data handles.
//!
//! Each table row can carry one [`Entity`] back-reference for the caller.
//! The table stores the handle but never owns or resolves what it points to.
//! A row without user data holds `None`; there is no null handle, so
//! `Option<Entity>` stays the size of a `u64`.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

/// A caller-defined back-reference attached to a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(NonZeroU64);

impl Entity {
    /// Wrap a raw identifier. Zero is reserved for "no user data".
    #[must_use]
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl From<NonZeroU64> for Entity {
    fn from(id: NonZeroU64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
