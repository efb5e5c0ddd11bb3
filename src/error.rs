//! The crate's error type.
//!
//! [`World::new`](crate::World::new) is the single fallible construction
//! path in the crate; every other operation signals failure through
//! `Option`/`bool`/no-op rather than a catchable error, so no broader error
//! enum is needed.

use std::error::Error as StdError;
use std::fmt;

/// Failure constructing a [`World`](crate::World).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    /// `max_entities`, `max_components`, or `max_tags` was zero.
    ZeroCapacity,
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::ZeroCapacity => write!(
                f,
                "World capacity (max_entities, max_components, max_tags) must all be non-zero"
            ),
        }
    }
}

impl StdError for WorldError {}
