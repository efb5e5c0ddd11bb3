//! Common imports for users of this crate.
//!
//! ```
//! use decs::prelude::*;
//! ```

pub use crate::entity::{Entity, Index, MAX_INDEX};
pub use crate::error::WorldError;
pub use crate::iter::Iter;
pub use crate::World;
