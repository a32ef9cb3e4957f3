//! Shared types for the glyphworld workspace: entity identity and grid positions.

mod types;

pub use types::{EntityId, IdAllocator, Position};
