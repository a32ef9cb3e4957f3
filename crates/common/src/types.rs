use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an entity in the world.
///
/// Ids are handed out by an [`IdAllocator`] and never reused within the
/// allocator's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source owned by whoever constructs entities.
///
/// Each world owns its own allocator. A fresh allocator starts from zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume allocation at `next` (used when restoring a saved world).
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Hand out the next id.
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// The id the next call to [`allocate`](Self::allocate) will return.
    pub fn peek(&self) -> EntityId {
        EntityId(self.next)
    }
}

/// Integer grid coordinates. `y` grows upward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by `(dx, dy)`, or `None` if either axis overflows.
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
