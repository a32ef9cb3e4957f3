//! Persistence: the collaborator interface the core loads and saves worlds
//! through, content-hashed snapshots, and session start-up.
//!
//! # Invariants
//! - Snapshots are verified before a world is restored from them.
//! - A missing save source never fails start-up; a new world is generated.
//!
//! On-disk formats live outside this crate. [`MemoryStore`] keeps snapshots
//! for the lifetime of the process.

mod init;
mod snapshot;
mod store;

pub use init::{InitError, init_world_state};
pub use snapshot::Snapshot;
pub use store::{MemoryStore, PersistError, WorldPersistence};
