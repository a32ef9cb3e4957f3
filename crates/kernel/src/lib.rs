//! World Kernel: authoritative world state, entity behavior, tick stepping,
//! new-world generation.
//!
//! # Invariants
//! - The view entity is always a member of the world's entity list.
//! - Entity ids are unique and strictly increasing; they are never reused.
//! - Structural changes requested during a tick are applied after the pass.

pub mod config;
pub mod entity;
pub mod factory;
pub mod world;

pub use config::{ConfigError, SaveName, WorldConfig, parse_position};
pub use entity::{
    BehaviorError, CommandBuffer, Entity, EntityKind, Sprite, TickContext, WorldCommand,
};
pub use factory::WorldFactory;
pub use world::{StepReport, World, WorldError, WorldEvent};
