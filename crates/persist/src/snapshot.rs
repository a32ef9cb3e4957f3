use glyphworld_common::EntityId;
use glyphworld_kernel::{Entity, World};
use serde::{Deserialize, Serialize};

use crate::store::PersistError;

/// A content-addressed snapshot of the world state at a specific tick.
///
/// The hash covers the JSON encoding of every other field, enabling
/// corruption detection on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Completed-step count at capture time.
    pub tick: u64,
    pub view: EntityId,
    /// Allocator position, so restored worlds never reuse an id.
    pub next_id: EntityId,
    /// Entities in update order.
    pub entities: Vec<Entity>,
    /// FNV-1a over the serialized contents.
    pub hash: u64,
}

impl Snapshot {
    /// Create a snapshot from the current world state.
    pub fn capture(world: &World) -> Result<Self, PersistError> {
        let tick = world.tick();
        let view = world.view_id();
        let next_id = world.next_id();
        let entities = world.entities().to_vec();
        let hash = content_hash(tick, view, next_id, &entities)?;
        Ok(Self {
            tick,
            view,
            next_id,
            entities,
            hash,
        })
    }

    /// Recompute the hash and compare it with the stored one.
    pub fn verify(&self) -> Result<(), PersistError> {
        let actual = content_hash(self.tick, self.view, self.next_id, &self.entities)?;
        if actual != self.hash {
            return Err(PersistError::Integrity {
                expected: self.hash,
                actual,
            });
        }
        Ok(())
    }

    /// Verify, then rebuild the world this snapshot was taken from.
    pub fn restore(&self) -> Result<World, PersistError> {
        self.verify()?;
        let world = World::from_parts(self.tick, self.entities.clone(), self.view, self.next_id)?;
        Ok(world)
    }
}

fn content_hash(
    tick: u64,
    view: EntityId,
    next_id: EntityId,
    entities: &[Entity],
) -> Result<u64, PersistError> {
    let bytes = serde_json::to_vec(&(tick, view, next_id, entities))?;
    Ok(fnv1a_hash(&bytes))
}

/// FNV-1a hash for content addressing. Detects corruption, not tampering.
fn fnv1a_hash(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in data {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}
