use glyphworld_kernel::{SaveName, World, WorldError};
use std::collections::BTreeMap;

use crate::snapshot::Snapshot;

/// Errors from persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("no saved world named {0}")]
    NotFound(SaveName),
    #[error("integrity check failed: expected {expected:#018x}, got {actual:#018x}")]
    Integrity { expected: u64, actual: u64 },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("saved world violates world invariants: {0}")]
    Corrupt(#[from] WorldError),
}

/// Persistence collaborator: loads and saves whole worlds by name.
pub trait WorldPersistence {
    fn load(&self, name: &SaveName) -> Result<World, PersistError>;
    fn save(&mut self, world: &World, name: &SaveName) -> Result<(), PersistError>;
}

/// In-memory snapshot store.
///
/// Snapshots live as long as the store. Every load verifies the snapshot hash
/// before restoring.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: BTreeMap<SaveName, Snapshot>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots stored.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn get_snapshot(&self, name: &SaveName) -> Option<&Snapshot> {
        self.snapshots.get(name)
    }

    /// Store a snapshot as-is, replacing any existing one under `name`.
    pub fn insert_snapshot(&mut self, name: SaveName, snapshot: Snapshot) {
        self.snapshots.insert(name, snapshot);
    }
}

impl WorldPersistence for MemoryStore {
    fn load(&self, name: &SaveName) -> Result<World, PersistError> {
        let snapshot = self
            .snapshots
            .get(name)
            .ok_or_else(|| PersistError::NotFound(name.clone()))?;
        let world = snapshot.restore()?;
        tracing::debug!(%name, tick = world.tick(), "restored world");
        Ok(world)
    }

    fn save(&mut self, world: &World, name: &SaveName) -> Result<(), PersistError> {
        let snapshot = Snapshot::capture(world)?;
        tracing::debug!(%name, tick = snapshot.tick, hash = snapshot.hash, "saved world");
        self.snapshots.insert(name.clone(), snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphworld_common::Position;
    use glyphworld_kernel::{EntityKind, WorldFactory};

    fn name(s: &str) -> SaveName {
        SaveName::parse(s).unwrap()
    }

    #[test]
    fn missing_name_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.load(&name("slot1")),
            Err(PersistError::NotFound(_))
        ));
    }

    #[test]
    fn save_and_load() {
        let mut store = MemoryStore::new();
        let mut world = WorldFactory::default().generate_new_world();
        world.spawn(EntityKind::Generic, Position::new(-2, 5));
        world.step();

        store.save(&world, &name("slot1")).unwrap();
        assert_eq!(store.snapshot_count(), 1);

        let loaded = store.load(&name("slot1")).unwrap();
        assert_eq!(loaded.tick(), 1);
        assert_eq!(loaded.entities(), world.entities());
    }

    #[test]
    fn save_overwrites_same_name() {
        let mut store = MemoryStore::new();
        let mut world = WorldFactory::default().generate_new_world();
        store.save(&world, &name("slot1")).unwrap();
        world.step();
        store.save(&world, &name("slot1")).unwrap();
        assert_eq!(store.snapshot_count(), 1);
        assert_eq!(store.get_snapshot(&name("slot1")).unwrap().tick, 1);
    }

    #[test]
    fn tampered_snapshot_fails_closed() {
        let mut store = MemoryStore::new();
        let world = WorldFactory::default().generate_new_world();
        let mut snap = Snapshot::capture(&world).unwrap();
        snap.entities[1].position = Position::new(0, 0);
        store.insert_snapshot(name("slot1"), snap);

        assert!(matches!(
            store.load(&name("slot1")),
            Err(PersistError::Integrity { .. })
        ));
    }
}
