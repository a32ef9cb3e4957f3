use glyphworld_common::{EntityId, Position};
use glyphworld_kernel::World;
use std::collections::BTreeMap;

/// World inspector for developer tooling.
///
/// Provides read-only queries against the world state.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let mut by_kind = BTreeMap::new();
        for entity in world.entities() {
            *by_kind.entry(entity.kind.name()).or_insert(0) += 1;
        }
        WorldSummary {
            tick: world.tick(),
            entity_count: world.entity_count(),
            view: world.view_entity().position,
            by_kind,
            pending_events: world.events().len(),
        }
    }

    pub fn inspect_entity(world: &World, id: EntityId) -> Option<EntityInfo> {
        world.get(id).map(|e| EntityInfo {
            id,
            kind: e.kind.name(),
            glyph: e.render().glyph(),
            position: e.position,
            is_view: id == world.view_id(),
        })
    }

    /// All entity ids in update order.
    pub fn list_entities(world: &World) -> Vec<EntityId> {
        world.entities().iter().map(|e| e.id()).collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone)]
pub struct WorldSummary {
    pub tick: u64,
    pub entity_count: usize,
    pub view: Position,
    /// Entity count per kind name.
    pub by_kind: BTreeMap<&'static str, usize>,
    pub pending_events: usize,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: tick={} entities={} view={} pending_events={}",
            self.tick, self.entity_count, self.view, self.pending_events
        )?;
        for (kind, count) in &self.by_kind {
            write!(f, " {kind}={count}")?;
        }
        Ok(())
    }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub id: EntityId,
    pub kind: &'static str,
    pub glyph: char,
    pub position: Position,
    pub is_view: bool,
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entity {} '{}' {} at {}",
            self.id, self.glyph, self.kind, self.position
        )?;
        if self.is_view {
            write!(f, " (view)")?;
        }
        Ok(())
    }
}
