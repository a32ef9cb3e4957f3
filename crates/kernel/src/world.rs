use glyphworld_common::{EntityId, IdAllocator, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::entity::{BehaviorError, CommandBuffer, Entity, EntityKind, TickContext, WorldCommand};

/// An event record produced by every mutation to the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Entity was spawned with the given kind and position.
    Spawned {
        id: EntityId,
        kind: EntityKind,
        position: Position,
    },
    /// Entity was removed from the world.
    Despawned { id: EntityId },
    /// Entity position changed.
    Moved {
        id: EntityId,
        from: Position,
        to: Position,
    },
    /// Simulation completed a step; `tick` is the new completed-step count.
    Stepped { tick: u64 },
}

/// Rejected world operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("no entity with id {0}")]
    UnknownEntity(EntityId),
    #[error("entity {0} is the view entity and cannot be removed")]
    ViewEntityRemoval(EntityId),
    #[error("entity {id} at {from} cannot move by ({dx}, {dy}): coordinate overflow")]
    CoordinateOverflow {
        id: EntityId,
        from: Position,
        dx: i32,
        dy: i32,
    },
    #[error("view entity {0} is not part of the entity list")]
    MissingViewEntity(EntityId),
    #[error("view entity {0} must be the first entity")]
    ViewEntityNotFirst(EntityId),
    #[error("entity id {0} appears more than once")]
    DuplicateEntity(EntityId),
    #[error("entity id {id} is not below the allocator's next id {next}")]
    IdAheadOfAllocator { id: EntityId, next: EntityId },
}

/// Outcome of one tick phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Completed-step count after this step.
    pub tick: u64,
    /// Entities whose tick failed. They kept their prior state.
    pub failures: Vec<(EntityId, BehaviorError)>,
    pub spawned: Vec<EntityId>,
    pub despawned: Vec<EntityId>,
}

/// The authoritative world state.
///
/// Entity order is insertion order and is the render and update order. The
/// view entity is always present and always first. Deserialization goes
/// through [`World::from_parts`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "WorldParts")]
pub struct World {
    tick: u64,
    entities: Vec<Entity>,
    view: EntityId,
    ids: IdAllocator,
    /// Append-only event log of all mutations.
    #[serde(skip)]
    event_log: Vec<WorldEvent>,
}

/// Serialized shape of a [`World`], validated before it becomes one.
#[derive(Deserialize)]
struct WorldParts {
    tick: u64,
    entities: Vec<Entity>,
    view: EntityId,
    ids: IdAllocator,
}

impl TryFrom<WorldParts> for World {
    type Error = WorldError;

    fn try_from(parts: WorldParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts.tick, parts.entities, parts.view, parts.ids.peek())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a world at tick 0 whose only entity is a spectator view entity.
    pub fn new() -> Self {
        let mut ids = IdAllocator::new();
        let view = Entity::spectator(&mut ids);
        let view_id = view.id();
        let mut world = Self {
            tick: 0,
            entities: Vec::new(),
            view: view_id,
            ids,
            event_log: Vec::new(),
        };
        world.insert(view);
        world
    }

    /// Rebuild a world from saved parts, checking every structural invariant.
    pub fn from_parts(
        tick: u64,
        entities: Vec<Entity>,
        view: EntityId,
        next_id: EntityId,
    ) -> Result<Self, WorldError> {
        let mut seen = BTreeSet::new();
        for entity in &entities {
            if !seen.insert(entity.id()) {
                return Err(WorldError::DuplicateEntity(entity.id()));
            }
            if entity.id() >= next_id {
                return Err(WorldError::IdAheadOfAllocator {
                    id: entity.id(),
                    next: next_id,
                });
            }
        }
        if !seen.contains(&view) {
            return Err(WorldError::MissingViewEntity(view));
        }
        if entities[0].id() != view {
            return Err(WorldError::ViewEntityNotFirst(view));
        }
        Ok(Self {
            tick,
            entities,
            view,
            ids: IdAllocator::starting_at(next_id.0),
            event_log: Vec::new(),
        })
    }

    /// Number of completed simulation steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// All entities in render/update order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn view_id(&self) -> EntityId {
        self.view
    }

    pub fn view_entity(&self) -> &Entity {
        // every constructor validates that the view entity is first, and
        // despawn refuses to remove it
        debug_assert_eq!(self.entities[0].id(), self.view);
        &self.entities[0]
    }

    /// The id the next spawned entity will receive.
    pub fn next_id(&self) -> EntityId {
        self.ids.peek()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    /// The first solid entity at `position`, ignoring `except`.
    pub fn blocker_at(&self, position: Position, except: EntityId) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.id() != except && e.position == position && e.kind.is_solid())
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Append a new entity at the end of the update order. Returns its id.
    pub fn spawn(&mut self, kind: EntityKind, position: Position) -> EntityId {
        let entity = Entity::new(&mut self.ids, kind, position);
        let id = entity.id();
        self.insert(entity);
        id
    }

    fn insert(&mut self, entity: Entity) {
        self.event_log.push(WorldEvent::Spawned {
            id: entity.id(),
            kind: entity.kind,
            position: entity.position,
        });
        self.entities.push(entity);
    }

    /// Remove an entity, keeping the order of the rest.
    pub fn despawn(&mut self, id: EntityId) -> Result<Entity, WorldError> {
        if id == self.view {
            return Err(WorldError::ViewEntityRemoval(id));
        }
        let index = self
            .entities
            .iter()
            .position(|e| e.id() == id)
            .ok_or(WorldError::UnknownEntity(id))?;
        let removed = self.entities.remove(index);
        self.event_log.push(WorldEvent::Despawned { id });
        Ok(removed)
    }

    /// Place an entity at `to`. Returns its previous position.
    pub fn move_entity(&mut self, id: EntityId, to: Position) -> Result<Position, WorldError> {
        let entity = self
            .entities
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(WorldError::UnknownEntity(id))?;
        let from = entity.position;
        entity.position = to;
        if from != to {
            self.event_log.push(WorldEvent::Moved { id, from, to });
        }
        Ok(from)
    }

    /// Move an entity by `(dx, dy)`. Returns its new position.
    pub fn translate(&mut self, id: EntityId, dx: i32, dy: i32) -> Result<Position, WorldError> {
        let from = self.get(id).ok_or(WorldError::UnknownEntity(id))?.position;
        let to = from
            .checked_offset(dx, dy)
            .ok_or(WorldError::CoordinateOverflow { id, from, dx, dy })?;
        self.move_entity(id, to)?;
        Ok(to)
    }

    /// Advance the simulation by one tick.
    ///
    /// Every entity ticks once, in order, on a copy of itself. A successful
    /// tick commits the copy and its queued commands; a failed one is logged
    /// and leaves the entity as it was. Queued spawns and despawns are
    /// applied after the whole pass, then the tick counter increments.
    pub fn step(&mut self) -> StepReport {
        let ctx = TickContext {
            tick: self.tick,
            view: self.view_entity().position,
        };
        let mut report = StepReport::default();
        let mut deferred = CommandBuffer::new();

        for entity in self.entities.iter_mut() {
            let mut next = entity.clone();
            let mut queued = CommandBuffer::new();
            match next.tick(&ctx, &mut queued) {
                Ok(()) => {
                    if next.position != entity.position {
                        self.event_log.push(WorldEvent::Moved {
                            id: entity.id(),
                            from: entity.position,
                            to: next.position,
                        });
                    }
                    *entity = next;
                    deferred.append(&mut queued);
                }
                Err(e) => {
                    tracing::warn!(entity = %entity.id(), kind = entity.kind.name(), "tick failed: {e}");
                    report.failures.push((entity.id(), e));
                }
            }
        }

        self.apply_deferred(&mut deferred, &mut report);

        self.tick += 1;
        self.event_log.push(WorldEvent::Stepped { tick: self.tick });
        report.tick = self.tick;
        report
    }

    /// Apply queued structural changes in FIFO order.
    fn apply_deferred(&mut self, deferred: &mut CommandBuffer, report: &mut StepReport) {
        for command in deferred.drain() {
            match command {
                WorldCommand::Spawn { kind, position } => {
                    report.spawned.push(self.spawn(kind, position));
                }
                WorldCommand::Despawn(id) => match self.despawn(id) {
                    Ok(_) => report.despawned.push(id),
                    Err(e) => tracing::warn!("deferred despawn rejected: {e}"),
                },
            }
        }
    }
}
