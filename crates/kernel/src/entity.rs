use glyphworld_common::{EntityId, IdAllocator, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single display glyph produced by an entity for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sprite {
    glyph: char,
}

impl Sprite {
    pub const fn new(glyph: char) -> Self {
        Self { glyph }
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }
}

impl fmt::Display for Sprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph)
    }
}

/// Behavior variant of an entity. Closed set: every match over it is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Unspecialized entity.
    Generic,
    /// Static terrain decoration.
    Grass,
    /// Camera / viewpoint. Always constructed at the origin.
    Spectator,
    /// Moves by `(dx, dy)` every tick. With a lifetime, removes itself once it
    /// has drifted that many ticks.
    Drifter {
        dx: i32,
        dy: i32,
        lifetime: Option<u32>,
    },
}

impl EntityKind {
    /// Glyph table for every variant.
    pub fn sprite(&self) -> Sprite {
        match self {
            Self::Generic => Sprite::new('X'),
            Self::Grass => Sprite::new('.'),
            Self::Spectator => Sprite::new('O'),
            Self::Drifter { .. } => Sprite::new('*'),
        }
    }

    /// Whether the entity occupies its cell. Terrain can be walked over.
    pub fn is_solid(&self) -> bool {
        match self {
            Self::Generic | Self::Spectator | Self::Drifter { .. } => true,
            Self::Grass => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Grass => "grass",
            Self::Spectator => "spectator",
            Self::Drifter { .. } => "drifter",
        }
    }
}

/// Read-only view of the world handed to entities during the tick pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickContext {
    /// Number of completed steps before this one.
    pub tick: u64,
    /// Position of the view entity at the start of the pass.
    pub view: Position,
}

/// Structural change requested by an entity during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldCommand {
    Spawn { kind: EntityKind, position: Position },
    Despawn(EntityId),
}

/// FIFO queue of structural changes, applied once the tick pass completes.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<WorldCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, kind: EntityKind, position: Position) {
        self.commands.push(WorldCommand::Spawn { kind, position });
    }

    pub fn despawn(&mut self, id: EntityId) {
        self.commands.push(WorldCommand::Despawn(id));
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Move every command from `other` onto the end of this buffer.
    pub fn append(&mut self, other: &mut CommandBuffer) {
        self.commands.append(&mut other.commands);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, WorldCommand> {
        self.commands.drain(..)
    }
}

/// A single entity's tick failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BehaviorError {
    #[error("entity {id} at {from} cannot move by ({dx}, {dy}): coordinate overflow")]
    CoordinateOverflow {
        id: EntityId,
        from: Position,
        dx: i32,
        dy: i32,
    },
}

/// A simulated object with identity, grid position, and behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    pub position: Position,
    pub kind: EntityKind,
}

impl Entity {
    /// Construct an entity with the next id from `ids`.
    ///
    /// A [`EntityKind::Spectator`] ignores `position` and starts at the origin.
    pub fn new(ids: &mut IdAllocator, kind: EntityKind, position: Position) -> Self {
        let position = match kind {
            EntityKind::Spectator => Position::ORIGIN,
            _ => position,
        };
        Self {
            id: ids.allocate(),
            position,
            kind,
        }
    }

    pub fn spectator(ids: &mut IdAllocator) -> Self {
        Self::new(ids, EntityKind::Spectator, Position::ORIGIN)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn render(&self) -> Sprite {
        self.kind.sprite()
    }

    /// Advance one simulation step. Structural changes go through `commands`.
    pub fn tick(
        &mut self,
        _ctx: &TickContext,
        commands: &mut CommandBuffer,
    ) -> Result<(), BehaviorError> {
        match &mut self.kind {
            EntityKind::Generic | EntityKind::Grass | EntityKind::Spectator => Ok(()),
            EntityKind::Drifter { dx, dy, lifetime } => {
                let (dx, dy) = (*dx, *dy);
                self.position = self.position.checked_offset(dx, dy).ok_or(
                    BehaviorError::CoordinateOverflow {
                        id: self.id,
                        from: self.position,
                        dx,
                        dy,
                    },
                )?;
                if let Some(remaining) = lifetime {
                    *remaining = remaining.saturating_sub(1);
                    if *remaining == 0 {
                        commands.despawn(self.id);
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TickContext {
        TickContext {
            tick: 0,
            view: Position::ORIGIN,
        }
    }

    #[test]
    fn ids_strictly_increase_in_construction_order() {
        let mut ids = IdAllocator::new();
        let built: Vec<Entity> = (0..10)
            .map(|i| Entity::new(&mut ids, EntityKind::Grass, Position::new(i, i)))
            .collect();
        for pair in built.windows(2) {
            assert!(pair[0].id() < pair[1].id());
        }
    }

    #[test]
    fn render_is_deterministic_per_variant() {
        let mut ids = IdAllocator::new();
        let generic = Entity::new(&mut ids, EntityKind::Generic, Position::new(1, 2));
        let grass = Entity::new(&mut ids, EntityKind::Grass, Position::new(10, 10));
        let spectator = Entity::spectator(&mut ids);
        for _ in 0..2 {
            assert_eq!(generic.render().glyph(), 'X');
            assert_eq!(grass.render().glyph(), '.');
            assert_eq!(spectator.render().glyph(), 'O');
        }
    }

    #[test]
    fn only_terrain_is_walkable() {
        assert!(!EntityKind::Grass.is_solid());
        assert!(EntityKind::Generic.is_solid());
        assert!(EntityKind::Spectator.is_solid());
        let drifter = EntityKind::Drifter {
            dx: 0,
            dy: 0,
            lifetime: None,
        };
        assert!(drifter.is_solid());
    }

    #[test]
    fn spectator_always_starts_at_origin() {
        let mut ids = IdAllocator::new();
        let s = Entity::new(&mut ids, EntityKind::Spectator, Position::new(5, 5));
        assert_eq!(s.position, Position::ORIGIN);
    }

    #[test]
    fn static_variants_do_not_change_on_tick() {
        let mut ids = IdAllocator::new();
        let mut commands = CommandBuffer::new();
        for kind in [EntityKind::Generic, EntityKind::Grass, EntityKind::Spectator] {
            let mut e = Entity::new(&mut ids, kind, Position::new(3, 4));
            let before = e.clone();
            e.tick(&ctx(), &mut commands).unwrap();
            assert_eq!(e, before);
        }
        assert!(commands.is_empty());
    }

    #[test]
    fn drifter_moves_each_tick() {
        let mut ids = IdAllocator::new();
        let kind = EntityKind::Drifter {
            dx: 1,
            dy: -1,
            lifetime: None,
        };
        let mut e = Entity::new(&mut ids, kind, Position::new(0, 0));
        let mut commands = CommandBuffer::new();
        e.tick(&ctx(), &mut commands).unwrap();
        e.tick(&ctx(), &mut commands).unwrap();
        assert_eq!(e.position, Position::new(2, -2));
        assert!(commands.is_empty());
    }

    #[test]
    fn drifter_requests_despawn_when_lifetime_runs_out() {
        let mut ids = IdAllocator::new();
        let kind = EntityKind::Drifter {
            dx: 0,
            dy: 1,
            lifetime: Some(2),
        };
        let mut e = Entity::new(&mut ids, kind, Position::ORIGIN);
        let mut commands = CommandBuffer::new();
        e.tick(&ctx(), &mut commands).unwrap();
        assert!(commands.is_empty());
        e.tick(&ctx(), &mut commands).unwrap();
        let queued: Vec<_> = commands.drain().collect();
        assert_eq!(queued, vec![WorldCommand::Despawn(e.id())]);
    }

    #[test]
    fn drifter_overflow_is_a_behavior_error() {
        let mut ids = IdAllocator::new();
        let kind = EntityKind::Drifter {
            dx: 1,
            dy: 0,
            lifetime: None,
        };
        let mut e = Entity::new(&mut ids, kind, Position::new(i32::MAX, 0));
        let err = e.tick(&ctx(), &mut CommandBuffer::new()).unwrap_err();
        assert!(matches!(err, BehaviorError::CoordinateOverflow { dx: 1, .. }));
    }

    #[test]
    fn command_buffer_append_keeps_fifo_order() {
        let mut a = CommandBuffer::new();
        let mut b = CommandBuffer::new();
        a.despawn(EntityId(1));
        b.spawn(EntityKind::Grass, Position::new(1, 1));
        b.despawn(EntityId(2));
        a.append(&mut b);
        assert!(b.is_empty());
        let all: Vec<_> = a.drain().collect();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], WorldCommand::Despawn(EntityId(1)));
        assert_eq!(all[2], WorldCommand::Despawn(EntityId(2)));
    }

    #[test]
    fn sprite_display_is_the_glyph() {
        assert_eq!(EntityKind::Grass.sprite().to_string(), ".");
    }
}
