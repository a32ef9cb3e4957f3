use glyphworld_common::{EntityId, Position};
use glyphworld_kernel::{Sprite, World};

/// A sprite together with where, and for whom, it was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedSprite {
    pub entity: EntityId,
    pub position: Position,
    pub sprite: Sprite,
}

/// One render pass over the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Completed-step count the frame was captured at.
    pub tick: u64,
    /// Position of the view entity.
    pub view: Position,
    /// Sprites in entity order.
    pub sprites: Vec<PlacedSprite>,
}

impl Frame {
    /// Ask every entity for its sprite, in entity order.
    pub fn capture(world: &World) -> Self {
        let sprites = world
            .entities()
            .iter()
            .map(|e| PlacedSprite {
                entity: e.id(),
                position: e.position,
                sprite: e.render(),
            })
            .collect();
        Self {
            tick: world.tick(),
            view: world.view_entity().position,
            sprites,
        }
    }

    /// The glyph sequence of this frame, in entity order.
    pub fn glyphs(&self) -> Vec<char> {
        self.sprites.iter().map(|s| s.sprite.glyph()).collect()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}
