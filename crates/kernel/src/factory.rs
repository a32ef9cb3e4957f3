use crate::config::{ConfigError, WorldConfig};
use crate::entity::EntityKind;
use crate::world::World;

/// Builds fresh worlds from a validated [`WorldConfig`].
#[derive(Debug, Clone)]
pub struct WorldFactory {
    config: WorldConfig,
}

impl WorldFactory {
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// A new world at tick 0: the spectator view entity first, then one grass
    /// per configured starter position. Same config, same world.
    pub fn generate_new_world(&self) -> World {
        let mut world = World::new();
        for position in &self.config.starter_grass {
            world.spawn(EntityKind::Grass, *position);
        }
        tracing::info!(entities = world.entity_count(), "generated new world");
        world
    }
}

impl Default for WorldFactory {
    fn default() -> Self {
        Self {
            config: WorldConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphworld_common::{EntityId, Position};

    #[test]
    fn default_world_matches_starter_layout() {
        let world = WorldFactory::default().generate_new_world();
        assert_eq!(world.tick(), 0);
        let layout: Vec<(EntityId, EntityKind, Position)> = world
            .entities()
            .iter()
            .map(|e| (e.id(), e.kind, e.position))
            .collect();
        assert_eq!(
            layout,
            vec![
                (EntityId(0), EntityKind::Spectator, Position::new(0, 0)),
                (EntityId(1), EntityKind::Grass, Position::new(10, 10)),
            ]
        );
    }

    #[test]
    fn view_entity_is_a_member_and_first() {
        let world = WorldFactory::default().generate_new_world();
        assert_eq!(world.entities()[0].id(), world.view_id());
        assert!(world.get(world.view_id()).is_some());
    }

    #[test]
    fn first_render_pass_glyphs() {
        let world = WorldFactory::default().generate_new_world();
        let glyphs: String = world.entities().iter().map(|e| e.render().glyph()).collect();
        assert_eq!(glyphs, "O.");
    }

    #[test]
    fn generation_is_deterministic() {
        let factory = WorldFactory::new(WorldConfig {
            starter_grass: vec![Position::new(1, 2), Position::new(-4, 0)],
        })
        .unwrap();
        let a = factory.generate_new_world();
        let b = factory.generate_new_world();
        assert_eq!(a.entities(), b.entities());
        assert_eq!(a.next_id(), b.next_id());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = WorldFactory::new(WorldConfig {
            starter_grass: vec![Position::ORIGIN, Position::ORIGIN],
        });
        assert!(result.is_err());
    }
}
