use glyphworld_kernel::{ConfigError, SaveName, World, WorldFactory};

use crate::store::{PersistError, WorldPersistence};

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to load world: {0}")]
    Persist(#[from] PersistError),
}

/// Produce the world a session starts from.
///
/// With no `source` a new world is generated. A named source is validated,
/// then loaded; if nothing is saved under that name a new world is generated
/// instead. Any other load failure is returned.
pub fn init_world_state(
    source: Option<&str>,
    persistence: &dyn WorldPersistence,
    factory: &WorldFactory,
) -> Result<World, InitError> {
    let Some(source) = source else {
        return Ok(factory.generate_new_world());
    };
    let name = SaveName::parse(source)?;
    match persistence.load(&name) {
        Ok(world) => {
            tracing::info!(%name, tick = world.tick(), "loaded saved world");
            Ok(world)
        }
        Err(PersistError::NotFound(_)) => {
            tracing::info!(%name, "no saved world, generating a new one");
            Ok(factory.generate_new_world())
        }
        Err(e) => Err(e.into()),
    }
}
