use glyphworld_common::Position;
use glyphworld_input::InputEvent;
use glyphworld_kernel::World;

/// What the loop should do after processing an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Continue,
    Exit,
}

/// Apply one input event to the world.
///
/// May move the view entity, spawn, or despawn; never renders or ticks.
/// Rejected operations are logged and leave the world unchanged. The view
/// cannot move onto a cell held by a solid entity.
pub fn process_input(world: &mut World, event: Option<InputEvent>) -> Directive {
    let Some(event) = event else {
        return Directive::Continue;
    };
    match event {
        InputEvent::Move { dx, dy } => match world.view_entity().position.checked_offset(dx, dy) {
            Some(to) => move_view(world, to),
            None => tracing::warn!(dx, dy, "move rejected: coordinate overflow"),
        },
        InputEvent::Goto { x, y } => move_view(world, Position::new(x, y)),
        InputEvent::Spawn { kind, position } => {
            let id = world.spawn(kind, position);
            tracing::info!(entity = %id, kind = kind.name(), %position, "spawned entity");
        }
        InputEvent::Despawn(id) => match world.despawn(id) {
            Ok(_) => tracing::info!(entity = %id, "despawned entity"),
            Err(e) => tracing::warn!("despawn rejected: {e}"),
        },
        InputEvent::Wait => {}
        InputEvent::Quit => return Directive::Exit,
    }
    Directive::Continue
}

fn move_view(world: &mut World, to: Position) {
    let view = world.view_id();
    if let Some(blocker) = world.blocker_at(to, view) {
        tracing::warn!(%to, blocker = %blocker.id(), "move rejected: cell occupied");
        return;
    }
    match world.move_entity(view, to) {
        Ok(_) => tracing::debug!(%to, "view moved"),
        Err(e) => tracing::warn!("move rejected: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphworld_common::EntityId;
    use glyphworld_kernel::{EntityKind, WorldFactory};

    #[test]
    fn no_event_changes_nothing() {
        let mut world = WorldFactory::default().generate_new_world();
        let before = world.entities().to_vec();
        assert_eq!(process_input(&mut world, None), Directive::Continue);
        assert_eq!(world.entities(), &before[..]);
        assert_eq!(world.tick(), 0);
    }

    #[test]
    fn move_targets_the_view_entity() {
        let mut world = WorldFactory::default().generate_new_world();
        process_input(&mut world, Some(InputEvent::Move { dx: 3, dy: -2 }));
        assert_eq!(world.view_entity().position, Position::new(3, -2));
        assert_eq!(world.entities()[1].position, Position::new(10, 10));
    }

    #[test]
    fn goto_moves_the_view_to_an_absolute_cell() {
        let mut world = WorldFactory::default().generate_new_world();
        process_input(&mut world, Some(InputEvent::Move { dx: 1, dy: 1 }));
        process_input(&mut world, Some(InputEvent::Goto { x: -5, y: 8 }));
        assert_eq!(world.view_entity().position, Position::new(-5, 8));
    }

    #[test]
    fn view_walks_over_terrain() {
        let mut world = WorldFactory::default().generate_new_world();
        process_input(&mut world, Some(InputEvent::Goto { x: 10, y: 10 }));
        assert_eq!(world.view_entity().position, Position::new(10, 10));
    }

    #[test]
    fn occupied_cells_block_the_view() {
        let mut world = WorldFactory::default().generate_new_world();
        world.spawn(EntityKind::Generic, Position::new(1, 0));
        process_input(&mut world, Some(InputEvent::Goto { x: 1, y: 0 }));
        assert_eq!(world.view_entity().position, Position::ORIGIN);
        process_input(&mut world, Some(InputEvent::Move { dx: 1, dy: 0 }));
        assert_eq!(world.view_entity().position, Position::ORIGIN);
        process_input(&mut world, Some(InputEvent::Move { dx: 0, dy: 1 }));
        assert_eq!(world.view_entity().position, Position::new(0, 1));
    }

    #[test]
    fn move_overflow_is_rejected() {
        let mut world = WorldFactory::default().generate_new_world();
        process_input(&mut world, Some(InputEvent::Goto { x: i32::MAX, y: 0 }));
        process_input(&mut world, Some(InputEvent::Move { dx: 1, dy: 0 }));
        assert_eq!(world.view_entity().position, Position::new(i32::MAX, 0));
    }

    #[test]
    fn spawn_appends_in_order() {
        let mut world = WorldFactory::default().generate_new_world();
        process_input(
            &mut world,
            Some(InputEvent::Spawn {
                kind: EntityKind::Generic,
                position: Position::new(4, 4),
            }),
        );
        assert_eq!(world.entity_count(), 3);
        let last = world.entities().last().unwrap();
        assert_eq!(last.kind, EntityKind::Generic);
        assert_eq!(last.id(), EntityId(2));
    }

    #[test]
    fn despawning_the_view_entity_is_ignored() {
        let mut world = WorldFactory::default().generate_new_world();
        let view = world.view_id();
        assert_eq!(
            process_input(&mut world, Some(InputEvent::Despawn(view))),
            Directive::Continue
        );
        assert!(world.get(view).is_some());
    }

    #[test]
    fn despawn_removes_other_entities() {
        let mut world = WorldFactory::default().generate_new_world();
        process_input(&mut world, Some(InputEvent::Despawn(EntityId(1))));
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn quit_requests_exit_without_mutation() {
        let mut world = WorldFactory::default().generate_new_world();
        assert_eq!(
            process_input(&mut world, Some(InputEvent::Quit)),
            Directive::Exit
        );
        assert_eq!(world.tick(), 0);
    }
}
