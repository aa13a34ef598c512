// End to end runs through a headless app: interactions grow and unwind the
// spiral, size edits rebuild the template, toggle changes outrank size
// changes within one notification.

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy_spiral_cubes::attributes::SIZE_KEY;
use bevy_spiral_cubes::prelude::*;

fn app_with_session() -> (App, Entity) {
    let mut app = App::new();
    app.add_plugins(SpiralPlugin::default());
    let target = app
        .world_mut()
        .spawn((DynamicAttributes::new(100.0), SpiralSession::new()))
        .id();
    // First update seeds the watcher cache from the fresh dictionary.
    app.update();
    (app, target)
}

fn interact(app: &mut App, target: Entity) {
    let mut attrs = app
        .world_mut()
        .get_mut::<DynamicAttributes>(target)
        .unwrap();
    attrs.interact();
}

fn count_instances(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<(), With<CubeInstance>>()
        .iter(app.world())
        .count()
}

#[test]
fn forward_run_stamps_one_copy_per_frame_up_to_the_bound() {
    let (mut app, target) = app_with_session();

    interact(&mut app, target);
    app.update();
    assert_eq!(count_instances(&mut app), 1);

    for _ in 0..63 {
        app.update();
    }
    assert_eq!(count_instances(&mut app), 64);

    // Further frames stamp nothing once the run is complete.
    for _ in 0..10 {
        app.update();
    }
    assert_eq!(count_instances(&mut app), 64);

    let session = app.world().get::<SpiralSession>(target).unwrap();
    assert!(session.animator().is_idle());
    assert_eq!(session.copies().len(), 64);
}

#[test]
fn reverse_run_unwinds_symmetrically_in_lifo_order() {
    let (mut app, target) = app_with_session();

    interact(&mut app, target);
    for _ in 0..70 {
        app.update();
    }
    let built: Vec<Entity> = app
        .world()
        .get::<SpiralSession>(target)
        .unwrap()
        .copies()
        .to_vec();
    assert_eq!(built.len(), 64);

    interact(&mut app, target);
    app.update();

    // The most recently stamped copy goes first.
    let remaining: Vec<Entity> = app
        .world()
        .get::<SpiralSession>(target)
        .unwrap()
        .copies()
        .to_vec();
    assert_eq!(remaining, built[..63].to_vec());
    assert!(app.world().get_entity(*built.last().unwrap()).is_err());

    for _ in 0..70 {
        app.update();
    }
    assert_eq!(count_instances(&mut app), 0);
    assert!(app
        .world()
        .get::<SpiralSession>(target)
        .unwrap()
        .copies()
        .is_empty());
}

#[test]
fn size_changes_rebuild_the_template() {
    let (mut app, target) = app_with_session();

    app.world_mut()
        .get_mut::<DynamicAttributes>(target)
        .unwrap()
        .set(SIZE_KEY, "40");
    app.update();

    assert_eq!(app.world().resource::<CubeTemplate>().size(), 40.0);
    assert_eq!(count_instances(&mut app), 0);
}

#[test]
fn toggle_changes_take_priority_over_size_changes() {
    let (mut app, target) = app_with_session();

    {
        let mut attrs = app
            .world_mut()
            .get_mut::<DynamicAttributes>(target)
            .unwrap();
        attrs.set(SIZE_KEY, "250");
        attrs.interact();
    }
    app.update();

    // Only the toggle branch fired: the run started, the template did not
    // rebuild.
    assert_eq!(count_instances(&mut app), 1);
    assert_eq!(app.world().resource::<CubeTemplate>().size(), 100.0);

    // A later notification with the toggle unchanged picks the size up.
    app.world_mut()
        .get_mut::<DynamicAttributes>(target)
        .unwrap()
        .set(SIZE_KEY, "250");
    app.update();
    assert_eq!(app.world().resource::<CubeTemplate>().size(), 250.0);
}

#[test]
fn reset_discards_copies_mid_run() {
    let (mut app, target) = app_with_session();

    interact(&mut app, target);
    for _ in 0..10 {
        app.update();
    }
    assert_eq!(count_instances(&mut app), 10);

    let reset_all = |mut commands: Commands, mut sessions: Query<&mut SpiralSession>| {
        for mut session in &mut sessions {
            session.reset(&mut commands);
        }
    };
    app.world_mut().run_system_once(reset_all).unwrap();
    assert_eq!(count_instances(&mut app), 0);

    let session = app.world().get::<SpiralSession>(target).unwrap();
    assert!(session.animator().is_idle());
    assert!(session.copies().is_empty());

    // Resetting an already idle, empty session changes nothing.
    app.world_mut().run_system_once(reset_all).unwrap();
    assert_eq!(count_instances(&mut app), 0);
}

#[test]
fn sessions_can_override_the_base_config() {
    let mut app = App::new();
    app.add_plugins(SpiralPlugin::default());
    let target = app
        .world_mut()
        .spawn((
            DynamicAttributes::new(100.0),
            SpiralSession::with_config(SpiralConfig {
                max_steps: 8,
                ..SpiralConfig::default()
            }),
        ))
        .id();
    app.update();

    interact(&mut app, target);
    for _ in 0..20 {
        app.update();
    }
    assert_eq!(count_instances(&mut app), 8);
}

#[test]
fn copies_are_parented_to_the_session_entity() {
    let (mut app, target) = app_with_session();

    interact(&mut app, target);
    for _ in 0..5 {
        app.update();
    }

    let copies: Vec<Entity> = app
        .world()
        .get::<SpiralSession>(target)
        .unwrap()
        .copies()
        .to_vec();
    assert_eq!(copies.len(), 5);
    for cube in copies {
        assert_eq!(
            app.world().get::<ChildOf>(cube).map(ChildOf::parent),
            Some(target)
        );
    }
}
