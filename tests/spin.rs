use std::time::Duration;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_input::InputPlugin;
use bevy_math::prelude::*;
use bevy_spin_controls::{
    extensions::spin_to::{SpinTo, SpinToPlugin, SpinToTrigger},
    prelude::*,
};
use bevy_time::{TimePlugin, TimeUpdateStrategy};
use bevy_transform::prelude::*;

const FRAME: f32 = 1.0 / 60.0;
const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;

#[derive(Resource, Default)]
struct Collected(Vec<SpinEventKind>);

fn collect(mut events: EventReader<SpinEvent>, mut collected: ResMut<Collected>) {
    collected.0.extend(events.read().map(|event| event.kind));
}

fn app() -> App {
    let mut app = App::new();
    app.add_plugins((
        TimePlugin,
        InputPlugin,
        SpinControlsPlugin,
        SpinInputPlugin,
        SpinToPlugin,
    ))
    .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
        FRAME,
    )))
    .init_resource::<Collected>()
    .add_systems(Last, collect);
    app
}

fn spawn(app: &mut App, mut controls: SpinControls) -> Entity {
    controls.screen = ScreenRect::new(0.0, 0.0, WIDTH, HEIGHT);
    let entity = app
        .world_mut()
        .spawn((Transform::default(), GlobalTransform::default(), controls))
        .id();
    // The first frame has no elapsed time.
    app.update();
    entity
}

fn undamped() -> SpinControls {
    let mut controls = SpinControls::default();
    controls.damping.enabled = false;
    controls
}

/// Screen position of a point in normalized device coordinates.
fn screen(ndc: Vec2) -> Vec2 {
    Vec2::new((ndc.x + 1.0) * WIDTH / 2.0, (1.0 - ndc.y) * HEIGHT / 2.0)
}

/// Send mouse inputs that all arrive within one frame, then run that frame.
fn send_frame(app: &mut App, inputs: &[(PointerPhase, Vec2)]) {
    for &(phase, ndc) in inputs {
        app.world_mut().send_event(SpinPointerInput {
            source: PointerSource::Mouse,
            phase,
            position: screen(ndc),
        });
    }
    app.update();
}

fn send(app: &mut App, phase: PointerPhase, ndc: Vec2) {
    send_frame(app, &[(phase, ndc)]);
}

fn take_events(app: &mut App) -> Vec<SpinEventKind> {
    std::mem::take(&mut app.world_mut().resource_mut::<Collected>().0)
}

fn rotation(app: &App, entity: Entity) -> Quat {
    app.world().get::<Transform>(entity).unwrap().rotation
}

fn controls(app: &App, entity: Entity) -> &SpinControls {
    app.world().get::<SpinControls>(entity).unwrap()
}

#[test]
fn drag_spins_about_up() {
    let mut app = app();
    let entity = spawn(&mut app, undamped());

    send(&mut app, PointerPhase::Down, Vec2::ZERO);
    assert!(controls(&app, entity).is_dragging());
    send(&mut app, PointerPhase::Move, Vec2::new(0.1, 0.0));

    assert_eq!(
        take_events(&mut app),
        vec![SpinEventKind::Start, SpinEventKind::Change]
    );
    let (axis, angle) = rotation(&app, entity).to_axis_angle();
    assert!(axis.abs_diff_eq(Vec3::Y, 1e-3), "{axis:?}");
    assert!(angle > 0.0 && angle < 0.2, "{angle}");

    // A flick: the pointer is still moving in the frame it is released.
    send_frame(
        &mut app,
        &[
            (PointerPhase::Move, Vec2::new(0.2, 0.0)),
            (PointerPhase::Up, Vec2::new(0.2, 0.0)),
        ],
    );
    assert_eq!(
        take_events(&mut app),
        vec![SpinEventKind::Change, SpinEventKind::End]
    );
    assert!(!controls(&app, entity).is_dragging());

    // Without damping the spin carries on after release.
    let released = rotation(&app, entity);
    app.update();
    assert_ne!(rotation(&app, entity), released);
    assert!(controls(&app, entity).angular_velocity().length() > 0.0);
}

#[test]
fn click_does_not_spin() {
    let mut app = app();
    let entity = spawn(&mut app, SpinControls::default());

    send(&mut app, PointerPhase::Down, Vec2::new(0.2, 0.2));
    for _ in 0..3 {
        app.update();
    }
    send(&mut app, PointerPhase::Up, Vec2::new(0.2, 0.2));
    for _ in 0..10 {
        app.update();
    }

    assert_eq!(
        take_events(&mut app),
        vec![SpinEventKind::Start, SpinEventKind::End]
    );
    assert_eq!(controls(&app, entity).angular_velocity(), Vec3::ZERO);
    assert_eq!(rotation(&app, entity), Quat::IDENTITY);
}

#[test]
fn release_after_holding_still_does_not_spin() {
    let mut app = app();
    let entity = spawn(&mut app, undamped());

    send(&mut app, PointerPhase::Down, Vec2::ZERO);
    send(&mut app, PointerPhase::Move, Vec2::new(0.3, 0.0));
    assert!(controls(&app, entity).angular_velocity().length() > 0.0);
    for _ in 0..120 {
        app.update();
    }
    let held = rotation(&app, entity);

    send(&mut app, PointerPhase::Up, Vec2::new(0.3, 0.0));
    app.update();

    assert_eq!(controls(&app, entity).angular_velocity(), Vec3::ZERO);
    assert_eq!(rotation(&app, entity), held);
}

#[test]
fn spin_decays_after_release() {
    let mut app = app();
    let entity = spawn(&mut app, SpinControls::default());
    let damping = controls(&app, entity).damping;

    app.world_mut()
        .get_mut::<SpinControls>(entity)
        .unwrap()
        .set_angular_velocity(Vec3::Y);

    let mut speed = 1.0;
    for _ in 0..60 {
        app.update();
        let velocity = controls(&app, entity).angular_velocity();
        assert!(velocity.length() < speed);
        assert!(velocity.y > 0.0);
        speed = velocity.length();
    }

    let expected = damping.multiplier(FRAME, 1.0).powi(60);
    assert!((speed - expected).abs() < 1e-4, "{speed} vs {expected}");
    assert!((rotation(&app, entity).length() - 1.0).abs() < 1e-6);
    assert!(take_events(&mut app)
        .iter()
        .all(|kind| *kind == SpinEventKind::Change));
}

#[test]
fn disabled_controls_ignore_pointers() {
    let mut app = app();
    let mut disabled = SpinControls::default();
    disabled.enabled = false;
    let entity = spawn(&mut app, disabled);

    send(&mut app, PointerPhase::Down, Vec2::ZERO);
    send(&mut app, PointerPhase::Move, Vec2::new(0.3, 0.1));
    send(&mut app, PointerPhase::Up, Vec2::new(0.3, 0.1));

    assert!(take_events(&mut app).is_empty());
    assert_eq!(rotation(&app, entity), Quat::IDENTITY);
}

#[test]
fn presses_outside_the_screen_are_ignored() {
    let mut app = app();
    let entity = spawn(&mut app, SpinControls::default());

    send(&mut app, PointerPhase::Down, Vec2::new(1.5, 0.0));

    assert!(take_events(&mut app).is_empty());
    assert!(!controls(&app, entity).is_dragging());
}

#[test]
fn axis_constraint_limits_spin() {
    let mut app = app();
    let entity = spawn(&mut app, undamped().with_axis_constraint(Vec3::X * 2.0));

    send(&mut app, PointerPhase::Down, Vec2::ZERO);
    send(&mut app, PointerPhase::Move, Vec2::new(0.1, 0.1));

    let (axis, angle) = rotation(&app, entity).to_axis_angle();
    // Dragging up tips the front of the trackball up, a negative turn about +X.
    assert!(axis.abs_diff_eq(Vec3::NEG_X, 1e-4), "{axis:?}");
    assert!(angle > 0.0);
}

#[test]
fn spin_to_reaches_target() {
    let mut app = app();
    let entity = spawn(&mut app, SpinControls::default());
    app.world_mut()
        .get_mut::<SpinControls>(entity)
        .unwrap()
        .set_angular_velocity(Vec3::X * 3.0);

    let target = Quat::from_rotation_y(1.0);
    app.world_mut().send_event(SpinToTrigger {
        target_rotation: target,
        entity,
    });
    for _ in 0..40 {
        app.update();
    }

    assert!(rotation(&app, entity).abs_diff_eq(target, 1e-4));
    assert_eq!(controls(&app, entity).angular_velocity(), Vec3::ZERO);
    let events = take_events(&mut app);
    assert!(events.contains(&SpinEventKind::Start));
    assert_eq!(events.last(), Some(&SpinEventKind::End));
}

#[test]
fn grabbing_ends_spin_to() {
    let mut app = app();
    let entity = spawn(&mut app, SpinControls::default());
    app.world_mut().send_event(SpinToTrigger {
        target_rotation: Quat::from_rotation_x(1.0),
        entity,
    });
    for _ in 0..5 {
        app.update();
    }
    assert!(app.world().resource::<SpinTo>().is_animating(entity));

    send(&mut app, PointerPhase::Down, Vec2::ZERO);

    assert!(!app.world().resource::<SpinTo>().is_animating(entity));
    let events = take_events(&mut app);
    let starts = events.iter().filter(|kind| **kind == SpinEventKind::Start);
    let ends = events.iter().filter(|kind| **kind == SpinEventKind::End);
    // The animation and the drag each started once; only the animation has ended.
    assert_eq!(starts.count(), 2);
    assert_eq!(ends.count(), 1);
    assert_eq!(events.last(), Some(&SpinEventKind::End));
}
