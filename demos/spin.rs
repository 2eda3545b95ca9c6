//! Spin a cube by dragging it with the mouse or a finger.

use bevy::prelude::*;
use bevy_spin_controls::{extensions::spin_to::SpinToTrigger, prelude::*};

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, DefaultSpinControlsPlugins))
        .add_systems(Startup, setup)
        .add_systems(Update, (reset_orientation, log_spin_events))
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let camera = commands
        .spawn((
            Camera3d::default(),
            Transform::from_xyz(0.0, 0.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        ))
        .id();

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(1.5, 1.5, 1.5))),
        MeshMaterial3d(materials.add(Color::srgb(0.8, 0.5, 0.3))),
        Transform::default(),
        SpinControls::new(camera, 1.3),
    ));

    commands.spawn((
        DirectionalLight::default(),
        Transform::from_xyz(3.0, 4.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Press R to spin back to the starting orientation.
fn reset_orientation(
    keys: Res<ButtonInput<KeyCode>>,
    spinning: Query<Entity, With<SpinControls>>,
    mut spin_to: EventWriter<SpinToTrigger>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        for entity in &spinning {
            spin_to.write(SpinToTrigger {
                target_rotation: Quat::IDENTITY,
                entity,
            });
        }
    }
}

fn log_spin_events(mut events: EventReader<SpinEvent>) {
    for event in events.read() {
        if event.kind != SpinEventKind::Change {
            info!("{:?} {:?}", event.entity, event.kind);
        }
    }
}
