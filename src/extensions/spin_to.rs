//! A `bevy_spin_controls` extension that smoothly rotates a spun entity until it reaches a given
//! orientation.

use std::time::Duration;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_math::{
    curve::{Curve, EaseFunction, EasingCurve},
    prelude::*,
};
use bevy_platform::collections::HashMap;
use bevy_reflect::prelude::*;
use bevy_time::prelude::*;
use bevy_transform::prelude::*;
use bevy_window::RequestRedraw;

use crate::prelude::*;

/// See the [module](self) docs.
pub struct SpinToPlugin;

impl Plugin for SpinToPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpinTo>()
            .add_event::<SpinToTrigger>()
            .add_systems(
                PreUpdate,
                SpinTo::update.after(SpinControls::update_spin),
            )
            .add_systems(PostUpdate, SpinToTrigger::receive) // In PostUpdate so we don't miss users sending this in Update. SpinTo::update will catch the changes next frame.
            .register_type::<SpinTo>();
    }
}

/// Send this event to rotate an entity with [`SpinControls`] until it has the given orientation.
/// Any spin is canceled. Animation speed is configured with the [`SpinTo`] resource.
#[derive(Debug, Event)]
pub struct SpinToTrigger {
    /// The orientation to end at.
    pub target_rotation: Quat,
    /// The entity to rotate.
    pub entity: Entity,
}

impl SpinToTrigger {
    fn receive(
        mut triggers: EventReader<Self>,
        mut state: ResMut<SpinTo>,
        mut controls: Query<(&mut SpinControls, &Transform)>,
        mut events: EventWriter<SpinEvent>,
        mut redraw: EventWriter<RequestRedraw>,
        time: Res<Time>,
    ) {
        for trigger in triggers.read() {
            let Ok((mut controls, transform)) = controls.get_mut(trigger.entity) else {
                continue;
            };
            redraw.write(RequestRedraw);
            controls.cancel_spin();

            let entry = SpinToEntry {
                start: time.elapsed_secs_f64(),
                initial_rotation: transform.rotation.normalize(),
                target_rotation: trigger.target_rotation.normalize(),
                complete: false,
            };
            if state.map.insert(trigger.entity, entry).is_none() {
                events.write(SpinEvent {
                    entity: trigger.entity,
                    kind: SpinEventKind::Start,
                });
            }
        }
    }
}

struct SpinToEntry {
    start: f64,
    initial_rotation: Quat,
    target_rotation: Quat,
    complete: bool,
}

/// Stores settings and state for the spin to plugin.
#[derive(Resource, Reflect)]
pub struct SpinTo {
    /// The duration of the "spin to" transition animation.
    pub animation_duration: Duration,
    /// The easing function used to animate the rotation.
    pub ease: EaseFunction,
    #[reflect(ignore)]
    map: HashMap<Entity, SpinToEntry>,
}

impl Default for SpinTo {
    fn default() -> Self {
        Self {
            animation_duration: Duration::from_millis(400),
            ease: EaseFunction::CubicInOut,
            map: Default::default(),
        }
    }
}

impl SpinTo {
    /// Is the entity being rotated by a "spin to" animation?
    pub fn is_animating(&self, entity: Entity) -> bool {
        self.map.contains_key(&entity)
    }

    fn update(
        mut state: ResMut<Self>,
        mut controls: Query<(&mut Transform, &SpinControls)>,
        mut events: EventWriter<SpinEvent>,
        mut redraw: EventWriter<RequestRedraw>,
        time: Res<Time>,
    ) {
        let animation_duration = state.animation_duration.as_secs_f64();
        let curve = EasingCurve::new(0.0, 1.0, state.ease);
        let now = time.elapsed_secs_f64();

        for (
            entity,
            SpinToEntry {
                start,
                initial_rotation,
                target_rotation,
                complete,
            },
        ) in state.map.iter_mut()
        {
            let end = SpinEvent {
                entity: *entity,
                kind: SpinEventKind::End,
            };
            let Ok((mut transform, controls)) = controls.get_mut(*entity) else {
                *complete = true;
                events.write(end);
                continue;
            };
            // Grabbing the trackball takes over.
            if controls.is_dragging() {
                *complete = true;
                events.write(end);
                continue;
            }

            let progress_t = if animation_duration > 0.0 {
                ((now - *start) / animation_duration).clamp(0.0, 1.0) as f32
            } else {
                1.0
            };
            let progress = curve.sample_clamped(progress_t);

            transform.rotation = initial_rotation.slerp(*target_rotation, progress).normalize();
            redraw.write(RequestRedraw);
            events.write(SpinEvent {
                entity: *entity,
                kind: SpinEventKind::Change,
            });

            if progress_t >= 1.0 {
                *complete = true;
                events.write(end);
            }
        }
        state.map.retain(|_, v| !v.complete);
    }
}
