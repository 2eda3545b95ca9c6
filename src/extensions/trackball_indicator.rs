//! A `bevy_spin_controls` extension that draws the silhouette of the trackball while it is being
//! dragged. This shows users how far the pointer is from the edge, where dragging stops tipping
//! the object and starts rolling it.

use bevy_app::prelude::*;
use bevy_color::prelude::*;
use bevy_ecs::prelude::*;
use bevy_gizmos::prelude::*;
use bevy_math::Isometry3d;
use bevy_reflect::prelude::*;
use bevy_transform::{prelude::*, TransformSystem};

use crate::prelude::*;

/// See the [module](self) docs.
pub struct TrackballIndicatorPlugin;

impl Plugin for TrackballIndicatorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PostUpdate,
            draw_trackball.after(TransformSystem::TransformPropagate),
        )
        .register_type::<TrackballIndicator>();
    }
}

/// Optional. Configures whether or not a [`SpinControls`] should show its trackball while
/// dragging. The indicator will be enabled if this component is not present.
#[derive(Debug, Component, Reflect)]
pub struct TrackballIndicator {
    /// Should the indicator be visible for this entity?
    pub enabled: bool,
    /// Color of the silhouette.
    pub color: Color,
}

impl Default for TrackballIndicator {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Color::WHITE,
        }
    }
}

/// Use gizmos to draw the trackball silhouette in world space, facing its camera.
pub fn draw_trackball(
    controls: Query<(
        &SpinControls,
        &GlobalTransform,
        Option<&TrackballIndicator>,
    )>,
    cameras: Query<&GlobalTransform>,
    mut gizmos: Gizmos,
) {
    for (spin_controls, transform, indicator) in controls
        .iter()
        .filter(|(controls, ..)| controls.is_dragging())
        .filter(|(.., indicator)| indicator.map(|i| i.enabled).unwrap_or(true))
    {
        let Some(camera_transform) = spin_controls
            .camera
            .and_then(|camera| cameras.get(camera).ok())
        else {
            continue;
        };
        let (scale, _, center) = transform.to_scale_rotation_translation();
        let radius = spin_controls.trackball_radius * scale.abs().max_element();
        let color = indicator.map(|i| i.color).unwrap_or(Color::WHITE);

        // Circles are drawn in the XY plane of the isometry, which faces the camera when using the
        // camera's rotation.
        gizmos.circle(
            Isometry3d::new(center, camera_transform.rotation()),
            radius,
            color,
        );
    }
}
