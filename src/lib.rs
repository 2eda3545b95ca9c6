//! A trackball spin controller for bevy.
//!
//! Add [`SpinControls`](controller::component::SpinControls) to an entity to let mouse and touch
//! input spin it. Pointer positions are lifted onto a virtual sphere around the entity (the
//! trackball), and dragging rotates the entity so the point under the pointer follows it. Letting
//! go leaves the entity spinning, slowing down with damping.
//!
//! ```rust,ignore
//! fn setup(mut commands: Commands) {
//!     let camera = commands
//!         .spawn((Camera3d::default(), Transform::from_xyz(0.0, 0.0, 5.0)))
//!         .id();
//!     commands.spawn((
//!         Mesh3d(cube),
//!         SpinControls::new(camera, 1.0),
//!     ));
//! }
//! ```
//!
//! Listen for [`SpinEvent`](controller::events::SpinEvent)s to react to drags and orientation
//! changes.

pub mod controller;
pub mod extensions;
pub mod input;

use bevy_app::{PluginGroup, PluginGroupBuilder};

/// Adds [`controller::SpinControlsPlugin`], [`input::SpinInputPlugin`], and the default
/// extensions.
pub struct DefaultSpinControlsPlugins;

impl PluginGroup for DefaultSpinControlsPlugins {
    fn build(self) -> PluginGroupBuilder {
        let group = PluginGroupBuilder::start::<Self>()
            .add(controller::SpinControlsPlugin)
            .add(input::SpinInputPlugin)
            .add(extensions::spin_to::SpinToPlugin);
        #[cfg(feature = "extension_trackball_indicator")]
        let group = group.add(extensions::trackball_indicator::TrackballIndicatorPlugin);
        group
    }
}

/// Common imports.
pub mod prelude {
    pub use crate::{
        controller::{
            component::SpinControls,
            events::{SpinEvent, SpinEventKind},
            inputs::{PointerPhase, PointerSource, SpinPointerInput},
            momentum::Damping,
            screen::ScreenRect,
            sphere::{SphereMapping, TrackballFrame},
            velocity::OffSilhouette,
            SpinControlsPlugin,
        },
        input::{SpinInputPlugin, SpinInputSettings},
        DefaultSpinControlsPlugins,
    };
}
