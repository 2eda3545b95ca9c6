//! The trackball spin controller.

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_input::InputSystem;
use bevy_window::RequestRedraw;

pub mod component;
pub mod events;
pub mod inputs;
pub mod momentum;
pub mod projection;
pub mod screen;
pub mod sphere;
pub mod velocity;

use component::SpinControls;

/// Adds the [`SpinControls`] systems and events. Pair it with
/// [`SpinInputPlugin`](crate::input::SpinInputPlugin), or send
/// [`SpinPointerInput`](inputs::SpinPointerInput) events from your own input backend.
pub struct SpinControlsPlugin;

impl Plugin for SpinControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<events::SpinEvent>()
            .add_event::<inputs::SpinPointerInput>()
            .add_event::<RequestRedraw>()
            .add_systems(
                PreUpdate,
                (
                    SpinControls::refresh_frames,
                    SpinControls::handle_pointer_input,
                    SpinControls::update_spin,
                )
                    .chain()
                    .after(InputSystem),
            )
            .register_type::<SpinControls>()
            .register_type::<inputs::SpinPointerInput>();
    }
}
