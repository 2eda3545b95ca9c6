//! The default input backend. Turns mouse and touch input into
//! [`SpinPointerInput`](crate::controller::inputs::SpinPointerInput) events.

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_input::{prelude::*, touch::Touches, InputSystem};
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;
use bevy_window::{PrimaryWindow, Window};

use crate::controller::{
    component::SpinControls,
    inputs::{PointerPhase, PointerSource, SpinPointerInput},
};

/// See the [module](self) docs.
pub struct SpinInputPlugin;

impl Plugin for SpinInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpinInputSettings>()
            .add_systems(
                PreUpdate,
                send_pointer_inputs
                    .after(InputSystem)
                    .before(SpinControls::handle_pointer_input),
            )
            .register_type::<SpinInputSettings>();
    }
}

/// Settings for [`SpinInputPlugin`].
#[derive(Debug, Clone, Resource, Reflect)]
pub struct SpinInputSettings {
    /// The mouse button that grabs the trackball.
    pub mouse_button: MouseButton,
    /// Should touches grab the trackball?
    pub touch: bool,
}

impl Default for SpinInputSettings {
    fn default() -> Self {
        Self {
            mouse_button: MouseButton::Left,
            touch: true,
        }
    }
}

/// Send at most one [`SpinPointerInput`] per pointer and phase each frame.
pub fn send_pointer_inputs(
    settings: Res<SpinInputSettings>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut last_cursor: Local<Option<Vec2>>,
    mut inputs: EventWriter<SpinPointerInput>,
) {
    let cursor = windows
        .single()
        .ok()
        .and_then(|window| window.cursor_position());
    let mut send = |source, phase, position| {
        inputs.write(SpinPointerInput {
            source,
            phase,
            position,
        });
    };

    let button = settings.mouse_button;
    if let Some(position) = cursor {
        if mouse.just_pressed(button) {
            send(PointerSource::Mouse, PointerPhase::Down, position);
        } else if mouse.pressed(button) && Some(position) != *last_cursor {
            send(PointerSource::Mouse, PointerPhase::Move, position);
        }
    }
    if mouse.just_released(button) {
        // Releasing outside the window must still end the drag.
        let position = cursor.or(*last_cursor).unwrap_or_default();
        send(PointerSource::Mouse, PointerPhase::Up, position);
    }
    *last_cursor = cursor.or(*last_cursor);

    if !settings.touch {
        return;
    }
    for touch in touches.iter_just_pressed() {
        send(PointerSource::Touch(touch.id()), PointerPhase::Down, touch.position());
    }
    for touch in touches.iter() {
        if !touches.just_pressed(touch.id()) && touch.delta() != Vec2::ZERO {
            send(PointerSource::Touch(touch.id()), PointerPhase::Move, touch.position());
        }
    }
    for touch in touches
        .iter_just_released()
        .chain(touches.iter_just_canceled())
    {
        send(PointerSource::Touch(touch.id()), PointerPhase::Up, touch.position());
    }
}
