//! Pointer inputs sent to the controller, and the per-source state tracked during a drag.

use bevy_ecs::prelude::*;
use bevy_math::prelude::*;
use bevy_platform::collections::HashMap;
use bevy_reflect::prelude::*;

use super::sphere::SphereSample;

/// Identifies an input source. Mouse and touch can be active at the same time on hybrid devices,
/// and each touch is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum PointerSource {
    /// The mouse.
    Mouse,
    /// A touch, by touch id.
    Touch(u64),
}

impl PointerSource {
    /// Is this a touch source?
    pub fn is_touch(&self) -> bool {
        matches!(self, PointerSource::Touch(_))
    }
}

/// The stage of a pointer's press, drag, release lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum PointerPhase {
    /// The pointer was pressed.
    Down,
    /// The pointer moved while pressed.
    Move,
    /// The pointer was released or the press was canceled.
    Up,
}

/// A pointer input for all [`SpinControls`](super::component::SpinControls) to consume.
///
/// [`SpinInputPlugin`](crate::input::SpinInputPlugin) sends these from mouse and touch input. Send
/// them yourself to drive the controller from another input backend.
#[derive(Debug, Clone, Copy, PartialEq, Event, Reflect)]
pub struct SpinPointerInput {
    /// The input source.
    pub source: PointerSource,
    /// The lifecycle stage.
    pub phase: PointerPhase,
    /// Pointer position in logical pixels, with the origin at the top left of the window.
    pub position: Vec2,
}

/// The latest state of one pressed pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTrack {
    /// The latest position on the trackball, if the trackball could be hit at that time.
    pub sample: Option<SphereSample>,
    /// When the latest sample was taken, in seconds.
    pub time: f64,
}

/// All pressed pointers, by source.
#[derive(Debug, Default, Clone)]
pub struct PointerTracks(HashMap<PointerSource, PointerTrack>);

impl PointerTracks {
    /// Start tracking a pointer, replacing any stale state for the same source.
    pub fn press(&mut self, source: PointerSource, track: PointerTrack) {
        self.0.insert(source, track);
    }

    /// Stop tracking a pointer, returning its last state if it was tracked.
    pub fn release(&mut self, source: PointerSource) -> Option<PointerTrack> {
        self.0.remove(&source)
    }

    /// The tracked state of a pressed pointer.
    pub fn get_mut(&mut self, source: PointerSource) -> Option<&mut PointerTrack> {
        self.0.get_mut(&source)
    }

    /// Is any pointer pressed?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of pressed pointers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Forget all pointers.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}
