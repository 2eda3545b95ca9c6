//! Notifications sent by the controller.

use bevy_ecs::prelude::*;
use bevy_reflect::prelude::*;

/// Sent when a [`SpinControls`](super::component::SpinControls) starts a drag, changes the
/// orientation of its entity, or ends a drag. Redraw on [`SpinEventKind::Change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Event)]
pub struct SpinEvent {
    /// The entity being spun.
    pub entity: Entity,
    /// What happened.
    pub kind: SpinEventKind,
}

/// The kind of [`SpinEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum SpinEventKind {
    /// A pointer grabbed the trackball.
    Start,
    /// The orientation changed noticeably.
    Change,
    /// The last pointer let go of the trackball.
    End,
}
