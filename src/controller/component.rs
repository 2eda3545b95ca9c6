//! The primary [`Component`] of the controller, [`SpinControls`].

use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_reflect::prelude::*;
use bevy_render::prelude::*;
use bevy_time::prelude::*;
use bevy_transform::prelude::*;
use bevy_window::{PrimaryWindow, RequestRedraw, Window};

use super::{
    events::{SpinEvent, SpinEventKind},
    inputs::{PointerPhase, PointerSource, PointerTrack, PointerTracks, SpinPointerInput},
    momentum::{Damping, SpinMomentum},
    projection::trackball_frame,
    screen::ScreenRect,
    sphere::{SphereMapping, TrackballFrame},
    velocity::{estimate_angular_velocity, OffSilhouette},
};

/// Lets pointers spin the entity it is added to, as if the entity were held inside a trackball.
///
/// Dragging rotates the entity's [`Transform::rotation`] so the point of the trackball under the
/// pointer follows it. Letting go leaves the trackball spinning, slowed down by [`Damping`].
///
/// # Moving the Trackball
///
/// [`SpinInputPlugin`](crate::input::SpinInputPlugin) turns mouse and touch input into
/// [`SpinPointerInput`] events, which every [`SpinControls`] consumes. To drive it manually, send
/// those events yourself, or call [`SpinControls::pointer_down`], [`SpinControls::pointer_move`],
/// and [`SpinControls::pointer_up`] with positions in normalized device coordinates.
///
/// Removing this component detaches the controller.
#[derive(Debug, Clone, Reflect, Component)]
pub struct SpinControls {
    /// While disabled, pointer input is ignored. An ongoing spin keeps decaying.
    pub enabled: bool,
    /// Multiplies the applied rotation. At `1.0` the trackball stays under the pointer.
    pub sensitivity: f32,
    /// How spin decays after release.
    pub damping: Damping,
    /// Only spin about this axis, in the parent frame of the entity, when set.
    pub axis_constraint: Option<Vec3>,
    /// How pointer positions are lifted onto the trackball.
    pub mapping: SphereMapping,
    /// How spin is estimated while the pointer is outside the trackball silhouette.
    pub off_silhouette: OffSilhouette,
    /// Radius of the trackball, in the entity's local units.
    pub trackball_radius: f32,
    /// The camera the entity is seen through. Without one, the trackball fills the screen and the
    /// view is assumed to look down `-Z`.
    pub camera: Option<Entity>,
    /// On touch release without motion, velocity is multiplied by
    /// `1 / (tap_damping_scale * dt * damping.factor + 1)`, where `dt` is the time since the last
    /// touch sample. Lets very light taps nudge rather than stop the spin.
    pub tap_damping_scale: f32,
    /// Orientation changes smaller than this, measured as `8 * (1 - dot(last, new))`, are not
    /// reported with [`SpinEventKind::Change`].
    pub change_threshold: f32,
    /// The interactive surface. Managed by the controller from the camera viewport or primary
    /// window. Set it by hand when neither exists.
    pub screen: ScreenRect,
    /// Where the trackball is on screen. Managed by the controller when
    /// [`SpinControls::camera`] is set.
    pub frame: TrackballFrame,
    momentum: SpinMomentum,
    #[reflect(ignore)]
    pointers: PointerTracks,
    moved: bool,
    last_applied: Option<f64>,
}

impl Default for SpinControls {
    fn default() -> Self {
        SpinControls {
            enabled: true,
            sensitivity: 1.0,
            damping: Default::default(),
            axis_constraint: None,
            mapping: Default::default(),
            off_silhouette: Default::default(),
            trackball_radius: 1.0,
            camera: None,
            tap_damping_scale: 10.0,
            change_threshold: 1e-6,
            screen: Default::default(),
            frame: Default::default(),
            momentum: Default::default(),
            pointers: Default::default(),
            moved: false,
            last_applied: None,
        }
    }
}

impl SpinControls {
    /// Create a controller for an entity seen through `camera`, with a trackball of the given
    /// radius in the entity's local units.
    pub fn new(camera: Entity, trackball_radius: f32) -> Self {
        Self {
            camera: Some(camera),
            trackball_radius,
            ..Default::default()
        }
    }

    /// Constrain spinning to a single axis.
    pub fn with_axis_constraint(self, axis: Vec3) -> Self {
        Self {
            axis_constraint: Some(axis),
            ..self
        }
    }

    /// Is any pointer holding the trackball?
    pub fn is_dragging(&self) -> bool {
        !self.pointers.is_empty()
    }

    /// The current angular velocity in radians per second, in the parent frame of the entity.
    pub fn angular_velocity(&self) -> Vec3 {
        self.momentum.angular_velocity()
    }

    /// Set the angular velocity, e.g. to start a spin programmatically.
    pub fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.momentum.set_angular_velocity(angular_velocity);
    }

    /// Stop spinning immediately, whether or not a pointer is holding the trackball.
    pub fn cancel_spin(&mut self) {
        self.momentum.cancel();
    }

    /// A pointer was pressed at `ndc`, at time `now` in seconds. The first pointer to press starts
    /// a drag, stops any spin, and returns [`SpinEventKind::Start`].
    pub fn pointer_down(
        &mut self,
        source: PointerSource,
        ndc: Vec2,
        now: f64,
    ) -> Option<SpinEventKind> {
        if !self.enabled {
            return None;
        }
        let starting = !self.is_dragging();
        let sample = self.frame.project(ndc, self.mapping);
        self.pointers.press(source, PointerTrack { sample, time: now });
        if !starting {
            return None;
        }
        self.momentum.cancel();
        self.moved = false;
        self.last_applied = Some(now);
        Some(SpinEventKind::Start)
    }

    /// A pressed pointer moved to `ndc`. Updates the angular velocity from the motion and applies
    /// it to `rotation` right away.
    pub fn pointer_move(
        &mut self,
        source: PointerSource,
        ndc: Vec2,
        now: f64,
        rotation: &mut Quat,
    ) -> Option<SpinEventKind> {
        if !self.enabled {
            return None;
        }
        let track = self.pointers.get_mut(source)?;
        let current = self.frame.project(ndc, self.mapping);
        let previous = std::mem::replace(&mut track.sample, current);
        let delta_time = (now - track.time) as f32;
        track.time = now;
        self.moved = true;

        let velocity = estimate_angular_velocity(
            previous.as_ref()?,
            current.as_ref()?,
            delta_time,
            &self.off_silhouette,
        )?;
        self.momentum.set_angular_velocity(velocity);
        self.apply(now, rotation)
    }

    /// A pressed pointer was released. The last pointer to release ends the drag and returns
    /// [`SpinEventKind::End`].
    ///
    /// If no pointer moved since the last [`SpinControls::tick`], a mouse release stops the spin,
    /// so a click or a still pointer never starts one. A touch release damps it heavily instead,
    /// see [`SpinControls::tap_damping_scale`].
    pub fn pointer_up(&mut self, source: PointerSource, now: f64) -> Option<SpinEventKind> {
        if !self.enabled {
            return None;
        }
        let track = self.pointers.release(source)?;
        if self.is_dragging() {
            return None;
        }
        if !self.moved {
            if source.is_touch() {
                let delta_time = (now - track.time).max(0.0) as f32;
                self.momentum
                    .scale(self.damping.multiplier(delta_time, self.tap_damping_scale));
            } else {
                self.momentum.cancel();
            }
        }
        // The spin resumes from the release, not from the last sample of the drag.
        self.last_applied = Some(now);
        Some(SpinEventKind::End)
    }

    /// Advance the spin to time `now`, in seconds. Called once per frame.
    ///
    /// While a pointer holds the trackball, rotation only follows pointer motion. Otherwise the
    /// velocity is damped and applied to `rotation`. Pointer motion is tracked per frame, so a
    /// release after this call only keeps the spin if a pointer moves again first.
    pub fn tick(&mut self, now: f64, rotation: &mut Quat) -> Option<SpinEventKind> {
        if !self.enabled && self.is_dragging() {
            debug!("Dropping pointers held by disabled spin controls");
            self.pointers.clear();
        }
        self.moved = false;
        if self.is_dragging() {
            return None;
        }
        let delta_time = self.delta_since_applied(now);
        self.momentum.damp(delta_time, &self.damping);
        self.apply(now, rotation)
    }

    fn delta_since_applied(&self, now: f64) -> f32 {
        self.last_applied
            .map(|last| (now - last) as f32)
            .unwrap_or(0.0)
    }

    fn apply(&mut self, now: f64, rotation: &mut Quat) -> Option<SpinEventKind> {
        let delta_time = self.delta_since_applied(now);
        self.last_applied = Some(now);
        self.momentum
            .integrate(
                delta_time,
                rotation,
                self.axis_constraint,
                self.sensitivity,
                self.change_threshold,
            )
            .then_some(SpinEventKind::Change)
    }

    /// Refresh the screen rectangle and trackball frame of all controllers. Called once per frame
    /// before input is handled.
    pub fn refresh_frames(
        mut controls: Query<(&mut SpinControls, &GlobalTransform)>,
        cameras: Query<(&Camera, &GlobalTransform)>,
        windows: Query<&Window, With<PrimaryWindow>>,
    ) {
        for (mut controls, transform) in &mut controls {
            let Some(camera_entity) = controls.camera else {
                if let Ok(window) = windows.single() {
                    controls.screen = ScreenRect::from_size(window.size());
                }
                continue;
            };
            let Ok((camera, camera_transform)) = cameras.get(camera_entity) else {
                warn_once!("SpinControls camera {camera_entity} has no Camera component");
                continue;
            };
            if let Some(viewport) = camera.logical_viewport_rect() {
                controls.screen = viewport.into();
            }
            let (scale, _, center) = transform.to_scale_rotation_translation();
            let world_radius = controls.trackball_radius * scale.abs().max_element();
            let frame = match trackball_frame(camera, camera_transform, center, world_radius) {
                Some(frame) => frame,
                None => {
                    debug!("Trackball is not visible through camera {camera_entity}");
                    TrackballFrame {
                        radius: Vec2::ZERO,
                        ..controls.frame
                    }
                }
            };
            controls.frame = frame;
        }
    }

    /// Feed [`SpinPointerInput`] events to all controllers.
    pub fn handle_pointer_input(
        mut inputs: EventReader<SpinPointerInput>,
        mut controls: Query<(Entity, &mut SpinControls, &mut Transform)>,
        time: Res<Time>,
        mut events: EventWriter<SpinEvent>,
        mut redraw: EventWriter<RequestRedraw>,
    ) {
        let now = time.elapsed_secs_f64();
        for input in inputs.read() {
            for (entity, mut controls, mut transform) in &mut controls {
                let kind = match input.phase {
                    PointerPhase::Up => controls.pointer_up(input.source, now),
                    _ if controls.screen.is_empty() => {
                        debug!("Ignoring pointer input, spin controls have no screen area");
                        None
                    }
                    PointerPhase::Down => {
                        let ndc = controls.screen.to_ndc(input.position);
                        let inside = ndc.cmpge(Vec2::NEG_ONE).all() && ndc.cmple(Vec2::ONE).all();
                        if inside {
                            controls.pointer_down(input.source, ndc, now)
                        } else {
                            None
                        }
                    }
                    PointerPhase::Move => {
                        let ndc = controls.screen.to_ndc(input.position);
                        controls.pointer_move(input.source, ndc, now, &mut transform.rotation)
                    }
                };
                if let Some(kind) = kind {
                    notify(&mut events, &mut redraw, entity, kind);
                }
            }
        }
    }

    /// Advance the spin of all controllers. Called once per frame.
    pub fn update_spin(
        mut controls: Query<(Entity, &mut SpinControls, &mut Transform)>,
        time: Res<Time>,
        mut events: EventWriter<SpinEvent>,
        mut redraw: EventWriter<RequestRedraw>,
    ) {
        let now = time.elapsed_secs_f64();
        for (entity, mut controls, mut transform) in &mut controls {
            if let Some(kind) = controls.tick(now, &mut transform.rotation) {
                notify(&mut events, &mut redraw, entity, kind);
            }
        }
    }
}

fn notify(
    events: &mut EventWriter<SpinEvent>,
    redraw: &mut EventWriter<RequestRedraw>,
    entity: Entity,
    kind: SpinEventKind,
) {
    if kind == SpinEventKind::Change {
        redraw.write(RequestRedraw);
    }
    events.write(SpinEvent { entity, kind });
}
