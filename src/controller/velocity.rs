//! Estimates the angular velocity implied by two successive pointer samples.

use std::f32::consts::FRAC_PI_2;

use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

use super::sphere::SphereSample;

/// How to estimate spin while the pointer is outside the trackball silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct OffSilhouette {
    /// When enabled, pointer motion outside the silhouette is split into radial and polar parts
    /// instead of being measured on the sphere.
    pub enabled: bool,
    /// Radians of spin per unit of radial pointer motion, in units of the on-screen trackball
    /// radius. Compensates for the lever arm shrinking toward the silhouette.
    pub radial_gain: f32,
}

impl Default for OffSilhouette {
    fn default() -> Self {
        Self {
            enabled: true,
            radial_gain: FRAC_PI_2,
        }
    }
}

/// Estimate the world space angular velocity, in radians per second, that carries `previous` to
/// `current` in `delta_time` seconds.
///
/// Each estimate stands alone; nothing is accumulated across samples. Returns `None` when no
/// estimate can be made, e.g. when `delta_time` is not positive, and the caller should keep
/// whatever velocity it had.
pub fn estimate_angular_velocity(
    previous: &SphereSample,
    current: &SphereSample,
    delta_time: f32,
    off_silhouette: &OffSilhouette,
) -> Option<Vec3> {
    // Also rejects NaN.
    if !(delta_time > 0.0) {
        return None;
    }
    if off_silhouette.enabled
        && previous.is_outside_silhouette()
        && current.is_outside_silhouette()
    {
        off_silhouette_velocity(previous, current, delta_time, off_silhouette.radial_gain)
    } else {
        on_sphere_velocity(previous.point, current.point, delta_time)
    }
}

/// Spin about `previous × current`, at the angle between them per unit time.
fn on_sphere_velocity(previous: Vec3, current: Vec3, delta_time: f32) -> Option<Vec3> {
    let angle = previous.angle_between(current);
    let velocity = previous.cross(current).normalize_or_zero() * (angle / delta_time);
    velocity.is_finite().then_some(velocity)
}

/// Motion toward or away from the trackball center tips the sphere, motion around the center
/// rolls it about the view axis.
fn off_silhouette_velocity(
    previous: &SphereSample,
    current: &SphereSample,
    delta_time: f32,
    radial_gain: f32,
) -> Option<Vec3> {
    let (from, to) = (previous.offset, current.offset);
    let direction = to.try_normalize()?;

    let radial_angle = (to.length() - from.length()) * radial_gain;
    let radial = Vec3::Z.cross(direction.extend(0.0)) * radial_angle;

    let polar_angle = from.perp_dot(to).atan2(from.dot(to));
    let polar = Vec3::Z * polar_angle;

    let velocity = current.camera_rotation * ((radial + polar) / delta_time);
    velocity.is_finite().then_some(velocity)
}
