//! Provides [`SpinMomentum`], which turns a stored angular velocity into rotation every frame.

use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

/// How quickly spin decays once no pointer is holding the trackball.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Damping {
    /// When disabled, the trackball keeps spinning at its release velocity.
    pub enabled: bool,
    /// Resistance to spinning. Larger values stop the spin sooner. This is not a time constant:
    /// each step scales velocity by `1 / (dt * factor + 1)`.
    pub factor: f32,
}

impl Default for Damping {
    fn default() -> Self {
        Self {
            enabled: true,
            factor: 5.0,
        }
    }
}

impl Damping {
    /// The velocity multiplier for a step of `delta_time` seconds, scaled by `scale`.
    pub fn multiplier(&self, delta_time: f32, scale: f32) -> f32 {
        1.0 / (scale * delta_time * self.factor + 1.0)
    }
}

/// Angular velocity of the trackball, and the integrator that applies it to an orientation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Reflect)]
pub struct SpinMomentum {
    /// Spin axis times angular speed, in radians per second.
    angular_velocity: Vec3,
    /// The orientation when a change was last reported.
    last_reported: Quat,
}

impl SpinMomentum {
    /// The current angular velocity, in radians per second about its direction.
    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Overwrite the angular velocity with a fresh estimate.
    pub fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.angular_velocity = angular_velocity;
    }

    /// Stop spinning immediately.
    pub fn cancel(&mut self) {
        self.angular_velocity = Vec3::ZERO;
    }

    /// Scale the angular velocity by `multiplier`.
    pub fn scale(&mut self, multiplier: f32) {
        self.angular_velocity *= multiplier;
    }

    /// Apply one step of damping. Does nothing if damping is disabled.
    pub fn damp(&mut self, delta_time: f32, damping: &Damping) {
        if damping.enabled && delta_time > 0.0 {
            self.scale(damping.multiplier(delta_time, 1.0));
        }
    }

    /// Rotate `rotation` by the spin accumulated over `delta_time` seconds.
    ///
    /// The increment is premultiplied, so the spin happens in the parent frame of `rotation`.
    /// With an `axis_constraint`, only the component of the velocity along that axis is applied.
    ///
    /// Returns `true` when the orientation moved far enough from the last reported orientation
    /// that a change should be reported. Changes below `threshold`, measured as
    /// `8 * (1 - dot(last, new))` (about the squared angle for small rotations), accumulate
    /// silently.
    pub fn integrate(
        &mut self,
        delta_time: f32,
        rotation: &mut Quat,
        axis_constraint: Option<Vec3>,
        sensitivity: f32,
        threshold: f32,
    ) -> bool {
        let (axis, speed) = match axis_constraint {
            Some(constraint) => {
                let Some(axis) = constraint.try_normalize() else {
                    return false;
                };
                (axis, axis.dot(self.angular_velocity))
            }
            None => {
                let Some(axis) = self.angular_velocity.try_normalize() else {
                    return false;
                };
                (axis, self.angular_velocity.length())
            }
        };

        let angle = speed * delta_time * sensitivity;
        if !(delta_time > 0.0) || speed == 0.0 || !angle.is_finite() {
            return false;
        }

        let increment = Quat::from_axis_angle(axis, angle);
        *rotation = increment * rotation.normalize();

        if 8.0 * (1.0 - self.last_reported.dot(*rotation)) > threshold {
            self.last_reported = *rotation;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    const THRESHOLD: f32 = 1e-6;

    fn spinning(angular_velocity: Vec3) -> SpinMomentum {
        let mut momentum = SpinMomentum::default();
        momentum.set_angular_velocity(angular_velocity);
        momentum
    }

    #[test]
    fn zero_delta_time_never_rotates() {
        let mut momentum = spinning(Vec3::new(0.3, 2.0, -1.0));
        let start = Quat::from_rotation_x(0.4);
        let mut rotation = start;
        assert!(!momentum.integrate(0.0, &mut rotation, None, 1.0, THRESHOLD));
        assert!(!momentum.integrate(0.0, &mut rotation, Some(Vec3::Y), 1.0, THRESHOLD));
        assert_eq!(rotation, start);
    }

    #[test]
    fn integrates_angle_about_velocity() {
        let mut momentum = spinning(Vec3::Y * FRAC_PI_2);
        let mut rotation = Quat::IDENTITY;
        assert!(momentum.integrate(1.0, &mut rotation, None, 1.0, THRESHOLD));
        assert!((rotation * Vec3::Z).abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn sensitivity_scales_angle() {
        let mut momentum = spinning(Vec3::Y);
        let mut rotation = Quat::IDENTITY;
        momentum.integrate(0.5, &mut rotation, None, 2.0, THRESHOLD);
        let (axis, angle) = rotation.to_axis_angle();
        assert!(axis.abs_diff_eq(Vec3::Y, 1e-5));
        assert!((angle - 1.0).abs() < 1e-5);
    }

    #[test]
    fn premultiplies_in_parent_frame() {
        let mut momentum = spinning(Vec3::Y);
        let start = Quat::from_rotation_x(FRAC_PI_2);
        let mut rotation = start;
        momentum.integrate(0.25, &mut rotation, None, 1.0, THRESHOLD);
        let expected = Quat::from_rotation_y(0.25) * start;
        assert!(rotation.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn axis_constraint_projects_velocity() {
        let mut momentum = spinning(Vec3::new(3.0, 0.5, 0.0));
        let mut rotation = Quat::IDENTITY;
        assert!(momentum.integrate(
            1.0,
            &mut rotation,
            Some(Vec3::new(0.0, 4.0, 0.0)),
            1.0,
            THRESHOLD
        ));
        let (axis, angle) = rotation.to_axis_angle();
        assert!(axis.abs_diff_eq(Vec3::Y, 1e-5));
        assert!((angle - 0.5).abs() < 1e-5);
    }

    #[test]
    fn zero_axis_constraint_locks_rotation() {
        let mut momentum = spinning(Vec3::X);
        let mut rotation = Quat::IDENTITY;
        assert!(!momentum.integrate(1.0, &mut rotation, Some(Vec3::ZERO), 1.0, THRESHOLD));
        assert_eq!(rotation, Quat::IDENTITY);
    }

    #[test]
    fn tiny_rotations_are_not_reported() {
        let mut momentum = spinning(Vec3::Z * 1e-5);
        let mut rotation = Quat::IDENTITY;
        assert!(!momentum.integrate(0.016, &mut rotation, None, 1.0, THRESHOLD));
        assert_ne!(rotation, Quat::IDENTITY);
    }

    #[test]
    fn stays_normalized() {
        let mut momentum = spinning(Vec3::new(1.3, -7.1, 2.2));
        let mut rotation = Quat::from_xyzw(0.1, 0.2, 0.3, 0.9);
        for _ in 0..10_000 {
            momentum.integrate(1.0 / 60.0, &mut rotation, None, 1.0, THRESHOLD);
        }
        assert!((rotation.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn damping_matches_closed_form() {
        let damping = Damping::default();
        let dt = 1.0 / 60.0;
        let mut momentum = spinning(Vec3::X);
        let mut last = momentum.angular_velocity().length();
        for _ in 0..60 {
            momentum.damp(dt, &damping);
            let speed = momentum.angular_velocity().length();
            assert!(speed < last);
            assert!(momentum.angular_velocity().x > 0.0);
            last = speed;
        }
        let expected = (1.0 / (dt * damping.factor + 1.0)).powi(60);
        assert!((last - expected).abs() < 1e-5);
        assert!(last < 0.01);
    }

    #[test]
    fn disabled_damping_keeps_velocity() {
        let damping = Damping {
            enabled: false,
            ..Default::default()
        };
        let mut momentum = spinning(Vec3::X);
        momentum.damp(1.0, &damping);
        assert_eq!(momentum.angular_velocity(), Vec3::X);
    }
}
