//! Maps pointer positions onto the virtual trackball sphere.

use std::f32::consts::FRAC_PI_2;

use bevy_math::prelude::*;
use bevy_reflect::prelude::*;

/// How a pointer position relative to the trackball is lifted onto the sphere.
///
/// The policies trade "feels like touching a sphere" against continuity when the pointer crosses
/// the silhouette of the trackball.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum SphereMapping {
    /// Shoemake's mapping. Points inside the silhouette land on the front hemisphere, points
    /// outside are pushed onto its rim. The derivative is discontinuous at the silhouette, so the
    /// sphere can jump when the pointer crosses it.
    Shoemake,
    /// Holroyd's mapping. A sphere near the center blended into a hyperbolic sheet outside
    /// `t = 0.5`, normalized back onto the sphere. Smooth everywhere.
    #[default]
    Holroyd,
    /// Azimuthal equidistant mapping. Distance from the center is proportional to the angle from
    /// the view axis, reaching the rim at the silhouette and wrapping behind it beyond.
    AzimuthalEquidistant,
}

impl SphereMapping {
    /// Map a pointer offset, in units of the trackball's on-screen radius, onto the sphere. The
    /// result is in camera-facing space: `+x` right, `+y` up, `+z` toward the viewer.
    pub fn map(self, delta: Vec2) -> Vec3 {
        let t = delta.length_squared();
        match self {
            SphereMapping::Shoemake => {
                if t < 1.0 {
                    delta.extend((1.0 - t).sqrt())
                } else {
                    delta.normalize().extend(0.0)
                }
            }
            SphereMapping::Holroyd => {
                if t < 0.5 {
                    delta.extend((1.0 - t).sqrt())
                } else {
                    delta.extend(1.0 / (2.0 * t.sqrt())).normalize()
                }
            }
            SphereMapping::AzimuthalEquidistant => {
                let theta = FRAC_PI_2 * delta.length();
                (delta * FRAC_PI_2 * sinc(theta)).extend(theta.cos())
            }
        }
    }
}

/// `sin(x) / x`, with the removable singularity at zero filled in.
fn sinc(x: f32) -> f32 {
    if x.abs() < f32::EPSILON {
        1.0
    } else {
        x.sin() / x
    }
}

/// Where the trackball sits on screen this frame, and how the camera looking at it is oriented.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct TrackballFrame {
    /// Center of the trackball in normalized device coordinates.
    pub center: Vec2,
    /// Radius of the trackball silhouette in normalized device coordinates, per axis. The axes
    /// differ when the viewport is not square.
    pub radius: Vec2,
    /// World space rotation of the camera. Converts camera-facing sphere points to world space.
    pub camera_rotation: Quat,
}

impl Default for TrackballFrame {
    /// The whole screen is the trackball, seen by an unrotated camera.
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            radius: Vec2::ONE,
            camera_rotation: Quat::IDENTITY,
        }
    }
}

impl TrackballFrame {
    /// Project a pointer position in normalized device coordinates onto the trackball.
    ///
    /// Returns `None` if the trackball has no on-screen extent, in which case no rotation can be
    /// derived this frame.
    pub fn project(&self, ndc: Vec2, mapping: SphereMapping) -> Option<SphereSample> {
        if !ndc.is_finite() || !self.radius.is_finite() || self.radius.cmpeq(Vec2::ZERO).any() {
            return None;
        }
        let offset = (ndc - self.center) / self.radius;
        let local = mapping.map(offset);
        local.is_finite().then_some(SphereSample {
            point: self.camera_rotation * local,
            offset,
            camera_rotation: self.camera_rotation,
        })
    }
}

/// A pointer position lifted onto the trackball.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SphereSample {
    /// The point on the unit sphere, in world space.
    pub point: Vec3,
    /// The pointer offset from the trackball center, in units of the on-screen radius.
    pub offset: Vec2,
    /// Camera rotation the sample was taken with.
    pub camera_rotation: Quat,
}

impl SphereSample {
    /// Is the pointer outside the silhouette of the trackball?
    pub fn is_outside_silhouette(&self) -> bool {
        self.offset.length_squared() > 1.0
    }
}
