//! Places the trackball on screen by projecting the spun object through a camera.

use bevy_math::prelude::*;
use bevy_render::prelude::*;
use bevy_transform::prelude::*;

use super::sphere::TrackballFrame;

/// Compute where a trackball of `world_radius` centered at `center` appears through `camera`.
///
/// Returns `None` if the camera has not computed its projection yet, or the trackball center is
/// outside the camera frustum.
pub fn trackball_frame(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    center: Vec3,
    world_radius: f32,
) -> Option<TrackballFrame> {
    let clip_from_world = camera.clip_from_view() * camera_transform.compute_matrix().inverse();
    trackball_frame_from_matrix(
        clip_from_world,
        camera_transform.rotation(),
        center,
        world_radius,
    )
}

/// See [`trackball_frame`].
pub fn trackball_frame_from_matrix(
    clip_from_world: Mat4,
    camera_rotation: Quat,
    center: Vec3,
    world_radius: f32,
) -> Option<TrackballFrame> {
    // Offset the center toward the camera's right and up by one trackball radius, and measure how
    // far apart the projected points land. Measuring both axes keeps the silhouette round on
    // non-square viewports.
    let right = camera_rotation * Vec3::X * world_radius;
    let up = camera_rotation * Vec3::Y * world_radius;

    let center_ndc = world_to_ndc(clip_from_world, center)?;
    let right_ndc = world_to_ndc(clip_from_world, center + right)?;
    let up_ndc = world_to_ndc(clip_from_world, center + up)?;

    let radius = Vec2::new(
        (right_ndc - center_ndc).length(),
        (up_ndc - center_ndc).length(),
    );
    radius.is_finite().then_some(TrackballFrame {
        center: center_ndc,
        radius,
        camera_rotation,
    })
}

/// Project a world space point into normalized device coordinates.
fn world_to_ndc(clip_from_world: Mat4, world_point: Vec3) -> Option<Vec2> {
    let ndc = clip_from_world.project_point3(world_point);
    // NDC z-values outside of 0 < z < 1 are outside the (implicit) camera frustum.
    (!ndc.is_nan() && ndc.z >= 0.0 && ndc.z <= 1.0).then_some(ndc.truncate())
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn clip_from_world(camera: Transform) -> Mat4 {
        Mat4::perspective_infinite_reverse_rh(FRAC_PI_2, 2.0, 0.1) * camera.compute_matrix().inverse()
    }

    #[test]
    fn centered_object() {
        let camera = Transform::from_xyz(0.0, 0.0, 5.0);
        let frame =
            trackball_frame_from_matrix(clip_from_world(camera), camera.rotation, Vec3::ZERO, 1.0)
                .unwrap();
        assert!(frame.center.abs_diff_eq(Vec2::ZERO, 1e-6));
        // Aspect ratio 2 squeezes the silhouette horizontally in NDC.
        assert!(frame.radius.abs_diff_eq(Vec2::new(0.1, 0.2), 1e-5));
    }

    #[test]
    fn offset_object() {
        let camera = Transform::from_xyz(0.0, 0.0, 5.0);
        let frame = trackball_frame_from_matrix(
            clip_from_world(camera),
            camera.rotation,
            Vec3::new(0.0, 2.5, 0.0),
            1.0,
        )
        .unwrap();
        assert!(frame.center.abs_diff_eq(Vec2::new(0.0, 0.5), 1e-5));
    }

    #[test]
    fn object_behind_camera() {
        let camera = Transform::from_xyz(0.0, 0.0, 5.0);
        let frame = trackball_frame_from_matrix(
            clip_from_world(camera),
            camera.rotation,
            Vec3::new(0.0, 0.0, 10.0),
            1.0,
        );
        assert!(frame.is_none());
    }

    #[test]
    fn zero_radius_projects_to_a_point() {
        let camera = Transform::from_xyz(0.0, 0.0, 5.0);
        let frame =
            trackball_frame_from_matrix(clip_from_world(camera), camera.rotation, Vec3::ZERO, 0.0)
                .unwrap();
        assert_eq!(frame.radius, Vec2::ZERO);
        assert!(frame.project(Vec2::ZERO, Default::default()).is_none());
    }
}
