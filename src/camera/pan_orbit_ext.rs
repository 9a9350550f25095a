use std::f32::consts::PI;
use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;

use crate::camera::CameraConfig;

/// Yaw, pitch and radius that put a pan-orbit camera at `position` while it looks at `focus`.
pub fn orbit_params(position: Vec3, focus: Vec3) -> (f32, f32, f32) {
    let offset = position - focus;
    let yaw = offset.x.atan2(offset.z);
    let pitch = offset.y.atan2(offset.x.hypot(offset.z));
    (yaw, pitch, offset.length())
}

/// `yaw` moved by whole turns so it lies within half a turn of `near`.
pub fn unwrap_yaw(yaw: f32, near: f32) -> f32 {
    let diff = yaw - near;
    near + TAU.mul_add(-((diff + PI) / TAU).floor(), diff)
}

/// Extension trait for `PanOrbitCamera` used by the preset rig.
pub trait PanOrbitCameraExt {
    /// The camera lands on its targets in the same frame - the rig does its own easing.
    fn disable_interpolation(&mut self);

    /// Hands the camera back to the user with the configured easing.
    fn enable_interpolation(&mut self, camera_config: &CameraConfig);

    /// Points the targets at a camera position and a focus point.
    fn aim(&mut self, position: Vec3, focus: Vec3);
}

impl PanOrbitCameraExt for PanOrbitCamera {
    fn disable_interpolation(&mut self) {
        self.zoom_smoothness = 0.0;
        self.pan_smoothness = 0.0;
        self.orbit_smoothness = 0.0;
    }

    fn enable_interpolation(&mut self, camera_config: &CameraConfig) {
        self.zoom_smoothness = camera_config.zoom_smoothness;
        self.pan_smoothness = camera_config.pan_smoothness;
        self.orbit_smoothness = camera_config.orbit_smoothness;
    }

    fn aim(&mut self, position: Vec3, focus: Vec3) {
        let (yaw, pitch, radius) = orbit_params(position, focus);
        self.target_focus = focus;
        // auto-rotate keeps adding to the yaw, so stay on the same turn as the camera
        self.target_yaw = unwrap_yaw(yaw, self.target_yaw);
        self.target_pitch = pitch;
        self.target_radius = radius;
        self.force_update = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Where a pan-orbit camera with these parameters ends up.
    fn orbit_position(focus: Vec3, yaw: f32, pitch: f32, radius: f32) -> Vec3 {
        let rotation = Quat::from_rotation_y(yaw) * Quat::from_rotation_x(-pitch);
        focus + rotation * Vec3::new(0.0, 0.0, radius)
    }

    #[test]
    fn orbit_params_put_the_camera_back_where_it_was() {
        let cases = [
            (Vec3::new(25., 15., 25.), Vec3::new(0., 5., 0.)),
            (Vec3::new(-12., 22., 8.), Vec3::new(0., 0., -4.)),
            (Vec3::new(4.5, -1., 3.), Vec3::new(4.1, -1.8, 1.5)),
            (Vec3::new(0., 0., 8.), Vec3::ZERO),
            (Vec3::new(-4., 0., -9.), Vec3::new(1., 2., 3.)),
        ];
        for (position, focus) in cases {
            let (yaw, pitch, radius) = orbit_params(position, focus);
            let rebuilt = orbit_position(focus, yaw, pitch, radius);
            assert!(
                rebuilt.distance(position) < 1e-3,
                "{position} around {focus} came back as {rebuilt}"
            );
        }
    }

    #[test]
    fn unwrapped_yaw_stays_on_the_current_turn() {
        let near = 3.0 * TAU + 0.2;
        let yaw = unwrap_yaw(0.3, near);
        assert!((yaw - (3.0 * TAU + 0.3)).abs() < 1e-4);
        assert!((unwrap_yaw(PI - 0.1, -PI + 0.1) - (-PI - 0.1)).abs() < 1e-4);
        assert!((unwrap_yaw(1.0, 1.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn aiming_only_moves_the_targets() {
        let config = CameraConfig::default();
        let mut orbit = PanOrbitCamera::default();
        orbit.enable_interpolation(&config);
        orbit.disable_interpolation();
        orbit.aim(Vec3::new(0., 0., 8.), Vec3::ZERO);

        assert_eq!(orbit.target_focus, Vec3::ZERO);
        assert!((orbit.target_radius - 8.0).abs() < 1e-4);
        assert!(orbit.target_yaw.abs() < 1e-4);
        assert!(orbit.target_pitch.abs() < 1e-4);
        assert!(orbit.orbit_smoothness.abs() < f32::EPSILON);

        orbit.enable_interpolation(&config);
        assert!((orbit.pan_smoothness - config.pan_smoothness).abs() < f32::EPSILON);
    }
}
