use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::light::AmbientLight;
use bevy::post_process::bloom::Bloom;
use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;
use bevy_panorbit_camera::PanOrbitCameraPlugin;

use super::config::CameraConfig;
use super::rig::CameraRig;

pub struct CamerasPlugin;

impl Plugin for CamerasPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PanOrbitCameraPlugin)
            .add_systems(Startup, spawn_showcase_camera)
            .add_systems(Update, (update_bloom_settings, update_projection));
    }
}

#[derive(Component, Reflect, Debug)]
pub struct ShowcaseCamera;

// One camera lives for the whole session. Scenes never spawn their own - they re-aim this one
// through its rig and re-light it through the lighting presets. Between preset moves the user
// orbits, pans and zooms it freely.
pub fn spawn_showcase_camera(mut commands: Commands, camera_config: Res<CameraConfig>) {
    commands.spawn((
        ShowcaseCamera,
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: camera_config.fov.to_radians(),
            far: 1000.0,
            ..default()
        }),
        Tonemapping::TonyMcMapface,
        get_bloom_settings(&camera_config),
        // overwritten on the first scene enter; the sparkles need ambient to be per-camera so
        // that each scene can set its own
        AmbientLight {
            brightness: 0.0,
            ..default()
        },
        PanOrbitCamera {
            focus: Vec3::ZERO,
            radius: Some(8.0),
            orbit_smoothness: camera_config.orbit_smoothness,
            zoom_smoothness: camera_config.zoom_smoothness,
            pan_smoothness: camera_config.pan_smoothness,
            trackpad_pinch_to_zoom_enabled: true,
            ..default()
        },
        CameraRig::default(),
        Transform::from_xyz(0.0, 0.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

// propagate bloom settings back to the camera
fn update_bloom_settings(
    camera_config: Res<CameraConfig>,
    mut q_current_settings: Query<&mut Bloom, With<ShowcaseCamera>>,
) {
    if camera_config.is_changed()
        && let Ok(mut old_bloom_settings) = q_current_settings.single_mut()
    {
        *old_bloom_settings = get_bloom_settings(&camera_config);
    }
}

fn get_bloom_settings(camera_config: &CameraConfig) -> Bloom {
    let mut new_bloom_settings = Bloom::NATURAL;
    new_bloom_settings.intensity = camera_config.bloom_intensity;
    new_bloom_settings
}

fn update_projection(
    camera_config: Res<CameraConfig>,
    mut projection: Single<&mut Projection, With<ShowcaseCamera>>,
) {
    if !camera_config.is_changed() {
        return;
    }
    if let Projection::Perspective(ref mut perspective) = **projection {
        perspective.fov = camera_config.fov.to_radians();
    }
}
