use bevy::prelude::*;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;

pub struct CameraConfigPlugin;

impl Plugin for CameraConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraConfig>();
    }
}

#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct CameraConfig {
    /// fraction of the remaining distance to the preset covered per 60 Hz frame
    #[inspector(min = 0.001, max = 1.0, display = NumberDisplay::Slider)]
    pub damping:           f32,
    /// degrees
    #[inspector(min = 20.0, max = 90.0, display = NumberDisplay::Slider)]
    pub fov:               f32,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub lobby_orbit_speed: f32,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub bloom_intensity:   f32,
    /// how much of the user's orbit drag is eased out once a preset has settled
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub orbit_smoothness:  f32,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub zoom_smoothness:   f32,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub pan_smoothness:    f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            damping:           0.05,
            fov:               40.0,
            // OrbitControls autoRotateSpeed 0.5 is one turn per two minutes
            lobby_orbit_speed: std::f32::consts::TAU / 120.0,
            bloom_intensity:   0.2,
            orbit_smoothness:  0.10,
            zoom_smoothness:   0.10,
            pan_smoothness:    0.02,
        }
    }
}
