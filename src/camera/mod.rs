mod cameras;
mod config;
mod lighting;
mod pan_orbit_ext;
mod presets;
mod rig;

use bevy::prelude::*;

use cameras::CamerasPlugin;
pub use cameras::ShowcaseCamera;
pub use config::CameraConfig;
use config::CameraConfigPlugin;
use lighting::LightingPlugin;
pub use presets::CameraPreset;
pub use presets::PresetTable;
pub use presets::table_for;
pub use rig::CameraRig;
use rig::CameraRigPlugin;
pub use rig::SelectView;
pub use rig::ViewButton;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(CameraConfigPlugin)
            .add_plugins(CamerasPlugin)
            .add_plugins(CameraRigPlugin)
            .add_plugins(LightingPlugin);
    }
}
