mod motion;
mod sparkles;
mod stars;

use bevy::prelude::*;

pub use motion::Flicker;
pub use motion::Float;
pub use motion::Hover;
use motion::MotionPlugin;
pub use sparkles::SparkleField;
use sparkles::SparklesPlugin;
pub use stars::StarField;
use stars::StarsPlugin;

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MotionPlugin)
            .add_plugins(SparklesPlugin)
            .add_plugins(StarsPlugin);
    }
}

/// Light intensities are authored on a small artist scale; this turns them into the lumens a
/// point light wants under the default camera exposure.
pub const fn lumens(intensity: f32) -> f32 { intensity * 20_000.0 }

/// A coloured point light with the given artist-scale intensity and reach.
pub fn point_light(color: Color, intensity: f32, range: f32) -> PointLight {
    PointLight {
        color,
        intensity: lumens(intensity),
        range,
        ..default()
    }
}
