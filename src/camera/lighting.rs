//! Per-scene clear colour, fog and ambient light, applied to the showcase camera on scene enter.

use bevy::light::AmbientLight;
use bevy::prelude::*;

use super::cameras::ShowcaseCamera;
use crate::state::Screen;

pub struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, apply_lighting_preset.run_if(state_changed::<Screen>));
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fog {
    Linear { start: f32, end: f32 },
    Exponential { density: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingPreset {
    pub background:         Color,
    pub fog:                Option<Fog>,
    pub ambient_color:      Color,
    pub ambient_brightness: f32,
}

pub const fn preset_for(screen: Screen) -> LightingPreset {
    match screen {
        Screen::Launch => LightingPreset {
            background:         Color::BLACK,
            fog:                None,
            ambient_color:      Color::WHITE,
            ambient_brightness: 0.0,
        },
        Screen::Lobby => LightingPreset {
            background:         Color::srgb(0.02, 0.02, 0.02),
            fog:                Some(Fog::Exponential { density: 0.02 }),
            ambient_color:      Color::WHITE,
            ambient_brightness: 250.0,
        },
        Screen::City => LightingPreset {
            background:         Color::srgb(0.067, 0.067, 0.133),
            fog:                Some(Fog::Linear {
                start: 10.0,
                end:   80.0,
            }),
            ambient_color:      Color::srgb(0.8, 0.8, 1.0),
            ambient_brightness: 400.0,
        },
        Screen::Mars => LightingPreset {
            background:         Color::srgb(0.1, 0.02, 0.02),
            fog:                Some(Fog::Linear {
                start: 20.0,
                end:   300.0,
            }),
            ambient_color:      Color::srgb(0.27, 0.13, 0.13),
            ambient_brightness: 600.0,
        },
        Screen::Explore => LightingPreset {
            background:         Color::BLACK,
            fog:                Some(Fog::Exponential { density: 0.002 }),
            ambient_color:      Color::srgb(0.0, 0.07, 0.2),
            ambient_brightness: 40.0,
        },
        Screen::About => LightingPreset {
            background:         Color::srgb(0.008, 0.008, 0.02),
            fog:                None,
            ambient_color:      Color::WHITE,
            ambient_brightness: 80.0,
        },
    }
}

impl LightingPreset {
    fn distance_fog(&self) -> Option<DistanceFog> {
        let falloff = match self.fog? {
            Fog::Linear { start, end } => FogFalloff::Linear { start, end },
            Fog::Exponential { density } => FogFalloff::Exponential { density },
        };
        Some(DistanceFog {
            color: self.background,
            falloff,
            ..default()
        })
    }
}

fn apply_lighting_preset(
    mut commands: Commands,
    screen: Res<State<Screen>>,
    mut clear_color: ResMut<ClearColor>,
    mut cameras: Query<(Entity, &mut AmbientLight), With<ShowcaseCamera>>,
) {
    let preset = preset_for(*screen.get());
    clear_color.0 = preset.background;

    for (entity, mut ambient) in &mut cameras {
        ambient.color = preset.ambient_color;
        ambient.brightness = preset.ambient_brightness;
        match preset.distance_fog() {
            Some(fog) => commands.entity(entity).insert(fog),
            None => commands.entity(entity).remove::<DistanceFog>(),
        };
    }
}
