//! IdinVerse - an interactive 3D showcase built with Bevy 0.18
//!
//! A lobby behind a tap-to-enter gate leads to four scenes:
//! - Karawang City, where a dialogue with the host unlocks the city behind a mode switch
//! - The mystical camp, with a spirit mode and two sound channels
//! - The Mars colony
//! - An about page
//!
//! Every 3D scene has preset camera views with damped travel between them. Bevy Remote Protocol
//! (BRP) is enabled for debugging.

mod asset_loader;
mod camera;
mod despawn;
mod dialogue;
mod effects;
mod input;
mod inspector;
mod lock_gate;
mod media;
mod router;
mod scenes;
mod schedule;
mod state;
mod traits;
mod transition;
mod typewriter;
mod ui;

use bevy::gltf::GltfPlugin;
use bevy::prelude::*;
#[cfg(target_arch = "wasm32")]
use bevy::window::PresentMode;
#[cfg(target_arch = "wasm32")]
use bevy::window::WindowMode;
use bevy_brp_extras::BrpExtrasPlugin;
use bevy_enhanced_input::prelude::EnhancedInputPlugin;
use bevy_inspector_egui::bevy_egui::EguiPlugin;
use bevy_window_manager::WindowManagerPlugin;

use crate::asset_loader::AssetLoaderPlugin;
use crate::camera::CameraPlugin;
use crate::dialogue::DialoguePlugin;
use crate::effects::EffectsPlugin;
use crate::input::InputPlugin;
use crate::inspector::InspectorPlugin;
use crate::lock_gate::LockGatePlugin;
use crate::media::MediaPlugin;
use crate::router::RouterPlugin;
use crate::scenes::ScenesPlugin;
use crate::schedule::SchedulePlugin;
use crate::state::StatePlugin;
use crate::transition::TransitionPlugin;
use crate::typewriter::TypewriterPlugin;
use crate::ui::WidgetsPlugin;

fn main() {
    let mut app = App::new();

    // Get effective port from BrpExtrasPlugin to include in window title if non-default
    let brp_plugin = BrpExtrasPlugin::default();
    let (effective_port, _) = brp_plugin.get_effective_port();
    let window_title = if effective_port == bevy_brp_extras::DEFAULT_REMOTE_PORT {
        "idinverse".to_string()
    } else {
        format!("idinverse - {effective_port}")
    };

    #[cfg(not(target_arch = "wasm32"))]
    app.add_plugins(
        DefaultPlugins
            .set(GltfPlugin {
                use_model_forward_direction: true,
                ..default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: window_title,
                    ..default()
                }),
                ..default()
            }),
    )
    .add_plugins(WindowManagerPlugin);

    #[cfg(target_arch = "wasm32")]
    app.add_plugins(
        DefaultPlugins
            .set(GltfPlugin {
                use_model_forward_direction: true,
                ..default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: window_title,
                    present_mode: PresentMode::AutoNoVsync, // Reduces input lag.
                    mode: WindowMode::BorderlessFullscreen(MonitorSelection::Current),
                    fit_canvas_to_parent: true,
                    ..default()
                }),
                ..default()
            }),
    );

    app.add_plugins((EguiPlugin::default(), EnhancedInputPlugin, brp_plugin))
        .add_plugins((
            AssetLoaderPlugin,
            CameraPlugin,
            DialoguePlugin,
            EffectsPlugin,
            InputPlugin,
            InspectorPlugin,
            LockGatePlugin,
            MediaPlugin,
            RouterPlugin,
            ScenesPlugin,
            SchedulePlugin,
            StatePlugin,
            TransitionPlugin,
            TypewriterPlugin,
            WidgetsPlugin,
        ))
        .run();
}
