mod about;
mod city;
mod explore;
mod lobby;
mod mars;

use bevy::prelude::*;

use about::AboutPlugin;
use city::CityPlugin;
use explore::ExplorePlugin;
use lobby::LobbyPlugin;
use mars::MarsPlugin;

use crate::camera::PresetTable;
use crate::camera::ViewButton;
use crate::media::AudioLabel;
use crate::media::MuteButton;
use crate::router::LOBBY_PATH;
use crate::router::NavButton;
use crate::ui::ButtonPalette;
use crate::ui::text;

pub struct ScenesPlugin;

impl Plugin for ScenesPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(LobbyPlugin)
            .add_plugins(CityPlugin)
            .add_plugins(MarsPlugin)
            .add_plugins(ExplorePlugin)
            .add_plugins(AboutPlugin);
    }
}

/// A glTF model placed in the scene.
fn model(scene: Handle<Scene>, transform: Transform) -> impl Bundle { (SceneRoot(scene), transform) }

/// Top-left button back to the lobby.
fn back_button(label: &'static str) -> impl Bundle {
    (NavButton(LOBBY_PATH), crate::ui::button(label, ButtonPalette::GLASS))
}

fn view_button(key: &'static str, label: &'static str) -> impl Bundle {
    (ViewButton(key), crate::ui::button(label, ButtonPalette::GLASS))
}

/// One button per preset of the table, in table order.
fn spawn_view_buttons(parent: &mut ChildSpawnerCommands, table: PresetTable) {
    for preset in table.presets {
        parent.spawn(view_button(preset.key, preset.label));
    }
}

/// Mute toggle that shows the state of the scene's sound.
fn mute_button() -> impl Bundle {
    (
        MuteButton,
        Button,
        ButtonPalette::GLASS,
        Node {
            padding: UiRect::axes(px(12), px(6)),
            ..default()
        },
        BackgroundColor(ButtonPalette::GLASS.idle),
        children![(AudioLabel, text("LOADING SOUND", 12.0, Color::WHITE))],
    )
}
