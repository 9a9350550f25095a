use std::time::Duration;

use bevy::prelude::*;

use super::model;
use super::mute_button;
use crate::asset_loader::Preloaded;
use crate::asset_loader::SceneLoad;
use crate::effects::Float;
use crate::effects::SparkleField;
use crate::effects::lumens;
use crate::lock_gate::LobbyAmbience;
use crate::media::AudioConfig;
use crate::media::SceneAudio;
use crate::media::looping_track;
use crate::router::NavButton;
use crate::state::Screen;
use crate::traits::TransformExt;
use crate::ui::ACCENT;
use crate::ui::ButtonPalette;
use crate::ui::CYAN;
use crate::ui::Disabled;
use crate::ui::Hud;
use crate::ui::MUTED_TEXT;
use crate::ui::PINK;
use crate::ui::anchored_row;
use crate::ui::heading;
use crate::ui::menu_entry;
use crate::ui::text;

pub struct LobbyPlugin;

impl Plugin for LobbyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Screen::Lobby), (spawn_lobby_world, spawn_lobby_menu));
    }
}

const AMBIENCE: &str = "audio/lobby.ogg";

/// The lobby's entries: title, description, route and hover colour.
const ENTRIES: [(&str, &str, &str, Color); 4] = [
    ("KARAWANG CITY", "Cyberpunk Urban Simulation", "/city", Color::srgb(0.23, 0.51, 0.96)),
    ("MYSTICAL CAMP", "Javanese Horror & Artifacts", "/explore", Color::srgb(0.92, 0.35, 0.05)),
    ("MARS COLONY", "Red Planet Outpost", "/mars", Color::srgb(0.86, 0.15, 0.15)),
    ("ABOUT", "The Creator", "/about", CYAN),
];

fn spawn_lobby_world(
    mut commands: Commands,
    preloaded: Res<Preloaded>,
    asset_server: Res<AssetServer>,
    audio: Res<AudioConfig>,
) {
    commands
        .spawn((
            Name::new("Host"),
            DespawnOnExit(Screen::Lobby),
            model(
                preloaded.host.clone(),
                Transform::from_trs(
                    Vec3::new(2.0, -2.0, 0.0),
                    Quat::from_rotation_y(-0.5),
                    Vec3::splat(1.3),
                ),
            ),
            Float::new(2.0, 0.2, 0.1),
        ))
        .with_child((
            SpotLight {
                color: Color::srgb(1.0, 0.0, 1.0),
                intensity: lumens(50.0),
                outer_angle: 0.5,
                inner_angle: 0.0,
                ..default()
            },
            Transform::from_xyz(-2.0, 5.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
        ));

    commands.spawn((
        Name::new("LobbySparkles"),
        DespawnOnExit(Screen::Lobby),
        SparkleField::new(100, Vec3::splat(10.0), Color::WHITE)
            .with_size(0.02)
            .with_glow(0.5),
    ));

    // silent until the lock gate opens
    commands.spawn((
        Name::new("LobbyAmbience"),
        DespawnOnExit(Screen::Lobby),
        LobbyAmbience,
        looping_track(
            asset_server.load(AMBIENCE),
            audio.lobby_volume,
            SceneAudio::on_demand(),
        ),
    ));

    commands.spawn((
        Name::new("LobbyLoad"),
        DespawnOnExit(Screen::Lobby),
        SceneLoad::new([preloaded.host.id().untyped()], Duration::ZERO),
    ));
}

fn spawn_lobby_menu(mut commands: Commands) {
    commands
        .spawn((
            Name::new("LobbyMenu"),
            DespawnOnExit(Screen::Lobby),
            Hud,
            Node {
                width: percent(100),
                height: percent(100),
                padding: UiRect::all(px(48)),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                row_gap: px(16),
                ..default()
            },
        ))
        .with_children(|menu| {
            menu.spawn(Node {
                flex_direction: FlexDirection::Column,
                margin: UiRect::bottom(px(24)),
                ..default()
            })
            .with_children(|title| {
                title.spawn(heading("IDINVERSE", ACCENT));
                title.spawn((
                    text("INTERACTIVE 3D EXPERIENCE", 14.0, MUTED_TEXT),
                    Node {
                        border: UiRect::left(px(4)),
                        padding: UiRect::left(px(12)),
                        ..default()
                    },
                    BorderColor::all(PINK),
                ));
            });

            menu.spawn(Node {
                width: px(420),
                flex_direction: FlexDirection::Column,
                row_gap: px(12),
                ..default()
            })
            .with_children(|entries| {
                for (title, subtitle, path, color) in ENTRIES {
                    entries.spawn((
                        NavButton(path),
                        menu_entry(title, subtitle, ButtonPalette::accent(color)),
                    ));
                }
                entries.spawn((
                    Disabled,
                    menu_entry(
                        "LOCKED LEVEL",
                        "Coming Soon in Update v2.0",
                        ButtonPalette::accent(Color::srgba(1.0, 1.0, 1.0, 0.05)),
                    ),
                ));
            });

            menu.spawn(anchored_row(None, Some(px(24)), Val::Auto, px(24)))
                .with_child(mute_button());
        });
}
