//! Karawang city. The host greets the visitor on a dialogue card; unlocking (or the shortcut
//! button) runs the mode switch, which swaps the host for the city under the overlay.

use std::time::Duration;

use bevy::prelude::*;

use super::back_button;
use super::model;
use super::spawn_view_buttons;
use crate::asset_loader::Preloaded;
use crate::asset_loader::SceneLoad;
use crate::asset_loader::gltf_scene;
use crate::camera::table_for;
use crate::dialogue::DialogueCard;
use crate::dialogue::DialoguePhase;
use crate::dialogue::DialogueReveal;
use crate::dialogue::GREETING_CHARACTER_MS;
use crate::dialogue::HOST_GREETING;
use crate::dialogue::line_bundle;
use crate::effects::lumens;
use crate::state::Screen;
use crate::traits::TransformExt;
use crate::transition::HomeControl;
use crate::transition::ModeContent;
use crate::transition::ModeSwitchButton;
use crate::transition::TransitionConfig;
use crate::typewriter::Typewriter;
use crate::ui::ButtonPalette;
use crate::ui::Hud;
use crate::ui::MUTED_TEXT;
use crate::ui::anchored_row;
use crate::ui::button;
use crate::ui::text;

pub struct CityPlugin;

impl Plugin for CityPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(Screen::City),
            (spawn_city_world, spawn_host_dialogue, spawn_city_controls),
        );
    }
}

const CITY_MODEL: &str = "models/city.glb";
const CITY_POSITION: Vec3 = Vec3::new(0.0, -2.0, 0.0);
const BIKE_POSITION: Vec3 = Vec3::new(0.0, -2.0, 2.0);

fn spawn_city_world(
    mut commands: Commands,
    preloaded: Res<Preloaded>,
    asset_server: Res<AssetServer>,
    transition: Res<TransitionConfig>,
) {
    let city = gltf_scene(&asset_server, CITY_MODEL);

    commands.spawn((
        Name::new("CityModeSwitch"),
        DespawnOnExit(Screen::City),
        transition.mode_switch(),
    ));

    commands.spawn((
        Name::new("Host"),
        DespawnOnExit(Screen::City),
        ModeContent::Home,
        Visibility::Inherited,
        model(
            preloaded.host.clone(),
            Transform::from_xyz(0.0, -1.7, 0.0).with_scale(Vec3::splat(1.1)),
        ),
    ));

    commands
        .spawn((
            Name::new("City"),
            DespawnOnExit(Screen::City),
            ModeContent::Destination,
            Visibility::Hidden,
            Transform::default(),
        ))
        .with_children(|city_group| {
            city_group.spawn(model(city.clone(), Transform::from_translation(CITY_POSITION)));
            city_group.spawn(model(
                preloaded.bike.clone(),
                Transform::from_trs(BIKE_POSITION, Quat::from_rotation_y(1.2), Vec3::splat(0.8)),
            ));
            city_group.spawn((
                DirectionalLight {
                    color: Color::srgb(1.0, 0.87, 0.67),
                    illuminance: 8_000.0,
                    shadows_enabled: true,
                    ..default()
                },
                Transform::from_xyz(10.0, 20.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
            ));
            city_group.spawn((
                SpotLight {
                    color: Color::srgb(0.0, 1.0, 1.0),
                    intensity: lumens(10.0),
                    ..default()
                },
                Transform::from_xyz(0.0, 5.0, 5.0).looking_at(BIKE_POSITION, Vec3::Y),
            ));
        });

    commands.spawn((
        Name::new("CityLoad"),
        DespawnOnExit(Screen::City),
        SceneLoad::new(
            [
                preloaded.host.id().untyped(),
                preloaded.bike.id().untyped(),
                city.id().untyped(),
            ],
            Duration::ZERO,
        ),
    ));
}

fn spawn_host_dialogue(mut commands: Commands) {
    commands
        .spawn((
            Name::new("HostDialogue"),
            DespawnOnExit(Screen::City),
            HomeControl,
            Hud,
            anchored_row(None, Some(px(32)), px(0), px(0)),
        ))
        .with_children(|row| {
            row.spawn((
                Node {
                    width: percent(100),
                    max_width: px(720),
                    margin: UiRect::horizontal(Val::Auto),
                    padding: UiRect::all(px(24)),
                    flex_direction: FlexDirection::Column,
                    row_gap: px(16),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            ))
            .with_children(|panel| {
                panel.spawn(text("YUMI", 14.0, Color::srgb(0.96, 0.45, 0.71)));
                panel
                    .spawn((
                        DialogueCard,
                        DialoguePhase::new(),
                        Node {
                            flex_direction: FlexDirection::Column,
                            row_gap: px(12),
                            ..default()
                        },
                    ))
                    .with_child(line_bundle(
                        0,
                        Typewriter::from_millis(HOST_GREETING, GREETING_CHARACTER_MS),
                        20.0,
                        Color::WHITE,
                    ));
                panel.spawn((
                    DialogueReveal,
                    ModeSwitchButton,
                    Visibility::Hidden,
                    button("UNLOCK THE CITY", ButtonPalette::SOLID_BLUE),
                ));
            });
        });

    commands.spawn((
        Name::new("GoToCity"),
        DespawnOnExit(Screen::City),
        HomeControl,
        Hud,
        anchored_row(Some(px(16)), None, Val::Auto, px(16)),
        children![(
            ModeSwitchButton,
            button("GO TO CITY", ButtonPalette::SOLID_BLUE)
        )],
    ));
}

fn spawn_city_controls(mut commands: Commands) {
    commands.spawn((
        Name::new("CityBack"),
        DespawnOnExit(Screen::City),
        ModeContent::Destination,
        Visibility::Hidden,
        Hud,
        anchored_row(Some(px(32)), None, px(32), Val::Auto),
        children![back_button("BACK")],
    ));

    let Some(views) = table_for(Screen::City) else {
        return;
    };
    commands
        .spawn((
            Name::new("CityViews"),
            DespawnOnExit(Screen::City),
            ModeContent::Destination,
            Visibility::Hidden,
            Hud,
            Node {
                position_type: PositionType::Absolute,
                bottom: px(40),
                width: percent(100),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                row_gap: px(8),
                ..default()
            },
        ))
        .with_children(|bar| {
            bar.spawn(text("PICK A VIEW", 12.0, MUTED_TEXT));
            bar.spawn(Node {
                column_gap: px(12),
                ..default()
            })
            .with_children(|buttons| spawn_view_buttons(buttons, views));
        });
}
