use std::time::Duration;

use bevy::prelude::*;

use super::back_button;
use super::model;
use super::mute_button;
use super::spawn_view_buttons;
use crate::asset_loader::SceneLoad;
use crate::asset_loader::gltf_scene;
use crate::camera::table_for;
use crate::effects::Float;
use crate::effects::Hover;
use crate::effects::SparkleField;
use crate::effects::StarField;
use crate::effects::point_light;
use crate::media::AudioConfig;
use crate::media::SceneAudio;
use crate::media::looping_track;
use crate::state::Screen;
use crate::traits::TransformExt;
use crate::ui::Hud;
use crate::ui::anchored_row;
use crate::ui::heading;

pub struct MarsPlugin;

impl Plugin for MarsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Screen::Mars), (spawn_mars_world, spawn_mars_hud));
    }
}

const COLONY: &str = "models/city.glb";
const ASTRONAUT: &str = "models/astro.glb";
const ALIEN: &str = "models/alien.glb";
const PORTAL: &str = "models/portal.glb";
const ROVER: &str = "models/rover.glb";
const DRONE: &str = "models/drone.glb";
const SOUNDTRACK: &str = "audio/astro.ogg";

const ORANGE: Color = Color::srgb(1.0, 0.67, 0.0);
const PORTAL_CYAN: Color = Color::srgb(0.0, 1.0, 1.0);

fn spawn_mars_world(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    audio: Res<AudioConfig>,
) {
    let colony = gltf_scene(&asset_server, COLONY);
    let astronaut = gltf_scene(&asset_server, ASTRONAUT);
    let alien = gltf_scene(&asset_server, ALIEN);
    let portal = gltf_scene(&asset_server, PORTAL);
    let rover = gltf_scene(&asset_server, ROVER);
    let drone = gltf_scene(&asset_server, DRONE);

    commands.spawn((
        Name::new("MarsLoad"),
        DespawnOnExit(Screen::Mars),
        SceneLoad::new(
            [&colony, &astronaut, &alien, &portal, &rover, &drone].map(|handle| handle.id().untyped()),
            Duration::ZERO,
        ),
    ));

    commands.spawn((
        Name::new("Colony"),
        DespawnOnExit(Screen::Mars),
        model(colony, Transform::from_xyz(0.0, -2.0, 0.0)),
        children![(
            point_light(ORANGE, 20.0, 50.0),
            Transform::from_xyz(0.0, 10.0, 0.0)
        )],
    ));

    commands.spawn((
        Name::new("Astronaut"),
        DespawnOnExit(Screen::Mars),
        model(
            astronaut,
            Transform::from_trs(
                Vec3::new(5.0, -2.0, 5.0),
                Quat::from_rotation_y(-0.5),
                Vec3::splat(1.5),
            ),
        ),
        Float::new(2.0, 0.5, 0.2),
    ));

    commands.spawn((
        Name::new("Alien"),
        DespawnOnExit(Screen::Mars),
        model(
            alien,
            Transform::from_trs(
                Vec3::new(-5.0, -2.0, 3.0),
                Quat::from_rotation_y(0.5),
                Vec3::splat(1.2),
            ),
        ),
        children![(
            point_light(Color::srgb(0.0, 1.0, 0.0), 5.0, 8.0),
            Transform::from_xyz(0.0, 2.0, 0.0)
        )],
    ));

    commands.spawn((
        Name::new("Portal"),
        DespawnOnExit(Screen::Mars),
        model(portal, Transform::from_xyz(0.0, -2.0, -8.0)),
        children![
            (
                SparkleField::new(50, Vec3::new(4.0, 6.0, 1.0), PORTAL_CYAN)
                    .with_size(0.05)
                    .with_speed(2.0),
                Transform::from_xyz(0.0, 2.0, 0.0),
            ),
            (
                point_light(PORTAL_CYAN, 15.0, 15.0),
                Transform::from_xyz(0.0, 3.0, 0.0)
            ),
        ],
    ));

    commands.spawn((
        Name::new("Rover"),
        DespawnOnExit(Screen::Mars),
        model(
            rover,
            Transform::from_trs(
                Vec3::new(15.0, -2.5, 10.0),
                Quat::from_rotation_y(-0.5),
                Vec3::splat(1.2),
            ),
        ),
        children![(
            SpotLight {
                intensity: crate::effects::lumens(10.0),
                range: 10.0,
                outer_angle: 0.5,
                inner_angle: 0.25,
                ..default()
            },
            Transform::from_xyz(0.0, 1.0, 1.0).looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::Y),
        )],
    ));

    // hovers around y = 4, spinning about 0.02 rad a frame at 60 Hz
    commands.spawn((
        Name::new("Drone"),
        DespawnOnExit(Screen::Mars),
        model(
            drone,
            Transform::from_xyz(0.0, 4.0, 5.0).with_scale(Vec3::splat(1.5)),
        ),
        Hover::new(0.5, 1.5).with_spin(1.2),
        children![
            (
                SpotLight {
                    color: Color::srgb(1.0, 0.0, 0.0),
                    intensity: crate::effects::lumens(20.0),
                    range: 20.0,
                    outer_angle: 0.3,
                    inner_angle: 0.15,
                    ..default()
                },
                Transform::from_xyz(0.0, -0.5, 0.0).looking_at(Vec3::new(0.0, -10.0, 0.0), Vec3::Z),
            ),
            (
                point_light(Color::srgb(0.0, 1.0, 0.0), 5.0, 3.0),
                Transform::from_xyz(0.0, 0.5, 0.0)
            ),
        ],
    ));

    commands.spawn((
        Name::new("MarsStars"),
        DespawnOnExit(Screen::Mars),
        StarField::new(1500, 300.0, 50.0),
    ));

    commands.spawn((
        Name::new("MarsSun"),
        DespawnOnExit(Screen::Mars),
        DirectionalLight {
            color: ORANGE,
            illuminance: 6_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(50.0, 50.0, 25.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Name::new("MarsSoundtrack"),
        DespawnOnExit(Screen::Mars),
        looping_track(
            asset_server.load(SOUNDTRACK),
            audio.mars_volume,
            SceneAudio::autoplay(),
        ),
    ));
}

fn spawn_mars_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("MarsTitle"),
        DespawnOnExit(Screen::Mars),
        Hud,
        anchored_row(Some(px(32)), None, px(32), Val::Auto),
        children![
            back_button("EXIT"),
            heading(Screen::Mars.title(), Color::srgb(0.94, 0.27, 0.27)),
        ],
    ));

    commands.spawn((
        Name::new("MarsSound"),
        DespawnOnExit(Screen::Mars),
        Hud,
        anchored_row(Some(px(32)), None, Val::Auto, px(32)),
        children![mute_button()],
    ));

    let Some(views) = table_for(Screen::Mars) else {
        return;
    };
    commands
        .spawn((
            Name::new("MarsViews"),
            DespawnOnExit(Screen::Mars),
            Hud,
            anchored_row(None, Some(px(40)), px(0), px(0)),
        ))
        .with_children(|row| {
            row.spawn(Node {
                margin: UiRect::horizontal(Val::Auto),
                column_gap: px(12),
                ..default()
            })
            .with_children(|buttons| spawn_view_buttons(buttons, views));
        });
}
