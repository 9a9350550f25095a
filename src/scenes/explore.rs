//! The mystical camp. Two sound channels that play and pause together, a spirit mode that
//! switches the auras on and off, and a focus mode that hides the HUD.

use std::time::Duration;

use bevy::prelude::*;

use super::back_button;
use super::model;
use super::spawn_view_buttons;
use crate::asset_loader::SceneLoad;
use crate::asset_loader::gltf_scene;
use crate::camera::table_for;
use crate::effects::Flicker;
use crate::effects::Float;
use crate::effects::Hover;
use crate::effects::SparkleField;
use crate::effects::StarField;
use crate::effects::lumens;
use crate::effects::point_light;
use crate::media::AudioConfig;
use crate::media::AudioLabel;
use crate::media::PlaybackButton;
use crate::media::SceneAudio;
use crate::media::looping_track;
use crate::schedule::ScreenSet;
use crate::state::Screen;
use crate::traits::TransformExt;
use crate::ui::ButtonPalette;
use crate::ui::Hud;
use crate::ui::anchored_row;
use crate::ui::button;
use crate::ui::heading;
use crate::ui::text;

pub struct ExplorePlugin;

impl Plugin for ExplorePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(Screen::Explore),
            (spawn_camp_world, spawn_camp_spirits, spawn_camp_hud),
        )
        .add_systems(Update, press_mode_buttons.in_set(ScreenSet::Input))
        .add_systems(
            Update,
            apply_camp_modes
                .in_set(ScreenSet::Presentation)
                .run_if(in_state(Screen::Explore)),
        );
    }
}

const WORLD: &str = "models/explore_world.glb";
const STATUE: &str = "models/patung_couple.glb";
const KERIS: &str = "models/keris.glb";
const GHOST: &str = "models/kuntilanak.glb";
const BONES: &str = "models/bones.glb";
const GAMELAN: &str = "audio/gamelan.ogg";
const LAUGHTER: &str = "audio/ketawa.ogg";

/// The camp keeps its loading screen up a little after the last model arrives.
const LOADER_LINGER: Duration = Duration::from_millis(800);

const FIRE: Color = Color::srgb(1.0, 0.33, 0.0);
const SPIRIT_CYAN: Color = Color::srgb(0.0, 1.0, 1.0);
const SPIRIT_VIOLET: Color = Color::srgb(0.74, 0.0, 1.0);
const BLOOD: Color = Color::srgb(1.0, 0.0, 0.0);
const GHOST_GREEN: Color = Color::srgb(0.0, 1.0, 0.67);

/// Display toggles of the camp. Fresh on every visit.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampModes {
    spirit: bool,
    focus:  bool,
}

impl Default for CampModes {
    fn default() -> Self {
        Self {
            spirit: true,
            focus:  false,
        }
    }
}

impl CampModes {
    pub const fn toggle_spirit(&mut self) { self.spirit = !self.spirit; }

    pub const fn set_focus(&mut self, focus: bool) { self.focus = focus; }

    pub const fn spirit(&self) -> bool { self.spirit }

    pub const fn hud_visible(&self) -> bool { !self.focus }
}

/// Lights and sparkles that only show in spirit mode.
#[derive(Component, Debug, Clone, Copy)]
struct SpiritAura;

#[derive(Component, Debug, Clone, Copy)]
enum ModeButton {
    Spirit,
    EnterFocus,
    LeaveFocus,
}

fn spawn_camp_world(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    audio: Res<AudioConfig>,
) {
    let world = gltf_scene(&asset_server, WORLD);
    let statue = gltf_scene(&asset_server, STATUE);
    let keris = gltf_scene(&asset_server, KERIS);
    let ghost = gltf_scene(&asset_server, GHOST);
    let bones = gltf_scene(&asset_server, BONES);

    commands.spawn((
        Name::new("CampLoad"),
        DespawnOnExit(Screen::Explore),
        SceneLoad::new(
            [&world, &statue, &keris, &ghost, &bones].map(|handle| handle.id().untyped()),
            LOADER_LINGER,
        ),
    ));
    commands.spawn((
        Name::new("CampModes"),
        DespawnOnExit(Screen::Explore),
        CampModes::default(),
    ));

    commands.spawn((
        Name::new("Campfire"),
        DespawnOnExit(Screen::Explore),
        model(
            world,
            Transform::from_xyz(0.0, -2.0, 0.0).with_scale(Vec3::splat(1.5)),
        ),
        children![
            (
                point_light(FIRE, 40.0, 20.0),
                Flicker {
                    base:      lumens(40.0),
                    amplitude: lumens(6.0),
                    frequency: 9.0,
                },
                Transform::from_xyz(0.0, 1.0, 0.0),
            ),
            (
                SparkleField::new(40, Vec3::new(1.5, 4.0, 1.5), Color::srgb(1.0, 0.67, 0.0))
                    .with_speed(2.0)
                    .with_size(0.03),
                Transform::from_xyz(0.0, 1.0, 0.0),
            ),
        ],
    ));

    commands.spawn((
        Name::new("Statue"),
        DespawnOnExit(Screen::Explore),
        model(
            statue,
            Transform::from_trs(
                Vec3::new(3.5, -2.0, 1.0),
                Quat::from_rotation_y(1.8),
                Vec3::splat(0.002),
            ),
        ),
    ));

    commands.spawn((
        Name::new("Keris"),
        DespawnOnExit(Screen::Explore),
        model(
            keris,
            Transform::from_trs(
                Vec3::new(4.1, -2.0, 1.5),
                Quat::from_rotation_y(-0.5),
                Vec3::splat(0.014),
            ),
        ),
    ));

    commands.spawn((
        Name::new("Ghost"),
        DespawnOnExit(Screen::Explore),
        model(
            ghost,
            Transform::from_trs(
                Vec3::new(-6.0, 0.0, -2.0),
                Quat::from_rotation_y(1.0),
                Vec3::splat(95.0),
            ),
        ),
        Hover::new(0.2, 3.0),
    ));

    commands.spawn((
        Name::new("Bones"),
        DespawnOnExit(Screen::Explore),
        model(
            bones,
            Transform::from_trs(
                Vec3::new(8.0, -2.0, -8.0),
                Quat::from_rotation_y(2.5),
                Vec3::splat(0.7),
            ),
        ),
    ));

    commands.spawn((
        Name::new("CampStars"),
        DespawnOnExit(Screen::Explore),
        StarField::new(1500, 200.0, 50.0),
    ));
    commands.spawn((
        Name::new("NightSky"),
        DespawnOnExit(Screen::Explore),
        SparkleField::new(500, Vec3::new(100.0, 50.0, 100.0), Color::WHITE)
            .with_speed(0.2)
            .with_size(0.08)
            .with_glow(0.5),
        Transform::from_xyz(0.0, 20.0, -50.0),
    ));
    commands.spawn((
        Name::new("Fireflies"),
        DespawnOnExit(Screen::Explore),
        SparkleField::new(200, Vec3::new(30.0, 10.0, 30.0), Color::srgb(0.8, 1.0, 0.0))
            .with_speed(0.2)
            .with_size(0.03)
            .with_glow(0.6),
        Transform::from_xyz(0.0, 2.0, 0.0),
    ));

    // both channels start together and are toggled together
    commands.spawn((
        Name::new("Gamelan"),
        DespawnOnExit(Screen::Explore),
        looping_track(
            asset_server.load(GAMELAN),
            audio.gamelan_volume,
            SceneAudio::autoplay(),
        ),
    ));
    commands.spawn((
        Name::new("Laughter"),
        DespawnOnExit(Screen::Explore),
        looping_track(
            asset_server.load(LAUGHTER),
            audio.laugh_volume,
            SceneAudio::autoplay(),
        ),
    ));
}

fn spawn_camp_spirits(mut commands: Commands) {
    commands.spawn((
        Name::new("StatueAura"),
        DespawnOnExit(Screen::Explore),
        SpiritAura,
        Transform::from_xyz(3.5, -2.0, 1.0),
        Visibility::Inherited,
        children![
            (
                point_light(SPIRIT_CYAN, 10.0, 6.0),
                Transform::from_xyz(0.0, 1.0, 0.0)
            ),
            (
                point_light(SPIRIT_VIOLET, 8.0, 5.0),
                Transform::from_xyz(0.5, 2.0, 0.5)
            ),
            (
                SparkleField::new(60, Vec3::new(3.0, 5.0, 3.0), SPIRIT_CYAN)
                    .with_speed(0.4)
                    .with_glow(0.7),
                Float::new(2.0, 1.0, 0.5),
                Transform::default(),
            ),
            (
                SparkleField::new(30, Vec3::new(2.0, 4.0, 2.0), SPIRIT_VIOLET)
                    .with_speed(0.6)
                    .with_glow(0.5),
                Float::new(2.0, 1.0, 0.5),
                Transform::default(),
            ),
        ],
    ));

    commands.spawn((
        Name::new("KerisAura"),
        DespawnOnExit(Screen::Explore),
        SpiritAura,
        Transform::from_xyz(4.1, -2.0, 1.5),
        Visibility::Inherited,
        children![
            (
                point_light(BLOOD, 3.0, 2.0),
                Transform::from_xyz(0.0, 0.5, 0.0)
            ),
            SparkleField::new(15, Vec3::new(0.5, 0.8, 0.5), BLOOD)
                .with_speed(1.0)
                .with_glow(0.8),
        ],
    ));

    // the ghost's hand orbs bob out of step with each other
    commands.spawn((
        Name::new("GhostAura"),
        DespawnOnExit(Screen::Explore),
        SpiritAura,
        Transform::from_trs(
            Vec3::new(-6.0, 0.0, -2.0),
            Quat::from_rotation_y(1.0),
            Vec3::ONE,
        ),
        Visibility::Inherited,
        children![
            (
                Transform::from_xyz(-0.5, 1.2, 0.2),
                Visibility::Inherited,
                Hover::new(0.5, 5.0),
                children![
                    point_light(BLOOD, 5.0, 2.0),
                    SparkleField::new(10, Vec3::splat(0.5), BLOOD).with_speed(5.0),
                ],
            ),
            (
                Transform::from_xyz(0.5, 1.2, 0.2),
                Visibility::Inherited,
                Hover::new(0.5, 5.0).with_phase(2.0),
                children![
                    point_light(BLOOD, 5.0, 2.0),
                    SparkleField::new(10, Vec3::splat(0.5), BLOOD).with_speed(5.0),
                ],
            ),
            (
                SparkleField::new(60, Vec3::new(3.0, 4.0, 3.0), BLOOD)
                    .with_speed(3.0)
                    .with_size(0.04)
                    .with_glow(0.6),
                Transform::from_xyz(0.0, 1.0, 0.0),
            ),
            (
                SpotLight {
                    color: Color::srgb(0.67, 1.0, 0.67),
                    intensity: lumens(8.0),
                    range: 6.0,
                    outer_angle: 0.6,
                    ..default()
                },
                Transform::from_xyz(0.0, -2.0, 2.0).looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::Y),
            ),
        ],
    ));

    commands.spawn((
        Name::new("BonesAura"),
        DespawnOnExit(Screen::Explore),
        SpiritAura,
        Transform::from_xyz(8.0, -2.0, -8.0),
        Visibility::Inherited,
        children![
            (
                point_light(GHOST_GREEN, 2.5, 5.0),
                Flicker {
                    base:      lumens(2.0),
                    amplitude: lumens(0.5),
                    frequency: 2.0,
                },
                Transform::from_xyz(0.0, 1.5, 0.0),
            ),
            SparkleField::new(30, Vec3::splat(2.0), SPIRIT_CYAN)
                .with_speed(0.3)
                .with_glow(0.7),
        ],
    ));
}

fn spawn_camp_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("CampTitle"),
        DespawnOnExit(Screen::Explore),
        Hud,
        anchored_row(Some(px(24)), None, px(24), px(24)),
        children![
            heading(Screen::Explore.title(), Color::srgb(0.98, 0.45, 0.09)),
            (
                Node {
                    flex_grow: 1.0,
                    ..default()
                },
            ),
            back_button("EXIT"),
        ],
    ));

    if let Some(views) = table_for(Screen::Explore) {
        commands
            .spawn((
                Name::new("CampViews"),
                DespawnOnExit(Screen::Explore),
                Hud,
                Node {
                    position_type: PositionType::Absolute,
                    right: px(24),
                    top: percent(30),
                    flex_direction: FlexDirection::Column,
                    row_gap: px(8),
                    ..default()
                },
            ))
            .with_children(|column| spawn_view_buttons(column, views));
    }

    commands.spawn((
        Name::new("CampToolbar"),
        DespawnOnExit(Screen::Explore),
        Hud,
        anchored_row(None, Some(px(24)), px(24), Val::Auto),
        children![
            (ModeButton::Spirit, button("SPIRIT", ButtonPalette::accent(SPIRIT_CYAN))),
            (ModeButton::EnterFocus, button("FOCUS", ButtonPalette::GLASS)),
            (
                PlaybackButton,
                button("PLAY / PAUSE", ButtonPalette::GLASS),
            ),
            (AudioLabel, text("LOADING SOUND", 12.0, Color::WHITE)),
        ],
    ));

    // the only control left while focused
    commands.spawn((
        Name::new("LeaveFocus"),
        DespawnOnExit(Screen::Explore),
        anchored_row(Some(px(24)), None, Val::Auto, px(24)),
        children![(
            ModeButton::LeaveFocus,
            Visibility::Hidden,
            button("SHOW HUD", ButtonPalette::GLASS),
        )],
    ));
}

fn press_mode_buttons(
    buttons: Query<(&Interaction, &ModeButton), Changed<Interaction>>,
    mut modes: Query<&mut CampModes>,
) {
    for (_, button) in buttons
        .iter()
        .filter(|(interaction, _)| **interaction == Interaction::Pressed)
    {
        for mut camp in &mut modes {
            match button {
                ModeButton::Spirit => camp.toggle_spirit(),
                ModeButton::EnterFocus => camp.set_focus(true),
                ModeButton::LeaveFocus => camp.set_focus(false),
            }
            debug!("camp modes: {:?}", *camp);
        }
    }
}

fn apply_camp_modes(
    modes: Query<&CampModes, Changed<CampModes>>,
    mut auras: Query<&mut Visibility, (With<SpiritAura>, Without<Hud>, Without<ModeButton>)>,
    mut huds: Query<&mut Visibility, (With<Hud>, Without<SpiritAura>, Without<ModeButton>)>,
    mut restore: Query<(&ModeButton, &mut Visibility), (Without<Hud>, Without<SpiritAura>)>,
) {
    let Some(camp) = modes.iter().next() else {
        return;
    };
    let shown = |visible: bool| {
        if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        }
    };

    for mut visibility in &mut auras {
        visibility.set_if_neq(shown(camp.spirit()));
    }
    for mut visibility in &mut huds {
        visibility.set_if_neq(shown(camp.hud_visible()));
    }
    for (button, mut visibility) in &mut restore {
        if matches!(button, ModeButton::LeaveFocus) {
            visibility.set_if_neq(shown(!camp.hud_visible()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camp_starts_haunted_with_the_hud_up() {
        let camp = CampModes::default();
        assert!(camp.spirit());
        assert!(camp.hud_visible());
    }

    #[test]
    fn toggles_are_independent() {
        let mut camp = CampModes::default();
        camp.toggle_spirit();
        camp.set_focus(true);
        assert!(!camp.spirit());
        assert!(!camp.hud_visible());

        camp.set_focus(false);
        assert!(!camp.spirit());
        assert!(camp.hud_visible());
        camp.toggle_spirit();
        assert!(camp.spirit());
    }
}
