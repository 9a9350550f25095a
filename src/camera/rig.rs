//! Preset driven camera motion.
//!
//! While travelling, every frame the camera closes a fixed fraction of the remaining distance to
//! the selected preset, both for its position and for the point it looks at. There is no
//! duration: the motion decelerates and converges. Picking another preset mid-flight just moves
//! the target. Once the preset is reached the pan-orbit controls belong to the user again, and
//! the next preset picks up from wherever they left the camera.

use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;

use super::config::CameraConfig;
use super::pan_orbit_ext::PanOrbitCameraExt;
use super::presets::CameraPreset;
use super::presets::PresetTable;
use super::presets::table_for;
use crate::schedule::ScreenSet;
use crate::state::Screen;

pub struct CameraRigPlugin;

impl Plugin for CameraRigPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SelectView>()
            .add_systems(
                Update,
                snap_rig_to_scene_default.run_if(state_changed::<Screen>),
            )
            .add_systems(Update, press_view_buttons.in_set(ScreenSet::Input))
            .add_systems(Update, select_views.in_set(ScreenSet::Sequencing))
            .add_systems(
                Update,
                (drive_rig, highlight_view_buttons)
                    .chain()
                    .in_set(ScreenSet::Presentation),
            );
    }
}

/// The damping factor is tuned for this frame rate; other frame times are normalised to it.
const REFERENCE_FPS: f32 = 60.0;

/// Closer than this to the preset, on both points, counts as arrived.
const SETTLE_DISTANCE: f32 = 1e-3;

/// Fraction of the remaining distance covered in `dt` seconds, for a per-frame `factor` at
/// [`REFERENCE_FPS`].
pub fn damping_alpha(factor: f32, dt: f32) -> f32 {
    let factor = factor.clamp(0.0, 1.0);
    (1.0 - (1.0 - factor).powf(dt.max(0.0) * REFERENCE_FPS)).clamp(0.0, 1.0)
}

/// One step of exponential decay from `current` toward `target`. Never overshoots.
pub fn damp_toward(current: Vec3, target: Vec3, factor: f32, dt: f32) -> Vec3 {
    current.lerp(target, damping_alpha(factor, dt))
}

#[derive(Component, Debug, Clone, Default)]
pub struct CameraRig {
    table:       Option<PresetTable>,
    selected:    Option<&'static CameraPreset>,
    position:    Vec3,
    look_at:     Vec3,
    travelling:  bool,
    /// radians per second of yaw added once the rig has arrived
    orbit_speed: f32,
}

impl CameraRig {
    /// Jump straight to the table's default preset - used when a scene is entered.
    pub fn snap_to(&mut self, table: PresetTable) {
        self.table = Some(table);
        self.selected = table.default_preset();
        if let Some(preset) = self.selected {
            self.position = preset.position;
            self.look_at = preset.target;
        }
        // one frame of travel so the camera controls pick up the new preset
        self.travelling = self.selected.is_some();
    }

    /// Aim at another preset. An unknown key leaves the camera holding where it is.
    pub fn select(&mut self, key: &str) -> bool {
        self.selected = self.table.and_then(|table| table.find(key));
        if self.selected.is_none() {
            warn!("no camera preset named `{key}` - holding position");
        }
        self.travelling = self.selected.is_some();
        self.travelling
    }

    pub fn select_next(&mut self) -> bool {
        let Some(table) = self.table else {
            return false;
        };
        let current = self.selected.map_or("", |preset| preset.key);
        self.selected = table.after(current);
        self.travelling = self.selected.is_some();
        self.travelling
    }

    pub fn with_orbit(&mut self, radians_per_second: f32) { self.orbit_speed = radians_per_second; }

    /// Takes over the camera where the user left it. Ignored mid-flight, where the rig's own
    /// position is the camera's.
    pub fn resume_from(&mut self, position: Vec3, look_at: Vec3) {
        if !self.travelling {
            self.position = position;
            self.look_at = look_at;
        }
    }

    /// Where the rig is heading: the selected preset's position and target.
    pub fn goal(&self) -> Option<(Vec3, Vec3)> {
        self.selected.map(|preset| (preset.position, preset.target))
    }

    pub fn step(&mut self, factor: f32, dt: f32) {
        if !self.travelling {
            return;
        }
        let Some((position, target)) = self.goal() else {
            self.travelling = false;
            return;
        };
        self.position = damp_toward(self.position, position, factor, dt);
        self.look_at = damp_toward(self.look_at, target, factor, dt);

        if self.position.distance(position) < SETTLE_DISTANCE
            && self.look_at.distance(target) < SETTLE_DISTANCE
        {
            self.position = position;
            self.look_at = target;
            self.travelling = false;
        }
    }

    /// Yaw to add this frame. Nothing while a preset move is still under way.
    pub fn auto_rotate(&self, dt: f32) -> f32 {
        if self.travelling {
            0.0
        } else {
            self.orbit_speed * dt
        }
    }

    pub const fn is_travelling(&self) -> bool { self.travelling }

    pub fn selected(&self) -> Option<&'static CameraPreset> { self.selected }

    pub const fn position(&self) -> Vec3 { self.position }

    pub const fn look_at(&self) -> Vec3 { self.look_at }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_at(self.look_at, Vec3::Y)
    }
}

/// Request to aim the camera at a preset of the current scene.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum SelectView {
    Preset(&'static str),
    Next,
}

/// Button that aims the camera at a preset of the current scene.
#[derive(Component, Debug, Clone, Copy)]
pub struct ViewButton(pub &'static str);

fn snap_rig_to_scene_default(
    screen: Res<State<Screen>>,
    mut rigs: Query<(&mut CameraRig, &mut Transform)>,
    config: Res<CameraConfig>,
) {
    let Some(table) = table_for(*screen.get()) else {
        return;
    };
    for (mut rig, mut transform) in &mut rigs {
        rig.snap_to(table);
        rig.with_orbit(if *screen.get() == Screen::Lobby {
            config.lobby_orbit_speed
        } else {
            0.0
        });
        *transform = rig.transform();
        debug!(
            "camera rig snapped to {:?} for {:?}",
            rig.selected().map(|preset| preset.key),
            screen.get()
        );
    }
}

fn press_view_buttons(
    buttons: Query<(&Interaction, &ViewButton), Changed<Interaction>>,
    mut select: MessageWriter<SelectView>,
) {
    for (interaction, button) in &buttons {
        if *interaction == Interaction::Pressed {
            select.write(SelectView::Preset(button.0));
        }
    }
}

fn select_views(
    mut requests: MessageReader<SelectView>,
    mut rigs: Query<(&mut CameraRig, &Transform, Option<&PanOrbitCamera>)>,
) {
    for request in requests.read() {
        for (mut rig, transform, orbit) in &mut rigs {
            let focus = orbit.map_or(rig.look_at(), |orbit| orbit.focus);
            rig.resume_from(transform.translation, focus);
            match request {
                SelectView::Preset(key) => rig.select(key),
                SelectView::Next => rig.select_next(),
            };
        }
    }
}

fn drive_rig(
    time: Res<Time>,
    config: Res<CameraConfig>,
    mut rigs: Query<(&mut CameraRig, &mut Transform, Option<&mut PanOrbitCamera>)>,
) {
    let dt = time.delta_secs();
    for (mut rig, mut transform, orbit) in &mut rigs {
        let travelling = rig.is_travelling();
        rig.step(config.damping, dt);

        let Some(mut orbit) = orbit else {
            if travelling {
                *transform = rig.transform();
            }
            continue;
        };

        if travelling {
            orbit.disable_interpolation();
            orbit.aim(rig.position(), rig.look_at());
            if !rig.is_travelling() {
                orbit.enable_interpolation(&config);
                debug!(
                    "camera rig arrived at {:?}",
                    rig.selected().map(|preset| preset.key)
                );
            }
        } else {
            orbit.target_yaw += rig.auto_rotate(dt);
        }
    }
}

fn highlight_view_buttons(
    rigs: Query<&CameraRig, Changed<CameraRig>>,
    mut buttons: Query<(&ViewButton, &mut BorderColor)>,
) {
    let Some(selected) = rigs.iter().find_map(CameraRig::selected) else {
        return;
    };
    for (button, mut border) in &mut buttons {
        *border = if button.0 == selected.key {
            BorderColor::all(Color::WHITE)
        } else {
            BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.1))
        };
    }
}
