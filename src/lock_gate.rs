//! The veil over the lobby.
//!
//! Every visit to the lobby starts locked behind an opaque full-screen veil. The first tap (or the
//! confirm key) unlocks it - exactly once per visit - and uses that gesture to start the lobby
//! ambience. The veil then fades out and is removed. Taps that land while it is fading change
//! nothing. Leaving the lobby drops the gate; coming back builds a fresh one.

use std::time::Duration;

use bevy::prelude::*;
use bevy::ui::FocusPolicy;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;

use crate::despawn::despawn;
use crate::media::AutoplayPolicy;
use crate::media::PlaybackError;
use crate::media::SceneAudio;
use crate::schedule::ScreenSet;
use crate::state::Screen;

pub struct LockGatePlugin;

impl Plugin for LockGatePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LockGateConfig>()
            .add_message::<UnlockRequested>()
            .add_systems(OnEnter(Screen::Lobby), (init_lock_gate, spawn_veil).chain())
            .add_systems(OnExit(Screen::Lobby), drop_lock_gate)
            .add_systems(Update, press_veil.in_set(ScreenSet::Input))
            .add_systems(
                Update,
                (unlock_gate, fade_veil)
                    .chain()
                    .in_set(ScreenSet::Sequencing)
                    .run_if(resource_exists::<LockGate>),
            );
    }
}

#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct LockGateConfig {
    #[inspector(min = 0.1, max = 3.0, display = NumberDisplay::Slider)]
    pub fade_secs:    f32,
    /// 1 hides the lobby completely while locked
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub veil_opacity: f32,
}

impl Default for LockGateConfig {
    fn default() -> Self {
        Self {
            fade_secs:    0.6,
            veil_opacity: 1.0,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum UnlockOutcome<E> {
    /// this call unlocked the gate; carries what the side effect returned
    Unlocked(Result<(), E>),
    AlreadyUnlocked,
}

#[derive(Resource, Debug, Clone)]
pub struct LockGate {
    locked: bool,
    fade:   Timer,
}

impl LockGate {
    pub fn new(fade: Duration) -> Self {
        let mut fade = Timer::new(fade, TimerMode::Once);
        fade.pause();
        Self { locked: true, fade }
    }

    pub const fn is_locked(&self) -> bool { self.locked }

    /// Unlocks on the first call only, running `on_unlock` exactly then. Whatever the side
    /// effect returns is handed back - it never stops the gate from opening.
    pub fn unlock<E>(&mut self, on_unlock: impl FnOnce() -> Result<(), E>) -> UnlockOutcome<E> {
        if !self.locked {
            return UnlockOutcome::AlreadyUnlocked;
        }
        self.locked = false;
        self.fade.unpause();
        UnlockOutcome::Unlocked(on_unlock())
    }

    /// Advances the fade. True on the frame the veil is fully gone.
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.fade.tick(delta);
        self.fade.just_finished()
    }

    /// 1 while locked, falling to 0 over the fade.
    pub fn veil_alpha(&self) -> f32 {
        if self.locked { 1.0 } else { 1.0 - self.fade.fraction() }
    }

    pub fn is_veiled(&self) -> bool { self.locked || !self.fade.is_finished() }
}

/// A tap on the veil or the confirm key.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct UnlockRequested;

/// Marks the lobby track the gate starts.
#[derive(Component, Debug, Clone, Copy)]
pub struct LobbyAmbience;

#[derive(Component, Debug)]
pub struct LockVeil;

fn init_lock_gate(mut commands: Commands, config: Res<LockGateConfig>) {
    commands.insert_resource(LockGate::new(Duration::from_secs_f32(config.fade_secs)));
}

fn drop_lock_gate(mut commands: Commands) { commands.remove_resource::<LockGate>(); }

fn spawn_veil(mut commands: Commands, config: Res<LockGateConfig>) {
    commands
        .spawn((
            Name::new("LockVeil"),
            LockVeil,
            DespawnOnExit(Screen::Lobby),
            Button,
            FocusPolicy::Block,
            GlobalZIndex(100),
            Node {
                width: percent(100),
                height: percent(100),
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                row_gap: px(16),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, config.veil_opacity)),
        ))
        .with_children(|veil| {
            veil.spawn((
                Text::new("IDINVERSE"),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
                TextColor(Color::srgb(0.75, 0.5, 1.0)),
            ));
            veil.spawn((
                Text::new("TAP TO ENTER"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.6)),
            ));
        });
}

fn press_veil(
    veils: Query<&Interaction, (Changed<Interaction>, With<LockVeil>)>,
    mut unlock: MessageWriter<UnlockRequested>,
) {
    if veils.iter().any(|interaction| *interaction == Interaction::Pressed) {
        unlock.write(UnlockRequested);
    }
}

fn unlock_gate(
    mut requests: MessageReader<UnlockRequested>,
    mut gate: ResMut<LockGate>,
    mut policy: ResMut<AutoplayPolicy>,
    mut ambience: Query<(&mut SceneAudio, Option<&AudioSink>), With<LobbyAmbience>>,
) {
    for _ in requests.read() {
        let outcome = gate.unlock(|| {
            // the unlock itself is the gesture the autoplay policy is waiting for
            policy.note_gesture();
            let mut result = Ok(());
            for (mut track, sink) in &mut ambience {
                track.request_play();
                if let Err(error) = track.attempt(sink, &policy) {
                    result = Err(error);
                }
            }
            result
        });

        match outcome {
            UnlockOutcome::Unlocked(Ok(())) => info!("unlocked - ambience playing"),
            // not fatal: the sink may still be loading, or the platform wants another gesture
            UnlockOutcome::Unlocked(Err(error @ PlaybackError::NotReady)) => {
                debug!("unlocked - ambience will start when loaded ({error})");
            },
            UnlockOutcome::Unlocked(Err(error)) => info!("unlocked without sound: {error}"),
            UnlockOutcome::AlreadyUnlocked => {},
        }
    }
}

fn fade_veil(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<LockGateConfig>,
    mut gate: ResMut<LockGate>,
    mut veils: Query<(Entity, &mut BackgroundColor, &Children), With<LockVeil>>,
    mut texts: Query<&mut TextColor>,
) {
    if gate.is_locked() {
        return;
    }
    let gone = gate.tick(time.delta());
    let alpha = gate.veil_alpha();

    for (entity, mut background, children) in &mut veils {
        if gone {
            debug!("veil faded out");
            despawn(&mut commands, entity);
            continue;
        }
        background.0 = background.0.with_alpha(alpha * config.veil_opacity);
        for child in children {
            if let Ok(mut color) = texts.get_mut(*child) {
                color.0 = color.0.with_alpha(alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;

    use super::*;
    use crate::router::Navigate;
    use crate::router::RouterPlugin;
    use crate::schedule::SchedulePlugin;
    use crate::state::StatePlugin;

    const FADE: Duration = Duration::from_millis(600);

    #[test]
    fn second_unlock_is_a_no_op() {
        let mut gate = LockGate::new(FADE);
        let mut side_effects = 0;

        assert!(gate.is_locked());
        let first = gate.unlock(|| {
            side_effects += 1;
            Ok::<(), PlaybackError>(())
        });
        let second = gate.unlock(|| {
            side_effects += 1;
            Ok::<(), PlaybackError>(())
        });

        assert_eq!(first, UnlockOutcome::Unlocked(Ok(())));
        assert_eq!(second, UnlockOutcome::AlreadyUnlocked);
        assert_eq!(side_effects, 1);
        assert!(!gate.is_locked());
    }

    #[test]
    fn a_failing_side_effect_still_unlocks() {
        let mut gate = LockGate::new(FADE);
        let outcome = gate.unlock(|| Err(PlaybackError::GestureRequired));
        assert_eq!(
            outcome,
            UnlockOutcome::Unlocked(Err(PlaybackError::GestureRequired))
        );
        assert!(!gate.is_locked());
    }

    #[test]
    fn veil_only_fades_once_unlocked_and_is_gone_after_the_fade() {
        let mut gate = LockGate::new(FADE);
        assert!(!gate.tick(FADE * 3));
        assert!((gate.veil_alpha() - 1.0).abs() < f32::EPSILON);
        assert!(gate.is_veiled());

        gate.unlock(|| Ok::<(), PlaybackError>(()));
        assert!(!gate.tick(FADE / 2));
        assert!((gate.veil_alpha() - 0.5).abs() < 1e-3);

        // a second tap halfway through doesn't restart the fade
        gate.unlock(|| Ok::<(), PlaybackError>(()));
        assert!((gate.veil_alpha() - 0.5).abs() < 1e-3);

        assert!(gate.tick(FADE / 2));
        assert!(!gate.is_veiled());
        assert!(!gate.tick(FADE));
    }

    fn gate_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .add_plugins((StatePlugin, SchedulePlugin, RouterPlugin, LockGatePlugin))
            .insert_resource(AutoplayPolicy::new(true))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app
    }

    fn veil_count(app: &mut App) -> usize {
        let mut veils = app.world_mut().query_filtered::<Entity, With<LockVeil>>();
        veils.iter(app.world()).count()
    }

    fn navigate(app: &mut App, path: &str) {
        app.world_mut().write_message(Navigate::to(path));
        app.update();
        app.update();
    }

    #[test]
    fn clicking_the_veil_unlocks_plays_and_clears_it() {
        let mut app = gate_app();
        let ambience = app
            .world_mut()
            .spawn((LobbyAmbience, SceneAudio::on_demand()))
            .id();

        app.update();
        app.update();
        assert!(app.world().resource::<LockGate>().is_locked());
        let mut backgrounds = app
            .world_mut()
            .query_filtered::<&BackgroundColor, With<LockVeil>>();
        let opaque = backgrounds
            .iter(app.world())
            .all(|background| (background.0.alpha() - 1.0).abs() < f32::EPSILON);
        assert!(opaque);

        // two taps in the same frame
        app.world_mut().write_message(UnlockRequested);
        app.world_mut().write_message(UnlockRequested);
        app.update();

        assert!(!app.world().resource::<LockGate>().is_locked());
        assert!(app.world().resource::<AutoplayPolicy>().allows_playback());
        let track = app.world().get::<SceneAudio>(ambience);
        assert!(track.is_some_and(SceneAudio::wants_play));

        for _ in 0..10 {
            app.update();
        }
        assert_eq!(veil_count(&mut app), 0);
        assert!(!app.world().resource::<LockGate>().is_veiled());
    }

    #[test]
    fn coming_back_to_the_lobby_locks_it_again() {
        let mut app = gate_app();
        app.update();
        app.update();
        assert_eq!(veil_count(&mut app), 1);

        app.world_mut().write_message(UnlockRequested);
        app.update();
        assert!(!app.world().resource::<LockGate>().is_locked());

        navigate(&mut app, "/city");
        assert!(app.world().get_resource::<LockGate>().is_none());
        assert_eq!(veil_count(&mut app), 0);

        navigate(&mut app, "/");
        assert!(app.world().resource::<LockGate>().is_locked());
        assert_eq!(veil_count(&mut app), 1);
    }

    #[test]
    fn leaving_mid_fade_leaves_no_veil_behind() {
        let mut app = gate_app();
        app.update();
        app.update();
        app.world_mut().write_message(UnlockRequested);
        app.update();
        assert_eq!(veil_count(&mut app), 1);

        navigate(&mut app, "/about");
        assert_eq!(veil_count(&mut app), 0);
    }
}
