//! The one-shot switch from a scene's home view to its destination, hidden behind an overlay.
//!
//! A [`ModeSwitch`] lives on an entity of the scene. When triggered it goes `Transitioning`, the
//! overlay fades in, the content is swapped once the swap delay has passed (while the overlay is
//! opaque) and the overlay fades out and is removed at the end delay. There is no way back.

use std::f32::consts::PI;
use std::f32::consts::TAU;
use std::time::Duration;

use bevy::prelude::*;
use bevy::ui::FocusPolicy;
use bevy::ui::UiTransform;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;

use crate::despawn::despawn;
use crate::schedule::ScreenSet;
use crate::state::Screen;
use crate::traits::UsizeExt;

pub struct TransitionPlugin;

impl Plugin for TransitionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TransitionConfig>()
            .add_message::<ModeSwitchRequested>()
            .add_systems(Update, press_mode_switch_buttons.in_set(ScreenSet::Input))
            .add_systems(
                Update,
                (start_mode_switch, tick_mode_switch)
                    .chain()
                    .in_set(ScreenSet::Sequencing),
            )
            .add_systems(
                Update,
                (show_mode_content, suppress_home_controls, animate_overlay)
                    .in_set(ScreenSet::Presentation),
            );
    }
}

#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct TransitionConfig {
    /// content swaps this long after the trigger
    #[inspector(min = 0.1, max = 5.0, display = NumberDisplay::Slider)]
    pub swap_secs:         f32,
    /// the overlay is gone this long after the trigger
    #[inspector(min = 0.2, max = 8.0, display = NumberDisplay::Slider)]
    pub end_secs:          f32,
    #[inspector(min = 0.05, max = 2.0, display = NumberDisplay::Slider)]
    pub overlay_fade_secs: f32,
    #[inspector(min = 0, max = 64)]
    pub particle_count:    usize,
    /// ring turns per second
    #[inspector(min = 0.0, max = 4.0, display = NumberDisplay::Slider)]
    pub ring_speed:        f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            swap_secs:         1.2,
            end_secs:          2.5,
            overlay_fade_secs: 0.5,
            particle_count:    12,
            ring_speed:        0.5,
        }
    }
}

impl TransitionConfig {
    pub fn mode_switch(&self) -> ModeSwitch {
        ModeSwitch::new(
            Duration::from_secs_f32(self.swap_secs),
            Duration::from_secs_f32(self.end_secs),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum ModeSwitchPhase {
    #[default]
    SceneAVisible,
    Transitioning,
    SceneBVisible,
}

/// What one `tick` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeSwitchStep {
    pub swapped:  bool,
    pub finished: bool,
}

#[derive(Component, Debug, Clone)]
pub struct ModeSwitch {
    phase:   ModeSwitchPhase,
    swapped: bool,
    swap:    Timer,
    end:     Timer,
}

impl ModeSwitch {
    /// The end delay is pushed past the swap delay if it isn't already.
    pub fn new(swap: Duration, end: Duration) -> Self {
        let end = end.max(swap + Duration::from_millis(1));
        Self {
            phase:   ModeSwitchPhase::SceneAVisible,
            swapped: false,
            swap:    Timer::new(swap, TimerMode::Once),
            end:     Timer::new(end, TimerMode::Once),
        }
    }

    /// Starts the switch. False (and nothing changes) once it has already been triggered.
    pub fn trigger(&mut self) -> bool {
        if self.phase != ModeSwitchPhase::SceneAVisible {
            return false;
        }
        self.phase = ModeSwitchPhase::Transitioning;
        true
    }

    pub fn tick(&mut self, delta: Duration) -> ModeSwitchStep {
        let mut step = ModeSwitchStep::default();
        if self.phase != ModeSwitchPhase::Transitioning {
            return step;
        }

        self.swap.tick(delta);
        self.end.tick(delta);

        if !self.swapped && self.swap.is_finished() {
            self.swapped = true;
            step.swapped = true;
        }
        if self.end.is_finished() {
            self.phase = ModeSwitchPhase::SceneBVisible;
            step.finished = true;
        }
        step
    }

    pub const fn phase(&self) -> ModeSwitchPhase { self.phase }

    /// True from the swap on.
    pub const fn shows_destination(&self) -> bool { self.swapped }

    pub fn elapsed(&self) -> Duration { self.end.elapsed() }

    /// Overlay opacity: ramps up over `fade`, holds, and ramps down over the last `fade`.
    pub fn overlay_alpha(&self, fade: Duration) -> f32 {
        if self.phase != ModeSwitchPhase::Transitioning {
            return 0.0;
        }
        let fade = fade.as_secs_f32().max(f32::EPSILON);
        let elapsed = self.end.elapsed_secs();
        let remaining = self.end.remaining_secs();
        (elapsed / fade).min(remaining / fade).clamp(0.0, 1.0)
    }
}

/// Asks every mode switch in the current scene to start.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ModeSwitchRequested;

/// Any button that starts the scene's mode switch.
#[derive(Component, Debug, Clone, Copy)]
pub struct ModeSwitchButton;

/// Which side of the switch an entity belongs to.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeContent {
    Home,
    Destination,
}

/// Controls that only make sense before the switch; hidden as soon as it starts.
#[derive(Component, Debug, Clone, Copy)]
pub struct HomeControl;

#[derive(Component, Debug)]
pub struct TransitionOverlay;

/// One of the two rings of the magic circle. The inner one turns the other way.
#[derive(Component, Debug)]
struct MagicRing {
    turns_per_sec: f32,
}

#[derive(Component, Debug)]
struct CenterOrb;

#[derive(Component, Debug)]
struct OverlayParticle {
    angle: f32,
}

/// Inner ring: one turn every two seconds, against the outer ring.
const INNER_RING_TURNS_PER_SEC: f32 = -0.5;
const ORB_PULSE_SECS: f32 = 0.5;

const RING_PINK: Color = Color::srgb(0.93, 0.29, 0.6);
const RING_VIOLET: Color = Color::srgb(0.75, 0.5, 1.0);

pub fn ring_rotation(elapsed: f32, turns_per_sec: f32) -> Rot2 {
    Rot2::radians(elapsed * turns_per_sec * TAU)
}

/// 1 -> 1.2 -> 1 every pulse.
pub fn orb_scale(elapsed: f32) -> f32 {
    0.2f32.mul_add((elapsed / ORB_PULSE_SECS * PI).sin().abs(), 1.0)
}

fn press_mode_switch_buttons(
    buttons: Query<&Interaction, (Changed<Interaction>, With<ModeSwitchButton>)>,
    mut requests: MessageWriter<ModeSwitchRequested>,
) {
    if buttons.iter().any(|interaction| *interaction == Interaction::Pressed) {
        requests.write(ModeSwitchRequested);
    }
}

fn start_mode_switch(
    mut commands: Commands,
    mut requests: MessageReader<ModeSwitchRequested>,
    config: Res<TransitionConfig>,
    screen: Res<State<Screen>>,
    mut switches: Query<&mut ModeSwitch>,
    overlays: Query<(), With<TransitionOverlay>>,
) {
    for _ in requests.read() {
        let started = switches
            .iter_mut()
            .fold(false, |started, mut switch| switch.trigger() || started);
        if started && overlays.is_empty() {
            info!("mode switch started");
            spawn_overlay(&mut commands, &config, *screen.get());
        }
    }
}

fn tick_mode_switch(time: Res<Time>, mut switches: Query<&mut ModeSwitch>) {
    for mut switch in &mut switches {
        let step = switch.tick(time.delta());
        if step.swapped {
            debug!("mode switch: content swapped");
        }
        if step.finished {
            info!("mode switch finished");
        }
    }
}

fn show_mode_content(
    switches: Query<&ModeSwitch, Changed<ModeSwitch>>,
    mut content: Query<(&ModeContent, &mut Visibility)>,
) {
    let Some(switch) = switches.iter().next() else {
        return;
    };
    for (side, mut visibility) in &mut content {
        let shown = match side {
            ModeContent::Home => !switch.shows_destination(),
            ModeContent::Destination => switch.shows_destination(),
        };
        visibility.set_if_neq(if shown {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        });
    }
}

fn suppress_home_controls(
    switches: Query<&ModeSwitch, Changed<ModeSwitch>>,
    mut controls: Query<&mut Visibility, With<HomeControl>>,
) {
    if !switches
        .iter()
        .any(|switch| switch.phase() != ModeSwitchPhase::SceneAVisible)
    {
        return;
    }
    for mut visibility in &mut controls {
        visibility.set_if_neq(Visibility::Hidden);
    }
}

fn spawn_overlay(commands: &mut Commands, config: &TransitionConfig, screen: Screen) {
    let count = config.particle_count.max(1);
    commands
        .spawn((
            Name::new("TransitionOverlay"),
            TransitionOverlay,
            DespawnOnExit(screen),
            FocusPolicy::Block,
            GlobalZIndex(50),
            Node {
                width: percent(100),
                height: percent(100),
                position_type: PositionType::Absolute,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.1, 0.0, 0.2, 0.0)),
        ))
        .with_children(|overlay| {
            overlay.spawn((
                MagicRing {
                    turns_per_sec: config.ring_speed,
                },
                Node {
                    width: px(160),
                    height: px(160),
                    border: UiRect::all(px(2)),
                    border_radius: BorderRadius::MAX,
                    position_type: PositionType::Absolute,
                    ..default()
                },
                BorderColor::all(RING_PINK.with_alpha(0.0)),
                UiTransform::default(),
            ));
            overlay.spawn((
                MagicRing {
                    turns_per_sec: INNER_RING_TURNS_PER_SEC,
                },
                Node {
                    width: px(128),
                    height: px(128),
                    border: UiRect::all(px(1)),
                    border_radius: BorderRadius::MAX,
                    position_type: PositionType::Absolute,
                    ..default()
                },
                BorderColor::all(RING_VIOLET.with_alpha(0.0)),
                UiTransform::default(),
            ));
            overlay.spawn((
                CenterOrb,
                Node {
                    width: px(32),
                    height: px(32),
                    border_radius: BorderRadius::MAX,
                    position_type: PositionType::Absolute,
                    ..default()
                },
                BackgroundColor(RING_PINK.with_alpha(0.0)),
                UiTransform::default(),
            ));
            for index in 0..count {
                overlay.spawn((
                    OverlayParticle {
                        angle: index.to_f32() / count.to_f32() * TAU,
                    },
                    Node {
                        width: px(12),
                        height: px(12),
                        border_radius: BorderRadius::MAX,
                        position_type: PositionType::Absolute,
                        ..default()
                    },
                    BackgroundColor(Color::srgba(1.0, 0.85, 1.0, 0.0)),
                    UiTransform::default(),
                ));
            }
        });
}

fn animate_overlay(
    mut commands: Commands,
    config: Res<TransitionConfig>,
    switches: Query<&ModeSwitch>,
    mut overlays: Query<
        (Entity, &mut BackgroundColor),
        (With<TransitionOverlay>, Without<OverlayParticle>, Without<CenterOrb>),
    >,
    mut rings: Query<
        (&MagicRing, &mut UiTransform, &mut BorderColor),
        (Without<OverlayParticle>, Without<CenterOrb>),
    >,
    mut orbs: Query<
        (&mut UiTransform, &mut BackgroundColor),
        (
            With<CenterOrb>,
            Without<MagicRing>,
            Without<OverlayParticle>,
            Without<TransitionOverlay>,
        ),
    >,
    mut particles: Query<
        (&OverlayParticle, &mut UiTransform, &mut BackgroundColor),
        (Without<MagicRing>, Without<CenterOrb>),
    >,
) {
    let Some(switch) = switches
        .iter()
        .find(|switch| switch.phase() == ModeSwitchPhase::Transitioning)
    else {
        for (entity, _) in &overlays {
            despawn(&mut commands, entity);
        }
        return;
    };

    let alpha = switch.overlay_alpha(Duration::from_secs_f32(config.overlay_fade_secs));
    let elapsed = switch.elapsed().as_secs_f32();

    for (_, mut background) in &mut overlays {
        background.0 = background.0.with_alpha(alpha * 0.9);
    }
    for (ring, mut transform, mut border) in &mut rings {
        transform.rotation = ring_rotation(elapsed, ring.turns_per_sec);
        let color = border.top.with_alpha(alpha);
        *border = BorderColor::all(color);
    }
    for (mut transform, mut background) in &mut orbs {
        transform.scale = Vec2::splat(orb_scale(elapsed));
        background.0 = background.0.with_alpha(alpha);
    }
    // particles burst outward and keep drifting while the overlay is up
    let radius = 60.0 + elapsed * 80.0;
    for (particle, mut transform, mut background) in &mut particles {
        let offset = Vec2::from_angle(particle.angle + elapsed) * radius;
        transform.translation = Val2::px(offset.x, offset.y);
        background.0 = background.0.with_alpha(alpha);
    }
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;

    use super::*;
    use crate::router::RouterPlugin;
    use crate::schedule::SchedulePlugin;
    use crate::state::StatePlugin;

    const SWAP: Duration = Duration::from_millis(1200);
    const END: Duration = Duration::from_millis(2500);

    #[test]
    fn swap_lands_before_the_end() {
        let config = TransitionConfig::default();
        assert!(config.swap_secs < config.end_secs);

        let mut switch = ModeSwitch::new(SWAP, END);
        assert!(switch.trigger());

        assert_eq!(switch.tick(Duration::from_millis(1199)), ModeSwitchStep::default());
        assert!(!switch.shows_destination());

        let step = switch.tick(Duration::from_millis(1));
        assert!(step.swapped && !step.finished);
        assert_eq!(switch.phase(), ModeSwitchPhase::Transitioning);

        let step = switch.tick(Duration::from_millis(1300));
        assert!(!step.swapped && step.finished);
        assert_eq!(switch.phase(), ModeSwitchPhase::SceneBVisible);
    }

    #[test]
    fn a_single_long_frame_swaps_and_finishes_together() {
        let mut switch = ModeSwitch::new(SWAP, END);
        switch.trigger();
        let step = switch.tick(Duration::from_secs(10));
        assert_eq!(
            step,
            ModeSwitchStep {
                swapped:  true,
                finished: true,
            }
        );
    }

    #[test]
    fn retriggering_never_swaps_twice() {
        let mut switch = ModeSwitch::new(SWAP, END);
        assert!(switch.trigger());
        switch.tick(SWAP);
        assert!(!switch.trigger());
        switch.tick(END);
        assert!(!switch.trigger());

        assert_eq!(switch.tick(END), ModeSwitchStep::default());
        assert_eq!(switch.phase(), ModeSwitchPhase::SceneBVisible);
    }

    #[test]
    fn untriggered_switch_stays_home() {
        let mut switch = ModeSwitch::new(SWAP, END);
        assert_eq!(switch.tick(END * 2), ModeSwitchStep::default());
        assert_eq!(switch.phase(), ModeSwitchPhase::SceneAVisible);
    }

    #[test]
    fn end_is_pushed_past_swap() {
        let mut switch = ModeSwitch::new(SWAP, SWAP / 2);
        switch.trigger();
        let step = switch.tick(SWAP);
        assert!(step.swapped && !step.finished);
    }

    #[test]
    fn overlay_fades_in_and_out() {
        let fade = Duration::from_millis(500);
        let mut switch = ModeSwitch::new(SWAP, END);
        assert!(switch.overlay_alpha(fade).abs() < f32::EPSILON);

        switch.trigger();
        switch.tick(Duration::from_millis(250));
        assert!((switch.overlay_alpha(fade) - 0.5).abs() < 1e-3);
        switch.tick(Duration::from_millis(1000));
        assert!((switch.overlay_alpha(fade) - 1.0).abs() < 1e-3);
        switch.tick(Duration::from_millis(1000));
        assert!((switch.overlay_alpha(fade) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn rings_turn_against_each_other_and_the_orb_pulses() {
        let outer = ring_rotation(0.25, TransitionConfig::default().ring_speed);
        let inner = ring_rotation(0.25, INNER_RING_TURNS_PER_SEC);
        assert!(outer.as_radians() > 0.0);
        assert!(inner.as_radians() < 0.0);

        assert!((orb_scale(0.0) - 1.0).abs() < 1e-5);
        assert!((orb_scale(ORB_PULSE_SECS / 2.0) - 1.2).abs() < 1e-5);
        assert!((orb_scale(ORB_PULSE_SECS) - 1.0).abs() < 1e-5);
        for step in 0..40_u8 {
            let scale = orb_scale(f32::from(step) * 0.05);
            assert!((1.0 - 1e-5..=1.2 + 1e-5).contains(&scale));
        }
    }

    #[test]
    fn repeated_requests_spawn_one_overlay_and_swap_once() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .add_plugins((StatePlugin, SchedulePlugin, RouterPlugin, TransitionPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.update();
        app.update();

        let switch = app.world_mut().spawn(ModeSwitch::new(SWAP, END)).id();
        let home = app
            .world_mut()
            .spawn((ModeContent::Home, Visibility::Inherited))
            .id();
        let destination = app
            .world_mut()
            .spawn((ModeContent::Destination, Visibility::Hidden))
            .id();
        let control = app
            .world_mut()
            .spawn((HomeControl, Visibility::Inherited))
            .id();

        app.world_mut().write_message(ModeSwitchRequested);
        app.update();
        app.world_mut().write_message(ModeSwitchRequested);
        app.update();

        let mut overlays = app
            .world_mut()
            .query_filtered::<Entity, With<TransitionOverlay>>();
        assert_eq!(overlays.iter(app.world()).count(), 1);
        let mut rings = app.world_mut().query::<(&MagicRing, &Node)>();
        let spins: Vec<f32> = rings
            .iter(app.world())
            .map(|(ring, node)| {
                assert_eq!(node.border_radius, BorderRadius::MAX);
                ring.turns_per_sec
            })
            .collect();
        assert_eq!(spins.len(), 2);
        assert!(spins.iter().any(|spin| *spin > 0.0) && spins.iter().any(|spin| *spin < 0.0));
        let mut orbs = app.world_mut().query_filtered::<(), With<CenterOrb>>();
        assert_eq!(orbs.iter(app.world()).count(), 1);
        let mut particles = app.world_mut().query::<&OverlayParticle>();
        assert_eq!(particles.iter(app.world()).count(), 12);
        assert_eq!(
            app.world().get::<Visibility>(control),
            Some(&Visibility::Hidden)
        );

        for _ in 0..15 {
            app.update();
        }
        assert_eq!(app.world().get::<Visibility>(home), Some(&Visibility::Hidden));
        assert_eq!(
            app.world().get::<Visibility>(destination),
            Some(&Visibility::Inherited)
        );

        for _ in 0..15 {
            app.update();
        }
        assert_eq!(
            app.world().get::<ModeSwitch>(switch).map(ModeSwitch::phase),
            Some(ModeSwitchPhase::SceneBVisible)
        );
        assert_eq!(overlays.iter(app.world()).count(), 0);
    }
}
