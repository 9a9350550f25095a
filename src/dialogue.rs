//! The host's dialogue card: a short script of typed lines, each one starting a fixed pause
//! after the previous line finished. When the last line is done the card's reveal action shows
//! up.

use std::time::Duration;

use bevy::prelude::*;
use chrono::Local;

use crate::schedule::ScreenSet;
use crate::typewriter::Typewriter;
use crate::typewriter::TypewriterFinished;
use crate::typewriter::caret_bundle;

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(on_line_finished).add_systems(
            Update,
            (advance_dialogue, refresh_local_clock).in_set(ScreenSet::Sequencing),
        );
    }
}

pub const HOST_GREETING: &str = "Halo aku Yumi, aku diciptakan oleh Idin Programming. Sebelum \
                                 bercerita, izinkan aku menebak waktu di ponselmu...";

/// Pause between one line finishing and the next phase starting.
pub const PHASE_PAUSE: Duration = Duration::from_millis(500);
pub const GREETING_CHARACTER_MS: u64 = 40;
pub const CLOCK_CHARACTER_MS: u64 = 100;

/// Lines in the script. The phase after the last line is the "reveal" phase.
pub const LINE_COUNT: u32 = 2;

/// How many lines have been completed. Only ever moves forward; a fresh card starts at zero.
#[derive(Component, Debug, Clone)]
pub struct DialoguePhase {
    phase:   u32,
    pending: Option<Timer>,
}

impl Default for DialoguePhase {
    fn default() -> Self { Self::new() }
}

impl DialoguePhase {
    pub const fn new() -> Self {
        Self {
            phase:   0,
            pending: None,
        }
    }

    pub const fn get(&self) -> u32 { self.phase }

    /// The line typed in the current phase finished. Arms the pause before the next phase,
    /// unless one is already pending.
    pub fn line_finished(&mut self, pause: Duration) {
        if self.pending.is_none() && self.phase < LINE_COUNT {
            self.pending = Some(Timer::new(pause, TimerMode::Once));
        }
    }

    /// Returns the new phase on the frame the pause runs out.
    pub fn tick(&mut self, delta: Duration) -> Option<u32> {
        let timer = self.pending.as_mut()?;
        timer.tick(delta);
        if !timer.is_finished() {
            return None;
        }
        self.pending = None;
        self.phase += 1;
        Some(self.phase)
    }

    pub const fn is_revealed(&self) -> bool { self.phase >= LINE_COUNT }
}

/// Which line of the script a typewriter belongs to.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueLine(pub u32);

/// Marks the card that owns the dialogue phase. Lines are spawned under it.
#[derive(Component, Debug)]
pub struct DialogueCard;

/// Shown once the script has been read - the card's call to action.
#[derive(Component, Debug)]
pub struct DialogueReveal;

/// Keeps a typed line in sync with the wall clock - re-typing it when the minute changes.
#[derive(Component, Debug)]
pub struct LocalClock {
    refresh: Timer,
}

impl Default for LocalClock {
    fn default() -> Self {
        Self {
            refresh: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

pub fn local_time() -> String { Local::now().format("%H:%M").to_string() }

pub fn line_bundle(line: u32, typewriter: Typewriter, font_size: f32, color: Color) -> impl Bundle {
    (
        DialogueLine(line),
        Text::new(""),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(color),
        typewriter,
        children![caret_bundle()],
    )
}

fn on_line_finished(
    finished: On<TypewriterFinished>,
    lines: Query<(&DialogueLine, &ChildOf)>,
    mut cards: Query<&mut DialoguePhase, With<DialogueCard>>,
) {
    let Ok((line, child_of)) = lines.get(finished.entity) else {
        return;
    };
    let Ok(mut phase) = cards.get_mut(child_of.parent()) else {
        return;
    };
    // a restarted line (the clock ticking over) finishes again - it doesn't move us twice
    if line.0 == phase.get() {
        phase.line_finished(PHASE_PAUSE);
    }
}

fn advance_dialogue(
    mut commands: Commands,
    time: Res<Time>,
    mut cards: Query<(Entity, &mut DialoguePhase), With<DialogueCard>>,
    mut reveals: Query<&mut Visibility, With<DialogueReveal>>,
) {
    for (card, mut phase) in &mut cards {
        let Some(next) = phase.tick(time.delta()) else {
            continue;
        };
        debug!("dialogue phase {next}");

        if next == 1 {
            commands.entity(card).with_child((
                line_bundle(
                    1,
                    Typewriter::from_millis(local_time(), CLOCK_CHARACTER_MS),
                    28.0,
                    Color::srgb(1.0, 0.75, 0.4),
                ),
                LocalClock::default(),
            ));
        }

        if phase.is_revealed() {
            for mut visibility in &mut reveals {
                *visibility = Visibility::Inherited;
            }
        }
    }
}

fn refresh_local_clock(time: Res<Time>, mut clocks: Query<(&mut LocalClock, &mut Typewriter)>) {
    for (mut clock, mut typewriter) in &mut clocks {
        clock.refresh.tick(time.delta());
        if clock.refresh.just_finished() && typewriter.set_text(local_time()) {
            debug!("local clock rolled over, retyping");
        }
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
    use crate::typewriter::TypewriterPlugin;

    #[test]
    fn phases_only_move_forward_after_the_pause() {
        let mut phase = DialoguePhase::new();
        assert_eq!(phase.tick(Duration::from_secs(10)), None);

        phase.line_finished(PHASE_PAUSE);
        assert_eq!(phase.tick(Duration::from_millis(300)), None);
        assert_eq!(phase.tick(Duration::from_millis(200)), Some(1));
        assert_eq!(phase.get(), 1);
        assert!(!phase.is_revealed());

        phase.line_finished(PHASE_PAUSE);
        assert_eq!(phase.tick(PHASE_PAUSE), Some(2));
        assert!(phase.is_revealed());
    }

    #[test]
    fn finishing_twice_during_a_pause_advances_once() {
        let mut phase = DialoguePhase::new();
        phase.line_finished(PHASE_PAUSE);
        phase.line_finished(PHASE_PAUSE);
        assert_eq!(phase.tick(PHASE_PAUSE), Some(1));
        assert_eq!(phase.tick(PHASE_PAUSE), None);
        assert_eq!(phase.get(), 1);
    }

    #[test]
    fn nothing_follows_the_reveal() {
        let mut phase = DialoguePhase::new();
        for _ in 0..LINE_COUNT {
            phase.line_finished(PHASE_PAUSE);
            phase.tick(PHASE_PAUSE);
        }
        phase.line_finished(PHASE_PAUSE);
        assert_eq!(phase.tick(PHASE_PAUSE), None);
        assert_eq!(phase.get(), LINE_COUNT);
    }

    #[test]
    fn local_time_is_hours_and_minutes() {
        let time = local_time();
        assert_eq!(time.len(), 5);
        assert_eq!(time.as_bytes()[2], b':');
    }

    fn dialogue_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .add_plugins((StatePlugin, SchedulePlugin, RouterPlugin))
            .add_plugins((TypewriterPlugin, DialoguePlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        // launch, then the lobby
        app.update();
        app.update();
        app
    }

    fn card_phase(app: &mut App) -> DialoguePhase {
        let mut cards = app
            .world_mut()
            .query_filtered::<&DialoguePhase, With<DialogueCard>>();
        cards.single(app.world()).cloned().unwrap_or_default()
    }

    fn clock_lines(app: &mut App) -> Vec<Entity> {
        let mut clocks = app
            .world_mut()
            .query_filtered::<Entity, (With<LocalClock>, With<DialogueLine>)>();
        clocks.iter(app.world()).collect()
    }

    fn run_until_phase(app: &mut App, wanted: u32) {
        for _ in 0..50 {
            if card_phase(app).get() >= wanted {
                return;
            }
            app.update();
        }
        panic!("dialogue never reached phase {wanted}");
    }

    #[test]
    fn finished_lines_spawn_the_clock_then_reveal_and_retyping_does_not_advance() {
        let mut app = dialogue_app();
        let reveal = app
            .world_mut()
            .spawn((DialogueReveal, Visibility::Hidden))
            .id();
        app.world_mut()
            .spawn((DialogueCard, DialoguePhase::new()))
            .with_child(line_bundle(
                0,
                Typewriter::from_millis("Halo", GREETING_CHARACTER_MS),
                16.0,
                Color::WHITE,
            ));

        assert!(clock_lines(&mut app).is_empty());

        run_until_phase(&mut app, 1);
        assert_eq!(clock_lines(&mut app).len(), 1);
        assert_eq!(
            app.world().get::<Visibility>(reveal),
            Some(&Visibility::Hidden)
        );

        run_until_phase(&mut app, 2);
        assert!(card_phase(&mut app).is_revealed());
        assert_eq!(
            app.world().get::<Visibility>(reveal),
            Some(&Visibility::Inherited)
        );

        // the minute rolls over and the clock types itself out again
        let clock = clock_lines(&mut app)[0];
        let retyped = app
            .world_mut()
            .get_mut::<Typewriter>(clock)
            .is_some_and(|mut typewriter| typewriter.set_text("99:99"));
        assert!(retyped);
        for _ in 0..20 {
            app.update();
        }
        assert!(
            app.world()
                .get::<Typewriter>(clock)
                .is_some_and(Typewriter::is_complete)
        );

        let phase = card_phase(&mut app);
        assert_eq!(phase.get(), LINE_COUNT);
        assert!(phase.pending.is_none());
        assert_eq!(clock_lines(&mut app).len(), 1);
    }
}
