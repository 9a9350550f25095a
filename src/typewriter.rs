//! Reveals a line of text one character at a time.
//!
//! A [`Typewriter`] sits next to a `Text` on the same entity. Every frame it is advanced by the
//! frame time and the `Text` is rewritten with the revealed prefix. Once the last character is
//! shown a single [`TypewriterFinished`] is triggered for the entity and the typewriter goes
//! idle. Replacing the text mid-sequence starts over from an empty prefix.

use std::time::Duration;

use bevy::prelude::*;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;

use crate::schedule::ScreenSet;

pub struct TypewriterPlugin;

impl Plugin for TypewriterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TypewriterConfig>()
            .add_systems(
                Update,
                (advance_typewriters, blink_carets)
                    .chain()
                    .in_set(ScreenSet::Sequencing),
            );
    }
}

#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct TypewriterConfig {
    /// seconds per half blink of the caret
    #[inspector(min = 0.1, max = 2.0, display = NumberDisplay::Slider)]
    pub caret_blink_secs: f32,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            caret_blink_secs: 0.5,
        }
    }
}

/// The shortest per-character delay we accept - a zero duration timer never settles.
const MIN_CHARACTER_DELAY: Duration = Duration::from_millis(1);

/// What a single `advance` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypewriterStep {
    /// characters revealed by this call
    pub ticks:     usize,
    /// true exactly once per sequence - on the call that revealed the last character
    pub completed: bool,
}

#[derive(Component, Debug, Clone)]
pub struct Typewriter {
    text:       String,
    char_count: usize,
    revealed:   usize,
    timer:      Timer,
    completed:  bool,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, per_character: Duration) -> Self {
        let text = text.into();
        Self {
            char_count: text.chars().count(),
            text,
            revealed: 0,
            timer: Timer::new(per_character.max(MIN_CHARACTER_DELAY), TimerMode::Repeating),
            completed: false,
        }
    }

    pub fn from_millis(text: impl Into<String>, per_character_ms: u64) -> Self {
        Self::new(text, Duration::from_millis(per_character_ms))
    }

    /// Swaps in a new line. Returns false if the text is unchanged, otherwise the in-flight
    /// sequence is dropped and the new one starts from nothing.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.text {
            return false;
        }
        self.char_count = text.chars().count();
        self.text = text;
        self.revealed = 0;
        self.completed = false;
        self.timer.reset();
        true
    }

    pub fn advance(&mut self, delta: Duration) -> TypewriterStep {
        if self.completed {
            return TypewriterStep::default();
        }

        // nothing to type - done without a single tick
        if self.char_count == 0 {
            self.completed = true;
            return TypewriterStep {
                ticks:     0,
                completed: true,
            };
        }

        self.timer.tick(delta);
        let remaining = self.char_count - self.revealed;
        let ticks = usize::try_from(self.timer.times_finished_this_tick())
            .unwrap_or(usize::MAX)
            .min(remaining);
        self.revealed += ticks;

        if self.revealed == self.char_count {
            self.completed = true;
        }

        TypewriterStep {
            ticks,
            completed: self.completed,
        }
    }

    /// The prefix revealed so far. Always ends on a character boundary.
    pub fn visible(&self) -> &str {
        let end = self
            .text
            .char_indices()
            .nth(self.revealed)
            .map_or(self.text.len(), |(index, _)| index);
        &self.text[..end]
    }

    pub fn text(&self) -> &str { &self.text }

    pub const fn revealed(&self) -> usize { self.revealed }

    pub const fn is_complete(&self) -> bool { self.completed }
}

/// Triggered once for a typewriter entity when its line is fully shown.
#[derive(EntityEvent, Debug, Clone, Copy)]
pub struct TypewriterFinished {
    pub entity: Entity,
}

/// The blinking bar shown while a line is still being typed. Child of the typewriter's text.
#[derive(Component, Debug, Default)]
pub struct Caret {
    elapsed: f32,
}

pub fn caret_bundle() -> impl Bundle {
    (Caret::default(), TextSpan::new("|"))
}

fn advance_typewriters(
    mut commands: Commands,
    time: Res<Time>,
    mut typewriters: Query<(Entity, &mut Typewriter, &mut Text)>,
) {
    for (entity, mut typewriter, mut text) in &mut typewriters {
        if typewriter.is_complete() {
            continue;
        }

        let step = typewriter.advance(time.delta());
        if step.ticks > 0 || text.0.len() > typewriter.visible().len() {
            text.0 = typewriter.visible().to_string();
        }
        if step.completed {
            debug!("typewriter finished: {:?}", typewriter.text());
            commands.trigger(TypewriterFinished { entity });
        }
    }
}

fn blink_carets(
    time: Res<Time>,
    config: Res<TypewriterConfig>,
    typewriters: Query<&Typewriter>,
    mut carets: Query<(&ChildOf, &mut Caret, &mut TextColor)>,
) {
    for (child_of, mut caret, mut color) in &mut carets {
        let typing = typewriters
            .get(child_of.parent())
            .is_ok_and(|typewriter| !typewriter.is_complete());
        if !typing {
            color.0 = color.0.with_alpha(0.0);
            continue;
        }

        caret.elapsed += time.delta_secs();
        let half_blinks = (caret.elapsed / config.caret_blink_secs.max(0.01)).floor();
        let on = half_blinks.rem_euclid(2.0) < 1.0;
        color.0 = color.0.with_alpha(if on { 1.0 } else { 0.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(40);

    /// Drives a typewriter frame by frame and records every prefix it shows.
    fn run_to_completion(typewriter: &mut Typewriter, frame: Duration) -> (Vec<String>, usize, usize) {
        let mut shown = Vec::new();
        let mut ticks = 0;
        let mut completions = 0;
        for _ in 0..10_000 {
            let step = typewriter.advance(frame);
            ticks += step.ticks;
            if step.completed {
                completions += 1;
            }
            if step.ticks > 0 {
                shown.push(typewriter.visible().to_string());
            }
        }
        (shown, ticks, completions)
    }

    #[test]
    fn prefixes_grow_one_character_per_tick_until_the_full_line() {
        for line in ["Halo aku Yumi", "a", "Waktu: 09:41", "héllo ✨ wörld"] {
            let mut typewriter = Typewriter::new(line, DELAY);
            let (shown, ticks, completions) = run_to_completion(&mut typewriter, DELAY);

            assert_eq!(ticks, line.chars().count());
            assert_eq!(completions, 1);
            assert_eq!(shown.last().map(String::as_str), Some(line));
            for (index, prefix) in shown.iter().enumerate() {
                assert_eq!(prefix.chars().count(), index + 1);
                assert!(line.starts_with(prefix.as_str()));
            }
        }
    }

    #[test]
    fn empty_line_completes_immediately_without_ticking() {
        let mut typewriter = Typewriter::new("", DELAY);
        let step = typewriter.advance(Duration::ZERO);
        assert_eq!(
            step,
            TypewriterStep {
                ticks:     0,
                completed: true,
            }
        );
        assert_eq!(typewriter.advance(DELAY), TypewriterStep::default());
    }

    #[test]
    fn completion_fires_on_the_tick_that_reveals_the_last_character() {
        let mut typewriter = Typewriter::new("abc", DELAY);
        assert!(!typewriter.advance(DELAY).completed);
        assert!(!typewriter.advance(DELAY).completed);
        let last = typewriter.advance(DELAY);
        assert_eq!(last.ticks, 1);
        assert!(last.completed);
        assert!(typewriter.is_complete());
    }

    #[test]
    fn a_long_frame_covers_several_ticks_but_never_overruns() {
        let mut typewriter = Typewriter::new("abcdef", DELAY);
        let step = typewriter.advance(DELAY * 4);
        assert_eq!(step.ticks, 4);
        assert_eq!(typewriter.visible(), "abcd");

        let step = typewriter.advance(DELAY * 100);
        assert_eq!(step.ticks, 2);
        assert!(step.completed);
        assert_eq!(typewriter.visible(), "abcdef");
    }

    #[test]
    fn partial_frames_accumulate() {
        let mut typewriter = Typewriter::new("ab", DELAY);
        assert_eq!(typewriter.advance(Duration::from_millis(25)).ticks, 0);
        assert_eq!(typewriter.visible(), "");
        assert_eq!(typewriter.advance(Duration::from_millis(25)).ticks, 1);
        assert_eq!(typewriter.visible(), "a");
    }

    #[test]
    fn restarting_never_shows_the_old_line_again() {
        let old = "XXXXXXXXXX";
        let new = "hello";
        let mut typewriter = Typewriter::new(old, DELAY);
        typewriter.advance(DELAY * 3);
        assert_eq!(typewriter.visible(), "XXX");

        assert!(typewriter.set_text(new));
        assert_eq!(typewriter.visible(), "");
        assert!(!typewriter.is_complete());

        let (shown, ticks, completions) = run_to_completion(&mut typewriter, DELAY);
        assert_eq!(ticks, new.chars().count());
        assert_eq!(completions, 1);
        assert!(shown.iter().all(|prefix| !prefix.contains('X')));
        assert_eq!(typewriter.visible(), new);
    }

    #[test]
    fn restarting_a_finished_line_types_it_again() {
        let mut typewriter = Typewriter::new("09:41", DELAY);
        run_to_completion(&mut typewriter, DELAY);
        assert!(typewriter.is_complete());

        assert!(typewriter.set_text("09:42"));
        let (_, ticks, completions) = run_to_completion(&mut typewriter, DELAY);
        assert_eq!(ticks, 5);
        assert_eq!(completions, 1);
    }

    #[test]
    fn setting_the_same_text_keeps_the_sequence_going() {
        let mut typewriter = Typewriter::new("same", DELAY);
        typewriter.advance(DELAY * 2);
        assert!(!typewriter.set_text("same"));
        assert_eq!(typewriter.visible(), "sa");
    }
}
