//! Scene audio.
//!
//! Every track belongs to an entity of the scene that spawned it, so leaving the scene despawns
//! the track and stops it. Playback can be refused: browsers won't start audio before the
//! visitor has interacted with the page. A refused track waits, and the next user gesture
//! (click, touch or key press) retries it once.

use bevy::audio::Volume;
use bevy::prelude::*;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;
use thiserror::Error;

use crate::schedule::ScreenSet;

pub struct MediaPlugin;

impl Plugin for MediaPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AutoplayPolicy>()
            .init_resource::<AudioConfig>()
            .add_message::<ToggleMute>()
            .add_message::<TogglePlayback>()
            .add_systems(
                Update,
                (detect_gestures, press_audio_buttons).in_set(ScreenSet::Input),
            )
            .add_systems(
                Update,
                (toggle_mute, toggle_playback).in_set(ScreenSet::Sequencing),
            )
            .add_systems(
                Update,
                (drive_scene_audio, refresh_audio_labels)
                    .chain()
                    .in_set(ScreenSet::Presentation),
            );
    }
}

#[derive(Resource, Reflect, InspectorOptions, Debug, PartialEq, Clone, Copy)]
#[reflect(Resource, InspectorOptions)]
pub struct AudioConfig {
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub lobby_volume:   f32,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub mars_volume:    f32,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub gamelan_volume: f32,
    #[inspector(min = 0.0, max = 1.0, display = NumberDisplay::Slider)]
    pub laugh_volume:   f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            lobby_volume:   0.4,
            mars_volume:    0.5,
            gamelan_volume: 0.6,
            laugh_volume:   0.8,
        }
    }
}

/// Whether the platform lets us start audio yet.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayPolicy {
    requires_gesture: bool,
    gesture_seen:     bool,
}

impl Default for AutoplayPolicy {
    // only the browser gates audio behind a gesture
    fn default() -> Self { Self::new(cfg!(target_arch = "wasm32")) }
}

impl AutoplayPolicy {
    pub const fn new(requires_gesture: bool) -> Self {
        Self {
            requires_gesture,
            gesture_seen: false,
        }
    }

    pub const fn allows_playback(&self) -> bool { !self.requires_gesture || self.gesture_seen }

    /// Returns true for the first gesture of the session.
    pub const fn note_gesture(&mut self) -> bool {
        let first = !self.gesture_seen;
        self.gesture_seen = true;
        first
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("playback was refused until the visitor interacts with the page")]
    GestureRequired,
    #[error("the audio sink isn't ready yet")]
    NotReady,
}

/// The controls a track needs from whatever is actually producing sound.
pub trait PlaybackControl {
    fn resume(&self);
    fn halt(&self);
    fn set_muted(&mut self, muted: bool);
}

impl PlaybackControl for AudioSink {
    fn resume(&self) { self.play(); }

    fn halt(&self) { self.pause(); }

    fn set_muted(&mut self, muted: bool) {
        if muted {
            self.mute();
        } else {
            self.unmute();
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    /// wants to play and will try again next frame
    Pending,
    Playing,
    /// refused by the autoplay policy - waiting for a gesture
    Blocked,
}

#[derive(Component, Debug, Clone, Default, Reflect)]
pub struct SceneAudio {
    wants_play:   bool,
    status:       PlaybackStatus,
    muted:        bool,
    applied_mute: bool,
}

impl SceneAudio {
    /// A track that starts as soon as its scene is entered (if allowed).
    pub fn autoplay() -> Self {
        let mut audio = Self::default();
        audio.request_play();
        audio
    }

    /// A track that waits for something else to start it.
    pub fn on_demand() -> Self { Self::default() }

    pub fn request_play(&mut self) {
        self.wants_play = true;
        if self.status != PlaybackStatus::Playing {
            self.status = PlaybackStatus::Pending;
        }
    }

    pub const fn request_stop(&mut self) { self.wants_play = false; }

    pub fn attempt<P: PlaybackControl>(
        &mut self,
        sink: Option<&P>,
        policy: &AutoplayPolicy,
    ) -> Result<(), PlaybackError> {
        if !policy.allows_playback() {
            self.status = PlaybackStatus::Blocked;
            return Err(PlaybackError::GestureRequired);
        }
        let Some(sink) = sink else {
            self.status = PlaybackStatus::Pending;
            return Err(PlaybackError::NotReady);
        };
        sink.resume();
        self.status = PlaybackStatus::Playing;
        Ok(())
    }

    /// Pausing an already stopped track is fine.
    pub fn stop<P: PlaybackControl>(&mut self, sink: Option<&P>) {
        if let Some(sink) = sink {
            sink.halt();
        }
        self.status = PlaybackStatus::Stopped;
    }

    /// A gesture lifts the autoplay block - try once more.
    pub fn retry_after_gesture(&mut self) {
        if self.wants_play && self.status == PlaybackStatus::Blocked {
            self.status = PlaybackStatus::Pending;
        }
    }

    pub const fn set_muted(&mut self, muted: bool) { self.muted = muted; }

    pub const fn status(&self) -> PlaybackStatus { self.status }

    pub const fn wants_play(&self) -> bool { self.wants_play }

    pub const fn is_muted(&self) -> bool { self.muted }
}

/// A looping track that stays silent until [`SceneAudio`] lets it play.
pub fn looping_track(track: Handle<AudioSource>, volume: f32, audio: SceneAudio) -> impl Bundle {
    (
        audio,
        AudioPlayer::new(track),
        PlaybackSettings::LOOP
            .with_volume(Volume::Linear(volume))
            .paused(),
    )
}

#[derive(Message, Debug, Clone, Copy, Default)]
pub struct ToggleMute;

/// Play or pause every track of the scene together.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct TogglePlayback;

#[derive(Component, Debug, Clone, Copy)]
pub struct MuteButton;

#[derive(Component, Debug, Clone, Copy)]
pub struct PlaybackButton;

/// Text showing the state of the scene's audio.
#[derive(Component, Debug, Clone, Copy)]
pub struct AudioLabel;

pub const fn audio_label(status: PlaybackStatus, muted: bool) -> &'static str {
    match (status, muted) {
        (PlaybackStatus::Blocked, _) => "TAP FOR SOUND",
        (_, true) => "MUTED",
        (PlaybackStatus::Playing, false) => "SOUND ON",
        (PlaybackStatus::Pending, false) => "LOADING SOUND",
        (PlaybackStatus::Stopped, false) => "PAUSED",
    }
}

fn detect_gestures(
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    touches: Res<Touches>,
    mut policy: ResMut<AutoplayPolicy>,
    mut tracks: Query<&mut SceneAudio>,
) {
    let gesture = mouse.get_just_pressed().next().is_some()
        || keys.get_just_pressed().next().is_some()
        || touches.any_just_pressed();
    if !gesture {
        return;
    }

    if policy.note_gesture() {
        debug!("first user gesture - audio may start now");
    }
    for mut track in &mut tracks {
        track.retry_after_gesture();
    }
}

fn press_audio_buttons(
    mute_buttons: Query<&Interaction, (Changed<Interaction>, With<MuteButton>)>,
    playback_buttons: Query<&Interaction, (Changed<Interaction>, With<PlaybackButton>)>,
    mut mute: MessageWriter<ToggleMute>,
    mut playback: MessageWriter<TogglePlayback>,
) {
    if mute_buttons.iter().any(|interaction| *interaction == Interaction::Pressed) {
        mute.write(ToggleMute);
    }
    if playback_buttons
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed)
    {
        playback.write(TogglePlayback);
    }
}

fn toggle_mute(mut requests: MessageReader<ToggleMute>, mut tracks: Query<&mut SceneAudio>) {
    for _ in requests.read() {
        let muted = tracks.iter().any(|track| !track.is_muted());
        for mut track in &mut tracks {
            track.set_muted(muted);
            // unmuting is a request to hear something
            if !muted {
                track.request_play();
            }
        }
        debug!("scene audio muted: {muted}");
    }
}

/// Only tracks that are actually audible count; a blocked or loading track is not playing.
pub fn any_playing<'a>(tracks: impl IntoIterator<Item = &'a SceneAudio>) -> bool {
    tracks
        .into_iter()
        .any(|track| track.status() == PlaybackStatus::Playing)
}

fn toggle_playback(mut requests: MessageReader<TogglePlayback>, mut tracks: Query<&mut SceneAudio>) {
    for _ in requests.read() {
        let playing = any_playing(&tracks);
        for mut track in &mut tracks {
            if playing {
                track.request_stop();
            } else {
                track.request_play();
            }
        }
    }
}

fn drive_scene_audio(
    policy: Res<AutoplayPolicy>,
    mut tracks: Query<(Entity, &mut SceneAudio, Option<&mut AudioSink>)>,
) {
    for (entity, mut track, mut sink) in &mut tracks {
        if track.wants_play() && track.status() == PlaybackStatus::Pending {
            match track.attempt(sink.as_deref(), &policy) {
                Ok(()) => debug!("scene audio {entity} playing"),
                Err(PlaybackError::GestureRequired) => {
                    info!("scene audio {entity}: {}", PlaybackError::GestureRequired);
                },
                // the sink shows up once the track has loaded
                Err(PlaybackError::NotReady) => {},
            }
        } else if !track.wants_play() && track.status() != PlaybackStatus::Stopped {
            track.stop(sink.as_deref());
        }

        if let Some(sink) = sink.as_deref_mut()
            && track.applied_mute != track.muted
        {
            sink.set_muted(track.muted);
            track.applied_mute = track.muted;
        }
    }
}

fn refresh_audio_labels(
    tracks: Query<&SceneAudio, Changed<SceneAudio>>,
    mut labels: Query<&mut Text, With<AudioLabel>>,
) {
    let Some(track) = tracks.iter().next() else {
        return;
    };
    for mut label in &mut labels {
        label.0 = audio_label(track.status(), track.is_muted()).to_string();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use bevy::state::app::StatesPlugin;

    use super::*;
    use crate::router::RouterPlugin;
    use crate::schedule::SchedulePlugin;
    use crate::state::StatePlugin;

    #[derive(Default)]
    struct FakeSink {
        plays:  Cell<u32>,
        halts:  Cell<u32>,
        muted:  bool,
    }

    impl PlaybackControl for FakeSink {
        fn resume(&self) { self.plays.set(self.plays.get() + 1); }

        fn halt(&self) { self.halts.set(self.halts.get() + 1); }

        fn set_muted(&mut self, muted: bool) { self.muted = muted; }
    }

    #[test]
    fn refused_playback_waits_for_a_gesture_then_plays() {
        let mut policy = AutoplayPolicy::new(true);
        let sink = FakeSink::default();
        let mut track = SceneAudio::autoplay();

        assert_eq!(
            track.attempt(Some(&sink), &policy),
            Err(PlaybackError::GestureRequired)
        );
        assert_eq!(track.status(), PlaybackStatus::Blocked);
        assert_eq!(sink.plays.get(), 0);

        assert!(policy.note_gesture());
        assert!(!policy.note_gesture());
        track.retry_after_gesture();
        assert_eq!(track.status(), PlaybackStatus::Pending);
        assert_eq!(track.attempt(Some(&sink), &policy), Ok(()));
        assert_eq!(track.status(), PlaybackStatus::Playing);
        assert_eq!(sink.plays.get(), 1);
    }

    #[test]
    fn a_missing_sink_is_not_ready_rather_than_blocked() {
        let policy = AutoplayPolicy::new(false);
        let mut track = SceneAudio::autoplay();
        assert_eq!(
            track.attempt(None::<&FakeSink>, &policy),
            Err(PlaybackError::NotReady)
        );
        assert_eq!(track.status(), PlaybackStatus::Pending);
    }

    #[test]
    fn gestures_only_retry_tracks_that_were_blocked() {
        let mut playing = SceneAudio::autoplay();
        let sink = FakeSink::default();
        assert!(playing.attempt(Some(&sink), &AutoplayPolicy::new(false)).is_ok());
        playing.retry_after_gesture();
        assert_eq!(playing.status(), PlaybackStatus::Playing);

        let mut idle = SceneAudio::on_demand();
        idle.retry_after_gesture();
        assert_eq!(idle.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn stopping_is_idempotent() {
        let sink = FakeSink::default();
        let mut track = SceneAudio::autoplay();
        track.stop(Some(&sink));
        track.stop(Some(&sink));
        track.stop(None::<&FakeSink>);
        assert_eq!(track.status(), PlaybackStatus::Stopped);
        assert_eq!(sink.halts.get(), 2);
    }

    #[test]
    fn only_audible_tracks_count_as_playing() {
        let sink = FakeSink::default();
        let mut blocked = SceneAudio::autoplay();
        assert!(blocked.attempt(Some(&sink), &AutoplayPolicy::new(true)).is_err());
        let pending = SceneAudio::autoplay();
        assert!(!any_playing([&blocked, &pending]));

        let mut playing = SceneAudio::autoplay();
        assert!(playing.attempt(Some(&sink), &AutoplayPolicy::new(false)).is_ok());
        assert!(any_playing([&blocked, &playing]));
    }

    #[test]
    fn toggling_a_blocked_scene_asks_to_play_instead_of_stopping() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .add_plugins((StatePlugin, SchedulePlugin, RouterPlugin, MediaPlugin))
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<Touches>()
            .insert_resource(AutoplayPolicy::new(true));
        let track = app.world_mut().spawn(SceneAudio::autoplay()).id();

        app.update();
        app.update();
        app.update();
        let status = |app: &App| app.world().get::<SceneAudio>(track).map(SceneAudio::status);
        assert_eq!(status(&app), Some(PlaybackStatus::Blocked));

        app.world_mut().write_message(TogglePlayback);
        app.update();
        let audio = app.world().get::<SceneAudio>(track);
        assert!(audio.is_some_and(SceneAudio::wants_play));
        assert_eq!(status(&app), Some(PlaybackStatus::Blocked));
    }

    #[test]
    fn labels_follow_status_and_mute() {
        assert_eq!(audio_label(PlaybackStatus::Blocked, true), "TAP FOR SOUND");
        assert_eq!(audio_label(PlaybackStatus::Playing, true), "MUTED");
        assert_eq!(audio_label(PlaybackStatus::Playing, false), "SOUND ON");
    }
}
