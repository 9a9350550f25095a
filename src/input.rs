//! Keyboard shortcuts.
//!
//! One input context lives for the whole session. Each action only writes the same message the
//! matching on-screen button writes, so keys and buttons can't drift apart.

use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use crate::camera::SelectView;
use crate::inspector::InspectorVisible;
use crate::lock_gate::UnlockRequested;
use crate::media::ToggleMute;
use crate::router::Navigate;
use crate::state::Screen;
use crate::transition::ModeSwitchRequested;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_input_context::<ShowcaseInput>()
            .add_systems(Startup, spawn_showcase_input)
            .add_observer(go_back)
            .add_observer(confirm)
            .add_observer(next_view)
            .add_observer(toggle_mute)
            .add_observer(toggle_inspector);
    }
}

#[derive(Component, Debug)]
pub struct ShowcaseInput;

#[derive(InputAction, Debug)]
#[action_output(bool)]
pub struct Back;

/// Enter or Space: unlock the lobby, start the city's mode switch.
#[derive(InputAction, Debug)]
#[action_output(bool)]
pub struct Confirm;

#[derive(InputAction, Debug)]
#[action_output(bool)]
pub struct NextView;

#[derive(InputAction, Debug)]
#[action_output(bool)]
pub struct MuteAction;

#[derive(InputAction, Debug)]
#[action_output(bool)]
pub struct InspectorAction;

fn spawn_showcase_input(mut commands: Commands) {
    commands.spawn((
        Name::new("ShowcaseInput"),
        ShowcaseInput,
        actions!(ShowcaseInput[
            (Action::<Back>::new(), bindings![KeyCode::Escape]),
            (Action::<Confirm>::new(), bindings![KeyCode::Enter, KeyCode::Space]),
            (Action::<NextView>::new(), bindings![KeyCode::Tab]),
            (Action::<MuteAction>::new(), bindings![KeyCode::KeyM]),
            (Action::<InspectorAction>::new(), bindings![KeyCode::F1]),
        ]),
    ));
}

fn go_back(
    _back: On<Start<Back>>,
    screen: Res<State<Screen>>,
    mut navigate: MessageWriter<Navigate>,
) {
    if matches!(screen.get(), Screen::Lobby | Screen::Launch) {
        return;
    }
    navigate.write(Navigate::lobby());
}

fn confirm(
    _confirm: On<Start<Confirm>>,
    screen: Res<State<Screen>>,
    mut unlock: MessageWriter<UnlockRequested>,
    mut mode_switch: MessageWriter<ModeSwitchRequested>,
) {
    match screen.get() {
        Screen::Lobby => {
            unlock.write(UnlockRequested);
        },
        Screen::City => {
            mode_switch.write(ModeSwitchRequested);
        },
        _ => {},
    }
}

fn next_view(_next: On<Start<NextView>>, mut select: MessageWriter<SelectView>) {
    select.write(SelectView::Next);
}

fn toggle_mute(_mute: On<Start<MuteAction>>, mut mute: MessageWriter<ToggleMute>) {
    mute.write(ToggleMute);
}

fn toggle_inspector(_toggle: On<Start<InspectorAction>>, mut visible: ResMut<InspectorVisible>) {
    visible.toggle();
    debug!("inspector visible: {}", visible.0);
}
