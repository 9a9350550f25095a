use bevy::dev_tools::states::*;
use bevy::prelude::*;

use crate::router::Navigate;

pub struct StatePlugin;

impl Plugin for StatePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<Screen>()
            .add_computed_state::<InScene>()
            .add_systems(PostStartup, transition_to_lobby_on_startup)
            .add_systems(Update, log_transitions::<Screen>);
    }
}

/// Every screen the showcase can show. One route maps to exactly one screen.
/// `PostStartup` navigates to the lobby _after_ the camera is spawned.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Reflect, States)]
pub enum Screen {
    // Launch is the default so OnEnter(Lobby) can't fire before the camera rig exists -
    // every scene snaps the rig to its default preset on enter.
    #[default]
    Launch,
    Lobby,
    City,
    Mars,
    Explore,
    About,
}

impl Screen {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Launch => "",
            Self::Lobby => "IDINVERSE",
            Self::City => "KARAWANG CITY",
            Self::Mars => "MARS COLONY",
            Self::Explore => "THE CAMPFIRE",
            Self::About => "ABOUT",
        }
    }
}

// true on every screen that is an actual scene, i.e. anything after Launch.
// Scene systems hang off this so nothing ticks while we're still booting
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct InScene;

impl ComputedStates for InScene {
    type SourceStates = Screen;

    // Moving from one scene to another is still "in scene" - don't fire OnExit/OnEnter for it
    const ALLOW_SAME_STATE_TRANSITIONS: bool = false;

    fn compute(sources: Screen) -> Option<Self> {
        match sources {
            Screen::Launch => None,
            _ => Some(Self),
        }
    }
}

fn transition_to_lobby_on_startup(mut navigate: MessageWriter<Navigate>) {
    debug!("navigating to the lobby on startup");
    navigate.write(Navigate::to("/"));
}
