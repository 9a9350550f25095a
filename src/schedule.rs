use bevy::prelude::*;

use crate::state::InScene;

#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum ScreenSet {
    /// buttons, key actions and gestures get turned into requests
    Input,
    /// timers: typewriters, dialogue phases, the lock gate fade and the mode switch
    Sequencing,
    /// everything that only reflects state - camera rig, effects, overlays, audio
    Presentation,
}

pub struct SchedulePlugin;

impl Plugin for SchedulePlugin {
    fn build(&self, app: &mut App) {
        // a scene's requests land in the same frame they are made - sequencing reads what input
        // wrote and presentation shows the result. None of it runs before the first scene is
        // entered
        app.configure_sets(
            Update,
            (
                ScreenSet::Input,
                ScreenSet::Sequencing,
                ScreenSet::Presentation,
            )
                .chain()
                .run_if(in_state(InScene)),
        );
    }
}
