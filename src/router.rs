//! Path based navigation between screens.
//!
//! The route table is a fixed, closed set. Navigating is a forward jump: the current screen is
//! replaced by the target screen and anything scoped to the old screen is torn down by
//! `DespawnOnExit`. Routes carry no parameters and load nothing themselves - each scene resolves
//! its own assets after it has been entered.

use bevy::prelude::*;
use thiserror::Error;

use crate::schedule::ScreenSet;
use crate::state::Screen;

pub struct RouterPlugin;

impl Plugin for RouterPlugin {
    fn build(&self, app: &mut App) {
        // navigation runs outside of `ScreenSet` - the startup jump happens while we're still
        // in Launch, where the scene sets don't run
        app.add_message::<Navigate>()
            .add_systems(Update, apply_navigation.after(ScreenSet::Input))
            .add_systems(Update, press_nav_buttons.in_set(ScreenSet::Input));
    }
}

/// The route table - path to screen.
pub const ROUTES: [(&str, Screen); 5] = [
    ("/", Screen::Lobby),
    ("/city", Screen::City),
    ("/mars", Screen::Mars),
    ("/explore", Screen::Explore),
    ("/about", Screen::About),
];

pub const LOBBY_PATH: &str = "/";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route for path `{0}`")]
    Unknown(String),
}

/// Exact match against [`ROUTES`]. Trailing slashes are not normalised.
pub fn resolve(path: &str) -> Result<Screen, RouteError> {
    ROUTES
        .iter()
        .find(|(route, _)| *route == path)
        .map(|(_, screen)| *screen)
        .ok_or_else(|| RouteError::Unknown(path.to_string()))
}

pub fn path_of(screen: Screen) -> Option<&'static str> {
    ROUTES
        .iter()
        .find(|(_, candidate)| *candidate == screen)
        .map(|(path, _)| *path)
}

/// Request a jump to another screen.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct Navigate {
    pub path: String,
}

impl Navigate {
    pub fn to(path: impl Into<String>) -> Self { Self { path: path.into() } }

    pub fn lobby() -> Self { Self::to(LOBBY_PATH) }
}

/// Any button that jumps somewhere when pressed
#[derive(Component, Debug, Clone, Copy)]
pub struct NavButton(pub &'static str);

// Only the last request of a frame wins; there is no back-stack to push onto.
fn apply_navigation(
    mut requests: MessageReader<Navigate>,
    state: Res<State<Screen>>,
    mut next_state: ResMut<NextState<Screen>>,
) {
    let mut target = None;
    for request in requests.read() {
        match resolve(&request.path) {
            Ok(screen) => target = Some(screen),
            Err(error) => warn!("ignoring navigation: {error}"),
        }
    }

    if let Some(screen) = target
        && screen != *state.get()
    {
        debug!("navigating to {screen:?}");
        next_state.set(screen);
    }
}

fn press_nav_buttons(
    buttons: Query<(&Interaction, &NavButton), Changed<Interaction>>,
    mut navigate: MessageWriter<Navigate>,
) {
    for (interaction, button) in &buttons {
        if *interaction == Interaction::Pressed {
            navigate.write(Navigate::to(button.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;

    use super::*;
    use crate::schedule::SchedulePlugin;
    use crate::state::StatePlugin;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .add_plugins((StatePlugin, SchedulePlugin, RouterPlugin));
        app
    }

    fn current(app: &App) -> Screen { *app.world().resource::<State<Screen>>().get() }

    #[test]
    fn every_route_resolves_to_its_own_screen() {
        for (path, screen) in ROUTES {
            assert_eq!(resolve(path), Ok(screen));
            assert_eq!(path_of(screen), Some(path));
        }
    }

    #[test]
    fn unknown_and_unnormalised_paths_are_rejected() {
        assert_eq!(
            resolve("/nowhere"),
            Err(RouteError::Unknown("/nowhere".to_string()))
        );
        assert!(resolve("/city/").is_err());
        assert!(resolve("").is_err());
        assert_eq!(path_of(Screen::Launch), None);
    }

    #[test]
    fn startup_lands_on_the_lobby() {
        let mut app = test_app();
        app.update();
        app.update();
        assert_eq!(current(&app), Screen::Lobby);
    }

    #[test]
    fn navigation_jumps_forward_and_ignores_unknown_paths() {
        let mut app = test_app();
        app.update();
        app.update();

        app.world_mut().write_message(Navigate::to("/city"));
        app.update();
        app.update();
        assert_eq!(current(&app), Screen::City);

        app.world_mut().write_message(Navigate::to("/city/secret"));
        app.update();
        app.update();
        assert_eq!(current(&app), Screen::City);

        app.world_mut().write_message(Navigate::lobby());
        app.update();
        app.update();
        assert_eq!(current(&app), Screen::Lobby);
    }
}
