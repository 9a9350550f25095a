use std::time::Duration;

use bevy::asset::LoadState;
use bevy::asset::UntypedAssetId;
// load once, let every scene share the handle
use bevy::prelude::*;

use crate::despawn::despawn;
use crate::schedule::ScreenSet;
use crate::state::Screen;
use crate::traits::UsizeExt;

pub struct AssetLoaderPlugin;

impl Plugin for AssetLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Preloaded>()
            // the lobby and the city both want the host on their first frame - start fetching
            // before any scene exists
            .add_systems(PreStartup, preload_assets)
            .add_systems(
                Update,
                (track_scene_loads, show_loading_screen)
                    .chain()
                    .in_set(ScreenSet::Presentation),
            );
    }
}

pub const HOST_MODEL: &str = "models/yumi.glb";
pub const BIKE_MODEL: &str = "models/bike.glb";

/// Handles fetched at boot and held for the whole session so the asset server keeps them cached.
#[derive(Resource, Clone, Debug, Default)]
pub struct Preloaded {
    pub host: Handle<Scene>,
    pub bike: Handle<Scene>,
}

pub fn preload_assets(mut preloaded: ResMut<Preloaded>, asset_server: Res<AssetServer>) {
    *preloaded = Preloaded {
        host: asset_server.load(GltfAssetLabel::Scene(0).from_asset(HOST_MODEL)),
        bike: asset_server.load(GltfAssetLabel::Scene(0).from_asset(BIKE_MODEL)),
    };
}

/// A glTF scene by path - the asset server hands back the cached handle if it's already loaded.
pub fn gltf_scene(asset_server: &AssetServer, path: &'static str) -> Handle<Scene> {
    asset_server.load(GltfAssetLabel::Scene(0).from_asset(path))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetProgress {
    Pending,
    Loaded,
    Failed,
}

impl AssetProgress {
    pub fn from_load_state(state: Option<&LoadState>) -> Self {
        match state {
            Some(LoadState::Loaded) => Self::Loaded,
            Some(LoadState::Failed(_)) => Self::Failed,
            _ => Self::Pending,
        }
    }

    /// failed assets count as settled - a broken model shouldn't leave the loading screen up
    pub const fn is_settled(self) -> bool { !matches!(self, Self::Pending) }
}

/// Whole percent of `settled` out of `total`; nothing to load is 100%.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "fraction is clamped to 0..=1"
)]
pub fn progress_percent(settled: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    let fraction = (settled.min(total).to_f32() / total.to_f32()).clamp(0.0, 1.0);
    (fraction * 100.0).floor() as u32
}

/// The assets a scene waits for before dropping its loading screen.
#[derive(Component, Debug)]
pub struct SceneLoad {
    assets: Vec<(UntypedAssetId, AssetProgress)>,
    /// extra time the loading screen stays up once everything has settled
    linger: Timer,
}

impl SceneLoad {
    pub fn new(assets: impl IntoIterator<Item = UntypedAssetId>, linger: Duration) -> Self {
        Self {
            assets: assets
                .into_iter()
                .map(|id| (id, AssetProgress::Pending))
                .collect(),
            linger: Timer::new(linger, TimerMode::Once),
        }
    }

    /// Refreshes every still-pending asset. Returns the ones that failed since the last call.
    pub fn observe(
        &mut self,
        mut progress_of: impl FnMut(UntypedAssetId) -> AssetProgress,
    ) -> Vec<UntypedAssetId> {
        let mut failed = Vec::new();
        for (id, progress) in &mut self.assets {
            if progress.is_settled() {
                continue;
            }
            *progress = progress_of(*id);
            if *progress == AssetProgress::Failed {
                failed.push(*id);
            }
        }
        failed
    }

    pub fn settled(&self) -> usize {
        self.assets
            .iter()
            .filter(|(_, progress)| progress.is_settled())
            .count()
    }

    pub fn percent(&self) -> u32 { progress_percent(self.settled(), self.assets.len()) }

    /// Counts down the linger once everything has settled. True once the scene is ready.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.settled() < self.assets.len() {
            return false;
        }
        self.linger.tick(delta);
        self.linger.is_finished()
    }

    pub fn is_ready(&self) -> bool {
        self.settled() == self.assets.len() && self.linger.is_finished()
    }
}

#[derive(Component, Debug)]
pub struct LoadingScreen;

#[derive(Component, Debug)]
struct LoadingLabel;

fn track_scene_loads(
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    mut loads: Query<&mut SceneLoad>,
) {
    for mut load in &mut loads {
        if load.is_ready() {
            continue;
        }
        let failed =
            load.observe(|id| AssetProgress::from_load_state(asset_server.get_load_state(id).as_ref()));
        for id in failed {
            warn!("asset {id:?} failed to load - carrying on without it");
        }
        if load.tick(time.delta()) {
            debug!("scene assets ready");
        }
    }
}

fn show_loading_screen(
    mut commands: Commands,
    screen: Res<State<Screen>>,
    loads: Query<&SceneLoad>,
    screens: Query<Entity, With<LoadingScreen>>,
    mut labels: Query<&mut Text, With<LoadingLabel>>,
) {
    let pending = loads.iter().find(|load| !load.is_ready());

    let Some(load) = pending else {
        for entity in &screens {
            despawn(&mut commands, entity);
        }
        return;
    };

    let label = format!("LOADING {}%", load.percent());
    if screens.is_empty() {
        spawn_loading_screen(&mut commands, *screen.get(), label);
        return;
    }
    for mut text in &mut labels {
        if text.0 != label {
            text.0.clone_from(&label);
        }
    }
}

fn spawn_loading_screen(commands: &mut Commands, screen: Screen, label: String) {
    commands.spawn((
        Name::new("LoadingScreen"),
        LoadingScreen,
        DespawnOnExit(screen),
        GlobalZIndex(40),
        Node {
            width: percent(100),
            height: percent(100),
            position_type: PositionType::Absolute,
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            ..default()
        },
        BackgroundColor(Color::BLACK),
        children![(
            LoadingLabel,
            Text::new(label),
            TextFont {
                font_size: 24.0,
                ..default()
            },
            TextColor(Color::srgb(0.75, 0.5, 1.0)),
        )],
    ));
}

#[cfg(test)]
mod tests {
    use bevy::asset::AssetId;

    use super::*;

    fn ids(count: u128) -> Vec<UntypedAssetId> {
        (0..count)
            .map(|n| AssetId::<Scene>::Uuid {
                uuid: bevy::asset::uuid::Uuid::from_u128(n + 1),
            }
            .untyped())
            .collect()
    }

    #[test]
    fn percent_rounds_down_and_caps() {
        assert_eq!(progress_percent(0, 0), 100);
        assert_eq!(progress_percent(0, 3), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 66);
        assert_eq!(progress_percent(3, 3), 100);
        assert_eq!(progress_percent(5, 3), 100);
    }

    #[test]
    fn failed_assets_settle_and_are_reported_once() {
        let assets = ids(2);
        let broken = assets[1];
        let mut load = SceneLoad::new(assets.clone(), Duration::ZERO);

        let failed = load.observe(|id| {
            if id == broken {
                AssetProgress::Failed
            } else {
                AssetProgress::Pending
            }
        });
        assert_eq!(failed, vec![broken]);
        assert_eq!(load.percent(), 50);
        assert!(!load.tick(Duration::from_millis(16)));

        let failed = load.observe(|_| AssetProgress::Loaded);
        assert!(failed.is_empty());
        assert_eq!(load.percent(), 100);
        assert!(load.tick(Duration::ZERO));
        assert!(load.is_ready());
    }

    #[test]
    fn linger_holds_the_loading_screen_after_everything_settles() {
        let mut load = SceneLoad::new(ids(1), Duration::from_millis(800));
        assert!(!load.tick(Duration::from_secs(5)));

        load.observe(|_| AssetProgress::Loaded);
        assert!(!load.tick(Duration::from_millis(500)));
        assert!(!load.is_ready());
        assert!(load.tick(Duration::from_millis(300)));
        assert!(load.is_ready());
    }

    #[test]
    fn nothing_to_wait_for_is_ready_on_the_first_tick() {
        let mut load = SceneLoad::new(Vec::new(), Duration::ZERO);
        assert_eq!(load.percent(), 100);
        assert!(load.tick(Duration::ZERO));
    }
}
