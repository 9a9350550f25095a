//! Tuning windows for every config resource, hidden until F1 toggles them on.

use bevy::prelude::*;
use bevy_inspector_egui::quick::ResourceInspectorPlugin;

use crate::camera::CameraConfig;
use crate::lock_gate::LockGateConfig;
use crate::media::AudioConfig;
use crate::transition::TransitionConfig;
use crate::typewriter::TypewriterConfig;

pub struct InspectorPlugin;

impl Plugin for InspectorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InspectorVisible>()
            .add_plugins(ResourceInspectorPlugin::<CameraConfig>::default().run_if(inspector_visible))
            .add_plugins(
                ResourceInspectorPlugin::<TypewriterConfig>::default().run_if(inspector_visible),
            )
            .add_plugins(
                ResourceInspectorPlugin::<TransitionConfig>::default().run_if(inspector_visible),
            )
            .add_plugins(
                ResourceInspectorPlugin::<LockGateConfig>::default().run_if(inspector_visible),
            )
            .add_plugins(ResourceInspectorPlugin::<AudioConfig>::default().run_if(inspector_visible));
    }
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InspectorVisible(pub bool);

impl InspectorVisible {
    pub const fn toggle(&mut self) { self.0 = !self.0; }
}

pub fn inspector_visible(visible: Option<Res<InspectorVisible>>) -> bool {
    visible.is_some_and(|visible| visible.0)
}
