use bevy::math::Vec3;

use crate::state::Screen;

/// A named camera position and the point it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPreset {
    pub key:      &'static str,
    pub label:    &'static str,
    pub position: Vec3,
    pub target:   Vec3,
}

impl CameraPreset {
    const fn new(key: &'static str, label: &'static str, position: [f32; 3], target: [f32; 3]) -> Self {
        Self {
            key,
            label,
            position: Vec3::from_array(position),
            target: Vec3::from_array(target),
        }
    }
}

/// The preset table of one screen. The first entry is where the camera starts.
#[derive(Debug, Clone, Copy)]
pub struct PresetTable {
    pub presets: &'static [CameraPreset],
}

impl PresetTable {
    pub fn find(&self, key: &str) -> Option<&'static CameraPreset> {
        self.presets.iter().find(|preset| preset.key == key)
    }

    pub fn default_preset(&self) -> Option<&'static CameraPreset> { self.presets.first() }

    /// The preset after `key`, wrapping around. Unknown keys start over from the default.
    pub fn after(&self, key: &str) -> Option<&'static CameraPreset> {
        let index = self
            .presets
            .iter()
            .position(|preset| preset.key == key)
            .map_or(0, |index| (index + 1) % self.presets.len());
        self.presets.get(index)
    }
}

pub const LOBBY_VIEWS: &[CameraPreset] = &[CameraPreset::new("host", "Host", [0., 0., 8.], [0., 0., 0.])];

pub const CITY_VIEWS: &[CameraPreset] = &[
    CameraPreset::new("WIDE", "Wide", [25., 15., 25.], [0., 5., 0.]),
    CameraPreset::new("STREET", "Street", [6., 1., 12.], [0., 0., 0.]),
    CameraPreset::new("BIKE", "Bike", [3., 0., 6.], [0., -1.5, 2.]),
    CameraPreset::new("ROOFTOP", "Rooftop", [-12., 22., 8.], [0., 0., -4.]),
];

pub const MARS_VIEWS: &[CameraPreset] = &[
    CameraPreset::new("orbit", "Colony", [10., 5., 15.], [0., 0., 0.]),
    CameraPreset::new("portal", "Portal", [3., 1., -1.], [0., 0., -8.]),
    CameraPreset::new("rover", "Rover", [22., 2., 18.], [15., -2., 10.]),
];

pub const EXPLORE_VIEWS: &[CameraPreset] = &[
    CameraPreset::new("overview", "Overview", [15., 8., 15.], [0., 0., 0.]),
    CameraPreset::new("statue", "Guardian", [7., 0., 4.], [3.5, -2., 1.]),
    CameraPreset::new("fire", "Campfire", [4., 1., 4.], [0., -1.5, 0.]),
    CameraPreset::new("keris", "Keris Pusaka", [4.5, -1., 3.], [4.1, -1.8, 1.5]),
    CameraPreset::new("ghost", "The Ritual", [-4., 0., 4.], [-6., 1., -2.]),
    CameraPreset::new("mystery", "Grim Discovery", [12., 0., -2.], [8., -1.5, -8.]),
];

pub const ABOUT_VIEWS: &[CameraPreset] = &[CameraPreset::new("front", "About", [0., 0., 5.], [0., 0., 0.])];

pub const fn table_for(screen: Screen) -> Option<PresetTable> {
    let presets = match screen {
        Screen::Launch => return None,
        Screen::Lobby => LOBBY_VIEWS,
        Screen::City => CITY_VIEWS,
        Screen::Mars => MARS_VIEWS,
        Screen::Explore => EXPLORE_VIEWS,
        Screen::About => ABOUT_VIEWS,
    };
    Some(PresetTable { presets })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_starts_wide() {
        let wide = table_for(Screen::City).and_then(|table| table.default_preset());
        assert_eq!(wide.map(|preset| preset.key), Some("WIDE"));
        assert_eq!(wide.map(|preset| preset.position), Some(Vec3::new(25., 15., 25.)));
        assert_eq!(wide.map(|preset| preset.target), Some(Vec3::new(0., 5., 0.)));
    }

    #[test]
    fn every_scene_has_a_default_and_unique_keys() {
        for screen in [
            Screen::Lobby,
            Screen::City,
            Screen::Mars,
            Screen::Explore,
            Screen::About,
        ] {
            let Some(table) = table_for(screen) else {
                panic!("{screen:?} has no preset table");
            };
            assert!(table.default_preset().is_some());
            for (index, preset) in table.presets.iter().enumerate() {
                assert_eq!(table.find(preset.key).map(|found| found.label), Some(preset.label));
                assert!(table.presets[index + 1..].iter().all(|other| other.key != preset.key));
            }
        }
        assert!(table_for(Screen::Launch).is_none());
    }

    #[test]
    fn cycling_wraps_and_unknown_keys_restart() {
        let table = PresetTable { presets: CITY_VIEWS };
        assert_eq!(table.after("WIDE").map(|preset| preset.key), Some("STREET"));
        assert_eq!(table.after("ROOFTOP").map(|preset| preset.key), Some("WIDE"));
        assert_eq!(table.after("nope").map(|preset| preset.key), Some("WIDE"));
        assert!(table.find("nope").is_none());
    }
}
