//! Small looping motions that make props feel alive: a gentle float, a hovering spin and a
//! flickering light. All of them are pure functions of elapsed time so a prop never drifts away
//! from where its scene put it.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::schedule::ScreenSet;

pub struct MotionPlugin;

impl Plugin for MotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (anchor_motion, float_props, hover_props, flicker_lights)
                .chain()
                .in_set(ScreenSet::Presentation),
        );
    }
}

/// Gentle bob and sway around where the prop was spawned.
#[derive(Component, Debug, Clone, Copy)]
#[require(MotionAnchor)]
pub struct Float {
    pub speed:              f32,
    /// metres of vertical travel either side of the anchor
    pub float_intensity:    f32,
    /// radians of sway either side of the anchor's rotation
    pub rotation_intensity: f32,
}

impl Float {
    pub const fn new(speed: f32, float_intensity: f32, rotation_intensity: f32) -> Self {
        Self {
            speed,
            float_intensity,
            rotation_intensity,
        }
    }
}

/// Bobs up and down around a fixed height while spinning about Y.
#[derive(Component, Debug, Clone, Copy)]
#[require(MotionAnchor)]
pub struct Hover {
    pub amplitude: f32,
    /// radians per second of the bob
    pub frequency: f32,
    pub phase:     f32,
    /// radians per second about Y
    pub spin:      f32,
}

impl Hover {
    pub const fn new(amplitude: f32, frequency: f32) -> Self {
        Self {
            amplitude,
            frequency,
            phase: 0.0,
            spin: 0.0,
        }
    }

    pub const fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    pub const fn with_spin(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }
}

/// Pulses a point light's intensity around `base`.
#[derive(Component, Debug, Clone, Copy)]
pub struct Flicker {
    pub base:      f32,
    pub amplitude: f32,
    pub frequency: f32,
}

/// The transform the prop was spawned with. Motions are offsets from it.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MotionAnchor(Option<Transform>);

pub fn float_offset(float: &Float, elapsed: f32) -> (f32, f32) {
    let t = elapsed * float.speed;
    let height = (t / 4.0 * TAU).sin() * float.float_intensity * 0.5;
    let sway = (t / 4.0).sin() * float.rotation_intensity * 0.5;
    (height, sway)
}

pub fn hover_offset(hover: &Hover, elapsed: f32) -> f32 {
    hover.amplitude * elapsed.mul_add(hover.frequency, hover.phase).sin()
}

pub fn flicker_intensity(flicker: &Flicker, elapsed: f32) -> f32 {
    flicker
        .amplitude
        .mul_add((elapsed * flicker.frequency).sin(), flicker.base)
        .max(0.0)
}

fn anchor_motion(mut anchors: Query<(&Transform, &mut MotionAnchor), Added<MotionAnchor>>) {
    for (transform, mut anchor) in &mut anchors {
        anchor.0 = Some(*transform);
    }
}

fn float_props(time: Res<Time>, mut props: Query<(&Float, &MotionAnchor, &mut Transform)>) {
    let elapsed = time.elapsed_secs();
    for (float, anchor, mut transform) in &mut props {
        let Some(anchor) = anchor.0 else {
            continue;
        };
        let (height, sway) = float_offset(float, elapsed);
        transform.translation = anchor.translation + Vec3::Y * height;
        transform.rotation = anchor.rotation * Quat::from_euler(EulerRot::XYZ, sway * 0.5, sway, 0.0);
    }
}

fn hover_props(time: Res<Time>, mut props: Query<(&Hover, &MotionAnchor, &mut Transform)>) {
    let elapsed = time.elapsed_secs();
    for (hover, anchor, mut transform) in &mut props {
        let Some(anchor) = anchor.0 else {
            continue;
        };
        transform.translation = anchor.translation + Vec3::Y * hover_offset(hover, elapsed);
        transform.rotation = anchor.rotation * Quat::from_rotation_y(hover.spin * elapsed);
    }
}

fn flicker_lights(time: Res<Time>, mut lights: Query<(&Flicker, &mut PointLight)>) {
    let elapsed = time.elapsed_secs();
    for (flicker, mut light) in &mut lights {
        light.intensity = flicker_intensity(flicker, elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_stays_within_its_amplitude() {
        // the drone: half a metre at 1.5 rad/s
        let hover = Hover::new(0.5, 1.5).with_spin(1.2);
        for step in 0..1000 {
            let offset = hover_offset(&hover, step as f32 * 0.05);
            assert!(offset.abs() <= 0.5 + f32::EPSILON);
        }
        assert!(hover_offset(&hover, 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn phase_offsets_two_hovers() {
        let left = Hover::new(0.5, 5.0);
        let right = Hover::new(0.5, 5.0).with_phase(2.0);
        assert!((hover_offset(&left, 0.3) - hover_offset(&right, 0.3)).abs() > 0.01);
    }

    #[test]
    fn flicker_never_goes_negative() {
        let flicker = Flicker {
            base:      1.0,
            amplitude: 3.0,
            frequency: 2.0,
        };
        for step in 0..200 {
            assert!(flicker_intensity(&flicker, step as f32 * 0.1) >= 0.0);
        }
        let calm = Flicker {
            base:      2.0,
            amplitude: 0.5,
            frequency: 2.0,
        };
        assert!((flicker_intensity(&calm, 0.0) - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn float_is_bounded_by_its_intensity() {
        let float = Float::new(2.0, 0.5, 0.2);
        for step in 0..500 {
            let (height, sway) = float_offset(&float, step as f32 * 0.03);
            assert!(height.abs() <= 0.25 + 1e-5);
            assert!(sway.abs() <= 0.1 + 1e-5);
        }
    }
}
