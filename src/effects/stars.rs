use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::ThreadRng;

use crate::schedule::ScreenSet;
use crate::traits::TransformExt;

pub struct StarsPlugin;

impl Plugin for StarsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (populate_star_fields, rotate_star_fields)
                .chain()
                .in_set(ScreenSet::Presentation),
        );
    }
}

/// A shell of stars around the scene that slowly turns. Children are spawned on the next frame
/// and go away with the field.
#[derive(Component, Debug, Clone, Copy)]
#[require(Transform, Visibility)]
pub struct StarField {
    pub count:            usize,
    /// inner radius of the shell
    pub radius:           f32,
    /// thickness of the shell
    pub depth:            f32,
    /// one full turn takes this many minutes
    pub rotation_minutes: f32,
    /// chance that a star is (nearly) white rather than tinted
    pub white_chance:     f32,
}

impl StarField {
    pub const fn new(count: usize, radius: f32, depth: f32) -> Self {
        Self {
            count,
            radius,
            depth,
            rotation_minutes: 20.0,
            white_chance: 0.8,
        }
    }
}

#[derive(Component, Debug)]
struct Star;

/// Point in the shell between `inner` and `outer` for three uniform samples in `0..1`.
/// Uniform on the sphere: the polar angle is taken from `acos`, not sampled directly.
fn shell_position(inner: f32, outer: f32, azimuth: f32, polar: f32, depth: f32) -> Vec3 {
    let theta = azimuth * TAU;
    let phi = 2.0f32.mul_add(polar, -1.0).clamp(-1.0, 1.0).acos();
    let radius = (outer - inner).mul_add(depth, inner);

    Vec3::new(
        radius * theta.cos() * phi.sin(),
        radius * theta.sin() * phi.sin(),
        radius * phi.cos(),
    )
}

fn star_color(white_chance: f32, rng: &mut ThreadRng) -> LinearRgba {
    let start = if rng.random::<f32>() < white_chance { 0.8 } else { 0.2 };
    let mut r: f32 = rng.random_range(start..=1.0);
    let mut g = rng.random_range(start..=1.0);
    let mut b = rng.random_range(start..=1.0);

    // no dull stars
    let min_brightness = (1.0 - start).mul_add(0.2, start);
    let brightest = r.max(g).max(b);
    if brightest < min_brightness {
        let lift = min_brightness / brightest.max(f32::EPSILON);
        r *= lift;
        g *= lift;
        b *= lift;
    }
    LinearRgba::rgb(r, g, b) * 6.0
}

fn populate_star_fields(
    mut commands: Commands,
    fields: Query<(Entity, &StarField), Added<StarField>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if fields.is_empty() {
        return;
    }
    let mesh = meshes.add(Sphere::new(1.0).mesh().uv(6, 4));
    let mut rng = rand::rng();

    for (entity, field) in &fields {
        let inner = field.radius;
        let outer = field.radius + field.depth;

        commands.entity(entity).with_children(|parent| {
            for _ in 0..field.count {
                let position = shell_position(
                    inner,
                    outer,
                    rng.random(),
                    rng.random(),
                    rng.random(),
                );
                let radius = rng.random_range(0.2..0.6);
                let material = materials.add(StandardMaterial {
                    emissive: star_color(field.white_chance, &mut rng),
                    unlit: true,
                    ..default()
                });
                parent.spawn((
                    Star,
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(material),
                    Transform::from_trs(position, Quat::IDENTITY, Vec3::splat(radius)),
                ));
            }
        });
        debug!("spawned {} stars", field.count);
    }
}

// the shell turns as a whole - clockwise seen from above
fn rotate_star_fields(time: Res<Time>, mut fields: Query<(&StarField, &mut Transform)>) {
    for (field, mut transform) in &mut fields {
        if field.rotation_minutes <= f32::EPSILON {
            continue;
        }
        let speed = TAU / (field.rotation_minutes * 60.0);
        transform.rotate_y(-speed * time.delta_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_land_inside_the_shell() {
        let mut rng = rand::rng();
        for _ in 0..500 {
            let position = shell_position(200.0, 250.0, rng.random(), rng.random(), rng.random());
            let distance = position.length();
            assert!((200.0 - 1e-2..=250.0 + 1e-2).contains(&distance));
        }
    }

    #[test]
    fn shell_extremes() {
        let pole = shell_position(10.0, 20.0, 0.0, 1.0, 0.0);
        assert!((pole - Vec3::Z * 10.0).length() < 1e-4);
        let far = shell_position(10.0, 20.0, 0.25, 0.5, 1.0);
        assert!((far.length() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn star_colours_are_never_dark() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let color = star_color(0.5, &mut rng);
            assert!(color.red.max(color.green).max(color.blue) >= 0.2 * 6.0);
        }
    }
}
