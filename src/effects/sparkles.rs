use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::ThreadRng;

use crate::schedule::ScreenSet;

pub struct SparklesPlugin;

impl Plugin for SparklesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (populate_sparkle_fields, drift_sparkles)
                .chain()
                .in_set(ScreenSet::Presentation),
        );
    }
}

/// A box of glowing motes that drift upward and wobble, wrapping back to the bottom.
///
/// Spawn it with a `Transform`; the motes are spawned as its children on the next frame, so
/// hiding or despawning the field takes them along.
#[derive(Component, Debug, Clone, Copy)]
#[require(Transform, Visibility)]
pub struct SparkleField {
    pub count: usize,
    /// full extent of the box the motes live in
    pub scale: Vec3,
    /// mote radius in metres
    pub size:  f32,
    pub speed: f32,
    pub color: Color,
    /// 0..1, how bright the motes glow
    pub glow:  f32,
}

impl SparkleField {
    pub const fn new(count: usize, scale: Vec3, color: Color) -> Self {
        Self {
            count,
            scale,
            size: 0.02,
            speed: 0.5,
            color,
            glow: 1.0,
        }
    }

    pub const fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub const fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub const fn with_glow(mut self, glow: f32) -> Self {
        self.glow = glow;
        self
    }
}

#[derive(Component, Debug, Clone, Copy)]
struct Sparkle {
    home:  Vec3,
    phase: f32,
    speed: f32,
    scale: Vec3,
}

/// Where a mote is after `elapsed` seconds - always inside the field's box.
fn sparkle_position(home: Vec3, phase: f32, speed: f32, scale: Vec3, elapsed: f32) -> Vec3 {
    let half = scale * 0.5;
    let t = elapsed.mul_add(speed, phase);
    // rise and wrap
    let height = scale.y.max(f32::EPSILON);
    let y = (home.y + half.y + t * 0.2).rem_euclid(height) - half.y;
    // wobble sideways without leaving the box
    let x = t.sin().mul_add(0.1 * half.x, home.x).clamp(-half.x, half.x);
    let z = t.cos().mul_add(0.1 * half.z, home.z).clamp(-half.z, half.z);
    Vec3::new(x, y, z)
}

fn random_home(scale: Vec3, rng: &mut ThreadRng) -> Vec3 {
    let half = scale * 0.5;
    Vec3::new(
        rng.random_range(-1.0..=1.0) * half.x,
        rng.random_range(-1.0..=1.0) * half.y,
        rng.random_range(-1.0..=1.0) * half.z,
    )
}

fn populate_sparkle_fields(
    mut commands: Commands,
    fields: Query<(Entity, &SparkleField), Added<SparkleField>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if fields.is_empty() {
        return;
    }
    let mesh = meshes.add(Sphere::new(1.0).mesh().uv(8, 6));
    let mut rng = rand::rng();

    for (entity, field) in &fields {
        let emissive = LinearRgba::from(field.color) * (field.glow * 8.0);
        let material = materials.add(StandardMaterial {
            base_color: field.color,
            emissive,
            unlit: true,
            ..default()
        });

        commands.entity(entity).with_children(|parent| {
            for _ in 0..field.count {
                let home = random_home(field.scale, &mut rng);
                let size = field.size * rng.random_range(0.5..1.5);
                parent.spawn((
                    Sparkle {
                        home,
                        phase: rng.random_range(0.0..std::f32::consts::TAU),
                        speed: field.speed * rng.random_range(0.5..1.5),
                        scale: field.scale,
                    },
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(material.clone()),
                    Transform::from_translation(home).with_scale(Vec3::splat(size)),
                ));
            }
        });
        debug!("spawned {} sparkles", field.count);
    }
}

fn drift_sparkles(time: Res<Time>, mut sparkles: Query<(&Sparkle, &mut Transform)>) {
    let elapsed = time.elapsed_secs();
    for (sparkle, mut transform) in &mut sparkles {
        transform.translation =
            sparkle_position(sparkle.home, sparkle.phase, sparkle.speed, sparkle.scale, elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motes_never_leave_their_box() {
        let scale = Vec3::new(4.0, 6.0, 1.0);
        let half = scale * 0.5;
        let mut rng = rand::rng();
        for _ in 0..50 {
            let home = random_home(scale, &mut rng);
            for step in 0..400 {
                let position = sparkle_position(home, 1.3, 2.0, scale, step as f32 * 0.1);
                assert!(position.x.abs() <= half.x + 1e-4);
                assert!(position.y.abs() <= half.y + 1e-4);
                assert!(position.z.abs() <= half.z + 1e-4);
            }
        }
    }

    #[test]
    fn motes_rise_between_wraps() {
        let scale = Vec3::splat(10.0);
        let low = sparkle_position(Vec3::new(0.0, -4.0, 0.0), 0.0, 1.0, scale, 0.0);
        let higher = sparkle_position(Vec3::new(0.0, -4.0, 0.0), 0.0, 1.0, scale, 1.0);
        assert!(higher.y > low.y);
    }
}
