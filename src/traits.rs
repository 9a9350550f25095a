use bevy::prelude::*;

pub trait TransformExt {
    /// translation, rotation and scale in one go - handy for scattered decorations
    fn from_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Self;
}

impl TransformExt for Transform {
    fn from_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }
}

/// Counts and indices as `f32`, for spreading things around a circle or a percentage.
pub trait UsizeExt {
    fn to_f32(self) -> f32;
}

impl UsizeExt for usize {
    #[inline]
    #[allow(
        clippy::cast_precision_loss,
        reason = "particle counts and asset counts are tiny"
    )]
    fn to_f32(self) -> f32 { self as f32 }
}
