use bevy::prelude::*;

/// Queues a despawn that tolerates the entity already being gone - a scene exit and a fade-out
/// can both reach for the same overlay in one frame.
pub fn despawn(commands: &mut Commands, entity: Entity) { commands.entity(entity).try_despawn(); }
