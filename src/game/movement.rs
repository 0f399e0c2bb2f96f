//! Movement processor: direction intents become position changes

use super::geometry::Vec2;
use super::world::World;
use super::{InputError, PlayerId};

/// Move a player by `(dx, dy) * move_speed`.
///
/// The intent is applied as sent, without normalization. Positions are only
/// clamped when the world is configured with movement bounds. Intents that
/// are non-finite or would push the position out of `f64` range are rejected.
pub fn apply_move(world: &mut World, player_id: PlayerId, dx: f64, dy: f64) -> Result<(), InputError> {
    let speed = world.config.move_speed;
    let bounds = world.config.movement_bounds;
    let player = world
        .player_mut(player_id)
        .ok_or(InputError::UnknownPlayer(player_id))?;

    let mut next = player.position + Vec2::new(dx, dy) * speed;
    if !next.x.is_finite() || !next.y.is_finite() {
        return Err(InputError::DegenerateDirection);
    }
    if let Some(bounds) = bounds {
        next = bounds.clamp(next);
    }
    player.position = next;
    Ok(())
}
