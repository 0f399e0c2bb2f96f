//! Game simulation modules

pub mod combat;
pub mod geometry;
pub mod lifecycle;
pub mod r#match;
pub mod movement;
pub mod snapshot;
pub mod world;
pub mod zone;

pub use r#match::{GameMatch, MatchHandle};
pub use snapshot::Outbound;
pub use world::World;

use uuid::Uuid;

/// Identity of a connected player, assigned by the server on connect
pub type PlayerId = Uuid;

/// Commands fed into the match task, one per inbound event
#[derive(Debug, Clone)]
pub enum MatchCommand {
    Join { player_id: PlayerId },
    Leave { player_id: PlayerId },
    Move { player_id: PlayerId, dx: f64, dy: f64 },
    Shoot { player_id: PlayerId, dx: f64, dy: f64 },
}

/// Rejected player input. Logged and dropped, never sent to clients.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Direction must be finite and non-zero")]
    DegenerateDirection,

    #[error("Shot rejected by cooldown")]
    ShootCooldown,
}
