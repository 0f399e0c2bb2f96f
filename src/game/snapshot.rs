//! Snapshot building and outbound message routing

use crate::ws::protocol::{BulletSnapshot, PlayerSnapshot, ServerMsg, ZoneState};

use super::world::World;
use super::PlayerId;

/// A message leaving the simulation, either for every client or for one.
#[derive(Debug, Clone)]
pub enum Outbound {
    Broadcast(ServerMsg),
    Unicast { to: PlayerId, msg: ServerMsg },
}

impl Outbound {
    /// The message if `player_id` should receive it.
    pub fn for_player(&self, player_id: PlayerId) -> Option<&ServerMsg> {
        match self {
            Outbound::Broadcast(msg) => Some(msg),
            Outbound::Unicast { to, msg } if *to == player_id => Some(msg),
            Outbound::Unicast { .. } => None,
        }
    }
}

/// Builds full (non-delta) snapshots of the world
pub struct SnapshotBuilder;

impl SnapshotBuilder {
    pub fn players(world: &World) -> ServerMsg {
        ServerMsg::UpdatePlayers {
            players: world
                .players
                .values()
                .map(|p| {
                    (
                        p.id,
                        PlayerSnapshot {
                            x: p.position.x,
                            y: p.position.y,
                            health: p.health,
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn kills(world: &World) -> ServerMsg {
        ServerMsg::UpdateKills {
            kills: world.kills.clone(),
        }
    }

    pub fn bullets(world: &World) -> ServerMsg {
        ServerMsg::UpdateBullets {
            bullets: world
                .projectiles
                .iter()
                .map(|b| {
                    let dir = b.direction.as_vec();
                    BulletSnapshot {
                        x: b.position.x,
                        y: b.position.y,
                        dx: dir.x,
                        dy: dir.y,
                        owner: b.owner,
                    }
                })
                .collect(),
        }
    }

    pub fn zone(world: &World) -> ServerMsg {
        ServerMsg::UpdateSafeZone(ZoneState {
            x: world.zone.center.x,
            y: world.zone.center.y,
            radius: world.zone.radius,
        })
    }
}
