//! Match lifecycle: connections, eliminations, kill tally and the win condition

use std::time::Instant;
use tracing::info;

use crate::ws::protocol::ServerMsg;

use super::snapshot::{Outbound, SnapshotBuilder};
use super::world::World;
use super::PlayerId;

/// Spawn a newly connected player. The newcomer gets its identity and the
/// current zone, everybody gets the new player and kill maps.
pub fn connect(world: &mut World, player_id: PlayerId, out: &mut Vec<Outbound>) {
    let position = world.add_player(player_id).position;

    out.push(Outbound::Unicast {
        to: player_id,
        msg: ServerMsg::Welcome { id: player_id },
    });
    out.push(Outbound::Unicast {
        to: player_id,
        msg: SnapshotBuilder::zone(world),
    });
    out.push(Outbound::Broadcast(SnapshotBuilder::players(world)));
    out.push(Outbound::Broadcast(SnapshotBuilder::kills(world)));

    info!(
        user_id = %player_id,
        x = position.x,
        y = position.y,
        player_count = world.player_count(),
        "Player spawned"
    );
}

/// Drop a disconnected player. Empties the world -> full reset.
pub fn disconnect(world: &mut World, player_id: PlayerId, now: Instant, out: &mut Vec<Outbound>) {
    if world.remove_player(player_id).is_none() {
        // Already eliminated; nothing left to clean up
        return;
    }

    out.push(Outbound::Broadcast(SnapshotBuilder::players(world)));
    out.push(Outbound::Broadcast(SnapshotBuilder::kills(world)));

    info!(
        user_id = %player_id,
        player_count = world.player_count(),
        "Player left match"
    );

    if world.player_count() == 0 {
        on_world_empty(world, now);
    }
}

/// Remove `victim` from play, credit `killer` and check for a sole survivor.
///
/// Returns false if the victim was already gone, so each player is
/// eliminated at most once.
pub fn eliminate(
    world: &mut World,
    victim: PlayerId,
    killer: Option<PlayerId>,
    now: Instant,
    out: &mut Vec<Outbound>,
) -> bool {
    if world.remove_player(victim).is_none() {
        return false;
    }

    if let Some(killer_id) = killer {
        if let Some(count) = world.kills.get_mut(&killer_id) {
            *count += 1;
        }
    }
    out.push(Outbound::Broadcast(SnapshotBuilder::kills(world)));
    out.push(Outbound::Unicast {
        to: victim,
        msg: ServerMsg::PlayerEliminated,
    });

    info!(
        victim_id = %victim,
        killer_id = ?killer,
        cause = if killer.is_some() { "shot" } else { "zone" },
        remaining = world.player_count(),
        "Player eliminated"
    );

    match world.player_count() {
        1 => {
            if let Some(winner) = world.player_ids().first().copied() {
                out.push(Outbound::Unicast {
                    to: winner,
                    msg: ServerMsg::PlayerWon,
                });
                info!(winner_id = %winner, "Last player standing");
            }
        }
        0 => on_world_empty(world, now),
        _ => {}
    }

    true
}

/// Reinitialize the world for the next match. Clients infer the reset from
/// the snapshots that follow.
pub fn on_world_empty(world: &mut World, now: Instant) {
    world.reset(now);
    info!("World empty, match reset");
}
