//! Shrinking safe zone and out-of-zone damage

use std::time::Instant;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::util::time::elapsed_millis;

use super::geometry::Vec2;
use super::lifecycle;
use super::snapshot::{Outbound, SnapshotBuilder};
use super::world::World;

/// Zone lifecycle. Transitions only move forward for the life of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZonePhase {
    /// Initial radius, waiting for the shrink delay
    Stable,
    /// Losing radius every zone tick
    Shrinking,
    /// Radius reached the floor
    Minimum,
}

/// Circular safe area
#[derive(Debug, Clone)]
pub struct Zone {
    pub center: Vec2,
    pub radius: f64,
    pub phase: ZonePhase,
}

impl Zone {
    pub fn initial(config: &GameConfig) -> Self {
        Self {
            center: config.zone_center,
            radius: config.zone_initial_radius,
            phase: ZonePhase::Stable,
        }
    }

    /// On the boundary counts as inside.
    pub fn contains(&self, p: Vec2) -> bool {
        self.center.distance(p) <= self.radius
    }

    /// Shrink one step towards `min_radius`. Returns true if the radius changed.
    fn shrink(&mut self, rate: f64, min_radius: f64) -> bool {
        if self.phase != ZonePhase::Shrinking {
            return false;
        }
        let before = self.radius;
        self.radius = (self.radius - rate).max(min_radius);
        if self.radius <= min_radius {
            self.phase = ZonePhase::Minimum;
        }
        self.radius != before
    }
}

/// One zone tick: advance the shrink schedule, damage everyone outside the
/// zone and publish the player map.
pub fn tick(world: &mut World, now: Instant, out: &mut Vec<Outbound>) {
    let elapsed = now.saturating_duration_since(world.started_at);

    if world.zone.phase == ZonePhase::Stable && elapsed > world.config.zone_shrink_delay {
        world.zone.phase = ZonePhase::Shrinking;
        info!(
            radius = world.zone.radius,
            elapsed_ms = elapsed_millis(world.started_at, now) as u64,
            "Zone started shrinking"
        );
    }

    let (rate, floor) = (world.config.zone_shrink_rate, world.config.zone_min_radius);
    if world.zone.shrink(rate, floor) {
        out.push(Outbound::Broadcast(SnapshotBuilder::zone(world)));
        if world.zone.phase == ZonePhase::Minimum {
            info!(radius = world.zone.radius, "Zone reached minimum radius");
        }
    }

    let damage = world.config.zone_damage;
    for id in world.player_ids() {
        let zone = world.zone.clone();
        let Some(player) = world.player_mut(id) else {
            continue;
        };
        if zone.contains(player.position) {
            continue;
        }

        player.health -= damage;
        if player.health <= 0.0 {
            debug!(user_id = %id, "Player died outside the zone");
            lifecycle::eliminate(world, id, None, now, out);
        }
    }

    out.push(Outbound::Broadcast(SnapshotBuilder::players(world)));
}
