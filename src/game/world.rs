//! World aggregate: the single mutable source of truth for one match

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::time::Instant;

use crate::config::GameConfig;

use super::combat::Projectile;
use super::geometry::Vec2;
use super::zone::Zone;
use super::PlayerId;

/// Player state (authoritative)
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub position: Vec2,
    pub health: f64,
    /// Last accepted shot, for the optional fire-rate limit
    pub last_shot_at: Option<Instant>,
}

/// All live gameplay state. Owned by the match task.
pub struct World {
    pub config: GameConfig,
    pub players: HashMap<PlayerId, Player>,
    pub projectiles: Vec<Projectile>,
    pub zone: Zone,
    pub kills: HashMap<PlayerId, u32>,
    pub started_at: Instant,
    rng: ChaCha8Rng,
}

impl World {
    pub fn new(config: GameConfig, now: Instant) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            zone: Zone::initial(&config),
            config,
            players: HashMap::new(),
            projectiles: Vec::new(),
            kills: HashMap::new(),
            started_at: now,
            rng,
        }
    }

    /// Spawn a player at a random point of the spawn rectangle with full health.
    /// Re-adding a live identity respawns it.
    pub fn add_player(&mut self, id: PlayerId) -> &Player {
        let position = self.spawn_position();
        self.kills.insert(id, 0);
        self.players.insert(
            id,
            Player {
                id,
                position,
                health: self.config.max_health,
                last_shot_at: None,
            },
        );
        &self.players[&id]
    }

    /// Remove a player and its kill tally entry. No-op if absent.
    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        self.kills.remove(&id);
        self.players.remove(&id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Identities present right now, used as a stable iteration set for a tick.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.keys().copied().collect()
    }

    /// Back to the initial state of a fresh match, in place.
    pub fn reset(&mut self, now: Instant) {
        self.players.clear();
        self.projectiles.clear();
        self.kills.clear();
        self.zone = Zone::initial(&self.config);
        self.started_at = now;
    }

    fn spawn_position(&mut self) -> Vec2 {
        let origin = self.config.spawn_origin;
        let extent = self.config.spawn_extent;
        Vec2::new(
            origin.x + self.rng.gen::<f64>() * extent.x,
            origin.y + self.rng.gen::<f64>() * extent.y,
        )
    }
}
