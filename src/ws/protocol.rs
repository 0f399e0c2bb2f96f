//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMsg {
    /// Movement intent, each axis in -1..=1 (not required to be unit length)
    Move { dx: f64, dy: f64 },

    /// Fire along the given direction (expected to be unit length)
    Shoot { dx: f64, dy: f64 },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMsg {
    /// Identity assigned to this connection (unicast)
    Welcome { id: Uuid },

    /// Every live player
    UpdatePlayers {
        players: HashMap<Uuid, PlayerSnapshot>,
    },

    /// Kill count per live player
    UpdateKills { kills: HashMap<Uuid, u32> },

    /// Every live projectile
    UpdateBullets { bullets: Vec<BulletSnapshot> },

    /// Current safe zone
    UpdateSafeZone(ZoneState),

    /// You were eliminated (unicast)
    PlayerEliminated,

    /// You are the last player standing (unicast)
    PlayerWon,
}

/// Player state in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub x: f64,
    pub y: f64,
    pub health: f64,
}

/// Projectile state in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletSnapshot {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub owner: Uuid,
}

/// Zone (shrinking play area) state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneState {
    /// Zone center X
    pub x: f64,
    /// Zone center Y
    pub y: f64,
    /// Current zone radius
    pub radius: f64,
}
