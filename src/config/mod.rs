//! Configuration module - environment variable parsing and gameplay tuning

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::game::geometry::{Bounds, Vec2};

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// Allowed client origins for CORS ("*" allows any)
    pub client_origin: String,
    /// Max inbound WebSocket messages per second per connection
    pub input_rate_limit: u32,
    /// Gameplay tuning
    pub game: GameConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Hosting platforms provide PORT, fall back to SERVER_ADDR or default
        let server_addr = if let Ok(port) = env::var("PORT") {
            format!("0.0.0.0:{}", port)
        } else {
            env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        };

        let mut game = GameConfig::default();
        if let Some(seed) = parse_var::<u64>("RNG_SEED")? {
            game.rng_seed = Some(seed);
        }
        if parse_var::<bool>("CLAMP_MOVEMENT")?.unwrap_or(false) {
            game.movement_bounds = Some(GameConfig::ARENA);
        }
        if let Some(ms) = parse_var::<u64>("SHOOT_COOLDOWN_MS")? {
            game.shoot_cooldown = Duration::from_millis(ms);
        }
        game.validate()?;

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_json: env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")),
            client_origin: env::var("CLIENT_ORIGIN").unwrap_or_else(|_| "*".to_string()),
            input_rate_limit: parse_var("INPUT_RATE_LIMIT")?
                .unwrap_or(crate::util::rate_limit::INPUT_RATE_LIMIT),
            game,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(None),
    }
}

/// Gameplay constants. `Default` matches the reference ruleset.
#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Top-left corner of the spawn rectangle
    pub spawn_origin: Vec2,
    /// Width/height of the spawn rectangle
    pub spawn_extent: Vec2,
    pub max_health: f64,
    /// Distance moved per move intent
    pub move_speed: f64,
    /// Clamp player positions into these bounds; `None` leaves the world open
    pub movement_bounds: Option<Bounds>,

    pub projectile_speed: f64,
    pub projectile_damage: f64,
    pub hit_radius: f64,
    /// Minimum time between two shots of one player (zero disables the check)
    pub shoot_cooldown: Duration,

    pub zone_center: Vec2,
    pub zone_initial_radius: f64,
    pub zone_min_radius: f64,
    /// Radius lost per zone tick while shrinking
    pub zone_shrink_rate: f64,
    /// Time from world start before the zone may shrink
    pub zone_shrink_delay: Duration,
    /// Health lost per zone tick outside the zone
    pub zone_damage: f64,

    pub projectile_tick_hz: u32,
    pub zone_tick_hz: u32,

    /// Seed for spawn positions; `None` seeds from entropy
    pub rng_seed: Option<u64>,
}

impl GameConfig {
    /// Visible arena used when movement clamping is enabled.
    pub const ARENA: Bounds = Bounds {
        min: Vec2::new(0.0, 0.0),
        max: Vec2::new(800.0, 600.0),
    };

    pub fn projectile_tick(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.projectile_tick_hz))
    }

    pub fn zone_tick(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.zone_tick_hz))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.projectile_tick_hz == 0 || self.zone_tick_hz == 0 {
            return Err(ConfigError::Invalid("tick rates must be > 0"));
        }
        if !self.max_health.is_finite() || self.max_health <= 0.0 {
            return Err(ConfigError::Invalid("max_health must be > 0"));
        }
        if !self.hit_radius.is_finite() || self.hit_radius <= 0.0 {
            return Err(ConfigError::Invalid("hit_radius must be > 0"));
        }
        if self.zone_min_radius < 0.0 || self.zone_min_radius > self.zone_initial_radius {
            return Err(ConfigError::Invalid(
                "zone_min_radius must be within 0..=zone_initial_radius",
            ));
        }
        if self.zone_shrink_rate < 0.0 || self.zone_damage < 0.0 {
            return Err(ConfigError::Invalid("zone rates must be >= 0"));
        }
        if self.spawn_extent.x < 0.0 || self.spawn_extent.y < 0.0 {
            return Err(ConfigError::Invalid("spawn_extent must be >= 0"));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            spawn_origin: Vec2::new(100.0, 100.0),
            spawn_extent: Vec2::new(600.0, 400.0),
            max_health: 100.0,
            move_speed: 3.0,
            movement_bounds: None,

            projectile_speed: 6.0,
            projectile_damage: 25.0,
            hit_radius: 10.0,
            shoot_cooldown: Duration::ZERO,

            zone_center: Vec2::new(400.0, 300.0),
            zone_initial_radius: 250.0,
            zone_min_radius: 100.0,
            zone_shrink_rate: 0.2,
            zone_shrink_delay: Duration::from_secs(10),
            zone_damage: 0.3,

            projectile_tick_hz: crate::util::time::PROJECTILE_TPS,
            zone_tick_hz: crate::util::time::ZONE_TPS,

            rng_seed: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server address format")]
    InvalidAddress,

    #[error("Invalid configuration value: {0}")]
    Invalid(&'static str),
}
