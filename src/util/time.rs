//! Time utilities for game simulation

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Server start time for uptime tracking
static SERVER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize server start time (call once at startup)
pub fn init_server_time() {
    SERVER_START.get_or_init(Instant::now);
}

/// Get server uptime in seconds
pub fn uptime_secs() -> u64 {
    SERVER_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

/// Tick rate configuration
pub const PROJECTILE_TPS: u32 = 30; // projectile integration and hit detection
pub const ZONE_TPS: u32 = 10; // zone shrink and zone damage

/// Milliseconds elapsed between `start` and `now`, zero if `now` is earlier
pub fn elapsed_millis(start: Instant, now: Instant) -> u128 {
    now.saturating_duration_since(start).as_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_never_negative() {
        let start = Instant::now();
        let later = start + Duration::from_millis(250);
        assert_eq!(elapsed_millis(start, later), 250);
        assert_eq!(elapsed_millis(later, start), 0);
    }

    #[test]
    fn uptime_is_zero_before_init_or_small_after() {
        init_server_time();
        assert!(uptime_secs() < 5);
    }
}
