//! Combat system - projectiles, damage, hit detection

use std::time::Instant;
use tracing::debug;

use super::geometry::{Direction, Vec2};
use super::lifecycle;
use super::snapshot::{Outbound, SnapshotBuilder};
use super::world::World;
use super::{InputError, PlayerId};

/// Active projectile in the game
#[derive(Debug, Clone)]
pub struct Projectile {
    pub owner: PlayerId,
    pub position: Vec2,
    /// Fixed at spawn, unit length
    pub direction: Direction,
}

impl Projectile {
    pub fn new(owner: PlayerId, position: Vec2, direction: Direction) -> Self {
        Self {
            owner,
            position,
            direction,
        }
    }

    /// Advance one projectile tick
    pub fn update(&mut self, speed: f64) {
        self.position += self.direction.as_vec() * speed;
    }

    /// Strictly inside the hit radius counts as a hit
    pub fn check_hit(&self, target: Vec2, hit_radius: f64) -> bool {
        self.position.distance(target) < hit_radius
    }
}

/// Hit result from combat resolution
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    pub shooter_id: PlayerId,
    pub target_id: PlayerId,
    pub target_health: f64,
    pub target_killed: bool,
}

/// Apply damage to health, returns (new_health, is_dead)
pub fn apply_damage(current_health: f64, damage: f64) -> (f64, bool) {
    let new_health = current_health - damage;
    (new_health, new_health <= 0.0)
}

/// Fire a projectile from the owner's current position.
pub fn spawn(
    world: &mut World,
    owner: PlayerId,
    direction: Direction,
    now: Instant,
) -> Result<(), InputError> {
    let cooldown = world.config.shoot_cooldown;
    let player = world
        .player_mut(owner)
        .ok_or(InputError::UnknownPlayer(owner))?;

    if !cooldown.is_zero() {
        if let Some(last) = player.last_shot_at {
            if now.saturating_duration_since(last) < cooldown {
                return Err(InputError::ShootCooldown);
            }
        }
    }
    player.last_shot_at = Some(now);

    let origin = player.position;
    world
        .projectiles
        .push(Projectile::new(owner, origin, direction));
    Ok(())
}

/// One projectile tick: integrate, resolve hits, drop spent projectiles and
/// publish the projectile list.
pub fn tick(world: &mut World, now: Instant, out: &mut Vec<Outbound>) -> Vec<HitResult> {
    let speed = world.config.projectile_speed;
    let damage = world.config.projectile_damage;
    let hit_radius = world.config.hit_radius;

    for projectile in world.projectiles.iter_mut() {
        projectile.update(speed);
    }

    // Mark-and-compact: indices stay valid while hits remove players.
    let mut spent = vec![false; world.projectiles.len()];
    let mut hits = Vec::new();
    let targets = world.player_ids();

    for (idx, flag) in spent.iter_mut().enumerate() {
        // A kill that empties the world resets it and clears every projectile
        let Some(projectile) = world.projectiles.get(idx).cloned() else {
            break;
        };
        let owner = projectile.owner;

        for target_id in targets.iter().copied() {
            if target_id == owner {
                continue;
            }
            // Eliminated earlier this tick
            let Some(target) = world.player_mut(target_id) else {
                continue;
            };
            if !projectile.check_hit(target.position, hit_radius) {
                continue;
            }

            let (new_health, killed) = apply_damage(target.health, damage);
            target.health = new_health;
            *flag = true;

            debug!(
                shooter_id = %owner,
                target_id = %target_id,
                target_health = new_health,
                "Projectile hit"
            );
            hits.push(HitResult {
                shooter_id: owner,
                target_id,
                target_health: new_health,
                target_killed: killed,
            });

            if killed {
                lifecycle::eliminate(world, target_id, Some(owner), now, out);
            }
            break;
        }
    }

    if world.projectiles.len() == spent.len() {
        let mut flags = spent.into_iter();
        world
            .projectiles
            .retain(|p| !flags.next().unwrap_or(false) && p.position.in_positive_quadrant());
    }

    out.push(Outbound::Broadcast(SnapshotBuilder::bullets(world)));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::ws::protocol::ServerMsg;
    use std::time::Duration;
    use uuid::Uuid;

    fn test_world() -> World {
        World::new(
            GameConfig {
                rng_seed: Some(3),
                ..Default::default()
            },
            Instant::now(),
        )
    }

    fn place(world: &mut World, x: f64, y: f64) -> PlayerId {
        let id = Uuid::new_v4();
        world.add_player(id);
        world.player_mut(id).unwrap().position = Vec2::new(x, y);
        id
    }

    fn east() -> Direction {
        Direction::new(1.0, 0.0).unwrap()
    }

    #[test]
    fn spawn_starts_at_owner_position() {
        let mut world = test_world();
        let shooter = place(&mut world, 50.0, 60.0);
        spawn(&mut world, shooter, east(), Instant::now()).unwrap();

        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.projectiles[0].position, Vec2::new(50.0, 60.0));
        assert_eq!(world.projectiles[0].owner, shooter);
    }

    #[test]
    fn spawn_requires_existing_owner() {
        let mut world = test_world();
        let ghost = Uuid::new_v4();
        assert!(matches!(
            spawn(&mut world, ghost, east(), Instant::now()),
            Err(InputError::UnknownPlayer(_))
        ));
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn projectiles_advance_by_direction_times_speed() {
        let mut world = test_world();
        let shooter = place(&mut world, 100.0, 100.0);
        let dir = Direction::new(3.0, 4.0).unwrap();
        spawn(&mut world, shooter, dir, Instant::now()).unwrap();

        let mut out = Vec::new();
        for step in 1..=5 {
            tick(&mut world, Instant::now(), &mut out);
            let p = world.projectiles[0].position;
            assert!((p.x - (100.0 + 0.6 * 6.0 * step as f64)).abs() < 1e-9);
            assert!((p.y - (100.0 + 0.8 * 6.0 * step as f64)).abs() < 1e-9);
        }
    }

    #[test]
    fn hit_deals_damage_and_removes_projectile() {
        let mut world = test_world();
        let shooter = place(&mut world, 100.0, 100.0);
        let target = place(&mut world, 105.0, 100.0);
        spawn(&mut world, shooter, east(), Instant::now()).unwrap();

        let mut out = Vec::new();
        let hits = tick(&mut world, Instant::now(), &mut out);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target_id, target);
        assert_eq!(world.player(target).unwrap().health, 75.0);
        assert!(world.projectiles.is_empty());
        assert!(matches!(
            out.last(),
            Some(Outbound::Broadcast(ServerMsg::UpdateBullets { bullets })) if bullets.is_empty()
        ));
    }

    #[test]
    fn owner_is_never_hit() {
        let mut world = test_world();
        let shooter = place(&mut world, 100.0, 100.0);
        spawn(&mut world, shooter, east(), Instant::now()).unwrap();
        let mut out = Vec::new();
        let hits = tick(&mut world, Instant::now(), &mut out);
        assert!(hits.is_empty());
        assert_eq!(world.player(shooter).unwrap().health, 100.0);
        assert_eq!(world.projectiles.len(), 1);
    }

    #[test]
    fn projectile_hits_at_most_one_player() {
        let mut world = test_world();
        let shooter = place(&mut world, 100.0, 100.0);
        let a = place(&mut world, 106.0, 100.0);
        let b = place(&mut world, 106.0, 101.0);
        spawn(&mut world, shooter, east(), Instant::now()).unwrap();

        let mut out = Vec::new();
        let hits = tick(&mut world, Instant::now(), &mut out);

        assert_eq!(hits.len(), 1);
        let total: f64 = [a, b]
            .iter()
            .map(|id| world.player(*id).unwrap().health)
            .sum();
        assert_eq!(total, 175.0);
    }

    #[test]
    fn two_projectiles_same_tick_both_resolve() {
        let mut world = test_world();
        let shooter = place(&mut world, 100.0, 100.0);
        let target = place(&mut world, 104.0, 100.0);
        spawn(&mut world, shooter, east(), Instant::now()).unwrap();
        spawn(&mut world, shooter, east(), Instant::now()).unwrap();

        let mut out = Vec::new();
        let hits = tick(&mut world, Instant::now(), &mut out);
        assert_eq!(hits.len(), 2);
        assert_eq!(world.player(target).unwrap().health, 50.0);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn killed_player_is_not_hit_again_in_same_tick() {
        let mut world = test_world();
        let shooter = place(&mut world, 100.0, 100.0);
        let other = place(&mut world, 300.0, 300.0);
        let target = place(&mut world, 104.0, 100.0);
        world.player_mut(target).unwrap().health = 25.0;
        spawn(&mut world, shooter, east(), Instant::now()).unwrap();
        spawn(&mut world, shooter, east(), Instant::now()).unwrap();

        let mut out = Vec::new();
        let hits = tick(&mut world, Instant::now(), &mut out);

        assert_eq!(hits.len(), 1);
        assert!(hits[0].target_killed);
        assert!(world.player(target).is_none());
        assert_eq!(world.kills[&shooter], 1);
        // The second projectile flew on
        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.player(other).unwrap().health, 100.0);
    }

    #[test]
    fn orphaned_projectile_killing_last_player_resets_world() {
        let mut world = test_world();
        let shooter = place(&mut world, 100.0, 100.0);
        let target = place(&mut world, 104.0, 100.0);
        world.player_mut(target).unwrap().health = 10.0;
        spawn(&mut world, shooter, east(), Instant::now()).unwrap();
        spawn(&mut world, shooter, east(), Instant::now()).unwrap();
        world.remove_player(shooter);

        let mut out = Vec::new();
        let hits = tick(&mut world, Instant::now(), &mut out);

        assert_eq!(hits.len(), 1);
        assert_eq!(world.player_count(), 0);
        assert!(world.projectiles.is_empty());
        assert!(world.kills.is_empty());
    }

    #[test]
    fn leaving_quadrant_despawns() {
        let mut world = test_world();
        let shooter = place(&mut world, 4.0, 50.0);
        spawn(&mut world, shooter, Direction::new(-1.0, 0.0).unwrap(), Instant::now()).unwrap();
        let mut out = Vec::new();
        tick(&mut world, Instant::now(), &mut out);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn far_positive_coordinates_do_not_despawn() {
        let mut world = test_world();
        let shooter = place(&mut world, 100.0, 100.0);
        spawn(&mut world, shooter, east(), Instant::now()).unwrap();
        world.projectiles[0].position = Vec2::new(1.0e6, 100.0);
        let mut out = Vec::new();
        tick(&mut world, Instant::now(), &mut out);
        assert_eq!(world.projectiles.len(), 1);
    }

    #[test]
    fn cooldown_limits_fire_rate_when_enabled() {
        let mut world = World::new(
            GameConfig {
                shoot_cooldown: Duration::from_millis(500),
                ..Default::default()
            },
            Instant::now(),
        );
        let shooter = place(&mut world, 100.0, 100.0);
        let t0 = Instant::now();

        spawn(&mut world, shooter, east(), t0).unwrap();
        assert!(matches!(
            spawn(&mut world, shooter, east(), t0 + Duration::from_millis(100)),
            Err(InputError::ShootCooldown)
        ));
        spawn(&mut world, shooter, east(), t0 + Duration::from_millis(500)).unwrap();
        assert_eq!(world.projectiles.len(), 2);
    }

    #[test]
    fn four_hits_eliminate_and_last_one_wins() {
        let mut world = test_world();
        let p1 = place(&mut world, 100.0, 100.0);
        let p2 = place(&mut world, 105.0, 100.0);
        let mut out = Vec::new();

        for shot in 1..=4 {
            spawn(&mut world, p1, east(), Instant::now()).unwrap();
            tick(&mut world, Instant::now(), &mut out);
            if shot < 4 {
                assert_eq!(world.player(p2).unwrap().health, 100.0 - 25.0 * shot as f64);
                assert_eq!(world.kills[&p1], 0);
            }
        }

        assert!(world.player(p2).is_none());
        assert_eq!(world.kills[&p1], 1);
        assert!(out.iter().any(|o| matches!(
            o,
            Outbound::Unicast { to, msg: ServerMsg::PlayerEliminated } if *to == p2
        )));
        assert!(out.iter().any(|o| matches!(
            o,
            Outbound::Unicast { to, msg: ServerMsg::PlayerWon } if *to == p1
        )));
    }
}
