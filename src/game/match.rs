//! Match actor and authoritative tick loop

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::GameConfig;

use super::geometry::Direction;
use super::snapshot::{Outbound, SnapshotBuilder};
use super::world::World;
use super::{combat, lifecycle, movement, zone, MatchCommand};

const COMMAND_QUEUE: usize = 256;
const OUTBOUND_QUEUE: usize = 256;

/// Handle to the running match
#[derive(Clone)]
pub struct MatchHandle {
    pub input_tx: mpsc::Sender<MatchCommand>,
    pub outbound_tx: broadcast::Sender<Outbound>,
    pub player_count: Arc<AtomicUsize>,
}

impl MatchHandle {
    pub fn player_count(&self) -> usize {
        self.player_count.load(Ordering::Relaxed)
    }

    /// Subscribe to everything the match publishes. Unicasts for other
    /// players must be filtered by the receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<Outbound> {
        self.outbound_tx.subscribe()
    }
}

/// The authoritative game match. Owns the world; every mutation happens on
/// the task running [`GameMatch::run`].
pub struct GameMatch {
    world: World,
    input_rx: mpsc::Receiver<MatchCommand>,
    outbound_tx: broadcast::Sender<Outbound>,
    player_count: Arc<AtomicUsize>,
    out: Vec<Outbound>,
}

impl GameMatch {
    pub fn new(config: GameConfig) -> (Self, MatchHandle) {
        let (input_tx, input_rx) = mpsc::channel(COMMAND_QUEUE);
        let (outbound_tx, _) = broadcast::channel(OUTBOUND_QUEUE);
        let player_count = Arc::new(AtomicUsize::new(0));

        let handle = MatchHandle {
            input_tx,
            outbound_tx: outbound_tx.clone(),
            player_count: player_count.clone(),
        };

        let game_match = Self {
            world: World::new(config, now()),
            input_rx,
            outbound_tx,
            player_count,
            out: Vec::new(),
        };

        (game_match, handle)
    }

    /// Run until every command sender is gone
    pub async fn run(mut self) {
        info!(
            projectile_tps = self.world.config.projectile_tick_hz,
            zone_tps = self.world.config.zone_tick_hz,
            "Match started"
        );

        let mut projectile_interval = interval(self.world.config.projectile_tick());
        projectile_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut zone_interval = interval(self.world.config.zone_tick());
        zone_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                cmd = self.input_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = projectile_interval.tick() => {
                    let hits = combat::tick(&mut self.world, now(), &mut self.out);
                    let kills = hits.iter().filter(|h| h.target_killed).count();
                    if kills > 0 {
                        debug!(
                            hits = hits.len(),
                            kills,
                            players = self.world.player_count(),
                            "Projectile tick eliminated players"
                        );
                    }
                }
                _ = zone_interval.tick() => {
                    zone::tick(&mut self.world, now(), &mut self.out);
                }
            }
            self.flush();
        }

        info!("All match handles dropped, stopping match");
    }

    fn handle_command(&mut self, cmd: MatchCommand) {
        match cmd {
            MatchCommand::Join { player_id } => {
                lifecycle::connect(&mut self.world, player_id, &mut self.out);
            }
            MatchCommand::Leave { player_id } => {
                lifecycle::disconnect(&mut self.world, player_id, now(), &mut self.out);
            }
            MatchCommand::Move { player_id, dx, dy } => {
                match movement::apply_move(&mut self.world, player_id, dx, dy) {
                    Ok(()) => self
                        .out
                        .push(Outbound::Broadcast(SnapshotBuilder::players(&self.world))),
                    Err(e) => debug!(user_id = %player_id, error = %e, "Move dropped"),
                }
            }
            MatchCommand::Shoot { player_id, dx, dy } => {
                let fired = Direction::new(dx, dy)
                    .and_then(|dir| combat::spawn(&mut self.world, player_id, dir, now()));
                if let Err(e) = fired {
                    debug!(user_id = %player_id, error = %e, "Shot dropped");
                }
            }
        }
    }

    /// Publish everything produced since the last flush
    fn flush(&mut self) {
        self.player_count
            .store(self.world.player_count(), Ordering::Relaxed);
        for msg in self.out.drain(..) {
            // No receivers is fine: nobody is connected
            let _ = self.outbound_tx.send(msg);
        }
    }
}

/// Current time on the tokio clock, so paused-time tests drive the world too.
fn now() -> std::time::Instant {
    Instant::now().into_std()
}
