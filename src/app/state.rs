//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::game::{GameMatch, MatchHandle};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub match_handle: MatchHandle,
}

impl AppState {
    /// Build the state together with the match it talks to. The caller spawns
    /// the returned [`GameMatch`].
    pub fn new(config: Config) -> (Self, GameMatch) {
        let config = Arc::new(config);
        let (game_match, match_handle) = GameMatch::new(config.game.clone());

        let state = Self {
            config,
            match_handle,
        };
        (state, game_match)
    }
}
