//! Zone Royale server library.
//!
//! Authoritative simulation for a top-down shrinking-zone battle royale,
//! plus the WebSocket/HTTP shell around it.

pub mod app;
pub mod config;
pub mod game;
pub mod http;
pub mod util;
pub mod ws;
