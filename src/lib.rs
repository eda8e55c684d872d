//! Fighter Engine - authoritative simulation core for a two-player 2D fighter
//!
//! The `game` module is the headless simulation: character state machine,
//! action spawner, hitbox/projectile lifecycle, collision resolution and the
//! round controller. The remaining modules host it:
//! - a tokio tick loop that drains front-end commands and publishes snapshots
//! - a local HTTP/WebSocket bridge for a renderer and keyboard front-end

pub mod app;
pub mod config;
pub mod game;
pub mod http;
pub mod util;
pub mod ws;
