//! Fighter simulation modules

pub mod character;
pub mod combat;
pub mod lifecycle;
pub mod r#match;
pub mod physics;
pub mod round;
pub mod snapshot;
pub mod spawner;
pub mod timer;

pub use character::{ActionState, Character, Facing};
pub use combat::{Attack, AttackKind, GameEvent, Projectile, ProjectileKind};
pub use r#match::{GameMatch, MatchHandle, MatchState};
pub use round::{RoundEndCause, RoundPhase};
pub use snapshot::MatchSnapshot;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed seat of a fighter. Stored on every character and transient entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerId {
    Player1,
    Player2,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::Player1, PlayerId::Player2];

    pub fn opponent(self) -> Self {
        match self {
            PlayerId::Player1 => PlayerId::Player2,
            PlayerId::Player2 => PlayerId::Player1,
        }
    }

    /// Slot in two-element per-player arrays
    pub fn index(self) -> usize {
        match self {
            PlayerId::Player1 => 0,
            PlayerId::Player2 => 1,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerId::Player1 => f.write_str("player1"),
            PlayerId::Player2 => f.write_str("player2"),
        }
    }
}

/// Held-key state for one player. Level-triggered: a flag stays true
/// for as long as the key is down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub punch: bool,
    pub kick: bool,
    pub special: bool,
    pub block: bool,
}

/// Input snapshot for both players, read once at the start of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub player1: Controls,
    pub player2: Controls,
}

impl TickInput {
    pub fn for_player(&self, player: PlayerId) -> &Controls {
        match player {
            PlayerId::Player1 => &self.player1,
            PlayerId::Player2 => &self.player2,
        }
    }

    pub fn for_player_mut(&mut self, player: PlayerId) -> &mut Controls {
        match player {
            PlayerId::Player1 => &mut self.player1,
            PlayerId::Player2 => &mut self.player2,
        }
    }
}

/// Commands the match host accepts from the front-end bridge
#[derive(Debug, Clone, PartialEq)]
pub enum MatchCommand {
    /// Replace the held controls of one player
    Controls { player: PlayerId, controls: Controls },
    /// NotStarted -> Running
    Start,
    /// Rebuild the round from spawn
    Reset,
    /// The sending connection went away; release whatever it was holding
    Disconnect,
}

/// Command received from a front-end connection
#[derive(Debug, Clone)]
pub struct PlayerInput {
    pub connection_id: Uuid,
    pub command: MatchCommand,
    pub received_at: u64,
}
