//! Render snapshots of the match

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::character::Character;
use super::combat::{Attack, GameEvent, Projectile};
use super::r#match::MatchState;
use super::round::RoundPhase;
use super::PlayerId;

/// Immutable copy of the match handed to renderers once per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub match_id: Uuid,
    /// Simulated ticks since the host started
    pub tick: u64,
    pub round: u32,
    /// Whole seconds left on the round clock
    pub time_left: u32,
    pub phase: RoundPhase,
    pub game_over: bool,
    pub winner: Option<PlayerId>,
    pub player1: Character,
    pub player2: Character,
    pub attacks: Vec<Attack>,
    pub projectiles: Vec<Projectile>,
    /// Events that occurred during this tick
    pub events: Vec<GameEvent>,
}

impl MatchSnapshot {
    pub fn capture(state: &MatchState, events: Vec<GameEvent>) -> Self {
        Self {
            match_id: state.id,
            tick: state.tick,
            round: state.round,
            time_left: state.clock.seconds_left(),
            phase: state.phase,
            game_over: state.phase == RoundPhase::RoundOver,
            winner: state.winner,
            player1: state.fighter(PlayerId::Player1).clone(),
            player2: state.fighter(PlayerId::Player2).clone(),
            attacks: state.attacks.clone(),
            projectiles: state.projectiles.clone(),
            events,
        }
    }
}
