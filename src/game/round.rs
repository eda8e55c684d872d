//! Round phases, countdown clock and winner decision

use serde::{Deserialize, Serialize};

use super::character::Character;
use super::PlayerId;

/// Seconds on the clock at the start of a round
pub const ROUND_TIME_SECS: u32 = 99;

/// Round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// Waiting for the start trigger
    NotStarted,
    /// Fighters are live
    Running,
    /// Winner decided, waiting for reset
    RoundOver,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundEndCause {
    Knockout,
    TimeUp,
}

/// Whole-second countdown fed with wall-clock deltas.
///
/// Fractions carry over between calls so the clock does not drift with
/// the frame rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundClock {
    seconds_left: u32,
    accumulated: f32,
}

impl RoundClock {
    pub fn new(seconds: u32) -> Self {
        Self {
            seconds_left: seconds,
            accumulated: 0.0,
        }
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    /// Feed elapsed seconds, returns true once the clock has hit zero
    pub fn advance(&mut self, dt: f32) -> bool {
        if dt.is_finite() && dt > 0.0 {
            self.accumulated += dt;
        }

        while self.accumulated >= 1.0 && self.seconds_left > 0 {
            self.accumulated -= 1.0;
            self.seconds_left -= 1;
        }

        self.seconds_left == 0
    }
}

impl Default for RoundClock {
    fn default() -> Self {
        Self::new(ROUND_TIME_SECS)
    }
}

/// Higher health wins. On an exact tie the fighter further right wins.
pub fn decide_winner(player1: &Character, player2: &Character) -> PlayerId {
    if player1.health > player2.health {
        PlayerId::Player1
    } else if player2.health > player1.health {
        PlayerId::Player2
    } else if player1.x < player2.x {
        PlayerId::Player2
    } else {
        PlayerId::Player1
    }
}
