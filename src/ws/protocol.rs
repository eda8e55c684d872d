//! WebSocket protocol message definitions
//! These are the wire types between the engine and a local front-end

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{Controls, MatchCommand, MatchSnapshot, PlayerId, RoundEndCause};

/// Messages sent from front-end to engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Full held-key state for one player
    Controls {
        player: PlayerId,
        controls: Controls,
    },

    /// Start the round
    Start,

    /// Rebuild the round from spawn
    Reset,

    /// Ping for latency measurement
    Ping {
        /// Client timestamp
        t: u64,
    },
}

impl ClientMsg {
    /// Command for the match host, if this message is one
    pub fn into_command(self) -> Option<MatchCommand> {
        match self {
            ClientMsg::Controls { player, controls } => {
                Some(MatchCommand::Controls { player, controls })
            }
            ClientMsg::Start => Some(MatchCommand::Start),
            ClientMsg::Reset => Some(MatchCommand::Reset),
            ClientMsg::Ping { .. } => None,
        }
    }
}

/// Messages sent from engine to front-end
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Welcome message after connection
    Welcome {
        connection_id: Uuid,
        match_id: Uuid,
        server_time: u64,
        tick_rate: u32,
    },

    /// Match state after a tick (sent every tick)
    Snapshot(MatchSnapshot),

    /// Round is running (after start or reset)
    RoundStarted { round: u32 },

    /// Round has ended
    RoundOver {
        winner: PlayerId,
        cause: RoundEndCause,
        player1_health: i32,
        player2_health: i32,
    },

    /// Error message
    Error { code: String, message: String },

    /// Pong response
    Pong {
        /// Echo back client timestamp
        t: u64,
    },
}

impl ServerMsg {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        ServerMsg::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_controls_message() {
        let raw = r#"{"type":"controls","player":"player2","controls":{"left":true,"block":true}}"#;
        let msg: ClientMsg = serde_json::from_str(raw).unwrap();

        let mut expected = Controls::default();
        expected.left = true;
        expected.block = true;
        assert_eq!(
            msg,
            ClientMsg::Controls {
                player: PlayerId::Player2,
                controls: expected
            }
        );
    }

    #[test]
    fn lifecycle_messages_map_to_commands() {
        let start: ClientMsg = serde_json::from_str(r#"{"type":"start"}"#).unwrap();
        assert_eq!(start.into_command(), Some(MatchCommand::Start));

        let reset: ClientMsg = serde_json::from_str(r#"{"type":"reset"}"#).unwrap();
        assert_eq!(reset.into_command(), Some(MatchCommand::Reset));

        let ping: ClientMsg = serde_json::from_str(r#"{"type":"ping","t":42}"#).unwrap();
        assert_eq!(ping.into_command(), None);
    }

    #[test]
    fn rejects_unknown_player() {
        let raw = r#"{"type":"controls","player":"player3","controls":{}}"#;
        assert!(serde_json::from_str::<ClientMsg>(raw).is_err());
    }

    #[test]
    fn round_over_wire_format() {
        let msg = ServerMsg::RoundOver {
            winner: PlayerId::Player1,
            cause: RoundEndCause::Knockout,
            player1_health: 40,
            player2_health: 0,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "round_over");
        assert_eq!(json["winner"], "player1");
        assert_eq!(json["cause"], "knockout");
    }
}
