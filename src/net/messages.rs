//! Wire message types for the match protocol.
//!
//! Every frame on the wire is one of these, JSON-encoded behind a length
//! prefix (see [`crate::net::codec`]). Positions travel as file+rank
//! notation ("e4"), boards as FEN, pieces and colors as lowercase names.

use serde::{Deserialize, Serialize};

use crate::engine::types::{Color, PieceType};

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// Messages a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Request a new match; the creator is seated as White.
    StartMatch,
    /// Request to join a pending match; the joiner is seated as Black.
    #[serde(rename_all = "camelCase")]
    JoinMatch { match_id: String },
    /// Propose a move.
    #[serde(rename_all = "camelCase")]
    Turn {
        piece: PieceType,
        from: String,
        to: String,
        color: Color,
        is_capture: bool,
        match_id: String,
    },
    /// Concede the match.
    #[serde(rename_all = "camelCase")]
    Resign { match_id: String, player: Color },
    /// Answer to a server heartbeat ping.
    #[serde(rename_all = "camelCase")]
    HeartbeatReply { match_id: String },
    /// Orderly departure.
    #[serde(rename_all = "camelCase")]
    Disconnect { match_id: String, player: Color },
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// Messages the server may send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Answer to StartMatch: the new match ID and the creator's seat.
    #[serde(rename_all = "camelCase")]
    StartMatchReply {
        success: bool,
        match_id: String,
        board: String,
        color: Color,
    },
    /// Answer to JoinMatch. On failure `board` is empty and `color` absent.
    #[serde(rename_all = "camelCase")]
    JoinMatchReply {
        success: bool,
        board: String,
        color: Option<Color>,
        match_id: String,
    },
    /// Both seats are filled; play begins.
    OpponentConnected,
    /// Liveness ping; clients answer with HeartbeatReply.
    #[serde(rename_all = "camelCase")]
    Heartbeat { match_id: String },
    /// Result of a proposed move. Broadcast to both seats on success,
    /// sent to the offending seat alone on rejection.
    #[serde(rename_all = "camelCase")]
    TurnReply {
        success: bool,
        board: String,
        game_over: bool,
        winner: Option<Color>,
        match_id: String,
    },
    /// The opponent resigned; the recipient wins.
    #[serde(rename_all = "camelCase")]
    OpponentResigned { match_id: String },
    /// The opponent dropped; the recipient wins.
    #[serde(rename_all = "camelCase")]
    OpponentDisconnected { match_id: String },
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

impl ServerMessage {
    pub fn start_reply(match_id: &str, board: &str) -> Self {
        ServerMessage::StartMatchReply {
            success: true,
            match_id: match_id.to_string(),
            board: board.to_string(),
            color: Color::White,
        }
    }

    pub fn join_accepted(match_id: &str, board: &str) -> Self {
        ServerMessage::JoinMatchReply {
            success: true,
            board: board.to_string(),
            color: Some(Color::Black),
            match_id: match_id.to_string(),
        }
    }

    pub fn join_rejected(match_id: &str) -> Self {
        ServerMessage::JoinMatchReply {
            success: false,
            board: String::new(),
            color: None,
            match_id: match_id.to_string(),
        }
    }

    pub fn heartbeat(match_id: &str) -> Self {
        ServerMessage::Heartbeat {
            match_id: match_id.to_string(),
        }
    }

    pub fn turn_accepted(match_id: &str, board: &str, game_over: bool, winner: Option<Color>) -> Self {
        ServerMessage::TurnReply {
            success: true,
            board: board.to_string(),
            game_over,
            winner,
            match_id: match_id.to_string(),
        }
    }

    pub fn turn_rejected(match_id: &str, board: &str) -> Self {
        ServerMessage::TurnReply {
            success: false,
            board: board.to_string(),
            game_over: false,
            winner: None,
            match_id: match_id.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_match_round_trip() {
        let json = serde_json::to_string(&ClientMessage::StartMatch).unwrap();
        assert_eq!(json, r#"{"type":"start_match"}"#);
        let parsed: ClientMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ClientMessage::StartMatch);
    }

    #[test]
    fn turn_message_field_names() {
        let msg = ClientMessage::Turn {
            piece: PieceType::Pawn,
            from: "e2".into(),
            to: "e4".into(),
            color: Color::White,
            is_capture: false,
            match_id: "ab12cd".into(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "turn");
        assert_eq!(value["piece"], "pawn");
        assert_eq!(value["isCapture"], false);
        assert_eq!(value["matchId"], "ab12cd");
        assert_eq!(serde_json::from_str::<ClientMessage>(&json).unwrap(), msg);
    }

    #[test]
    fn join_match_deserializes() {
        let json = r#"{"type":"join_match","matchId":"xy98zw"}"#;
        let parsed: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed,
            ClientMessage::JoinMatch {
                match_id: "xy98zw".into()
            }
        );
    }

    #[test]
    fn heartbeat_reply_round_trip() {
        let msg = ClientMessage::HeartbeatReply {
            match_id: "m1".into(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(serde_json::from_str::<ClientMessage>(&json).unwrap(), msg);
    }

    #[test]
    fn unknown_message_type_is_an_error() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"launch_missiles"}"#).is_err());
    }

    #[test]
    fn start_reply_serializes() {
        let msg = ServerMessage::start_reply("m1", "somefen");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "start_match_reply");
        assert_eq!(value["success"], true);
        assert_eq!(value["color"], "white");
        assert_eq!(value["board"], "somefen");
    }

    #[test]
    fn join_rejected_has_no_color() {
        let value = serde_json::to_value(ServerMessage::join_rejected("nope42")).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["color"], serde_json::Value::Null);
        assert_eq!(value["board"], "");
    }

    #[test]
    fn turn_reply_with_winner() {
        let msg = ServerMessage::turn_accepted("m1", "fen", true, Some(Color::Black));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["gameOver"], true);
        assert_eq!(value["winner"], "black");
        let rejected = serde_json::to_value(ServerMessage::turn_rejected("m1", "fen")).unwrap();
        assert_eq!(rejected["success"], false);
        assert_eq!(rejected["winner"], serde_json::Value::Null);
    }

    #[test]
    fn opponent_events_round_trip() {
        for msg in [
            ServerMessage::OpponentConnected,
            ServerMessage::OpponentResigned {
                match_id: "m1".into(),
            },
            ServerMessage::OpponentDisconnected {
                match_id: "m1".into(),
            },
        ] {
            let json = serde_json::to_string(&msg).unwrap();
            assert_eq!(serde_json::from_str::<ServerMessage>(&json).unwrap(), msg);
        }
    }
}
