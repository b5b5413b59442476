// Protocol events for client-server communication.
//
// Two enums define the full protocol vocabulary:
// - `ClientEvent`: sent by game clients to the server.
// - `ServerEvent`: sent by the server to game clients.
//
// Every event travels as a `{"type": ..., "data": ...}` envelope where `type`
// is the event kind and `data` carries the kind-specific payload, omitted for
// events that carry none. The serde adjacently-tagged representation produces
// exactly this shape, so the enums below *are* the wire schema. A payload
// that does not match its declared type fails deserialization of that one
// envelope; the reader drops the event and keeps the connection.
//
// `Move` and `RoundOutcome` are shared value types. The dominance relation
// between moves lives in the server's `rules` module — the protocol crate is
// pure vocabulary.

use serde::{Deserialize, Serialize};

use crate::types::GameId;

/// A participant's move in a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

/// Outcome of a round from one side's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Win,
    Lose,
    Tie,
}

/// Events sent by a client to the server.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Enter matchmaking: wait for a partner, or pair with one already waiting.
    FindPartner,
    /// Submit a move for the current round.
    MoveSubmitted {
        #[serde(rename = "move")]
        mv: Move,
    },
    /// Request a rematch in the current game.
    PlayAgain,
    /// Leave the current game (or stop waiting for a partner).
    LeaveGame,
}

/// Events sent by the server to a client.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A partner was found and a game session created.
    PartnerFound { game_id: GameId },
    /// A round is starting — submit a move.
    StartGame,
    /// Both moves are in; results follow. Informational.
    BothMovesReceived,
    /// Round results from the receiving side's perspective.
    GameResults {
        your_move: Move,
        opponent_move: Move,
        result: RoundOutcome,
    },
}
