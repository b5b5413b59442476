// Core ID types for the matchmaking protocol.
//
// These are lightweight newtypes used by both `message.rs` (protocol events)
// and the server's matchmaking registry (`roshambo_server::registry`). The
// server assigns compact integer IDs on connection accept and game creation;
// they are process-lifetime scoped and carry no identity beyond that.

use serde::{Deserialize, Serialize};

/// Server-assigned participant ID (compact u32, unique per process lifetime).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Server-assigned game session ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub u64);
