// roshambo_protocol — wire protocol for client-server communication.
//
// This crate defines the event types, framing, and serialization used by the
// matchmaking server (`roshambo_server`) and game clients to communicate over
// TCP. It is shared between both sides and has no dependency on the server's
// registry or the interactive client.
//
// Module overview:
// - `types.rs`:    Core ID types — `PlayerId`, `GameId`.
// - `message.rs`:  Client-to-server and server-to-client event enums, plus
//                  the shared `Move` and `RoundOutcome` value types.
// - `framing.rs`:  Length-delimited framing over any `Read`/`Write` stream:
//                  4-byte big-endian length prefix, then JSON payload.
//
// Design decisions:
// - **JSON serialization.** Events are tiny and human-readable wire data aids
//   debugging. Binary framing can be swapped in later if bandwidth matters.
// - **Envelope shape on the wire.** Every event serializes as
//   `{"type": <kind>, "data": <payload>}` with `data` omitted for events
//   that carry none — the serde adjacently-tagged enum representation.
// - **No async runtime.** Uses `std::io::Read`/`Write` for framing,
//   compatible with both blocking TCP streams and buffered wrappers.

pub mod framing;
pub mod message;
pub mod types;

pub use framing::{MAX_MESSAGE_SIZE, read_message, write_message};
pub use message::{ClientEvent, Move, RoundOutcome, ServerEvent};
pub use types::{GameId, PlayerId};
