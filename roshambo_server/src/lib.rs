// roshambo_server — matchmaking and game arbitration for roshambo.
//
// The server pairs anonymous participants into two-player sessions and
// arbitrates rock-paper-scissors rounds between them over persistent TCP
// connections. It holds at most one waiting player at a time, pairs each new
// arrival with the current waiter, collects exactly one move per member per
// round, resolves rounds deterministically, and supports rematches and
// voluntary teardown.
//
// Module overview:
// - `registry.rs`: Matchmaking registry — waiting slot, live games, player
//                  roster, and the per-round move state. The core data
//                  structure that `server.rs` drives.
// - `rules.rs`:    Pure round resolution (`outcome`).
// - `server.rs`:   TCP listener, reader threads (one per client), and the
//                  shared `Mutex<Registry>` they dispatch into.
// - `error.rs`:    Outbound send-path error type.
//
// Dependencies: `roshambo_protocol` (shared event types and framing).
//
// The server can run as a standalone binary (`main.rs`) or be embedded in
// another process via the library API (`start_server`) — the integration
// tests use the latter.

pub mod error;
pub mod registry;
pub mod rules;
pub mod server;

pub use server::start_server;
