// Matchmaking registry and per-game round state.
//
// `Registry` is the central data structure that `server.rs` drives. It owns
// the single waiting-participant slot, the live game sessions, and the
// connected-player roster. Every reader thread dispatches into it through a
// shared `Mutex`, so all operations here are short, non-blocking (besides the
// outbound writes), and free of interior locking — the mutex in `server.rs`
// totally orders them.
//
// Key responsibilities:
// - Matchmaking: hold at most one waiting player; pair each new
//   `find_partner` arrival with the current waiter.
// - Round state: collect exactly one move per member per round, resolve via
//   `rules::outcome` when the second move lands, clear the move map.
// - Teardown: remove a game when either member leaves or disconnects; clear
//   the waiting slot when the waiter goes away.
//
// Games reference their members by `PlayerId` only. Dispatch looks the ID up
// in the live-player roster, so a member that has disconnected is naturally
// "not found" rather than a dangling reference.
//
// Writing to client streams: the registry holds cloned `TcpStream` write
// halves wrapped in `BufWriter`. The `send_to` helper serializes a
// `ServerEvent` to JSON, frames it, and writes it out. Write errors on a
// single client are logged but never propagated — the reader thread for that
// client will detect the broken pipe and trigger `remove_player`.

use std::collections::BTreeMap;
use std::io::BufWriter;
use std::net::TcpStream;

use roshambo_protocol::framing::write_message;
use roshambo_protocol::message::{Move, ServerEvent};
use roshambo_protocol::types::{GameId, PlayerId};
use tracing::{debug, info, warn};

use crate::error::SendError;
use crate::rules;

/// Matchmaking registry for a single server process.
pub struct Registry {
    waiting: Option<PlayerId>,
    games: BTreeMap<GameId, Game>,
    players: BTreeMap<PlayerId, PlayerState>,
    // Direct player-to-game index so session lookup is O(1) instead of a
    // scan over live games. Maintained together with `games` on pairing and
    // teardown.
    game_index: BTreeMap<PlayerId, GameId>,
    next_player_id: u32,
    next_game_id: u64,
}

struct PlayerState {
    writer: BufWriter<TcpStream>,
}

/// A live two-player game session. Members are non-owning `PlayerId`s; the
/// per-round move map holds at most one entry per member and is cleared
/// after each resolution.
struct Game {
    members: [PlayerId; 2],
    moves: BTreeMap<PlayerId, Move>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            waiting: None,
            games: BTreeMap::new(),
            players: BTreeMap::new(),
            game_index: BTreeMap::new(),
            next_player_id: 0,
            next_game_id: 0,
        }
    }

    /// Register a freshly accepted connection. Returns the assigned player ID,
    /// which tags the reader thread for this connection so that subsequent
    /// dispatches carry the correct identity.
    pub fn add_player(&mut self, stream: TcpStream) -> PlayerId {
        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        self.players.insert(
            id,
            PlayerState {
                writer: BufWriter::new(stream),
            },
        );
        info!(player = id.0, "player connected");
        id
    }

    /// Enter matchmaking. With no waiter, the caller becomes the waiting
    /// player; otherwise the waiting slot is cleared and a game is created
    /// atomically, and both members receive `partner_found` then
    /// `start_game`.
    pub fn find_partner(&mut self, player_id: PlayerId) {
        if self.game_index.contains_key(&player_id) {
            warn!(player = player_id.0, "find_partner while in a game, ignoring");
            return;
        }
        let Some(waiter) = self.waiting else {
            self.waiting = Some(player_id);
            info!(player = player_id.0, "waiting for a partner");
            return;
        };
        if waiter == player_id {
            warn!(player = player_id.0, "find_partner while already waiting, ignoring");
            return;
        }

        self.waiting = None;
        let game_id = GameId(self.next_game_id);
        self.next_game_id += 1;
        self.games.insert(
            game_id,
            Game {
                members: [waiter, player_id],
                moves: BTreeMap::new(),
            },
        );
        self.game_index.insert(waiter, game_id);
        self.game_index.insert(player_id, game_id);

        for id in [waiter, player_id] {
            self.send_to(id, &ServerEvent::PartnerFound { game_id });
        }
        for id in [waiter, player_id] {
            self.send_to(id, &ServerEvent::StartGame);
        }
        info!(
            game = game_id.0,
            a = waiter.0,
            b = player_id.0,
            "game started"
        );
    }

    /// Record a move for the current round. Dropped (logged) when the player
    /// has no live game or has already moved this round — the first recorded
    /// move is never overwritten. When the second move lands, the round is
    /// resolved and results go out to both members.
    pub fn submit_move(&mut self, player_id: PlayerId, mv: Move) {
        let Some(&game_id) = self.game_index.get(&player_id) else {
            warn!(player = player_id.0, "move submitted with no active game, dropping");
            return;
        };
        let Some(game) = self.games.get_mut(&game_id) else {
            warn!(player = player_id.0, game = game_id.0, "game missing from table, dropping move");
            return;
        };
        if game.moves.contains_key(&player_id) {
            warn!(
                player = player_id.0,
                game = game_id.0,
                "duplicate move for this round, keeping the first"
            );
            return;
        }
        game.moves.insert(player_id, mv);
        debug!(player = player_id.0, game = game_id.0, mv = ?mv, "move recorded");

        if game.moves.len() == 2 {
            self.resolve_round(game_id);
        }
    }

    /// Resolve a complete round: compute each member's outcome against the
    /// opponent's move, send both results, and clear the move map so the
    /// session is ready for a rematch.
    fn resolve_round(&mut self, game_id: GameId) {
        let Some(game) = self.games.get_mut(&game_id) else {
            return;
        };
        let [a, b] = game.members;
        let (Some(&move_a), Some(&move_b)) = (game.moves.get(&a), game.moves.get(&b)) else {
            return;
        };
        game.moves.clear();

        for (id, own, theirs) in [(a, move_a, move_b), (b, move_b, move_a)] {
            self.send_to(
                id,
                &ServerEvent::GameResults {
                    your_move: own,
                    opponent_move: theirs,
                    result: rules::outcome(own, theirs),
                },
            );
        }
        info!(game = game_id.0, "round resolved");
    }

    /// Start a rematch in the caller's game: both members receive
    /// `start_game`. The move map is already clear from the prior
    /// resolution. No-op (logged) without a live game.
    pub fn play_again(&mut self, player_id: PlayerId) {
        let Some(&game_id) = self.game_index.get(&player_id) else {
            warn!(player = player_id.0, "play_again with no active game, ignoring");
            return;
        };
        let Some(game) = self.games.get(&game_id) else {
            return;
        };
        let members = game.members;
        for id in members {
            self.send_to(id, &ServerEvent::StartGame);
        }
        debug!(game = game_id.0, "rematch started");
    }

    /// Tear down the caller's game, or clear the waiting slot if the caller
    /// was the waiting player. The remaining member is not notified; their
    /// next `move_submitted` fails its game lookup and is dropped.
    pub fn leave_game(&mut self, player_id: PlayerId) {
        if let Some(game_id) = self.game_index.remove(&player_id) {
            if let Some(game) = self.games.remove(&game_id) {
                for id in game.members {
                    self.game_index.remove(&id);
                }
            }
            info!(player = player_id.0, game = game_id.0, "left game");
        } else if self.waiting == Some(player_id) {
            self.waiting = None;
            info!(player = player_id.0, "stopped waiting for a partner");
        }
    }

    /// Transport-invoked cleanup on connection loss: same teardown as
    /// `leave_game`, plus removal from the connected roster.
    pub fn remove_player(&mut self, player_id: PlayerId) {
        self.leave_game(player_id);
        if self.players.remove(&player_id).is_some() {
            info!(player = player_id.0, "player disconnected");
        }
    }

    /// Returns the player currently waiting for a partner, if any.
    pub fn waiting_player(&self) -> Option<PlayerId> {
        self.waiting
    }

    /// Returns the number of connected players.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Returns the number of live games.
    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Returns the game the player is a member of, if any.
    pub fn game_of(&self, player_id: PlayerId) -> Option<GameId> {
        self.game_index.get(&player_id).copied()
    }

    /// Returns how many moves are recorded for the game's current round.
    pub fn pending_move_count(&self, game_id: GameId) -> usize {
        self.games.get(&game_id).map_or(0, |g| g.moves.len())
    }

    /// Send an event to a specific player. Write errors are logged and
    /// swallowed; the player's reader thread surfaces the broken pipe.
    fn send_to(&mut self, player_id: PlayerId, event: &ServerEvent) {
        if let Some(ps) = self.players.get_mut(&player_id) {
            if let Err(e) = send_event(&mut ps.writer, event) {
                warn!(player = player_id.0, error = %e, "failed to send event");
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a `ServerEvent` to JSON and write it with length-delimited
/// framing.
fn send_event(writer: &mut BufWriter<TcpStream>, event: &ServerEvent) -> Result<(), SendError> {
    let json = serde_json::to_vec(event)?;
    write_message(writer, &json)?;
    Ok(())
}
