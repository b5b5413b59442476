// TCP server and connection handling for the matchmaking registry.
//
// Architecture: thread-per-reader around a shared, mutex-guarded `Registry`.
//
// - **Listener thread** (`TcpListener::accept()` loop): accepts new TCP
//   connections, registers each one in the registry (which assigns the
//   `PlayerId` and takes ownership of the write half), and spawns a reader
//   thread for it.
// - **Reader threads** (one per client): call `framing::read_message()` in a
//   loop, deserialize `ClientEvent`, and dispatch into the registry under
//   the lock. On read error/EOF, perform disconnect cleanup and exit.
//
// The registry-wide mutex is the single point of mutual exclusion: the
// waiting slot, the game table, and the player roster are guarded jointly so
// their invariants stay consistent, and all operations on a session are
// totally ordered. Outbound writes happen while holding the lock — a
// throughput ceiling at large scale, acceptable here where events are tiny
// and rounds are human-paced.
//
// Shutdown: the listener checks a `keep_running` flag (set to false by
// `ServerHandle::stop`) between accept polls and breaks out of the loop.

use std::io::BufReader;
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use roshambo_protocol::framing::read_message;
use roshambo_protocol::message::ClientEvent;
use roshambo_protocol::types::PlayerId;
use tracing::warn;

use crate::registry::Registry;

/// Handle returned by `start_server` to control the running server.
pub struct ServerHandle {
    keep_running: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ServerHandle {
    /// Signal the server to stop accepting connections and wait for the
    /// listener thread to shut down. Reader threads exit as their clients
    /// disconnect.
    pub fn stop(self) {
        self.keep_running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread {
            let _ = handle.join();
        }
    }
}

/// Configuration for starting a server.
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

/// Start the server on a background thread. Returns a handle for stopping it
/// and the actual bound address (useful when port 0 is used to let the OS
/// pick a free port).
pub fn start_server(config: ServerConfig) -> std::io::Result<(ServerHandle, std::net::SocketAddr)> {
    let listener = TcpListener::bind(format!("{}:{}", config.bind, config.port))?;
    let addr = listener.local_addr()?;
    let keep_running = Arc::new(AtomicBool::new(true));
    let keep_running_clone = keep_running.clone();

    let thread = thread::spawn(move || {
        accept_loop(listener, keep_running_clone);
    });

    Ok((
        ServerHandle {
            keep_running,
            thread: Some(thread),
        },
        addr,
    ))
}

/// Lock the registry, recovering the guard if a previous holder panicked.
/// Registry operations never unwind in normal operation; this keeps a
/// poisoned mutex from cascading into every connection.
fn lock_registry(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Accept loop. Runs until `keep_running` is set to false.
fn accept_loop(listener: TcpListener, keep_running: Arc<AtomicBool>) {
    let registry = Arc::new(Mutex::new(Registry::new()));

    // Set the listener to non-blocking so the accept loop can check
    // keep_running periodically.
    listener.set_nonblocking(true).ok();

    while keep_running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, _addr)) => {
                stream.set_nonblocking(false).ok();
                handle_new_connection(&registry, stream, &keep_running);
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(50));
            }
            Err(_) => break,
        }
    }
}

/// Handle a new TCP connection: register the player (the registry keeps the
/// write half) and spawn a reader thread for the read half.
fn handle_new_connection(
    registry: &Arc<Mutex<Registry>>,
    stream: TcpStream,
    keep_running: &Arc<AtomicBool>,
) {
    let read_stream = match stream.try_clone() {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "failed to clone stream for new connection");
            return;
        }
    };

    let player_id = lock_registry(registry).add_player(stream);

    let registry = registry.clone();
    let keep_running = keep_running.clone();
    thread::spawn(move || {
        reader_loop(BufReader::new(read_stream), player_id, &registry, &keep_running);
    });
}

/// Reader loop for a single client. Runs in its own thread. A transport
/// fault (read error or EOF) ends the loop and triggers disconnect cleanup;
/// a malformed event is logged and dropped without closing the connection.
fn reader_loop(
    mut reader: BufReader<TcpStream>,
    player_id: PlayerId,
    registry: &Mutex<Registry>,
    keep_running: &AtomicBool,
) {
    while keep_running.load(Ordering::SeqCst) {
        match read_message(&mut reader) {
            Ok(bytes) => match serde_json::from_slice::<ClientEvent>(&bytes) {
                Ok(event) => dispatch(registry, player_id, event),
                Err(e) => {
                    warn!(player = player_id.0, error = %e, "malformed event, dropping");
                }
            },
            Err(_) => break,
        }
    }
    lock_registry(registry).remove_player(player_id);
}

/// Dispatch a decoded event to the corresponding registry operation.
fn dispatch(registry: &Mutex<Registry>, player_id: PlayerId, event: ClientEvent) {
    let mut registry = lock_registry(registry);
    match event {
        ClientEvent::FindPartner => registry.find_partner(player_id),
        ClientEvent::MoveSubmitted { mv } => registry.submit_move(player_id, mv),
        ClientEvent::PlayAgain => registry.play_again(player_id),
        ClientEvent::LeaveGame => registry.leave_game(player_id),
    }
}
