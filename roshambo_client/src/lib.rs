// roshambo_client — TCP client for the roshambo matchmaking server.
//
// Provides a non-blocking interface for a front end to communicate with the
// server. Architecture:
// - `connect()` performs the TCP connect on the calling thread, then spawns a
//   background reader thread.
// - The reader thread calls `read_message()` in a loop, deserializes
//   `ServerEvent`, and pushes into an `mpsc` channel.
// - The caller holds a `BufWriter<TcpStream>` for sending.
// - `poll()` drains the inbox non-blocking; `recv_timeout()` blocks up to a
//   deadline for flows that wait on a specific event.
//
// This separation ensures the caller never blocks on network reads. The
// writer flushes synchronously, acceptable for the tiny events we send.
//
// There is no join handshake: the server registers a participant the moment
// the connection is accepted, so `connect` is TCP plus a thread spawn.
// Matchmaking starts when the caller sends `find_partner`.
//
// The interactive front end (`main.rs`) and the full-pipeline integration
// tests both drive this same client.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use roshambo_protocol::framing::{read_message, write_message};
use roshambo_protocol::message::{ClientEvent, Move, ServerEvent};

/// TCP client for server communication.
pub struct NetClient {
    writer: BufWriter<TcpStream>,
    inbox: Receiver<ServerEvent>,
    _reader_thread: Option<JoinHandle<()>>,
}

impl NetClient {
    /// Connect to a server and spawn the reader thread.
    pub fn connect(addr: &str) -> Result<Self, String> {
        let stream = TcpStream::connect(addr).map_err(|e| format!("connect failed: {e}"))?;
        let reader_stream = stream
            .try_clone()
            .map_err(|e| format!("clone failed: {e}"))?;
        let writer = BufWriter::new(stream);

        let (tx, rx) = mpsc::channel();
        let reader_thread = thread::spawn(move || {
            reader_loop(BufReader::new(reader_stream), &tx);
        });

        Ok(Self {
            writer,
            inbox: rx,
            _reader_thread: Some(reader_thread),
        })
    }

    /// Enter matchmaking.
    pub fn find_partner(&mut self) -> Result<(), String> {
        self.send(&ClientEvent::FindPartner)
    }

    /// Submit a move for the current round.
    pub fn submit_move(&mut self, mv: Move) -> Result<(), String> {
        self.send(&ClientEvent::MoveSubmitted { mv })
    }

    /// Request a rematch in the current game.
    pub fn play_again(&mut self) -> Result<(), String> {
        self.send(&ClientEvent::PlayAgain)
    }

    /// Leave the current game (or stop waiting for a partner).
    pub fn leave_game(&mut self) -> Result<(), String> {
        self.send(&ClientEvent::LeaveGame)
    }

    /// Drain all queued server events (non-blocking).
    pub fn poll(&self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.inbox.try_recv() {
            events.push(event);
        }
        events
    }

    /// Block until the next server event arrives or the timeout elapses.
    /// Returns `None` on timeout or when the connection has closed.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ServerEvent> {
        self.inbox.recv_timeout(timeout).ok()
    }

    fn send(&mut self, event: &ClientEvent) -> Result<(), String> {
        let json = serde_json::to_vec(event).map_err(|e| e.to_string())?;
        write_message(&mut self.writer, &json).map_err(|e| format!("send failed: {e}"))
    }
}

/// Reader thread: read framed events in a loop, push to the channel.
fn reader_loop(mut reader: BufReader<TcpStream>, tx: &mpsc::Sender<ServerEvent>) {
    while let Ok(bytes) = read_message(&mut reader) {
        match serde_json::from_slice::<ServerEvent>(&bytes) {
            Ok(event) => {
                if tx.send(event).is_err() {
                    break; // Caller dropped the receiver
                }
            }
            Err(_) => break, // Malformed event
        }
    }
}
