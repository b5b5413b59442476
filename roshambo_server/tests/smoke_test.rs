// Integration smoke test for the matchmaking server.
//
// Starts a server on localhost, connects mock TCP clients, and exercises the
// full protocol lifecycle: matchmaking, move exchange, round results,
// rematch, voluntary leave, and disconnect cleanup.
//
// Each client is a plain TCP socket using the protocol crate's framing and
// event types — no client library involved. This tests the server end-to-end
// against the wire contract alone.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::time::Duration;

use roshambo_protocol::framing::{read_message, write_message};
use roshambo_protocol::message::{ClientEvent, Move, RoundOutcome, ServerEvent};
use roshambo_protocol::types::GameId;
use roshambo_server::server::{ServerConfig, ServerHandle, start_server};

/// Helper: send a ClientEvent over a framed TCP stream.
fn send(writer: &mut BufWriter<TcpStream>, event: &ClientEvent) {
    let json = serde_json::to_vec(event).unwrap();
    write_message(writer, &json).unwrap();
}

/// Helper: receive a ServerEvent from a framed TCP stream.
fn recv(reader: &mut BufReader<TcpStream>) -> ServerEvent {
    let bytes = read_message(reader).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Connect to the server. Reads block for at most 5 seconds so a missing
/// event fails the test instead of hanging it.
fn connect(addr: std::net::SocketAddr) -> (BufReader<TcpStream>, BufWriter<TcpStream>) {
    let stream = TcpStream::connect(addr).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let reader_stream = stream.try_clone().unwrap();
    (BufReader::new(reader_stream), BufWriter::new(stream))
}

/// Enter matchmaking and expect to be paired: returns the announced game ID
/// after consuming `partner_found` and `start_game`.
fn expect_paired(reader: &mut BufReader<TcpStream>) -> GameId {
    let game_id = match recv(reader) {
        ServerEvent::PartnerFound { game_id } => game_id,
        other => panic!("expected PartnerFound, got {other:?}"),
    };
    match recv(reader) {
        ServerEvent::StartGame => {}
        other => panic!("expected StartGame, got {other:?}"),
    }
    game_id
}

/// Drain all currently buffered events using a short read timeout.
fn drain_events(reader: &mut BufReader<TcpStream>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    if let Ok(stream) = reader.get_ref().try_clone() {
        stream
            .set_read_timeout(Some(Duration::from_millis(100)))
            .ok();
    }
    for _ in 0..50 {
        match read_message(reader) {
            Ok(bytes) => match serde_json::from_slice::<ServerEvent>(&bytes) {
                Ok(event) => events.push(event),
                Err(_) => break,
            },
            Err(_) => break,
        }
    }
    // Restore the longer timeout for subsequent blocking reads.
    if let Ok(stream) = reader.get_ref().try_clone() {
        stream.set_read_timeout(Some(Duration::from_secs(5))).ok();
    }
    events
}

fn start_test_server() -> (ServerHandle, std::net::SocketAddr) {
    let config = ServerConfig {
        bind: "127.0.0.1".into(),
        port: 0, // OS picks a free port
    };
    let (handle, addr) = start_server(config).unwrap();
    // Give the listener thread a moment to start.
    std::thread::sleep(Duration::from_millis(50));
    (handle, addr)
}

#[test]
fn full_game_lifecycle() {
    let (handle, addr) = start_test_server();

    // 1. Two clients connect and enter matchmaking. Both are told about the
    //    same game.
    let (mut reader_a, mut writer_a) = connect(addr);
    let (mut reader_b, mut writer_b) = connect(addr);

    send(&mut writer_a, &ClientEvent::FindPartner);
    // A is waiting — nothing arrives until B shows up.
    assert!(drain_events(&mut reader_a).is_empty());

    send(&mut writer_b, &ClientEvent::FindPartner);
    let game_a = expect_paired(&mut reader_a);
    let game_b = expect_paired(&mut reader_b);
    assert_eq!(game_a, game_b);

    // 2. A round: rock versus scissors.
    send(&mut writer_a, &ClientEvent::MoveSubmitted { mv: Move::Rock });
    send(
        &mut writer_b,
        &ClientEvent::MoveSubmitted { mv: Move::Scissors },
    );

    match recv(&mut reader_a) {
        ServerEvent::GameResults {
            your_move,
            opponent_move,
            result,
        } => {
            assert_eq!(your_move, Move::Rock);
            assert_eq!(opponent_move, Move::Scissors);
            assert_eq!(result, RoundOutcome::Win);
        }
        other => panic!("expected GameResults, got {other:?}"),
    }
    match recv(&mut reader_b) {
        ServerEvent::GameResults { result, .. } => assert_eq!(result, RoundOutcome::Lose),
        other => panic!("expected GameResults, got {other:?}"),
    }

    // 3. Rematch: both sides get StartGame and the new round resolves
    //    independently — this time a tie.
    send(&mut writer_a, &ClientEvent::PlayAgain);
    assert_eq!(recv(&mut reader_a), ServerEvent::StartGame);
    assert_eq!(recv(&mut reader_b), ServerEvent::StartGame);

    send(&mut writer_a, &ClientEvent::MoveSubmitted { mv: Move::Paper });
    send(&mut writer_b, &ClientEvent::MoveSubmitted { mv: Move::Paper });
    match recv(&mut reader_a) {
        ServerEvent::GameResults { result, .. } => assert_eq!(result, RoundOutcome::Tie),
        other => panic!("expected GameResults, got {other:?}"),
    }
    match recv(&mut reader_b) {
        ServerEvent::GameResults { result, .. } => assert_eq!(result, RoundOutcome::Tie),
        other => panic!("expected GameResults, got {other:?}"),
    }

    // 4. A leaves. B's next move lands in no game and is dropped — B
    //    receives nothing.
    send(&mut writer_a, &ClientEvent::LeaveGame);
    std::thread::sleep(Duration::from_millis(100));
    send(&mut writer_b, &ClientEvent::MoveSubmitted { mv: Move::Rock });
    assert!(drain_events(&mut reader_b).is_empty());

    // 5. B re-enters matchmaking and pairs with a newcomer in a fresh game.
    send(&mut writer_b, &ClientEvent::FindPartner);
    let (mut reader_c, mut writer_c) = connect(addr);
    send(&mut writer_c, &ClientEvent::FindPartner);

    let game_b2 = expect_paired(&mut reader_b);
    let game_c = expect_paired(&mut reader_c);
    assert_eq!(game_b2, game_c);
    assert_ne!(game_b2, game_a);

    handle.stop();
}

#[test]
fn malformed_event_keeps_connection_alive() {
    let (handle, addr) = start_test_server();

    let (mut reader_a, mut writer_a) = connect(addr);
    let (mut reader_b, mut writer_b) = connect(addr);

    // A well-framed but undecodable payload is dropped without closing the
    // connection.
    write_message(&mut writer_a, b"{\"type\":\"juggle\"}").unwrap();
    write_message(&mut writer_a, b"not json at all").unwrap();

    // The same connection still participates in matchmaking afterwards.
    send(&mut writer_a, &ClientEvent::FindPartner);
    send(&mut writer_b, &ClientEvent::FindPartner);
    let game_a = expect_paired(&mut reader_a);
    let game_b = expect_paired(&mut reader_b);
    assert_eq!(game_a, game_b);

    handle.stop();
}

#[test]
fn waiting_player_disconnect_clears_slot() {
    let (handle, addr) = start_test_server();

    // A enters matchmaking, then vanishes.
    let (_reader_a, mut writer_a) = connect(addr);
    send(&mut writer_a, &ClientEvent::FindPartner);
    std::thread::sleep(Duration::from_millis(100));
    drop(writer_a);
    drop(_reader_a);
    std::thread::sleep(Duration::from_millis(100));

    // B and C pair with each other, not with the ghost of A.
    let (mut reader_b, mut writer_b) = connect(addr);
    let (mut reader_c, mut writer_c) = connect(addr);
    send(&mut writer_b, &ClientEvent::FindPartner);
    assert!(drain_events(&mut reader_b).is_empty());
    send(&mut writer_c, &ClientEvent::FindPartner);

    let game_b = expect_paired(&mut reader_b);
    let game_c = expect_paired(&mut reader_c);
    assert_eq!(game_b, game_c);

    handle.stop();
}

#[test]
fn opponent_disconnect_drops_stale_moves() {
    let (handle, addr) = start_test_server();

    let (mut reader_a, mut writer_a) = connect(addr);
    let (mut reader_b, mut writer_b) = connect(addr);
    send(&mut writer_a, &ClientEvent::FindPartner);
    send(&mut writer_b, &ClientEvent::FindPartner);
    let _ = expect_paired(&mut reader_a);
    let _ = expect_paired(&mut reader_b);

    // A's connection dies mid-round; the session is torn down.
    drop(writer_a);
    drop(reader_a);
    std::thread::sleep(Duration::from_millis(100));

    // B's move has nowhere to land: dropped, no results, no crash.
    send(&mut writer_b, &ClientEvent::MoveSubmitted { mv: Move::Rock });
    assert!(drain_events(&mut reader_b).is_empty());

    // B can go again.
    send(&mut writer_b, &ClientEvent::FindPartner);
    assert!(drain_events(&mut reader_b).is_empty());

    handle.stop();
}
