// Interactive CLI client for the roshambo matchmaking server.
//
// A text-menu front end over `NetClient`: main menu (find a partner / quit),
// move prompt, round results, and a play-again/leave menu. The flow blocks
// on stdin for the operator and on the event inbox for the server, one step
// at a time — matchmaking and rounds are human-paced.
//
// Usage:
//   roshambo [OPTIONS]
//     --addr <HOST:PORT>    Server address (default: 127.0.0.1:8080)

use std::io::{self, Write};
use std::time::Duration;

use roshambo_client::NetClient;
use roshambo_protocol::message::{Move, RoundOutcome, ServerEvent};

/// How long to wait for a server event before giving up. Generous because
/// the opponent is a human picking menu entries.
const EVENT_WAIT: Duration = Duration::from_secs(600);

fn main() {
    let addr = parse_args();

    let mut client = match NetClient::connect(&addr) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to connect to {addr}: {e}");
            std::process::exit(1);
        }
    };
    println!("Connected to roshambo server at {addr}");

    loop {
        println!();
        println!("Rock Paper Scissors");
        println!("1. Find a partner to play");
        println!("2. Quit");
        match read_choice("Enter your choice (1-2): ").as_str() {
            "1" => {
                if let Err(e) = find_and_play(&mut client) {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
            "2" => {
                println!("Goodbye!");
                return;
            }
            _ => println!("Invalid choice! Please enter 1 or 2."),
        }
    }
}

/// Enter matchmaking, then play rounds until the operator leaves the game.
/// Errors are connection-level: lost server, closed inbox.
fn find_and_play(client: &mut NetClient) -> Result<(), String> {
    client.find_partner()?;
    println!("Looking for a partner...");

    loop {
        match next_event(client)? {
            ServerEvent::PartnerFound { game_id } => {
                println!("Partner found! (game {})", game_id.0);
            }
            ServerEvent::StartGame => break,
            other => println!("(ignoring unexpected event: {other:?})"),
        }
    }

    // Round loop: one iteration per round until the operator leaves.
    loop {
        let mv = prompt_for_move();
        client.submit_move(mv)?;
        println!("Move submitted! Waiting for opponent...");

        loop {
            match next_event(client)? {
                ServerEvent::BothMovesReceived => {
                    println!("Both moves received, waiting for results...");
                }
                ServerEvent::GameResults {
                    your_move,
                    opponent_move,
                    result,
                } => {
                    show_results(your_move, opponent_move, result);
                    break;
                }
                other => println!("(ignoring unexpected event: {other:?})"),
            }
        }

        println!();
        println!("What would you like to do?");
        println!("1. Play again");
        println!("2. Leave game");
        match read_choice("Enter your choice (1-2): ").as_str() {
            "1" => {
                client.play_again()?;
                println!("Waiting for the next round...");
                loop {
                    match next_event(client)? {
                        ServerEvent::StartGame => break,
                        other => println!("(ignoring unexpected event: {other:?})"),
                    }
                }
            }
            "2" => {
                client.leave_game()?;
                println!("Left the game. Thanks for playing!");
                return Ok(());
            }
            _ => {
                println!("Invalid choice, leaving game...");
                client.leave_game()?;
                return Ok(());
            }
        }
    }
}

/// Block for the next server event; a timeout or closed inbox means the
/// connection is gone.
fn next_event(client: &NetClient) -> Result<ServerEvent, String> {
    client
        .recv_timeout(EVENT_WAIT)
        .ok_or_else(|| "Connection to server lost.".into())
}

fn prompt_for_move() -> Move {
    loop {
        println!();
        println!("Make your move:");
        println!("1. Rock");
        println!("2. Paper");
        println!("3. Scissors");
        match read_choice("Enter your choice (1-3): ").as_str() {
            "1" => return Move::Rock,
            "2" => return Move::Paper,
            "3" => return Move::Scissors,
            _ => println!("Invalid choice! Please enter 1, 2, or 3."),
        }
    }
}

fn show_results(your_move: Move, opponent_move: Move, result: RoundOutcome) {
    println!();
    println!("ROUND RESULTS:");
    println!("  Your move: {your_move:?}");
    println!("  Opponent move: {opponent_move:?}");
    match result {
        RoundOutcome::Win => println!("  You WIN!"),
        RoundOutcome::Lose => println!("  You lose."),
        RoundOutcome::Tie => println!("  It's a tie."),
    }
}

/// Print a prompt and read one trimmed line from stdin.
fn read_choice(prompt: &str) -> String {
    print!("{prompt}");
    io::stdout().flush().ok();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim().to_string()
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching —
/// no clap dependency.
fn parse_args() -> String {
    let mut addr = String::from("127.0.0.1:8080");
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--addr" => {
                i += 1;
                addr = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--addr requires a value");
                    std::process::exit(1);
                });
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    addr
}

fn print_usage() {
    println!("Usage: roshambo [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --addr <HOST:PORT>    Server address (default: 127.0.0.1:8080)");
    println!("  --help, -h            Show this help");
}
