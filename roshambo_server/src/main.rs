// CLI entry point for the roshambo matchmaking server.
//
// Starts a standalone server that game clients connect to. See `server.rs`
// for the networking architecture and `registry.rs` for the matchmaking
// state.
//
// Usage:
//   roshambo-server [OPTIONS]
//     --port <PORT>    Listen port (default: 8080)
//     --bind <ADDR>    Bind address (default: 127.0.0.1)

use std::thread;
use std::time::Duration;

use roshambo_server::server::{ServerConfig, start_server};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = parse_args();

    let (_handle, addr) = match start_server(config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Failed to start server: {e}");
            std::process::exit(1);
        }
    };

    println!("Roshambo server listening on {addr}");
    println!("Press Ctrl+C to stop.");

    // The listener and reader threads do all the work; the process exits on
    // SIGINT/SIGTERM by default, which tears everything down.
    loop {
        thread::sleep(Duration::from_millis(100));
    }
}

/// Parse command-line arguments into a `ServerConfig`. Uses simple
/// `std::env::args()` matching — no clap dependency.
fn parse_args() -> ServerConfig {
    let mut config = ServerConfig::default();
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                i += 1;
                config.port = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--port requires a valid port number");
                    std::process::exit(1);
                });
            }
            "--bind" => {
                i += 1;
                config.bind = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--bind requires an address");
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

    config
}

fn print_usage() {
    println!("Usage: roshambo-server [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --port <PORT>    Listen port (default: 8080)");
    println!("  --bind <ADDR>    Bind address (default: 127.0.0.1)");
    println!("  --help, -h       Show this help");
}
