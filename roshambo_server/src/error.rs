// Error types for the server's outbound send path.

use thiserror::Error;

/// Failure to deliver a `ServerEvent` to a client: either serialization or
/// the framed write itself. Callers log and continue — a broken pipe is
/// surfaced as a disconnect by the client's reader thread, never here.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("event encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}
