//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Missing or invalid setting. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Durable read/write failed. An unrecorded strike must never be ignored.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Platform call failed (e.g. bot lacks the right to restrict members).
    #[error("Platform error: {0}")]
    Platform(String),

    /// Platform rate limit: caller may retry after `seconds` seconds.
    #[error("FloodWait: retry after {seconds} seconds")]
    FloodWait { seconds: u64 },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
