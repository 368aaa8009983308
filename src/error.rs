//! # Error Types
//!
//! Custom error types for Rover Bridge using `thiserror`.

use thiserror::Error;

/// Main error type for Rover Bridge
#[derive(Debug, Error)]
pub enum DriveError {
    /// Sending with no active session. The scheduler never runs without a
    /// session, so this indicates a collaborator contract violation.
    #[error("not connected to a vehicle")]
    NotConnected,

    /// Transient transport failure (a single dropped frame)
    #[error("link error: {0}")]
    Link(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Rover Bridge
pub type Result<T> = std::result::Result<T, DriveError>;
