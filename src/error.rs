//! Error types for the cache server
//!
//! Provides unified error handling using thiserror. The `Display` output of
//! parse errors is exactly the line sent back to the client.

use thiserror::Error;

// == Argument Error ==
/// A numeric `set` argument that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// The argument is not an integer at all
    #[error("\"{name}\" must be integer")]
    NotInteger { name: &'static str },

    /// The argument is below its lower bound
    #[error("\"{name}\" must be >= {bound}")]
    TooSmall { name: &'static str, bound: u64 },

    /// The argument is above its upper bound
    #[error("\"{name}\" must be <= {bound}")]
    TooLarge { name: &'static str, bound: u64 },
}

// == Parse Error ==
/// A command line that could not be turned into a command.
///
/// Parse errors never close the connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line holds nothing but whitespace
    #[error("Empty command")]
    Empty,

    /// The first word is not a known command
    #[error("Unknown command: {name}. Supported commands are: {supported}.")]
    UnknownCommand { name: String, supported: String },

    /// The command got the wrong number of arguments
    #[error("Usage: {keyword} {usage}")]
    Usage {
        keyword: &'static str,
        usage: &'static str,
    },

    /// An argument is out of range or not a number
    #[error("Bad argument: {0}")]
    BadArgument(#[from] ArgumentError),
}

// == Connection Error ==
/// Errors that end a client connection.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The byte stream no longer lines up with message boundaries
    #[error("unexpected message length or termination marker.")]
    Framing,

    /// Underlying socket failure, disconnects included
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConnectionError {
    /// Returns true if the peer went away, which is a normal way for a
    /// connection to end rather than a failure.
    pub fn is_disconnect(&self) -> bool {
        match self {
            ConnectionError::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
            ),
            ConnectionError::Framing => false,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for connection handling.
pub type Result<T> = std::result::Result<T, ConnectionError>;
