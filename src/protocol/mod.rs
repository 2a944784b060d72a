//! Protocol Module
//!
//! Defines the line-oriented text protocol spoken over TCP.
//!
//! ## Commands
//! - `set <key> <ttl> <size>\r\n`, then `<size>` raw bytes and `\r\n`
//! - `get <key>\r\n`
//! - `del <key>\r\n`
//!
//! ## Responses
//! - `SUCCESS\r\n`, `COMMAND_FAILED\r\n`, `NOT_FOUND\r\n`
//! - `<len>\r\n<raw bytes>\r\n` for a `get` hit
//! - one error line for anything the server rejects

mod command;
mod executor;
mod parser;
mod response;

pub use command::{Command, CommandDefinition, CommandKind};
pub use executor::execute_command;
pub use parser::parse_command;
pub use response::Response;

/// Terminates every line and every `set` payload
pub const SEPARATOR: &[u8] = b"\r\n";
