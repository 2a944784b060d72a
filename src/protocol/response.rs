//! Response definitions
//!
//! Everything the server writes back, rendered to separator-terminated bytes.

use crate::error::ParseError;
use crate::protocol::SEPARATOR;

const SUCCESS: &str = "SUCCESS";
const FAILURE: &str = "COMMAND_FAILED";
const NOT_FOUND: &str = "NOT_FOUND";

/// A message from server to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Success,
    Failure,
    NotFound,

    /// A `get` hit, framed by its length
    Value(Vec<u8>),

    /// Tells the client how many payload bytes to send for a `set`
    PayloadPrompt(usize),

    /// The command line could not be parsed
    Parse(ParseError),

    /// Framing or decoding problem; fatal ones close the connection
    Protocol { message: String, fatal: bool },
}

impl Response {
    pub fn protocol_error(message: impl Into<String>, fatal: bool) -> Self {
        Response::Protocol {
            message: message.into(),
            fatal,
        }
    }

    /// Renders the response, trailing separator included.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = match self {
            Response::Success => SUCCESS.as_bytes().to_vec(),
            Response::Failure => FAILURE.as_bytes().to_vec(),
            Response::NotFound => NOT_FOUND.as_bytes().to_vec(),
            Response::Value(value) => {
                let mut out = Vec::with_capacity(value.len() + 24);
                out.extend_from_slice(value.len().to_string().as_bytes());
                out.extend_from_slice(SEPARATOR);
                out.extend_from_slice(value);
                out
            }
            Response::PayloadPrompt(size) => {
                format!("Send {} bytes, terminated with \\r\\n.", size).into_bytes()
            }
            Response::Parse(err) => err.to_string().into_bytes(),
            Response::Protocol { message, fatal } => {
                let fatal = if *fatal { " (fatal)" } else { "" };
                format!("Protocol error{}: {}", fatal, message).into_bytes()
            }
        };
        out.extend_from_slice(SEPARATOR);
        out
    }
}

impl From<ParseError> for Response {
    fn from(err: ParseError) -> Self {
        Response::Parse(err)
    }
}
