//! Connection Handler
//!
//! Drives one client connection through the protocol state machine:
//!
//! ```text
//! AwaitingCommandLine ──set──> AwaitingPayload ──> Dispatching ──> AwaitingCommandLine
//!          └────────get/del──────────────────────────^
//! ```
//!
//! Any state may move to `Closed` on disconnect or a framing violation.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::error::{ConnectionError, Result};
use crate::protocol::{execute_command, parse_command, Command, Response, SEPARATOR};
use crate::server::ServerState;

/// Upper bound on the payload buffer reserved before any bytes arrive
const PAYLOAD_PREALLOC: usize = 64 * 1024;

/// Where a connection is in the request cycle
#[derive(Debug)]
enum ConnectionState {
    /// Waiting for the next `\r\n` terminated command line
    AwaitingCommandLine,
    /// A `set` was parsed; its payload still has to be read
    AwaitingPayload(Command),
    /// The command is complete and ready to run against the cache
    Dispatching(Command),
    Closed,
}

/// Handles a single client connection
pub struct Connection<S> {
    /// Client stream, buffered for line reads; writes pass straight through
    stream: BufReader<S>,
    /// Shared cache and limits
    state: ServerState,
    /// Peer address for logging
    peer_addr: String,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a new connection handler
    pub fn new(stream: S, peer_addr: impl Into<String>, state: ServerState) -> Self {
        Self {
            stream: BufReader::new(stream),
            state,
            peer_addr: peer_addr.into(),
        }
    }

    /// Serves requests until the client disconnects or breaks framing.
    ///
    /// Commands are handled strictly one at a time. A `set` only reaches the
    /// cache once its whole payload has arrived, so dropping the connection
    /// at any point leaves the cache untouched by the unfinished command.
    pub async fn run(mut self) {
        let mut state = ConnectionState::AwaitingCommandLine;

        loop {
            let step = match state {
                ConnectionState::AwaitingCommandLine => self.read_command().await,
                ConnectionState::AwaitingPayload(command) => self.read_payload(command).await,
                ConnectionState::Dispatching(command) => self.dispatch(command).await,
                ConnectionState::Closed => break,
            };

            state = match step {
                Ok(next) => next,
                Err(err) => self.close_with(err).await,
            };
        }

        if let Err(err) = self.stream.shutdown().await {
            debug!("Shutdown of {} failed: {}", self.peer_addr, err);
        }
        info!("Closed the client socket {}", self.peer_addr);
    }

    async fn read_command(&mut self) -> Result<ConnectionState> {
        let Some(line) = self.read_line().await? else {
            debug!("Client {} disconnected", self.peer_addr);
            return Ok(ConnectionState::Closed);
        };
        debug!(
            "Received message from {}: {:?}",
            self.peer_addr,
            String::from_utf8_lossy(&line)
        );

        let Ok(text) = std::str::from_utf8(&line) else {
            warn!("Failed to decode message from {}", self.peer_addr);
            self.send(&Response::protocol_error("failed to decode message", false))
                .await?;
            return Ok(ConnectionState::AwaitingCommandLine);
        };

        if text.trim().is_empty() {
            return Ok(ConnectionState::AwaitingCommandLine);
        }

        match parse_command(text, self.state.max_message_size) {
            Ok(command) if command.expected_payload().is_some() => {
                Ok(ConnectionState::AwaitingPayload(command))
            }
            Ok(command) => Ok(ConnectionState::Dispatching(command)),
            Err(err) => {
                self.send(&Response::from(err)).await?;
                Ok(ConnectionState::AwaitingCommandLine)
            }
        }
    }

    async fn read_payload(&mut self, mut command: Command) -> Result<ConnectionState> {
        let size = command.expected_payload().unwrap_or(0);
        self.send(&Response::PayloadPrompt(size)).await?;

        // Grows with what actually arrives, not with what was announced
        let expected = size.saturating_add(SEPARATOR.len());
        let mut data = Vec::with_capacity(expected.min(PAYLOAD_PREALLOC));
        (&mut self.stream)
            .take(expected as u64)
            .read_to_end(&mut data)
            .await?;
        if data.len() < expected {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        debug!("Received {} payload bytes from {}", size, self.peer_addr);

        if !data.ends_with(SEPARATOR) {
            return Err(ConnectionError::Framing);
        }
        data.truncate(size);
        command.attach_payload(data);

        Ok(ConnectionState::Dispatching(command))
    }

    async fn dispatch(&mut self, command: Command) -> Result<ConnectionState> {
        let response = {
            let mut cache = self.state.cache.write().await;
            execute_command(command, &mut cache)
        };

        self.send(&response).await?;
        Ok(ConnectionState::AwaitingCommandLine)
    }

    // Reads up to and including the next separator. Returns None when the
    // stream ends first, even mid-line.
    async fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
        let limit = self.state.max_message_size.saturating_add(SEPARATOR.len());
        let mut line = Vec::new();

        loop {
            let remaining = limit - line.len();
            if remaining == 0 {
                return Err(ConnectionError::Framing);
            }

            let read = (&mut self.stream)
                .take(remaining as u64)
                .read_until(b'\n', &mut line)
                .await?;

            if read == 0 {
                return Ok(None);
            }
            if line.ends_with(SEPARATOR) {
                return Ok(Some(line));
            }
        }
    }

    async fn send(&mut self, response: &Response) -> Result<()> {
        self.stream.write_all(&response.to_bytes()).await?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn close_with(&mut self, err: ConnectionError) -> ConnectionState {
        if err.is_disconnect() {
            debug!("Client {} disconnected: {}", self.peer_addr, err);
            return ConnectionState::Closed;
        }

        match &err {
            ConnectionError::Framing => {
                warn!("Framing violation from {}, closing", self.peer_addr);
                let response = Response::protocol_error(err.to_string(), true);
                if let Err(send_err) = self.send(&response).await {
                    debug!(
                        "Could not report framing error to {}: {}",
                        self.peer_addr, send_err
                    );
                }
            }
            ConnectionError::Io(io_err) => {
                warn!("Error on connection {}: {}", self.peer_addr, io_err);
            }
        }
        ConnectionState::Closed
    }
}
