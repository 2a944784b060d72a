//! TCP Listener
//!
//! Accepts client connections and spawns one task per connection.

use std::future::Future;

use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use super::connection::Connection;
use super::state::ServerState;

/// Accepts connections on `listener` until `shutdown` resolves.
///
/// Each client gets its own task running a [`Connection`]; all of them share
/// the cache in `state`. Connections already running are left to finish on
/// their own once accepting stops.
pub async fn serve<F>(listener: TcpListener, state: ServerState, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    // Disable Nagle's algorithm for low latency
                    if let Err(err) = stream.set_nodelay(true) {
                        debug!("Could not set TCP_NODELAY for {}: {}", addr, err);
                    }
                    info!("Accepted client from {}", addr);

                    let connection = Connection::new(stream, addr.to_string(), state.clone());
                    tokio::spawn(connection.run());
                }
                Err(err) => {
                    warn!("Failed to accept connection: {}", err);
                }
            },
            _ = &mut shutdown => {
                info!("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }
}
