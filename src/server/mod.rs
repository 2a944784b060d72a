//! Server Module
//!
//! TCP front end of the cache.
//!
//! ## Architecture
//! - One accept loop, stopped by a shutdown future
//! - One tokio task per client connection
//! - Every command runs against the shared cache under its write lock

mod connection;
mod listener;
mod state;

pub use connection::Connection;
pub use listener::serve;
pub use state::ServerState;
