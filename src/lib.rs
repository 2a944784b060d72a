//! Mini Cache - An in-memory cache server speaking a line-oriented TCP protocol
//!
//! Stores opaque byte payloads under string keys, with TTL expiration and
//! LRU eviction.

pub mod cache;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tasks;

pub use config::Config;
pub use server::{serve, ServerState};
pub use tasks::spawn_cleanup_task;
