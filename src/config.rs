//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8888;
const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024 * 1024;
const DEFAULT_MAX_ENTRIES: usize = 50_000;
const DEFAULT_CLEANUP_INTERVAL: u64 = 1;

/// Server configuration parameters.
///
/// Read once at startup and never changed afterwards. All values can be
/// configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the listener binds to
    pub server_host: String,
    /// TCP server port
    pub server_port: u16,
    /// Largest command line or `set` payload accepted, in bytes
    pub max_message_size: usize,
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Expiration sweep interval in seconds, 0 disables the sweep
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_HOST` - Listen address (default: 127.0.0.1)
    /// - `SERVER_PORT` - TCP port (default: 8888)
    /// - `MAX_MESSAGE_SIZE` - Max line or payload size in bytes (default: 1 MiB)
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 50000)
    /// - `CLEANUP_INTERVAL` - Expiration sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            server_port: env_or("SERVER_PORT", DEFAULT_PORT),
            max_message_size: env_or("MAX_MESSAGE_SIZE", DEFAULT_MAX_MESSAGE_SIZE),
            max_entries: env_or("MAX_ENTRIES", DEFAULT_MAX_ENTRIES),
            cleanup_interval: env_or("CLEANUP_INTERVAL", DEFAULT_CLEANUP_INTERVAL),
        }
    }

    /// Returns the `host:port` string the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: DEFAULT_HOST.to_string(),
            server_port: DEFAULT_PORT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            max_entries: DEFAULT_MAX_ENTRIES,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

// Unset or unparseable variables fall back to the default.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
