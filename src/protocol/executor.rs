//! Command Executor
//!
//! Applies parsed commands to the cache store.

use crate::cache::CacheStore;
use crate::protocol::command::Command;
use crate::protocol::response::Response;

/// Executes `command` against `cache` and returns the response to send.
///
/// Callers hold the cache lock for the whole call, so each command is
/// applied atomically.
pub fn execute_command(command: Command, cache: &mut CacheStore) -> Response {
    match command {
        Command::Set {
            key, ttl, payload, ..
        } => {
            if cache.set(key, payload, ttl) {
                Response::Success
            } else {
                Response::Failure
            }
        }
        Command::Get { key } => match cache.get(&key) {
            Some(value) => Response::Value(value.to_vec()),
            None => Response::NotFound,
        },
        Command::Delete { key } => {
            if cache.delete(&key) {
                Response::Success
            } else {
                Response::Failure
            }
        }
    }
}
