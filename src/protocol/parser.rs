//! Command Parser
//!
//! Turns one command line into a [`Command`] or a [`ParseError`].

use std::num::IntErrorKind;

use crate::error::{ArgumentError, ParseError};
use crate::protocol::command::{Command, CommandKind};

/// Parses a command line such as `set key 10 5`.
///
/// Words are split on any whitespace, so the trailing separator may still be
/// attached. `max_message_size` caps the payload a `set` may announce.
pub fn parse_command(line: &str, max_message_size: usize) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let keyword = words.next().ok_or(ParseError::Empty)?;
    let args: Vec<&str> = words.collect();

    let kind = CommandKind::from_keyword(keyword).ok_or_else(|| ParseError::UnknownCommand {
        name: keyword.to_string(),
        supported: CommandKind::supported_keywords(),
    })?;

    let definition = kind.definition();
    if args.len() != definition.arg_count {
        return Err(ParseError::Usage {
            keyword: kind.keyword(),
            usage: definition.usage,
        });
    }

    let key = args[0].to_string();
    let command = match kind {
        CommandKind::Set => {
            let ttl = parse_bounded(args[1], "ttl", None)?;
            let size = parse_bounded(args[2], "size", Some(max_message_size as u64))?;
            Command::Set {
                key,
                ttl,
                size: usize::try_from(size).map_err(|_| ArgumentError::TooLarge {
                    name: "size",
                    bound: max_message_size as u64,
                })?,
                payload: Vec::new(),
            }
        }
        CommandKind::Get => Command::Get { key },
        CommandKind::Delete => Command::Delete { key },
    };

    Ok(command)
}

// Non-negative integer, optionally capped. Values too large for u64 saturate
// and then face the cap like any other value.
fn parse_bounded(value: &str, name: &'static str, max: Option<u64>) -> Result<u64, ArgumentError> {
    let number = match value.parse::<i128>() {
        Ok(n) if n < 0 => return Err(ArgumentError::TooSmall { name, bound: 0 }),
        Ok(n) => u64::try_from(n).unwrap_or(u64::MAX),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => u64::MAX,
            IntErrorKind::NegOverflow => return Err(ArgumentError::TooSmall { name, bound: 0 }),
            _ => return Err(ArgumentError::NotInteger { name }),
        },
    };

    match max {
        Some(bound) if number > bound => Err(ArgumentError::TooLarge { name, bound }),
        _ => Ok(number),
    }
}
