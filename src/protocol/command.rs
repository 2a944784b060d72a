//! Command definitions
//!
//! Typed representations of the requests a client can send.

// == Command Kind ==
/// The operation a command line selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Set,
    Get,
    Delete,
}

impl CommandKind {
    /// All kinds, in the order they are advertised to clients.
    pub const ALL: [CommandKind; 3] = [CommandKind::Set, CommandKind::Get, CommandKind::Delete];

    /// The keyword that selects this command on the wire.
    pub fn keyword(self) -> &'static str {
        match self {
            CommandKind::Set => "set",
            CommandKind::Get => "get",
            CommandKind::Delete => "del",
        }
    }

    /// Looks up a kind by its exact wire keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// Argument count and usage string for this command.
    pub fn definition(self) -> CommandDefinition {
        match self {
            CommandKind::Set => CommandDefinition {
                arg_count: 3,
                usage: "[key] [ttl] [size]",
            },
            CommandKind::Get | CommandKind::Delete => CommandDefinition {
                arg_count: 1,
                usage: "[key]",
            },
        }
    }

    /// Comma separated keywords, e.g. `set,get,del`.
    pub fn supported_keywords() -> String {
        Self::ALL
            .iter()
            .map(|kind| kind.keyword())
            .collect::<Vec<_>>()
            .join(",")
    }
}

// == Command Definition ==
/// Shape of a command: how many arguments it takes and how to call it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDefinition {
    pub arg_count: usize,
    pub usage: &'static str,
}

// == Command ==
/// A parsed client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Store a payload; `payload` is filled in after the second read
    Set {
        key: String,
        ttl: u64,
        size: usize,
        payload: Vec<u8>,
    },

    /// Fetch a value by key
    Get { key: String },

    /// Remove a key
    Delete { key: String },
}

impl Command {
    /// Number of payload bytes the client must send after the command line.
    pub fn expected_payload(&self) -> Option<usize> {
        match self {
            Command::Set { size, .. } => Some(*size),
            _ => None,
        }
    }

    /// Attaches the payload read in the second phase of a `set`.
    ///
    /// Other commands carry no attachment and ignore it.
    pub fn attach_payload(&mut self, bytes: Vec<u8>) {
        if let Command::Set { payload, .. } = self {
            *payload = bytes;
        }
    }
}
