//! Command definitions
//!
//! Represents one parsed script line.

use crate::engine::OpenFlags;

/// A parsed command
///
/// Descriptors are given as raw slot indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open { name: String, flags: OpenFlags },

    Write { fd: usize, data: Vec<u8> },

    Read { fd: usize, max_len: usize },

    Seek { fd: usize, position: usize },

    Tell { fd: usize },

    Close { fd: usize },

    Delete { name: String },

    Resize { fd: usize, size: usize },

    Stat { fd: usize },

    /// List linked file names
    List,

    /// Show the most recent error kind
    Errno,

    Destroy,
}

impl Command {
    /// Keyword the command is written with
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Open { .. } => "open",
            Command::Write { .. } => "write",
            Command::Read { .. } => "read",
            Command::Seek { .. } => "seek",
            Command::Tell { .. } => "tell",
            Command::Close { .. } => "close",
            Command::Delete { .. } => "delete",
            Command::Resize { .. } => "resize",
            Command::Stat { .. } => "stat",
            Command::List => "ls",
            Command::Errno => "errno",
            Command::Destroy => "destroy",
        }
    }
}
