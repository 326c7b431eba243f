//! Descriptor Module
//!
//! Integer handles onto open files.
//!
//! ## Responsibilities
//! - Hand out small, reusable handle values
//! - Track access mode and cursor per open view
//! - Detect closed and stale handles instead of dangling
//!
//! ## Handle Format
//! ```text
//! ┌──────────────────────┬──────────────────────┐
//! │ index (slot number)  │ generation (per slot)│
//! └──────────────────────┴──────────────────────┘
//! ```
//! The index is the caller-visible small integer. The generation is bumped
//! every time the slot is released, so a handle kept past its `close`
//! no longer matches once the slot is reused.

mod table;

pub use table::{Descriptor, DescriptorTable};

use std::fmt;

/// Access mode of a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl OpenMode {
    pub fn can_read(&self) -> bool {
        matches!(self, OpenMode::ReadOnly | OpenMode::ReadWrite)
    }

    pub fn can_write(&self) -> bool {
        matches!(self, OpenMode::WriteOnly | OpenMode::ReadWrite)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OpenMode::ReadOnly => "ro",
            OpenMode::WriteOnly => "wo",
            OpenMode::ReadWrite => "rw",
        }
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to an open descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fd {
    index: usize,
    generation: u32,
}

impl Fd {
    /// Build a handle from its parts
    ///
    /// Mostly useful for probing: a handle that was never issued simply
    /// fails to resolve.
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// The small integer handle value
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Fd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}
