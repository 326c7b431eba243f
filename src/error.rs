//! Error types for userfs
//!
//! Provides a unified error type for all operations, plus the `ErrorCode`
//! kind that the engine records for `last_error()`.

use std::fmt;

use thiserror::Error;

/// Result type alias using UfsError
pub type Result<T> = std::result::Result<T, UfsError>;

/// Unified error type for userfs operations
#[derive(Debug, Error)]
pub enum UfsError {
    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    /// Unknown file name, or a handle that is out of range, closed or stale
    #[error("No such file or descriptor")]
    NoFile,

    /// The descriptor's access mode forbids the operation
    #[error("Permission denied")]
    NoPermission,

    /// The write would grow the file past its maximum size
    #[error("File size limit exceeded: {requested} bytes (max {limit})")]
    NoMem { requested: usize, limit: usize },

    #[error("Operation not implemented: {0}")]
    NotImplemented(&'static str),

    /// The allocator refused memory for a block or descriptor slot
    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    #[error("Invalid position {position} (file size {size})")]
    InvalidPosition { position: usize, size: usize },

    // -------------------------------------------------------------------------
    // Script Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl UfsError {
    /// The recorded error kind, if this error comes from a storage operation
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            UfsError::NoFile => Some(ErrorCode::NoFile),
            UfsError::NoPermission => Some(ErrorCode::NoPermission),
            UfsError::NoMem { .. } => Some(ErrorCode::NoMem),
            UfsError::NotImplemented(_) => Some(ErrorCode::NotImplemented),
            UfsError::OutOfMemory(_) => Some(ErrorCode::OutOfMemory),
            UfsError::InvalidPosition { .. } => Some(ErrorCode::InvalidArgument),
            UfsError::Io(_) | UfsError::Parse(_) => None,
        }
    }
}

/// Kind of the most recent storage error, as reported by `last_error()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCode {
    /// No error has been recorded yet
    #[default]
    NoErr,
    NoFile,
    NoMem,
    NoPermission,
    NotImplemented,
    OutOfMemory,
    InvalidArgument,
}

impl ErrorCode {
    /// Short upper-case name used by the script front-end
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoErr => "NO_ERR",
            ErrorCode::NoFile => "NO_FILE",
            ErrorCode::NoMem => "NO_MEM",
            ErrorCode::NoPermission => "NO_PERMISSION",
            ErrorCode::NotImplemented => "NOT_IMPLEMENTED",
            ErrorCode::OutOfMemory => "OUT_OF_MEMORY",
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
