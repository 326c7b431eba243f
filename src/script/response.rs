//! Response definitions
//!
//! Represents the outcome of one script command.

use std::fmt;

use crate::error::{ErrorCode, UfsError};

/// Response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
}

/// A response to print for a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Error kind (ERROR only); `None` for errors outside the storage taxonomy
    pub code: Option<ErrorCode>,

    /// Optional payload (result for OK, error message for ERROR)
    pub payload: Option<Vec<u8>>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<Vec<u8>>) -> Self {
        Self {
            status: Status::Ok,
            code: None,
            payload,
        }
    }

    /// Create an ERROR response from an error
    pub fn error(error: &UfsError) -> Self {
        Self {
            status: Status::Error,
            code: error.code(),
            payload: Some(error.to_string().into_bytes()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Status::Ok => f.write_str("OK")?,
            Status::Error => match self.code {
                Some(code) => write!(f, "ERR {}", code)?,
                None => f.write_str("ERR")?,
            },
        }

        if let Some(payload) = self.payload.as_ref().filter(|p| !p.is_empty()) {
            let separator = if self.status == Status::Error { ": " } else { " " };
            write!(f, "{}{}", separator, payload.escape_ascii())?;
        }

        Ok(())
    }
}
