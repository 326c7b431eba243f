//! Script Module
//!
//! A line-oriented text front-end for driving the filesystem, used by the
//! `userfs-cli` binary.
//!
//! ## Command Format
//! One command per line; blank lines and lines starting with `#` are
//! skipped.
//! ```text
//! open   <name> [default|create|ro|wo|rw|<bits>]
//! write  <fd> <text...>        (escapes: \n \t \0 \\)
//! read   <fd> <max_len>
//! seek   <fd> <position>
//! tell   <fd>
//! close  <fd>
//! delete <name>
//! resize <fd> <size>
//! stat   <fd>
//! ls
//! errno
//! destroy
//! ```
//!
//! ### Response Format
//! ```text
//! OK [payload]
//! ERR <CODE>: <message>
//! ```

mod command;
mod parser;
mod response;
mod runner;

pub use command::Command;
pub use parser::{parse_command, unescape};
pub use response::{Response, Status};
pub use runner::{run_script, ScriptSummary};
