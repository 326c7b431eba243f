//! Script runner
//!
//! Reads commands line by line, executes them and writes one response per
//! command.

use std::io::{BufRead, Write};

use crate::engine::UserFs;
use crate::error::Result;

use super::{parse_command, Response};

/// Counters for a finished script run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Commands executed (parse failures included)
    pub commands: usize,

    /// Commands that produced an ERR response
    pub failures: usize,
}

/// Execute every command from `reader` against `fs`
///
/// Parse and storage errors are reported as `ERR` lines and the run goes
/// on; only I/O errors on `reader` or `writer` abort it.
pub fn run_script<R: BufRead, W: Write>(fs: &mut UserFs, reader: R, mut writer: W) -> Result<ScriptSummary> {
    let mut summary = ScriptSummary::default();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;

        let response = match parse_command(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => {
                tracing::trace!("line {}: {:?}", number + 1, command);
                let keyword = command.keyword();
                match fs.execute(command) {
                    Ok(payload) => Response::ok(payload),
                    Err(e) => {
                        tracing::debug!("line {}: {} failed: {}", number + 1, keyword, e);
                        Response::error(&e)
                    }
                }
            }
            Err(e) => {
                tracing::warn!("line {}: {}", number + 1, e);
                Response::error(&e)
            }
        };

        summary.commands += 1;
        if !response.is_ok() {
            summary.failures += 1;
        }

        writeln!(writer, "{}", response)?;
    }

    writer.flush()?;
    Ok(summary)
}
