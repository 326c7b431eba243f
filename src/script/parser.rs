//! Script parser
//!
//! Turns one text line into a `Command`.

use crate::engine::OpenFlags;
use crate::error::{Result, UfsError};

use super::Command;

/// Parse a single script line
///
/// Returns `Ok(None)` for blank lines and `#` comments.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = split_word(trimmed);

    let command = match keyword {
        "open" => {
            let (name, rest) = split_word(rest);
            let name = required(name, "open", "file name")?;
            let (flags, rest) = split_word(rest);
            expect_end(rest, "open")?;

            Command::Open {
                name: name.to_string(),
                flags: parse_flags(flags)?,
            }
        }
        "write" => {
            let (fd, rest) = split_word(rest);
            Command::Write {
                fd: parse_number(fd, "write", "descriptor")?,
                data: unescape(rest)?,
            }
        }
        "read" => {
            let (fd, max_len) = two_numbers(rest, "read", "max_len")?;
            Command::Read { fd, max_len }
        }
        "seek" => {
            let (fd, position) = two_numbers(rest, "seek", "position")?;
            Command::Seek { fd, position }
        }
        "resize" => {
            let (fd, size) = two_numbers(rest, "resize", "size")?;
            Command::Resize { fd, size }
        }
        "tell" => Command::Tell {
            fd: one_number(rest, "tell")?,
        },
        "close" => Command::Close {
            fd: one_number(rest, "close")?,
        },
        "stat" => Command::Stat {
            fd: one_number(rest, "stat")?,
        },
        "delete" => {
            let (name, rest) = split_word(rest);
            let name = required(name, "delete", "file name")?;
            expect_end(rest, "delete")?;
            Command::Delete {
                name: name.to_string(),
            }
        }
        "ls" => {
            expect_end(rest, "ls")?;
            Command::List
        }
        "errno" => {
            expect_end(rest, "errno")?;
            Command::Errno
        }
        "destroy" => {
            expect_end(rest, "destroy")?;
            Command::Destroy
        }
        other => return Err(UfsError::Parse(format!("unknown command '{}'", other))),
    };

    Ok(Some(command))
}

/// Decode the escapes `\n`, `\t`, `\r`, `\0`, `\\` and `\xHH`
pub fn unescape(text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    let mut bytes = text.bytes();

    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }

        match bytes.next() {
            Some(b'n') => out.push(b'\n'),
            Some(b't') => out.push(b'\t'),
            Some(b'r') => out.push(b'\r'),
            Some(b'0') => out.push(0),
            Some(b'\\') => out.push(b'\\'),
            Some(b'x') => {
                let hex = [bytes.next(), bytes.next()];
                let value = match hex {
                    [Some(hi), Some(lo)] => std::str::from_utf8(&[hi, lo])
                        .ok()
                        .and_then(|s| u8::from_str_radix(s, 16).ok()),
                    _ => None,
                };
                out.push(value.ok_or_else(|| UfsError::Parse("bad \\x escape".to_string()))?);
            }
            Some(other) => {
                return Err(UfsError::Parse(format!("unknown escape '\\{}'", other as char)));
            }
            None => return Err(UfsError::Parse("dangling '\\' at end of line".to_string())),
        }
    }

    Ok(out)
}

// =============================================================================
// Private Helpers
// =============================================================================

/// Split off the first whitespace-delimited word
///
/// The remainder keeps everything after the single separator that ended
/// the word, so `write` payloads preserve their inner spacing.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => {
            let (word, rest) = s.split_at(idx);
            let mut chars = rest.chars();
            chars.next();
            (word, chars.as_str())
        }
        None => (s, ""),
    }
}

fn parse_flags(word: &str) -> Result<OpenFlags> {
    match word {
        "" | "default" => Ok(OpenFlags::Default),
        "create" => Ok(OpenFlags::Create),
        "ro" => Ok(OpenFlags::ReadOnly),
        "wo" => Ok(OpenFlags::WriteOnly),
        "rw" => Ok(OpenFlags::ReadWrite),
        other => other
            .parse::<u32>()
            .ok()
            .and_then(OpenFlags::from_bits)
            .ok_or_else(|| UfsError::Parse(format!("invalid open flags '{}'", other))),
    }
}

fn parse_number(word: &str, command: &str, what: &str) -> Result<usize> {
    let word = required(word, command, what)?;
    word.parse()
        .map_err(|_| UfsError::Parse(format!("{}: {} must be a number, got '{}'", command, what, word)))
}

fn required<'a>(word: &'a str, command: &str, what: &str) -> Result<&'a str> {
    if word.is_empty() {
        return Err(UfsError::Parse(format!("{}: missing {}", command, what)));
    }
    Ok(word)
}

fn expect_end(rest: &str, command: &str) -> Result<()> {
    if rest.trim().is_empty() {
        Ok(())
    } else {
        Err(UfsError::Parse(format!("{}: unexpected argument '{}'", command, rest.trim())))
    }
}

fn one_number(rest: &str, command: &str) -> Result<usize> {
    let (fd, rest) = split_word(rest);
    let fd = parse_number(fd, command, "descriptor")?;
    expect_end(rest, command)?;
    Ok(fd)
}

fn two_numbers(rest: &str, command: &str, second: &str) -> Result<(usize, usize)> {
    let (fd, rest) = split_word(rest);
    let (value, rest) = split_word(rest);
    let fd = parse_number(fd, command, "descriptor")?;
    let value = parse_number(value, command, second)?;
    expect_end(rest, command)?;
    Ok((fd, value))
}
