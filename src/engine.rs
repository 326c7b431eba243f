//! Engine Module
//!
//! The storage engine that composes the block store, file registry and
//! descriptor table behind the public file API.
//!
//! ## Responsibilities
//! - Validate handles and access modes
//! - Create files on `open` with `Create`
//! - Route reads and writes to the right block chain
//! - Record the most recent error for `last_error()`

use bytes::{Bytes, BytesMut};

use crate::block::Cursor;
use crate::config::Config;
use crate::descriptor::{DescriptorTable, Fd, OpenMode};
use crate::error::{ErrorCode, Result, UfsError};
use crate::registry::{File, FileRegistry};
use crate::script::Command;

/// Flags accepted by `open`
///
/// Exactly one flag is passed per call; they do not combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenFlags {
    /// Open an existing file read-write
    #[default]
    Default,

    /// Open read-write, creating the file if it does not exist
    Create,

    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl OpenFlags {
    /// Numeric flag value (0, 1, 2, 4, 8)
    pub fn bits(&self) -> u32 {
        match self {
            OpenFlags::Default => 0,
            OpenFlags::Create => 1,
            OpenFlags::ReadOnly => 2,
            OpenFlags::WriteOnly => 4,
            OpenFlags::ReadWrite => 8,
        }
    }

    /// Parse a numeric flag value
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0 => Some(OpenFlags::Default),
            1 => Some(OpenFlags::Create),
            2 => Some(OpenFlags::ReadOnly),
            4 => Some(OpenFlags::WriteOnly),
            8 => Some(OpenFlags::ReadWrite),
            _ => None,
        }
    }

    /// Access mode granted by these flags
    pub fn mode(&self) -> OpenMode {
        match self {
            OpenFlags::ReadOnly => OpenMode::ReadOnly,
            OpenFlags::WriteOnly => OpenMode::WriteOnly,
            OpenFlags::Default | OpenFlags::Create | OpenFlags::ReadWrite => OpenMode::ReadWrite,
        }
    }
}

/// Snapshot of a descriptor and the file behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub name: String,
    pub size: usize,
    pub blocks: usize,
    pub refs: usize,
    /// False once the name was deleted while this descriptor stayed open
    pub linked: bool,
    pub mode: OpenMode,
    pub position: usize,
}

/// The in-memory filesystem
///
/// ## Concurrency Model
/// Single owner, run-to-completion. Every mutating operation takes
/// `&mut self`, so no locking happens here; wrap the engine in
/// [`SharedUserFs`](crate::SharedUserFs) to share it between threads.
///
/// ## Error Reporting
/// Every fallible operation returns a `Result`. The kind of the most
/// recent failure is also kept in `last_error`, which successful calls
/// leave untouched.
///
/// ## Deleting Open Files
/// `delete` removes the name at once. Descriptors already open on the file
/// keep working on the unlinked file, whose blocks are freed by the last
/// `close`.
#[derive(Debug)]
pub struct UserFs {
    /// Engine configuration
    config: Config,

    /// Named files and their block chains
    registry: FileRegistry,

    /// Open descriptors
    descriptors: DescriptorTable,

    /// Kind of the most recent error
    last_error: ErrorCode,
}

impl UserFs {
    /// Create an empty filesystem with default limits
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an empty filesystem with the given config
    pub fn with_config(config: Config) -> Self {
        let descriptors = DescriptorTable::new(config.initial_descriptor_capacity);

        Self {
            config,
            registry: FileRegistry::new(),
            descriptors,
            last_error: ErrorCode::NoErr,
        }
    }

    /// Execute a script command
    ///
    /// Descriptor arguments are raw slot indices and are resolved to the
    /// handle currently living in that slot.
    pub fn execute(&mut self, command: Command) -> Result<Option<Vec<u8>>> {
        match command {
            Command::Open { name, flags } => {
                let fd = self.open(&name, flags)?;
                Ok(Some(fd.index().to_string().into_bytes()))
            }
            Command::Write { fd, data } => {
                let written = self.write(self.fd_from_index(fd), &data)?;
                Ok(Some(written.to_string().into_bytes()))
            }
            Command::Read { fd, max_len } => {
                let data = self.read_bytes(self.fd_from_index(fd), max_len)?;
                Ok(Some(data.to_vec()))
            }
            Command::Seek { fd, position } => {
                let position = self.seek(self.fd_from_index(fd), position)?;
                Ok(Some(position.to_string().into_bytes()))
            }
            Command::Tell { fd } => {
                let position = self.tell(self.fd_from_index(fd))?;
                Ok(Some(position.to_string().into_bytes()))
            }
            Command::Close { fd } => {
                self.close(self.fd_from_index(fd))?;
                Ok(None)
            }
            Command::Delete { name } => {
                self.delete(&name)?;
                Ok(None)
            }
            Command::Resize { fd, size } => {
                self.resize(self.fd_from_index(fd), size)?;
                Ok(None)
            }
            Command::Stat { fd } => {
                let stat = self.stat(self.fd_from_index(fd))?;
                Ok(Some(
                    format!(
                        "name={} size={} blocks={} refs={} linked={} mode={} pos={}",
                        stat.name, stat.size, stat.blocks, stat.refs, stat.linked, stat.mode, stat.position
                    )
                    .into_bytes(),
                ))
            }
            Command::List => Ok(Some(self.file_names().join(" ").into_bytes())),
            Command::Errno => Ok(Some(self.last_error.as_str().as_bytes().to_vec())),
            Command::Destroy => {
                self.destroy();
                Ok(None)
            }
        }
    }

    /// Open `name`, returning a new descriptor handle
    ///
    /// - `Create`: opens an existing file read-write, or creates an empty one
    /// - anything else: the file must exist (`NoFile` otherwise); `Default`
    ///   opens read-write, the mode flags open with that mode
    pub fn open(&mut self, name: &str, flags: OpenFlags) -> Result<Fd> {
        let result = self.open_internal(name, flags);
        self.record(result)
    }

    /// Write `data` at the descriptor's cursor
    ///
    /// Returns `data.len()` on success. A write whose end would pass the
    /// maximum file size fails with `NoMem` and changes nothing.
    pub fn write(&mut self, fd: Fd, data: &[u8]) -> Result<usize> {
        let result = self.write_internal(fd, data);
        self.record(result)
    }

    /// Read up to `buf.len()` bytes from the descriptor's cursor
    ///
    /// Returns the number of bytes read; 0 at end of file.
    pub fn read(&mut self, fd: Fd, buf: &mut [u8]) -> Result<usize> {
        let result = self.read_internal(fd, buf);
        self.record(result)
    }

    /// Read up to `max_len` bytes into a fresh buffer
    ///
    /// The buffer is sized to what is left of the file, so `max_len` may
    /// be arbitrarily large.
    pub fn read_bytes(&mut self, fd: Fd, max_len: usize) -> Result<Bytes> {
        let remaining = self.readable_remaining(fd);
        let remaining = self.record(remaining)?;

        let mut buf = BytesMut::zeroed(max_len.min(remaining));
        let count = self.read(fd, &mut buf)?;
        buf.truncate(count);
        Ok(buf.freeze())
    }

    /// Close a descriptor
    pub fn close(&mut self, fd: Fd) -> Result<()> {
        let result = self.descriptors.release(&mut self.registry, fd);
        if result.is_ok() {
            tracing::debug!("Closed fd {}", fd);
        }
        self.record(result)
    }

    /// Delete the file called `name`
    ///
    /// Succeeds even while descriptors are open on the file; see the type
    /// docs for what happens to them.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let result = self.delete_internal(name);
        self.record(result)
    }

    /// Move the descriptor's cursor to absolute byte `position`
    ///
    /// Positions past the end of the file are rejected (no sparse files).
    pub fn seek(&mut self, fd: Fd, position: usize) -> Result<usize> {
        let result = self.seek_internal(fd, position);
        self.record(result)
    }

    /// Current absolute position of the descriptor's cursor
    pub fn tell(&mut self, fd: Fd) -> Result<usize> {
        let result = self.descriptors.resolve(fd).map(|d| d.cursor.position());
        self.record(result)
    }

    /// Change a file's size. Not supported.
    pub fn resize(&mut self, fd: Fd, new_size: usize) -> Result<()> {
        tracing::debug!("Resize of fd {} to {} bytes requested", fd, new_size);
        self.record(Err(UfsError::NotImplemented("resize")))
    }

    /// Free every file, block and descriptor
    ///
    /// Every handle issued before the call stops resolving. The engine is
    /// empty afterwards and may be used again.
    pub fn destroy(&mut self) {
        let descriptors = self.descriptors.clear();
        let (files, blocks) = self.registry.clear();

        tracing::info!(
            "Filesystem destroyed: {} files, {} blocks, {} open descriptors released",
            files,
            blocks,
            descriptors
        );
    }

    /// Kind of the most recent error recorded by any operation
    pub fn last_error(&self) -> ErrorCode {
        self.last_error
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    //
    // These inspect state without recording errors.
    // =========================================================================

    /// Describe the descriptor `fd` and its file
    pub fn stat(&self, fd: Fd) -> Result<FileStat> {
        let descriptor = self.descriptors.resolve(fd)?;
        let file = self.registry.get(descriptor.file).ok_or(UfsError::NoFile)?;

        Ok(FileStat {
            name: file.name().to_string(),
            size: file.size(),
            blocks: file.block_count(),
            refs: file.refs(),
            linked: file.is_linked(),
            mode: descriptor.mode,
            position: descriptor.cursor.position(),
        })
    }

    /// Size of the file called `name`
    pub fn file_size(&self, name: &str) -> Result<usize> {
        Ok(self.linked_file(name)?.size())
    }

    /// Occupied bytes of each block of `name`, head first
    pub fn block_occupancy(&self, name: &str) -> Result<Vec<usize>> {
        Ok(self.linked_file(name)?.chain().occupancy())
    }

    /// Names of all linked files, sorted
    pub fn file_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Number of linked files
    pub fn file_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of files still holding memory, unlinked ones included
    pub fn live_file_count(&self) -> usize {
        self.registry.live_count()
    }

    /// Number of open descriptors
    pub fn open_descriptor_count(&self) -> usize {
        self.descriptors.len()
    }

    /// Reserved descriptor slots
    pub fn descriptor_capacity(&self) -> usize {
        self.descriptors.capacity()
    }

    /// Handle currently living in slot `index`
    pub fn fd_from_index(&self, index: usize) -> Fd {
        self.descriptors.fd_at(index)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Remember the kind of a failed result
    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(ref e) = result {
            if let Some(code) = e.code() {
                self.last_error = code;
            }
        }
        result
    }

    fn linked_file(&self, name: &str) -> Result<&File> {
        let id = self.registry.lookup(name).ok_or(UfsError::NoFile)?;
        self.registry.get(id).ok_or(UfsError::NoFile)
    }

    fn open_internal(&mut self, name: &str, flags: OpenFlags) -> Result<Fd> {
        let file = match (flags, self.registry.lookup(name)) {
            (_, Some(id)) => id,
            (OpenFlags::Create, None) => {
                let file = File::new(name)?;
                let id = match self.registry.insert(file) {
                    Ok(id) => id,
                    Err(existing) => self.registry.lookup(existing.name()).ok_or(UfsError::NoFile)?,
                };
                tracing::debug!("Created file '{}'", name);
                id
            }
            (_, None) => return Err(UfsError::NoFile),
        };

        let fd = self.descriptors.create(&mut self.registry, file, flags.mode())?;
        tracing::debug!("Opened '{}' as fd {} ({})", name, fd, flags.mode());
        Ok(fd)
    }

    fn write_internal(&mut self, fd: Fd, data: &[u8]) -> Result<usize> {
        let max_size = self.config.max_file_size;

        let descriptor = self.descriptors.resolve_mut(fd)?;
        if !descriptor.mode.can_write() {
            return Err(UfsError::NoPermission);
        }

        let file = self.registry.get_mut(descriptor.file).ok_or(UfsError::NoFile)?;
        let written = match file.write(&mut descriptor.cursor, data, max_size) {
            Ok(written) => written,
            Err(e) => {
                tracing::warn!("Write of {} bytes to fd {} failed: {}", data.len(), fd, e);
                return Err(e);
            }
        };

        tracing::trace!(
            "fd {}: wrote {} bytes, file '{}' now {} bytes",
            fd,
            written,
            file.name(),
            file.size()
        );
        Ok(written)
    }

    fn read_internal(&mut self, fd: Fd, buf: &mut [u8]) -> Result<usize> {
        let descriptor = self.descriptors.resolve_mut(fd)?;
        if !descriptor.mode.can_read() {
            return Err(UfsError::NoPermission);
        }

        let file = self.registry.get(descriptor.file).ok_or(UfsError::NoFile)?;
        let read = file.read(&mut descriptor.cursor, buf);

        tracing::trace!("fd {}: read {} of {} requested bytes", fd, read, buf.len());
        Ok(read)
    }

    /// Bytes between a readable descriptor's cursor and the end of its file
    fn readable_remaining(&self, fd: Fd) -> Result<usize> {
        let descriptor = self.descriptors.resolve(fd)?;
        if !descriptor.mode.can_read() {
            return Err(UfsError::NoPermission);
        }

        let file = self.registry.get(descriptor.file).ok_or(UfsError::NoFile)?;
        Ok(file.size().saturating_sub(descriptor.cursor.position()))
    }

    fn delete_internal(&mut self, name: &str) -> Result<()> {
        let refs = self.linked_file(name)?.refs();
        if refs > 0 {
            tracing::warn!("Deleting '{}' while {} descriptors are open on it", name, refs);
        }

        self.registry.remove(name);
        tracing::debug!("Deleted file '{}'", name);
        Ok(())
    }

    fn seek_internal(&mut self, fd: Fd, position: usize) -> Result<usize> {
        let descriptor = self.descriptors.resolve_mut(fd)?;
        let file = self.registry.get(descriptor.file).ok_or(UfsError::NoFile)?;

        if position > file.size() {
            return Err(UfsError::InvalidPosition {
                position,
                size: file.size(),
            });
        }

        descriptor.cursor = Cursor::from_position(position);
        Ok(position)
    }
}

impl Default for UserFs {
    fn default() -> Self {
        Self::new()
    }
}
