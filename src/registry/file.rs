//! File
//!
//! A named file: its block chain, incremental size and reference count.

use crate::block::{BlockChain, Cursor};
use crate::error::{Result, UfsError};

/// Identifier of a file inside the registry arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub(crate) usize);

impl FileId {
    /// Raw arena index
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A file stored entirely in memory
///
/// ## Invariants
/// - `size == Σ block.occupied` over the chain, kept up to date by every
///   write without rescanning
/// - the chain holds at least one block
#[derive(Debug)]
pub struct File {
    /// File name (registry key while linked)
    name: String,

    /// Blocks holding the file's bytes
    chain: BlockChain,

    /// Total occupied bytes across the chain
    size: usize,

    /// How many descriptors are open on the file
    refs: usize,

    /// False once the name has been deleted from the registry
    linked: bool,
}

impl File {
    /// Create an empty file with a single empty block
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            chain: BlockChain::new()?,
            size: 0,
            refs: 0,
            linked: true,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn refs(&self) -> usize {
        self.refs
    }

    /// Whether the file is still reachable by name
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn chain(&self) -> &BlockChain {
        &self.chain
    }

    /// Number of blocks in the chain
    pub fn block_count(&self) -> usize {
        self.chain.len()
    }

    /// Write `data` at `cursor`, advancing it past the written bytes
    ///
    /// Fails with `NoMem` when the end offset would pass `max_size`, and
    /// with `OutOfMemory` when blocks cannot be allocated. Neither failure
    /// touches the file or the cursor.
    pub fn write(&mut self, cursor: &mut Cursor, data: &[u8], max_size: usize) -> Result<usize> {
        let start = cursor.position();
        let end = start.saturating_add(data.len());
        if end > max_size {
            return Err(UfsError::NoMem {
                requested: end,
                limit: max_size,
            });
        }

        if data.is_empty() {
            return Ok(0);
        }

        self.chain.ensure_capacity(end)?;

        let mut written = 0;
        while written < data.len() {
            if cursor.at_block_end() {
                cursor.advance_block();
            }

            let block = &mut self.chain[cursor.block];
            let (copied, grown) = block.write_at(cursor.offset, &data[written..]);

            cursor.offset += copied;
            self.size += grown;
            written += copied;
        }

        Ok(written)
    }

    /// Read into `buf` from `cursor`, advancing it past the bytes read
    ///
    /// Stops when `buf` is full or at the logical end of the data: a block
    /// that is not full, or the tail block.
    pub fn read(&self, cursor: &mut Cursor, buf: &mut [u8]) -> usize {
        let mut read = 0;
        while read < buf.len() {
            let block = &self.chain[cursor.block];
            let count = block.read_at(cursor.offset, &mut buf[read..]);

            cursor.offset += count;
            read += count;

            if read == buf.len() || !block.is_full() || !self.chain.has_next(cursor.block) {
                break;
            }
            cursor.advance_block();
        }

        read
    }

    // =========================================================================
    // Registry Bookkeeping
    // =========================================================================

    pub(crate) fn acquire(&mut self) {
        self.refs += 1;
    }

    pub(crate) fn release(&mut self) {
        debug_assert!(self.refs > 0, "release of '{}' with no open descriptors", self.name);
        self.refs = self.refs.saturating_sub(1);
    }

    pub(crate) fn unlink(&mut self) {
        self.linked = false;
    }
}
