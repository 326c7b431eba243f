//! Block buffer
//!
//! A single fixed-capacity block and its occupancy counter.

use crate::error::{Result, UfsError};

use super::BLOCK_SIZE;

/// One fixed-size block of file data
///
/// `occupied` counts the valid bytes at the front of the buffer. It only
/// ever grows: overwriting bytes inside the occupied region leaves it alone.
pub struct Block {
    /// Block memory, always exactly `BLOCK_SIZE` bytes
    memory: Box<[u8]>,

    /// How many bytes are occupied
    occupied: usize,
}

impl Block {
    /// Allocate an empty block
    ///
    /// Uses a fallible reservation so allocator exhaustion becomes an
    /// `OutOfMemory` error instead of an abort.
    pub fn try_new() -> Result<Self> {
        let mut memory = Vec::new();
        memory.try_reserve_exact(BLOCK_SIZE).map_err(|e| {
            UfsError::OutOfMemory(format!("block allocation failed: {}", e))
        })?;
        memory.resize(BLOCK_SIZE, 0);

        Ok(Self {
            memory: memory.into_boxed_slice(),
            occupied: 0,
        })
    }

    /// Number of valid bytes in this block
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// Whether every byte of the block holds data
    pub fn is_full(&self) -> bool {
        self.occupied == BLOCK_SIZE
    }

    /// The occupied prefix of the block
    pub fn data(&self) -> &[u8] {
        &self.memory[..self.occupied]
    }

    /// Copy as much of `src` as fits, starting at `offset`
    ///
    /// Returns `(copied, grown)`: the bytes copied and how far `occupied`
    /// advanced, which is what the owning file adds to its size.
    pub fn write_at(&mut self, offset: usize, src: &[u8]) -> (usize, usize) {
        debug_assert!(offset <= BLOCK_SIZE);

        let copied = src.len().min(BLOCK_SIZE - offset);
        let end = offset + copied;
        self.memory[offset..end].copy_from_slice(&src[..copied]);

        let grown = end.saturating_sub(self.occupied);
        self.occupied += grown;

        (copied, grown)
    }

    /// Copy occupied bytes starting at `offset` into `dst`
    ///
    /// Returns the number of bytes copied (0 when `offset` is at or past
    /// the occupied end).
    pub fn read_at(&self, offset: usize, dst: &mut [u8]) -> usize {
        let available = self.occupied.saturating_sub(offset);
        let count = dst.len().min(available);
        dst[..count].copy_from_slice(&self.memory[offset..offset + count]);
        count
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block")
            .field("occupied", &self.occupied)
            .finish()
    }
}
