//! Block chain
//!
//! Ordered, index-addressed sequence of blocks owned by one file.

use std::ops::{Index, IndexMut};

use crate::error::{Result, UfsError};

use super::{Block, BLOCK_SIZE};

/// The blocks of a single file, head first
///
/// Blocks live in a `Vec` so neighbours are reachable by index in both
/// directions and appending at the tail is amortized O(1).
/// The chain is never empty.
#[derive(Debug)]
pub struct BlockChain {
    blocks: Vec<Block>,
}

impl BlockChain {
    /// Create a chain holding one empty block
    pub fn new() -> Result<Self> {
        Ok(Self {
            blocks: vec![Block::try_new()?],
        })
    }

    /// Number of blocks in the chain (always >= 1)
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block at `index`
    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Mutable block at `index`
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    /// First block
    pub fn head(&self) -> &Block {
        &self.blocks[0]
    }

    /// Last block
    pub fn tail(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Whether a block follows `index`
    pub fn has_next(&self, index: usize) -> bool {
        index + 1 < self.blocks.len()
    }

    /// Attach a new empty block after the tail, returning its index
    pub fn append_block(&mut self) -> Result<usize> {
        self.try_grow(1)?;
        self.blocks.push(Block::try_new()?);
        Ok(self.blocks.len() - 1)
    }

    /// Make sure the chain can hold `bytes` bytes
    ///
    /// Every missing block is allocated before any is attached, so on
    /// `OutOfMemory` the chain is left exactly as it was.
    pub fn ensure_capacity(&mut self, bytes: usize) -> Result<()> {
        let wanted = bytes.div_ceil(BLOCK_SIZE).max(1);
        if wanted <= self.blocks.len() {
            return Ok(());
        }

        let missing = wanted - self.blocks.len();
        let mut fresh = Vec::new();
        fresh.try_reserve_exact(missing).map_err(|e| {
            UfsError::OutOfMemory(format!("block list growth failed: {}", e))
        })?;
        for _ in 0..missing {
            fresh.push(Block::try_new()?);
        }

        self.try_grow(missing)?;
        self.blocks.extend(fresh);
        Ok(())
    }

    /// Byte capacity of the chain as it stands
    pub fn capacity_bytes(&self) -> usize {
        self.blocks.len() * BLOCK_SIZE
    }

    /// Iterate blocks head to tail (reversible)
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Sum of `occupied` over every block, computed by a full scan
    ///
    /// Only for verification; the write path keeps the file size
    /// incrementally instead.
    pub fn occupied_total(&self) -> usize {
        self.blocks.iter().map(Block::occupied).sum()
    }

    /// Per-block occupancy, head first
    pub fn occupancy(&self) -> Vec<usize> {
        self.blocks.iter().map(Block::occupied).collect()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn try_grow(&mut self, additional: usize) -> Result<()> {
        self.blocks.try_reserve(additional).map_err(|e| {
            UfsError::OutOfMemory(format!("block list growth failed: {}", e))
        })
    }
}

impl Index<usize> for BlockChain {
    type Output = Block;

    fn index(&self, index: usize) -> &Block {
        &self.blocks[index]
    }
}

impl IndexMut<usize> for BlockChain {
    fn index_mut(&mut self, index: usize) -> &mut Block {
        &mut self.blocks[index]
    }
}
