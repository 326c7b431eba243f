//! Block cursor
//!
//! A read/write position expressed as (block index, in-block offset).

use super::BLOCK_SIZE;

/// Position inside a block chain
///
/// `offset` ranges over `0..=BLOCK_SIZE`. An offset equal to `BLOCK_SIZE`
/// means "just past a full block"; the next read or write steps into the
/// following block before touching data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Index of the current block, counted from the head
    pub block: usize,

    /// Offset inside the current block
    pub offset: usize,
}

impl Cursor {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }

    /// Cursor for absolute byte position `pos`
    ///
    /// Exact multiples of `BLOCK_SIZE` land at the end of the previous
    /// block rather than the start of one that may not exist yet.
    pub fn from_position(pos: usize) -> Self {
        if pos > 0 && pos % BLOCK_SIZE == 0 {
            Self::new(pos / BLOCK_SIZE - 1, BLOCK_SIZE)
        } else {
            Self::new(pos / BLOCK_SIZE, pos % BLOCK_SIZE)
        }
    }

    /// Absolute byte position
    pub fn position(&self) -> usize {
        self.block * BLOCK_SIZE + self.offset
    }

    /// Whether the current block has no room left after the cursor
    pub fn at_block_end(&self) -> bool {
        self.offset == BLOCK_SIZE
    }

    /// Step to the start of the next block
    pub fn advance_block(&mut self) {
        self.block += 1;
        self.offset = 0;
    }
}
