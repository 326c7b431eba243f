//! Block Store Module
//!
//! Fixed-size memory blocks chained per file.
//!
//! ## Responsibilities
//! - Allocate empty blocks (fallibly, surfacing `OutOfMemory`)
//! - Keep each file's blocks in order, addressable by index
//! - Track how many bytes of each block hold valid data
//!
//! ## Layout
//! ```text
//! File "a" (size = 1100)
//! ┌───────────────┐ ┌───────────────┐ ┌───────────────┐
//! │ block 0       │ │ block 1       │ │ block 2       │
//! │ occupied 512  │◄►│ occupied 512  │◄►│ occupied 76   │
//! └───────────────┘ └───────────────┘ └───────────────┘
//!   head                                 tail
//! ```
//!
//! A cursor is `(block index, in-block offset)`; its absolute position is
//! `index * BLOCK_SIZE + offset`. Every block but the tail is full, so a
//! block with `occupied < BLOCK_SIZE` marks the logical end of the data.

mod buffer;
mod chain;
mod cursor;

pub use buffer::Block;
pub use chain::BlockChain;
pub use cursor::Cursor;

/// Capacity of one block in bytes
pub const BLOCK_SIZE: usize = 512;

/// Default maximum file size (100 MB)
pub const MAX_FILE_SIZE: usize = 100 * 1024 * 1024;
