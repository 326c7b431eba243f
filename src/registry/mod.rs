//! File Registry Module
//!
//! The flat namespace of files.
//!
//! ## Responsibilities
//! - One file per unique name
//! - Lookup, insert and removal by name
//! - Reference counting on behalf of the descriptor table
//! - Keeping unlinked-but-open files alive until their last close

mod file;
mod store;

pub use file::{File, FileId};
pub use store::FileRegistry;
