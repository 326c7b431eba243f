//! # userfs
//!
//! An in-memory filesystem with:
//! - Files stored as chains of fixed-size 512-byte blocks
//! - Integer descriptors with per-descriptor cursors and access modes
//! - Incremental size bookkeeping and a 100 MB per-file cap
//! - A queryable "last error" alongside ordinary `Result` returns
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Storage API (UserFs)                         │
//! │     open / read / write / close / delete / destroy           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Descriptor  │  FileId  │    File     │
//!   │   Table     │─────────►│  Registry   │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │ Block Store │
//!                           │  (chains)   │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod block;
pub mod registry;
pub mod descriptor;
pub mod script;
pub mod engine;
pub mod shared;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use block::{BLOCK_SIZE, MAX_FILE_SIZE};
pub use config::Config;
pub use descriptor::{Fd, OpenMode};
pub use engine::{FileStat, OpenFlags, UserFs};
pub use error::{ErrorCode, Result, UfsError};
pub use shared::SharedUserFs;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of userfs
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
