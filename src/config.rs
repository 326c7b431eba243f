//! Configuration for userfs
//!
//! Centralized configuration with sensible defaults.

use crate::block::MAX_FILE_SIZE;

/// Main configuration for a userfs instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // File Limits
    // -------------------------------------------------------------------------
    /// Largest size (in bytes) a single file may grow to.
    /// Writes whose end offset would pass this fail with `NoMem`.
    pub max_file_size: usize,

    // -------------------------------------------------------------------------
    // Descriptor Table
    // -------------------------------------------------------------------------
    /// Slot capacity reserved the first time the table grows.
    /// Later growth doubles the capacity.
    pub initial_descriptor_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE, // 100 MB
            initial_descriptor_capacity: 2,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the maximum file size (in bytes)
    pub fn max_file_size(mut self, size: usize) -> Self {
        self.config.max_file_size = size;
        self
    }

    /// Set the initial descriptor table capacity (clamped to at least 1)
    pub fn initial_descriptor_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_descriptor_capacity = capacity.max(1);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
