//! Shared Engine
//!
//! A cloneable, thread-safe handle around a single `UserFs`.
//!
//! Every call takes one global lock for its whole duration, so operations
//! from different threads never interleave. There is no finer-grained
//! locking.

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;

use crate::config::Config;
use crate::descriptor::Fd;
use crate::engine::{FileStat, OpenFlags, UserFs};
use crate::error::{ErrorCode, Result};

/// Thread-safe wrapper serializing access to one filesystem
#[derive(Debug, Clone, Default)]
pub struct SharedUserFs {
    inner: Arc<Mutex<UserFs>>,
}

impl SharedUserFs {
    pub fn new() -> Self {
        Self::from_engine(UserFs::new())
    }

    pub fn with_config(config: Config) -> Self {
        Self::from_engine(UserFs::with_config(config))
    }

    /// Wrap an existing engine
    pub fn from_engine(engine: UserFs) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn open(&self, name: &str, flags: OpenFlags) -> Result<Fd> {
        self.inner.lock().open(name, flags)
    }

    pub fn write(&self, fd: Fd, data: &[u8]) -> Result<usize> {
        self.inner.lock().write(fd, data)
    }

    pub fn read(&self, fd: Fd, buf: &mut [u8]) -> Result<usize> {
        self.inner.lock().read(fd, buf)
    }

    pub fn read_bytes(&self, fd: Fd, max_len: usize) -> Result<Bytes> {
        self.inner.lock().read_bytes(fd, max_len)
    }

    pub fn seek(&self, fd: Fd, position: usize) -> Result<usize> {
        self.inner.lock().seek(fd, position)
    }

    pub fn tell(&self, fd: Fd) -> Result<usize> {
        self.inner.lock().tell(fd)
    }

    /// Always fails with `NotImplemented`
    pub fn resize(&self, fd: Fd, new_size: usize) -> Result<()> {
        self.inner.lock().resize(fd, new_size)
    }

    pub fn close(&self, fd: Fd) -> Result<()> {
        self.inner.lock().close(fd)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        self.inner.lock().delete(name)
    }

    pub fn stat(&self, fd: Fd) -> Result<FileStat> {
        self.inner.lock().stat(fd)
    }

    pub fn destroy(&self) {
        self.inner.lock().destroy()
    }

    /// Most recent error kind recorded by any thread
    pub fn last_error(&self) -> ErrorCode {
        self.inner.lock().last_error()
    }

    /// Run several operations under one lock acquisition
    pub fn with<R>(&self, f: impl FnOnce(&mut UserFs) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
