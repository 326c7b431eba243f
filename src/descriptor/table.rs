//! Descriptor Table
//!
//! Slot map of open descriptors with lowest-slot reuse and doubling growth.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::block::Cursor;
use crate::error::{Result, UfsError};
use crate::registry::{FileId, FileRegistry};

use super::{Fd, OpenMode};

/// One open view onto a file
#[derive(Debug, Clone)]
pub struct Descriptor {
    /// File the descriptor points at
    pub file: FileId,

    /// Access mode granted at open
    pub mode: OpenMode,

    /// Next read/write position
    pub cursor: Cursor,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    descriptor: Option<Descriptor>,
}

/// Table of open descriptors
///
/// ## Slot Reuse
/// Released slots go to a min-heap so the next `create` always takes the
/// lowest free index, keeping handle values small under churn.
///
/// ## Growth
/// When no slot is free the capacity doubles (starting from the configured
/// initial capacity), reserved fallibly.
#[derive(Debug)]
pub struct DescriptorTable {
    slots: Vec<Slot>,

    /// Free slot indices, lowest first
    free: BinaryHeap<Reverse<usize>>,

    /// Reserved slot capacity
    capacity: usize,

    /// Capacity used for the first growth
    initial_capacity: usize,

    /// Number of occupied slots
    open: usize,

    /// Generation given to newly pushed slots; raised by `clear` so handles
    /// from before the clear never match a new slot
    base_generation: u32,
}

impl DescriptorTable {
    /// Create an empty table; nothing is reserved until the first `create`
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: BinaryHeap::new(),
            capacity: 0,
            initial_capacity: initial_capacity.max(1),
            open: 0,
            base_generation: 0,
        }
    }

    /// Open a descriptor on `file` with `mode`
    ///
    /// Increments the file's reference count. Fails with `NoFile` if the
    /// file is not in the registry, or `OutOfMemory` if the table cannot
    /// grow.
    pub fn create(&mut self, registry: &mut FileRegistry, file: FileId, mode: OpenMode) -> Result<Fd> {
        if registry.get(file).is_none() {
            return Err(UfsError::NoFile);
        }

        let index = match self.free.pop() {
            Some(Reverse(index)) => index,
            None => {
                self.grow()?;
                self.slots.push(Slot {
                    generation: self.base_generation,
                    descriptor: None,
                });
                self.slots.len() - 1
            }
        };

        registry.acquire(file);

        let slot = &mut self.slots[index];
        slot.descriptor = Some(Descriptor {
            file,
            mode,
            cursor: Cursor::default(),
        });
        self.open += 1;

        Ok(Fd::new(index, slot.generation))
    }

    /// Close `fd`, decrementing its file's reference count
    pub fn release(&mut self, registry: &mut FileRegistry, fd: Fd) -> Result<()> {
        let slot = self.slot_mut(fd)?;
        let descriptor = slot.descriptor.take().ok_or(UfsError::NoFile)?;
        slot.generation = slot.generation.wrapping_add(1);

        self.free.push(Reverse(fd.index()));
        self.open -= 1;
        registry.release(descriptor.file);

        Ok(())
    }

    /// Look up the descriptor behind `fd`
    pub fn resolve(&self, fd: Fd) -> Result<&Descriptor> {
        self.slots
            .get(fd.index())
            .filter(|slot| slot.generation == fd.generation())
            .and_then(|slot| slot.descriptor.as_ref())
            .ok_or(UfsError::NoFile)
    }

    /// Mutable lookup of the descriptor behind `fd`
    pub fn resolve_mut(&mut self, fd: Fd) -> Result<&mut Descriptor> {
        self.slot_mut(fd)?.descriptor.as_mut().ok_or(UfsError::NoFile)
    }

    /// Handle currently valid for slot `index`
    ///
    /// For an empty or out-of-range slot the returned handle fails to
    /// resolve.
    pub fn fd_at(&self, index: usize) -> Fd {
        let generation = self
            .slots
            .get(index)
            .map_or(self.base_generation, |slot| slot.generation);
        Fd::new(index, generation)
    }

    /// Number of open descriptors
    pub fn len(&self) -> usize {
        self.open
    }

    pub fn is_empty(&self) -> bool {
        self.open == 0
    }

    /// Reserved slot capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every descriptor and slot, returning how many were open
    ///
    /// Reference counts are not touched; callers clear the registry too.
    pub fn clear(&mut self) -> usize {
        let open = self.open;
        let newest = self.slots.iter().map(|slot| slot.generation).max();
        if let Some(newest) = newest {
            self.base_generation = self.base_generation.max(newest.wrapping_add(1));
        }
        self.slots = Vec::new();
        self.free.clear();
        self.capacity = 0;
        self.open = 0;
        open
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn slot_mut(&mut self, fd: Fd) -> Result<&mut Slot> {
        self.slots
            .get_mut(fd.index())
            .filter(|slot| slot.generation == fd.generation())
            .ok_or(UfsError::NoFile)
    }

    /// Double the reserved capacity if every slot is in use
    fn grow(&mut self) -> Result<()> {
        if self.slots.len() < self.capacity {
            return Ok(());
        }

        let new_capacity = if self.capacity == 0 {
            self.initial_capacity
        } else {
            self.capacity * 2
        };

        self.slots
            .try_reserve_exact(new_capacity - self.slots.len())
            .map_err(|e| UfsError::OutOfMemory(format!("descriptor table growth failed: {}", e)))?;

        tracing::trace!("Descriptor table grown: {} -> {} slots", self.capacity, new_capacity);
        self.capacity = new_capacity;
        Ok(())
    }
}
