//! File Registry
//!
//! Name → file mapping on top of a file arena.

use std::collections::HashMap;

use super::{File, FileId};

/// All files known to the filesystem
///
/// Files live in an arena addressed by `FileId`; `names` maps each linked
/// name to its slot. Deleting a name only unlinks it. The arena slot (and
/// the file's blocks) is freed once the file is unlinked and no descriptor
/// references it any more.
#[derive(Debug, Default)]
pub struct FileRegistry {
    /// File arena; `None` marks a free slot
    files: Vec<Option<File>>,

    /// Free arena slots available for reuse
    free: Vec<usize>,

    /// Linked names
    names: HashMap<String, FileId>,
}

impl FileRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a linked file by name
    pub fn lookup(&self, name: &str) -> Option<FileId> {
        self.names.get(name).copied()
    }

    /// Register a file under its name
    ///
    /// Hands the file back if the name is already taken.
    pub fn insert(&mut self, file: File) -> std::result::Result<FileId, File> {
        if self.names.contains_key(file.name()) {
            return Err(file);
        }

        let name = file.name().to_string();
        let id = match self.free.pop() {
            Some(slot) => {
                self.files[slot] = Some(file);
                FileId(slot)
            }
            None => {
                self.files.push(Some(file));
                FileId(self.files.len() - 1)
            }
        };

        self.names.insert(name, id);
        Ok(id)
    }

    /// Detach `name` from the registry
    ///
    /// Open descriptors are not consulted. A file nobody references is
    /// freed right away; otherwise it lingers, nameless, until its last
    /// descriptor is released.
    pub fn remove(&mut self, name: &str) -> Option<FileId> {
        let id = self.names.remove(name)?;

        let orphaned = match self.get_mut(id) {
            Some(file) => {
                file.unlink();
                file.refs() == 0
            }
            None => false,
        };
        if orphaned {
            self.free_slot(id);
        }

        Some(id)
    }

    pub fn get(&self, id: FileId) -> Option<&File> {
        self.files.get(id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, id: FileId) -> Option<&mut File> {
        self.files.get_mut(id.0)?.as_mut()
    }

    /// Count a new descriptor against `id`
    pub fn acquire(&mut self, id: FileId) -> bool {
        match self.get_mut(id) {
            Some(file) => {
                file.acquire();
                true
            }
            None => false,
        }
    }

    /// Drop one descriptor reference from `id`, freeing an unlinked file
    /// when it was the last one
    pub fn release(&mut self, id: FileId) {
        let orphaned = match self.get_mut(id) {
            Some(file) => {
                file.release();
                !file.is_linked() && file.refs() == 0
            }
            None => false,
        };
        if orphaned {
            self.free_slot(id);
        }
    }

    /// Number of linked (named) files
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of files still holding memory, including unlinked ones
    pub fn live_count(&self) -> usize {
        self.files.iter().filter(|slot| slot.is_some()).count()
    }

    /// Linked names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.keys().cloned().collect();
        names.sort();
        names
    }

    /// Free every file, returning `(files, blocks)` released
    pub fn clear(&mut self) -> (usize, usize) {
        let mut files = 0;
        let mut blocks = 0;
        for file in self.files.drain(..).flatten() {
            files += 1;
            blocks += file.block_count();
        }

        self.free.clear();
        self.names.clear();
        (files, blocks)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn free_slot(&mut self, id: FileId) {
        if let Some(slot) = self.files.get_mut(id.0) {
            if let Some(file) = slot.take() {
                tracing::trace!(
                    "Freed file '{}' ({} blocks, {} bytes)",
                    file.name(),
                    file.block_count(),
                    file.size()
                );
                self.free.push(id.0);
            }
        }
    }
}
