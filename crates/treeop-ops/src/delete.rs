//! Recursive delete with safe-mode gating.

use std::path::Path;

use treeop_core::{EntryKind, Result, Storage, TreeError};

use crate::operator::TreeOperator;

impl<S: Storage> TreeOperator<S> {
    /// Delete `path` depth-first: every descendant before the entry itself.
    ///
    /// A symbolic link is removed as an entry of its own; its target is
    /// never descended into.
    pub(crate) fn delete_subtree(&mut self, path: &Path) -> Result<()> {
        let kind = if self.storage.is_symlink(path) {
            EntryKind::File
        } else {
            self.storage.kind(path)
        };
        if kind.is_dir() {
            for child in self.children(path)? {
                self.delete_subtree(&child)?;
            }
        }
        self.remove_entry(path, kind)
    }

    /// Count one entry as removed and remove it unless deletion is disabled.
    fn remove_entry(&mut self, path: &Path, kind: EntryKind) -> Result<()> {
        self.trace_step(if kind.is_dir() { "rmdir" } else { "rm" }, path);
        self.counters.record_removal(kind);

        if self.config.deletion_enabled {
            self.storage
                .remove(path)
                .map_err(|source| TreeError::Remove {
                    path: path.to_path_buf(),
                    kind,
                    source,
                })?;
        }
        Ok(())
    }
}
