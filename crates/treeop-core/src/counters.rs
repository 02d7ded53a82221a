//! Counters accumulated while walking a tree.

use serde::{Deserialize, Serialize};

use crate::entry::EntryKind;

/// Result of counting a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountSummary {
    /// Number of directories, the root included.
    pub dirs: u64,
    /// Number of non-directory entries.
    pub files: u64,
}

impl CountSummary {
    /// Create a summary from raw counts.
    pub fn new(dirs: u64, files: u64) -> Self {
        Self { dirs, files }
    }

    /// Record one entry.
    pub fn record(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::Directory => self.dirs += 1,
            EntryKind::File => self.files += 1,
        }
    }

    /// Directories plus files.
    pub fn total(&self) -> u64 {
        self.dirs + self.files
    }
}

impl std::ops::Add for CountSummary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            dirs: self.dirs + rhs.dirs,
            files: self.files + rhs.files,
        }
    }
}

/// Copy and removal counters for one top-level operation.
///
/// Removal counters track entries visited for removal, whether or not the
/// removal was actually performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCounters {
    pub copied_dirs: u64,
    pub copied_files: u64,
    pub removed_dirs: u64,
    pub removed_files: u64,
}

impl OperationCounters {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero all counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record a copied entry.
    pub fn record_copy(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::Directory => self.copied_dirs += 1,
            EntryKind::File => self.copied_files += 1,
        }
    }

    /// Record an entry visited for removal.
    pub fn record_removal(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::Directory => self.removed_dirs += 1,
            EntryKind::File => self.removed_files += 1,
        }
    }

    /// Copied entries as a count summary.
    pub fn copied(&self) -> CountSummary {
        CountSummary::new(self.copied_dirs, self.copied_files)
    }

    /// Removed entries as a count summary.
    pub fn removed(&self) -> CountSummary {
        CountSummary::new(self.removed_dirs, self.removed_files)
    }
}
