//! The storage driver seam.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::entry::EntryKind;

/// Primitive filesystem capabilities a tree operator is built on.
///
/// Implementations are queried afresh on every call; nothing is cached
/// between a listing and the recursion that follows it.
pub trait Storage {
    /// Check whether an entry exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Check whether `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Check whether `path` is itself a symbolic link, without following it.
    fn is_symlink(&self, _path: &Path) -> bool {
        false
    }

    /// Full paths of the direct children of a directory, in driver order.
    fn list_children(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Open a file for streamed reading.
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + '_>>;

    /// Create or truncate a file for streamed writing.
    fn create_write(&self, path: &Path) -> io::Result<Box<dyn Write + '_>>;

    /// Create a single directory. The parent must exist and `path` must not.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Remove a file or an empty directory.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Resolve `path` to its absolute canonical form.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// The kind of the entry at `path`.
    fn kind(&self, path: &Path) -> EntryKind {
        EntryKind::from_is_dir(self.is_dir(path))
    }
}

impl<S: Storage + ?Sized> Storage for &S {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        (**self).is_symlink(path)
    }

    fn list_children(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        (**self).list_children(path)
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        (**self).open_read(path)
    }

    fn create_write(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        (**self).create_write(path)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        (**self).create_dir(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        (**self).remove(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        (**self).canonicalize(path)
    }
}
