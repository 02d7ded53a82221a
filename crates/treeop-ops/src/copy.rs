//! Recursive copy.

use std::io::{self, Read, Write};
use std::path::Path;

use treeop_core::{EntryKind, Result, Storage, TreeError};

use crate::operator::{TreeOperator, entry_name};

impl<S: Storage> TreeOperator<S> {
    /// Copy `src` to exactly `dst`, recursing into directories.
    ///
    /// Not transactional: a failure leaves whatever was already copied.
    pub(crate) fn copy_subtree(&mut self, src: &Path, dst: &Path) -> Result<()> {
        let kind = self.storage.kind(src);
        match kind {
            EntryKind::Directory => {
                self.trace_step("mkdir", dst);
                self.storage
                    .create_dir(dst)
                    .map_err(|source| TreeError::CreateDirectory {
                        path: dst.to_path_buf(),
                        source,
                    })?;
                self.counters.record_copy(kind);

                for child in self.children(src)? {
                    let target = dst.join(entry_name(src, &child)?);
                    self.copy_subtree(&child, &target)?;
                }
            }
            EntryKind::File => {
                self.trace_step("cp", dst);
                self.copy_file_contents(src, dst)?;
                self.counters.record_copy(kind);
            }
        }
        Ok(())
    }

    /// Stream a file's bytes through a fixed-size block buffer.
    ///
    /// Both handles are dropped on return, error or not.
    fn copy_file_contents(&self, src: &Path, dst: &Path) -> Result<u64> {
        let read_error = |source| TreeError::Read {
            path: src.to_path_buf(),
            source,
        };
        let write_error = |source| TreeError::Write {
            path: dst.to_path_buf(),
            source,
        };

        let mut reader = self.storage.open_read(src).map_err(read_error)?;
        let mut writer = self.storage.create_write(dst).map_err(write_error)?;

        let mut buf = vec![0u8; self.config.buffer_size.max(1)];
        let mut bytes_copied = 0u64;
        loop {
            let read = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(read_error(e)),
            };
            writer.write_all(&buf[..read]).map_err(write_error)?;
            bytes_copied += read as u64;
        }
        writer.flush().map_err(write_error)?;

        tracing::trace!(src = %src.display(), bytes_copied, "file copied");
        Ok(bytes_copied)
    }
}
