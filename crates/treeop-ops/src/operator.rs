//! The tree operator: count, copy, move and delete.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use treeop_core::{CountSummary, OperationCounters, OperatorConfig, Result, Storage, TreeError};

use crate::TRACE_TARGET;
use crate::conflict::resolve_destination;
use crate::operation::{OperationType, TreeOperation};
use crate::report::OperationReport;

/// Runs recursive tree operations against a storage driver.
///
/// Every operation walks depth-first and stops at the first error. Nothing
/// already written or removed is rolled back.
#[derive(Debug)]
pub struct TreeOperator<S> {
    pub(crate) storage: S,
    pub(crate) config: OperatorConfig,
    pub(crate) counters: OperationCounters,
}

impl<S: Storage> TreeOperator<S> {
    /// Create an operator over `storage`.
    pub fn new(storage: S, config: OperatorConfig) -> Self {
        Self {
            storage,
            config,
            counters: OperationCounters::new(),
        }
    }

    /// The storage driver.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The operator configuration.
    pub fn config(&self) -> &OperatorConfig {
        &self.config
    }

    /// Counters of the most recent copy, move or delete.
    pub fn counters(&self) -> OperationCounters {
        self.counters
    }

    /// Execute any tree operation and report on it.
    pub fn execute(&mut self, operation: &TreeOperation) -> Result<OperationReport> {
        match operation {
            TreeOperation::Count { root } => {
                let summary = self.count(root)?;
                Ok(OperationReport::counted(root.clone(), summary))
            }
            TreeOperation::Copy {
                source,
                destination,
            } => self.copy(source, destination),
            TreeOperation::Move {
                source,
                destination,
            } => self.move_tree(source, destination),
            TreeOperation::Delete { root } => self.delete(root),
        }
    }

    /// Count directories and files under `root`, the root included.
    ///
    /// A file root counts as one file; an empty directory as one directory.
    pub fn count(&self, root: &Path) -> Result<CountSummary> {
        if !self.storage.exists(root) {
            return Err(TreeError::NotFound {
                path: root.to_path_buf(),
            });
        }
        let mut summary = CountSummary::default();
        self.count_node(root, &mut summary)?;
        Ok(summary)
    }

    fn count_node(&self, path: &Path, summary: &mut CountSummary) -> Result<()> {
        let kind = self.storage.kind(path);
        summary.record(kind);
        if kind.is_dir() {
            for child in self.children(path)? {
                self.count_node(&child, summary)?;
            }
        }
        Ok(())
    }

    /// Copy `src` into the existing directory `dst`.
    ///
    /// The copy lands at `dst/<name of src>`, renamed to `name (n)` on
    /// collision.
    pub fn copy(&mut self, src: &Path, dst: &Path) -> Result<OperationReport> {
        self.paste(src, dst, OperationType::Copy)
    }

    /// Move `src` into the existing directory `dst`.
    ///
    /// The whole tree is copied before any source entry is removed. With
    /// deletion disabled the source is left in place.
    pub fn move_tree(&mut self, src: &Path, dst: &Path) -> Result<OperationReport> {
        self.paste(src, dst, OperationType::Move)
    }

    /// Delete `root` and everything under it, children before parents.
    ///
    /// With deletion disabled nothing is removed but every entry is still
    /// counted.
    pub fn delete(&mut self, root: &Path) -> Result<OperationReport> {
        self.counters.reset();
        let root = self.canonical(root)?;

        if self.config.debug_trace {
            tracing::info!(target: TRACE_TARGET, root = %root.display(), "initiating removal");
        }
        self.delete_subtree(&root)?;

        Ok(OperationReport::finished(
            OperationType::Delete,
            root,
            None,
            self.counters,
        ))
    }

    fn paste(
        &mut self,
        src: &Path,
        dst: &Path,
        operation: OperationType,
    ) -> Result<OperationReport> {
        self.counters.reset();
        let src = self.canonical(src)?;
        let dst = self.canonical(dst)?;

        if self.config.ancestry_check.is_inside(&src, &dst) {
            return Err(TreeError::DestinationInsideSource { src, dst });
        }
        if !self.storage.is_dir(&dst) {
            return Err(TreeError::invalid_argument(format!(
                "Destination is not a directory: {}",
                dst.display()
            )));
        }
        let name = src.file_name().ok_or_else(|| {
            TreeError::invalid_argument(format!("Source has no name: {}", src.display()))
        })?;

        let kind = self.storage.kind(&src);
        let target = resolve_destination(&self.storage, &dst, name, kind, &self.config)?;

        if self.config.debug_trace {
            tracing::info!(
                target: TRACE_TARGET,
                src = %src.display(),
                dst = %target.display(),
                "initiating {operation}"
            );
        }

        match operation {
            OperationType::Move => self.move_subtree(&src, &target)?,
            _ => self.copy_subtree(&src, &target)?,
        }

        Ok(OperationReport::finished(
            operation,
            src,
            Some(target),
            self.counters,
        ))
    }

    /// Canonicalize an existing path.
    fn canonical(&self, path: &Path) -> Result<PathBuf> {
        let canonical = self
            .storage
            .canonicalize(path)
            .map_err(|e| TreeError::canonicalize(path, e))?;
        if !self.storage.exists(&canonical) {
            return Err(TreeError::NotFound { path: canonical });
        }
        Ok(canonical)
    }

    pub(crate) fn children(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.storage
            .list_children(path)
            .map_err(|source| TreeError::ListDirectory {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Trace one traversal step, e.g. `mkdir path=/dst/logs`.
    pub(crate) fn trace_step(&self, action: &str, path: &Path) {
        if self.config.debug_trace {
            tracing::info!(target: TRACE_TARGET, path = %path.display(), "{action}");
        }
    }
}

/// Final name component of a child listed under `dir`.
///
/// A nameless child is a broken listing, reported against `dir`.
pub(crate) fn entry_name<'a>(dir: &Path, child: &'a Path) -> Result<&'a OsStr> {
    child.file_name().ok_or_else(|| TreeError::ListDirectory {
        path: dir.to_path_buf(),
        source: io::Error::new(
            io::ErrorKind::InvalidData,
            format!("listed entry has no name: {}", child.display()),
        ),
    })
}
