//! Move as copy-then-delete.

use std::path::Path;

use treeop_core::{Result, Storage};

use crate::operator::TreeOperator;

impl<S: Storage> TreeOperator<S> {
    /// Copy the whole subtree at `src` to `dst`, then delete `src`.
    ///
    /// No source entry is touched until every entry has been copied, so an
    /// interrupted move leaves a complete or partial copy next to an intact
    /// or partially removed source.
    pub(crate) fn move_subtree(&mut self, src: &Path, dst: &Path) -> Result<()> {
        self.copy_subtree(src, dst)?;
        self.delete_subtree(src)
    }
}
