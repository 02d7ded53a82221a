//! Reports produced by completed operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use treeop_core::{CountSummary, OperationCounters};

use crate::operation::OperationType;

/// Result of a completed tree operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationReport {
    /// The type of operation.
    pub operation: OperationType,
    /// Canonical source or root path (as given, for count).
    pub source: PathBuf,
    /// Final destination after collision renaming (copy and move only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    /// Copy and removal counters.
    pub counters: OperationCounters,
    /// Entry totals (count only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<CountSummary>,
}

impl OperationReport {
    /// Create a report for a count.
    pub fn counted(root: PathBuf, summary: CountSummary) -> Self {
        Self {
            operation: OperationType::Count,
            source: root,
            destination: None,
            counters: OperationCounters::default(),
            count: Some(summary),
        }
    }

    /// Create a report for a copy, move or delete.
    pub fn finished(
        operation: OperationType,
        source: PathBuf,
        destination: Option<PathBuf>,
        counters: OperationCounters,
    ) -> Self {
        Self {
            operation,
            source,
            destination,
            counters,
            count: None,
        }
    }

    /// Human-readable summary lines.
    ///
    /// Counts are always reported; copy and removal counters only when
    /// `verbose` is set.
    pub fn summary_lines(&self, verbose: bool) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(count) = &self.count {
            lines.push(format!(
                "Count: dirs={}, files={}, total={}",
                count.dirs,
                count.files,
                count.total()
            ));
        }
        if !verbose {
            return lines;
        }

        let copied = self.counters.copied();
        let removed = self.counters.removed();
        match self.operation {
            OperationType::Count => {}
            OperationType::Copy => {
                lines.push(format!("[Copied:  dirs={}, files={}]", copied.dirs, copied.files));
            }
            OperationType::Move => {
                lines.push(format!("[Copied:  dirs={}, files={}]", copied.dirs, copied.files));
                lines.push(format!("[Removed: dirs={}, files={}]", removed.dirs, removed.files));
            }
            OperationType::Delete => {
                lines.push(format!("[Removed: dirs={}, files={}]", removed.dirs, removed.files));
            }
        }
        lines
    }
}
