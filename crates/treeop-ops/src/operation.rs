//! Tree operation types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A tree operation to be executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeOperation {
    /// Count the directories and files under a root.
    Count { root: PathBuf },
    /// Copy a tree into an existing destination directory.
    Copy { source: PathBuf, destination: PathBuf },
    /// Move a tree into an existing destination directory.
    Move { source: PathBuf, destination: PathBuf },
    /// Delete a tree.
    Delete { root: PathBuf },
}

impl TreeOperation {
    /// Create a count operation.
    pub fn count(root: impl Into<PathBuf>) -> Self {
        Self::Count { root: root.into() }
    }

    /// Create a copy operation.
    pub fn copy(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::Copy {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Create a move operation.
    pub fn move_to(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::Move {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Create a delete operation.
    pub fn delete(root: impl Into<PathBuf>) -> Self {
        Self::Delete { root: root.into() }
    }

    /// The type of this operation.
    pub fn operation_type(&self) -> OperationType {
        match self {
            Self::Count { .. } => OperationType::Count,
            Self::Copy { .. } => OperationType::Copy,
            Self::Move { .. } => OperationType::Move,
            Self::Delete { .. } => OperationType::Delete,
        }
    }
}

/// The type of operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Count,
    Copy,
    Move,
    Delete,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count => write!(f, "count"),
            Self::Copy => write!(f, "copy"),
            Self::Move => write!(f, "move"),
            Self::Delete => write!(f, "removal"),
        }
    }
}
