//! Error types for tree operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entry::EntryKind;

/// Errors that abort a tree operation.
///
/// Every variant carries the path (or name) that triggered it so the failure
/// can be traced back to a single storage call.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A path that must exist does not.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// The destination lies inside the source tree.
    #[error("Destination path is a subpath of the source path: {dst} is inside {src}")]
    DestinationInsideSource { src: PathBuf, dst: PathBuf },

    /// Malformed argument.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A directory could not be created in the destination tree.
    #[error("Cannot create directory: {path}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be listed.
    #[error("Cannot list directory: {path}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a source file failed.
    #[error("Cannot read file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a destination file failed.
    #[error("Cannot write file: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing an entry failed.
    #[error("Cannot remove {kind}: {path}")]
    Remove {
        path: PathBuf,
        kind: EntryKind,
        #[source]
        source: std::io::Error,
    },

    /// Resolving a path to canonical form failed.
    #[error("Cannot canonicalize path: {path}")]
    Canonicalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No free name was found within the configured number of rename attempts.
    #[error("No free name for '{name}' after {attempts} attempts")]
    RenameExhausted { name: String, attempts: u64 },
}

/// Coarse classification of a [`TreeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A required path does not exist.
    NotFound,
    /// Arguments were malformed or contradictory.
    InvalidArgument,
    /// A storage primitive failed.
    Io,
    /// Collision renaming gave up.
    Conflict,
}

impl TreeError {
    /// Canonicalization error with path context.
    ///
    /// A missing path becomes [`TreeError::NotFound`].
    pub fn canonicalize(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Canonicalize { path, source },
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// The coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DestinationInsideSource { .. } | Self::InvalidArgument { .. } => {
                ErrorKind::InvalidArgument
            }
            Self::CreateDirectory { .. }
            | Self::ListDirectory { .. }
            | Self::Read { .. }
            | Self::Write { .. }
            | Self::Remove { .. }
            | Self::Canonicalize { .. } => ErrorKind::Io,
            Self::RenameExhausted { .. } => ErrorKind::Conflict,
        }
    }
}

/// Result alias used throughout treeop.
pub type Result<T> = std::result::Result<T, TreeError>;
