//! Collision-avoiding destination naming.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use treeop_core::{EntryKind, OperatorConfig, Result, Storage, TreeError};

use crate::TRACE_TARGET;

/// Build the `attempt`-th alternative for a colliding name.
///
/// Directories get `"<name> (n)"`. Files get the counter before the last
/// `.`, so `"note.txt"` becomes `"note (n).txt"` and `".bashrc"` becomes
/// `" (n).bashrc"`. A file name without a dot is treated like a directory.
/// Bytes that are not valid UTF-8 are carried over unchanged.
pub fn candidate_name(name: &OsStr, kind: EntryKind, attempt: u64) -> OsString {
    let bytes = name.as_encoded_bytes();
    let dot = match kind {
        EntryKind::File => bytes.iter().rposition(|&b| b == b'.'),
        EntryKind::Directory => None,
    };
    let (base, ext) = bytes.split_at(dot.unwrap_or(bytes.len()));
    // SAFETY: both halves come from `as_encoded_bytes` and are split right
    // before an ASCII `.` (or at the end), which is a valid boundary.
    let (base, ext) = unsafe {
        (
            OsStr::from_encoded_bytes_unchecked(base),
            OsStr::from_encoded_bytes_unchecked(ext),
        )
    };

    let mut candidate = OsString::with_capacity(bytes.len() + 8);
    candidate.push(base);
    candidate.push(format!(" ({attempt})"));
    candidate.push(ext);
    candidate
}

/// Pick a destination path under `dir` for an entry called `name`.
///
/// Returns `dir/name` when that is free, otherwise the first free
/// [`candidate_name`]. Without a `rename_limit` the search never gives up.
pub fn resolve_destination<S: Storage>(
    storage: &S,
    dir: &Path,
    name: &OsStr,
    kind: EntryKind,
    config: &OperatorConfig,
) -> Result<PathBuf> {
    let first = dir.join(name);
    if !storage.exists(&first) {
        return Ok(first);
    }

    let mut candidate = first;
    let mut attempt = 0u64;

    while storage.exists(&candidate) {
        if config.debug_trace {
            tracing::info!(
                target: TRACE_TARGET,
                name = %candidate.file_name().unwrap_or_default().to_string_lossy(),
                "already exists in destination"
            );
        }
        if config.rename_limit.is_some_and(|limit| attempt >= limit) {
            return Err(TreeError::RenameExhausted {
                name: name.to_string_lossy().into_owned(),
                attempts: attempt,
            });
        }
        attempt += 1;
        candidate = dir.join(candidate_name(name, kind, attempt));
    }

    Ok(candidate)
}
