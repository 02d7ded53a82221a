//! Core types and traits for treeop.
//!
//! This crate provides the shared vocabulary of the treeop workspace: the
//! error type, operator configuration, entry kinds, counters, and the
//! [`Storage`] trait that tree operations are written against.

mod config;
mod counters;
mod entry;
mod error;
mod storage;

pub use config::{AncestryCheck, DEFAULT_BUFFER_SIZE, OperatorConfig, OperatorConfigBuilder};
pub use counters::{CountSummary, OperationCounters};
pub use entry::EntryKind;
pub use error::{ErrorKind, Result, TreeError};
pub use storage::Storage;
