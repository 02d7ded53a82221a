//! Tree operations engine for treeop.
//!
//! This crate provides the recursive count, copy, move and delete operations
//! on top of the [`Storage`](treeop_core::Storage) trait, together with a
//! local-disk driver and an in-memory driver for tests.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use treeop_core::OperatorConfig;
//! use treeop_ops::{LocalStorage, TreeOperator};
//!
//! # fn main() -> Result<(), treeop_core::TreeError> {
//! let mut operator = TreeOperator::new(LocalStorage::new(), OperatorConfig::safe());
//! let report = operator.delete(Path::new("/tmp/scratch"))?;
//! println!("would remove {} files", report.counters.removed_files);
//! # Ok(())
//! # }
//! ```

mod conflict;
mod copy;
mod delete;
mod local;
mod memory;
mod move_op;
mod operation;
mod operator;
mod report;

pub use conflict::{candidate_name, resolve_destination};
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use operation::{OperationType, TreeOperation};
pub use operator::TreeOperator;
pub use report::OperationReport;

/// Tracing target for per-step trace events.
pub const TRACE_TARGET: &str = "treeop::trace";
