use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use treeop_core::OperatorConfig;
use treeop_ops::{MemoryStorage, TreeOperator};

/// Shared buffer the fmt subscriber writes into.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a plain-text subscriber and return every line it logged.
fn capture(f: impl FnOnce()) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::with_default(subscriber, f);

    let bytes = captured.0.lock().unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn sample_storage() -> MemoryStorage {
    let storage = MemoryStorage::new();
    storage.write_file("/src/tree/a.txt", b"alpha").unwrap();
    storage.create_dir_all("/src/tree/sub").unwrap();
    storage.create_dir_all("/dst").unwrap();
    storage
}

#[test]
fn test_copy_trace_records_paths_as_fields() {
    let storage = sample_storage();
    let mut op = TreeOperator::new(&storage, OperatorConfig::new().with_debug_trace(true));

    let output = capture(|| {
        op.copy(Path::new("/src/tree"), Path::new("/dst")).unwrap();
        op.copy(Path::new("/src/tree"), Path::new("/dst")).unwrap();
    });

    assert!(output.contains("treeop::trace"));
    assert!(output.contains("initiating copy"));
    assert!(output.contains("src=/src/tree"));
    assert!(output.contains("dst=/dst/tree (1)"));
    assert!(output.contains("mkdir path=/dst/tree/sub"));
    assert!(output.contains("cp path=/dst/tree/a.txt"));
    assert!(output.contains("already exists in destination name=tree"));
}

#[test]
fn test_delete_trace_records_root_and_steps() {
    let storage = sample_storage();
    let mut op = TreeOperator::new(&storage, OperatorConfig::safe().with_debug_trace(true));

    let output = capture(|| {
        op.delete(Path::new("/src/tree")).unwrap();
    });

    assert!(output.contains("initiating removal root=/src/tree"));
    assert!(output.contains("rm path=/src/tree/a.txt"));
    assert!(output.contains("rmdir path=/src/tree"));
}

#[test]
fn test_no_trace_without_debug() {
    let storage = sample_storage();
    let mut op = TreeOperator::new(&storage, OperatorConfig::default());

    let output = capture(|| {
        op.copy(Path::new("/src/tree"), Path::new("/dst")).unwrap();
        op.delete(Path::new("/dst/tree")).unwrap();
    });

    assert!(!output.contains("treeop::trace"));
}
