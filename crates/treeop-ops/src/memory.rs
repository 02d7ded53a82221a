//! In-memory storage driver.
//!
//! Models a `/`-rooted tree of files and directories with no symlinks.
//! Listings come back in sorted order, which keeps traversal deterministic.
//! Individual primitives can be made to fail for a given path so error
//! handling can be exercised without touching the disk.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::io::{self, Cursor, Read, Write};
use std::path::{Component, Path, PathBuf};

use treeop_core::Storage;

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Directory,
}

/// A storage primitive that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Fault {
    CreateDir,
    List,
    Read,
    Remove,
    Write,
}

/// Storage driver backed by an in-memory map.
#[derive(Debug)]
pub struct MemoryStorage {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
    faults: RefCell<HashSet<(Fault, PathBuf)>>,
}

impl MemoryStorage {
    /// Create storage containing only the root directory.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(PathBuf::from("/"), Node::Directory);
        Self {
            nodes: RefCell::new(nodes),
            faults: RefCell::new(HashSet::new()),
        }
    }

    /// Create a directory and any missing ancestors.
    pub fn create_dir_all(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = normalize(path.as_ref())?;
        let mut nodes = self.nodes.borrow_mut();
        for ancestor in path.ancestors().collect::<Vec<_>>().into_iter().rev() {
            match nodes.get(ancestor) {
                Some(Node::Directory) => {}
                Some(Node::File(_)) => return Err(not_a_directory(ancestor)),
                None => {
                    nodes.insert(ancestor.to_path_buf(), Node::Directory);
                }
            }
        }
        Ok(())
    }

    /// Write a file, creating missing parent directories.
    pub fn write_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> io::Result<()> {
        let path = normalize(path.as_ref())?;
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        let mut nodes = self.nodes.borrow_mut();
        if let Some(Node::Directory) = nodes.get(&path) {
            return Err(is_a_directory(&path));
        }
        nodes.insert(path, Node::File(contents.as_ref().to_vec()));
        Ok(())
    }

    /// Contents of a file, if `path` is one.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let path = normalize(path.as_ref()).ok()?;
        match self.nodes.borrow().get(&path) {
            Some(Node::File(bytes)) => Some(bytes.clone()),
            _ => None,
        }
    }

    /// Every path in storage, root included, in sorted order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.nodes.borrow().keys().cloned().collect()
    }

    /// Make every later `remove` of `path` fail.
    pub fn fail_removal(&self, path: impl AsRef<Path>) {
        self.inject(Fault::Remove, path.as_ref());
    }

    /// Make every later `create_dir` of `path` fail.
    pub fn fail_create_dir(&self, path: impl AsRef<Path>) {
        self.inject(Fault::CreateDir, path.as_ref());
    }

    /// Make every later `list_children` of `path` fail.
    pub fn fail_list(&self, path: impl AsRef<Path>) {
        self.inject(Fault::List, path.as_ref());
    }

    /// Make every later `open_read` of `path` fail.
    pub fn fail_read(&self, path: impl AsRef<Path>) {
        self.inject(Fault::Read, path.as_ref());
    }

    /// Make writes to `path` fail. The file itself is still created empty.
    pub fn fail_write(&self, path: impl AsRef<Path>) {
        self.inject(Fault::Write, path.as_ref());
    }

    fn inject(&self, fault: Fault, path: &Path) {
        if let Ok(path) = normalize(path) {
            self.faults.borrow_mut().insert((fault, path));
        }
    }

    fn check_fault(&self, fault: Fault, path: &Path) -> io::Result<()> {
        if self.faults.borrow().contains(&(fault, path.to_path_buf())) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected failure for {}", path.display()),
            ));
        }
        Ok(())
    }

    fn node(&self, path: &Path) -> Option<Node> {
        let path = normalize(path).ok()?;
        self.nodes.borrow().get(&path).cloned()
    }

    fn require_parent_dir(&self, path: &Path) -> io::Result<()> {
        let parent = path.parent().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "path has no parent")
        })?;
        match self.nodes.borrow().get(parent) {
            Some(Node::Directory) => Ok(()),
            Some(Node::File(_)) => Err(not_a_directory(parent)),
            None => Err(not_found(parent)),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn exists(&self, path: &Path) -> bool {
        self.node(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.node(path), Some(Node::Directory))
    }

    fn list_children(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let path = normalize(path)?;
        self.check_fault(Fault::List, &path)?;
        let nodes = self.nodes.borrow();
        match nodes.get(&path) {
            Some(Node::Directory) => Ok(nodes
                .keys()
                .filter(|p| p.parent() == Some(path.as_path()))
                .cloned()
                .collect()),
            Some(Node::File(_)) => Err(not_a_directory(&path)),
            None => Err(not_found(&path)),
        }
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        let path = normalize(path)?;
        self.check_fault(Fault::Read, &path)?;
        match self.nodes.borrow().get(&path) {
            Some(Node::File(bytes)) => Ok(Box::new(Cursor::new(bytes.clone()))),
            Some(Node::Directory) => Err(is_a_directory(&path)),
            None => Err(not_found(&path)),
        }
    }

    fn create_write(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        let path = normalize(path)?;
        self.require_parent_dir(&path)?;
        let mut nodes = self.nodes.borrow_mut();
        if let Some(Node::Directory) = nodes.get(&path) {
            return Err(is_a_directory(&path));
        }
        nodes.insert(path.clone(), Node::File(Vec::new()));
        Ok(Box::new(MemoryWriter {
            storage: self,
            path,
        }))
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        let path = normalize(path)?;
        self.check_fault(Fault::CreateDir, &path)?;
        self.require_parent_dir(&path)?;
        let mut nodes = self.nodes.borrow_mut();
        if nodes.contains_key(&path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            ));
        }
        nodes.insert(path, Node::Directory);
        Ok(())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let path = normalize(path)?;
        self.check_fault(Fault::Remove, &path)?;
        if path.parent().is_none() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "cannot remove the root directory",
            ));
        }
        let mut nodes = self.nodes.borrow_mut();
        match nodes.get(&path) {
            None => return Err(not_found(&path)),
            Some(Node::Directory) if nodes.keys().any(|p| p.parent() == Some(path.as_path())) => {
                return Err(io::Error::new(
                    io::ErrorKind::DirectoryNotEmpty,
                    format!("{} is not empty", path.display()),
                ));
            }
            Some(_) => {}
        }
        nodes.remove(&path);
        Ok(())
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let path = normalize(path)?;
        if self.nodes.borrow().contains_key(&path) {
            Ok(path)
        } else {
            Err(not_found(&path))
        }
    }
}

/// Appends to a file node on every write.
struct MemoryWriter<'a> {
    storage: &'a MemoryStorage,
    path: PathBuf,
}

impl Write for MemoryWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.storage.check_fault(Fault::Write, &self.path)?;
        match self.storage.nodes.borrow_mut().get_mut(&self.path) {
            Some(Node::File(bytes)) => {
                bytes.extend_from_slice(buf);
                Ok(buf.len())
            }
            _ => Err(not_found(&self.path)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Lexically resolve `.` and `..` in an absolute path.
fn normalize(path: &Path) -> io::Result<PathBuf> {
    if !path.has_root() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path must be absolute: {}", path.display()),
        ));
    }
    let mut normalized = PathBuf::from("/");
    for component in path.components() {
        match component {
            Component::Normal(name) => normalized.push(name),
            Component::ParentDir => {
                normalized.pop();
            }
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
        }
    }
    Ok(normalized)
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

fn not_a_directory(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotADirectory,
        format!("{} is not a directory", path.display()),
    )
}

fn is_a_directory(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::IsADirectory,
        format!("{} is a directory", path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_resolves_dots() {
        assert_eq!(
            normalize(Path::new("/a/./b/../c")).unwrap(),
            PathBuf::from("/a/c")
        );
        assert_eq!(normalize(Path::new("/..")).unwrap(), PathBuf::from("/"));
        assert!(normalize(Path::new("relative/path")).is_err());
    }

    #[test]
    fn test_listing_is_sorted_and_direct_only() {
        let storage = MemoryStorage::new();
        storage.write_file("/d/b.txt", b"b").unwrap();
        storage.write_file("/d/a.txt", b"a").unwrap();
        storage.write_file("/d/sub/deep.txt", b"x").unwrap();

        let children = storage.list_children(Path::new("/d")).unwrap();
        assert_eq!(
            children,
            vec![
                PathBuf::from("/d/a.txt"),
                PathBuf::from("/d/b.txt"),
                PathBuf::from("/d/sub"),
            ]
        );
    }

    #[test]
    fn test_write_then_read_back() {
        let storage = MemoryStorage::new();
        storage.create_dir_all("/d").unwrap();
        {
            let mut writer = storage.create_write(Path::new("/d/f")).unwrap();
            writer.write_all(b"hello ").unwrap();
            writer.write_all(b"world").unwrap();
        }
        let mut contents = String::new();
        storage
            .open_read(Path::new("/d/f"))
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "hello world");
    }

    #[test]
    fn test_create_dir_requires_parent_and_absence() {
        let storage = MemoryStorage::new();
        let err = storage.create_dir(Path::new("/missing/child")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        storage.create_dir(Path::new("/d")).unwrap();
        let err = storage.create_dir(Path::new("/d")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_remove_refuses_non_empty_directory() {
        let storage = MemoryStorage::new();
        storage.write_file("/d/f", b"x").unwrap();

        let err = storage.remove(Path::new("/d")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::DirectoryNotEmpty);

        storage.remove(Path::new("/d/f")).unwrap();
        storage.remove(Path::new("/d")).unwrap();
        assert!(!storage.exists(Path::new("/d")));
    }

    #[test]
    fn test_injected_faults() {
        let storage = MemoryStorage::new();
        storage.write_file("/f", b"x").unwrap();
        storage.fail_removal("/f");
        storage.fail_create_dir("/g");

        assert!(storage.remove(Path::new("/f")).is_err());
        assert!(storage.exists(Path::new("/f")));
        assert!(storage.create_dir(Path::new("/g")).is_err());
    }

    #[test]
    fn test_injected_io_faults() {
        let storage = MemoryStorage::new();
        storage.write_file("/d/f", b"x").unwrap();
        storage.fail_list("/d");
        storage.fail_read("/d/f");
        storage.fail_write("/d/g");

        assert!(storage.list_children(Path::new("/d")).is_err());
        assert!(storage.open_read(Path::new("/d/f")).is_err());

        let mut writer = storage.create_write(Path::new("/d/g")).unwrap();
        let err = writer.write_all(b"y").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(storage.read_file("/d/g"), Some(Vec::new()));
    }

    #[test]
    fn test_canonicalize_missing_is_not_found() {
        let storage = MemoryStorage::new();
        storage.create_dir_all("/a/b").unwrap();
        assert_eq!(
            storage.canonicalize(Path::new("/a/./b/..")).unwrap(),
            PathBuf::from("/a")
        );
        let err = storage.canonicalize(Path::new("/nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
