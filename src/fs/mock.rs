use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use super::{DirEntry, EntryIter, Filesystem, NodeKind};

#[derive(Debug, Clone)]
struct MockNode {
    kind: NodeKind,
    /// Whether listings report the node's type
    hinted: bool,
    /// Symlink target, resolved by `kind()`
    target: Option<PathBuf>,
}

/// In-memory [`Filesystem`] for tests.
///
/// Nodes are keyed by the exact path they were added under; parents are
/// created implicitly. Open and remove failures can be injected per path, and
/// every removal call is counted, including failed ones.
///
/// ```
/// use scrub::fs::{Filesystem, MockFs};
/// use std::path::Path;
///
/// let fs = MockFs::new();
/// fs.add_file("downloads/album.nfo");
/// assert!(fs.exists("downloads"));
/// fs.remove_file(Path::new("downloads/album.nfo")).unwrap();
/// assert_eq!(fs.removal_calls(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockFs {
    nodes: RefCell<BTreeMap<PathBuf, MockNode>>,
    deny_open: RefCell<HashSet<PathBuf>>,
    deny_remove: RefCell<HashSet<PathBuf>>,
    removal_calls: Cell<usize>,
}

impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node of any kind, creating missing parent directories
    pub fn add_node(&self, path: impl AsRef<Path>, kind: NodeKind) {
        let path = path.as_ref();
        let mut nodes = self.nodes.borrow_mut();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            nodes.entry(ancestor.to_path_buf()).or_insert(MockNode {
                kind: NodeKind::Directory,
                hinted: true,
                target: None,
            });
        }
        nodes.insert(
            path.to_path_buf(),
            MockNode {
                kind,
                hinted: true,
                target: None,
            },
        );
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        self.add_node(path, NodeKind::RegularFile);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.add_node(path, NodeKind::Directory);
    }

    pub fn add_symlink(&self, path: impl AsRef<Path>, target: impl AsRef<Path>) {
        let path = path.as_ref();
        self.add_node(path, NodeKind::SymbolicLink);
        if let Some(node) = self.nodes.borrow_mut().get_mut(path) {
            node.target = Some(target.as_ref().to_path_buf());
        }
    }

    /// Make listings omit the type of this node, forcing a probe
    pub fn hide_type(&self, path: impl AsRef<Path>) {
        if let Some(node) = self.nodes.borrow_mut().get_mut(path.as_ref()) {
            node.hinted = false;
        }
    }

    /// Make listing this directory fail with "permission denied"
    pub fn deny_open(&self, path: impl AsRef<Path>) {
        self.deny_open.borrow_mut().insert(path.as_ref().to_path_buf());
    }

    /// Make removing this node fail with "permission denied"
    pub fn deny_remove(&self, path: impl AsRef<Path>) {
        self.deny_remove
            .borrow_mut()
            .insert(path.as_ref().to_path_buf());
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.nodes.borrow().contains_key(path.as_ref())
    }

    /// Number of remove_file/remove_dir calls made so far
    pub fn removal_calls(&self) -> usize {
        self.removal_calls.get()
    }

    /// Every path currently in the tree, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        self.nodes.borrow().keys().cloned().collect()
    }

    fn children(&self, path: &Path) -> Vec<PathBuf> {
        self.nodes
            .borrow()
            .keys()
            .filter(|candidate| candidate.parent() == Some(path))
            .cloned()
            .collect()
    }

    fn lookup(&self, path: &Path) -> io::Result<MockNode> {
        self.nodes
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from_raw_os_error(libc::ENOENT))
    }

    fn check_remove(&self, path: &Path) -> io::Result<MockNode> {
        self.removal_calls.set(self.removal_calls.get() + 1);
        if self.deny_remove.borrow().contains(path) {
            return Err(io::Error::from_raw_os_error(libc::EACCES));
        }
        self.lookup(path)
    }
}

impl Filesystem for MockFs {
    fn read_dir(&self, path: &Path) -> io::Result<EntryIter<'_>> {
        if self.deny_open.borrow().contains(path) {
            return Err(io::Error::from_raw_os_error(libc::EACCES));
        }
        if self.lookup(path)?.kind != NodeKind::Directory {
            return Err(io::Error::from_raw_os_error(libc::ENOTDIR));
        }

        let nodes = self.nodes.borrow();
        let entries: Vec<io::Result<DirEntry>> = self
            .children(path)
            .into_iter()
            .filter_map(|child| {
                let node = nodes.get(&child)?;
                Some(Ok(DirEntry {
                    name: child.file_name()?.to_os_string(),
                    kind_hint: node.hinted.then_some(node.kind),
                }))
            })
            .collect();
        Ok(Box::new(entries.into_iter()))
    }

    fn symlink_kind(&self, path: &Path) -> io::Result<NodeKind> {
        self.lookup(path).map(|node| node.kind)
    }

    fn kind(&self, path: &Path) -> io::Result<NodeKind> {
        let node = self.lookup(path)?;
        match node.target {
            Some(target) => self.kind(&target),
            None => Ok(node.kind),
        }
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        if self.check_remove(path)?.kind == NodeKind::Directory {
            return Err(io::Error::from_raw_os_error(libc::EISDIR));
        }
        self.nodes.borrow_mut().remove(path);
        Ok(())
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        if self.check_remove(path)?.kind != NodeKind::Directory {
            return Err(io::Error::from_raw_os_error(libc::ENOTDIR));
        }
        if !self.children(path).is_empty() {
            return Err(io::Error::from_raw_os_error(libc::ENOTEMPTY));
        }
        self.nodes.borrow_mut().remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(fs: &MockFs, dir: &str) -> Vec<String> {
        fs.read_dir(Path::new(dir))
            .unwrap()
            .map(|e| e.unwrap().name_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_parents_are_created() {
        let fs = MockFs::new();
        fs.add_file("downloads/oddball_folder/album.nfo");
        assert!(fs.exists("downloads"));
        assert!(fs.exists("downloads/oddball_folder"));
        assert_eq!(
            fs.symlink_kind(Path::new("downloads/oddball_folder")).unwrap(),
            NodeKind::Directory
        );
    }

    #[test]
    fn test_read_dir_lists_direct_children_only() {
        let fs = MockFs::new();
        fs.add_file("d/a.nfo");
        fs.add_file("d/sub/b.nfo");
        assert_eq!(names(&fs, "d"), vec!["a.nfo", "sub"]);
        assert_eq!(names(&fs, "d/sub"), vec!["b.nfo"]);
    }

    #[test]
    fn test_read_dir_errors() {
        let fs = MockFs::new();
        fs.add_file("d/file");
        fs.add_dir("d/locked");
        fs.deny_open("d/locked");

        let err = fs.read_dir(Path::new("d/locked")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        let err = fs.read_dir(Path::new("d/file")).err().unwrap();
        assert_eq!(err.raw_os_error(), Some(libc::ENOTDIR));
        let err = fs.read_dir(Path::new("missing")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_hidden_type_has_no_hint() {
        let fs = MockFs::new();
        fs.add_dir("d/sub");
        fs.hide_type("d/sub");
        let entry = fs.read_dir(Path::new("d")).unwrap().next().unwrap().unwrap();
        assert_eq!(entry.kind_hint, None);
    }

    #[test]
    fn test_remove_dir_requires_empty() {
        let fs = MockFs::new();
        fs.add_file("d/a");
        let err = fs.remove_dir(Path::new("d")).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::ENOTEMPTY));

        fs.remove_file(Path::new("d/a")).unwrap();
        fs.remove_dir(Path::new("d")).unwrap();
        assert!(fs.paths().is_empty());
        assert_eq!(fs.removal_calls(), 3);
    }

    #[test]
    fn test_remove_denied() {
        let fs = MockFs::new();
        fs.add_file("d/a");
        fs.deny_remove("d/a");
        let err = fs.remove_file(Path::new("d/a")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(fs.exists("d/a"));
    }

    #[test]
    fn test_symlink_follow() {
        let fs = MockFs::new();
        fs.add_dir("real");
        fs.add_symlink("link", "real");
        assert_eq!(fs.symlink_kind(Path::new("link")).unwrap(), NodeKind::SymbolicLink);
        assert_eq!(fs.kind(Path::new("link")).unwrap(), NodeKind::Directory);

        fs.add_symlink("dangling", "nowhere");
        assert!(fs.kind(Path::new("dangling")).is_err());
    }
}
