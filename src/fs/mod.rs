//! Filesystem seam used by the scrubber.
//!
//! Every list, probe and remove primitive goes through [`Filesystem`], so the
//! walker can run against the real disk ([`RealFs`]) or an in-memory tree
//! ([`MockFs`]) in tests.

pub mod mock;
mod real;

use std::ffi::OsString;
use std::fs::FileType;
use std::io;
use std::path::Path;

pub use mock::MockFs;
pub use real::RealFs;

/// What kind of node a path refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Directory,
    RegularFile,
    /// Block/character device, FIFO or socket
    SpecialFile,
    SymbolicLink,
    /// The filesystem did not say; handled like a regular file
    UnknownType,
}

impl NodeKind {
    pub fn from_file_type(file_type: FileType) -> NodeKind {
        if file_type.is_dir() {
            NodeKind::Directory
        } else if file_type.is_file() {
            NodeKind::RegularFile
        } else if file_type.is_symlink() {
            NodeKind::SymbolicLink
        } else if is_device_pipe_or_socket(file_type) {
            NodeKind::SpecialFile
        } else {
            NodeKind::UnknownType
        }
    }

    /// Symlinks count as special files for preservation purposes
    pub fn is_special(self) -> bool {
        matches!(self, NodeKind::SpecialFile | NodeKind::SymbolicLink)
    }
}

#[cfg(unix)]
fn is_device_pipe_or_socket(file_type: FileType) -> bool {
    use std::os::unix::fs::FileTypeExt;
    file_type.is_block_device()
        || file_type.is_char_device()
        || file_type.is_fifo()
        || file_type.is_socket()
}

#[cfg(not(unix))]
fn is_device_pipe_or_socket(_file_type: FileType) -> bool {
    false
}

/// One child of a listed directory. Never `.` or `..`.
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: OsString,
    /// Type reported by the listing itself, when it reports one
    pub kind_hint: Option<NodeKind>,
}

impl DirEntry {
    pub fn name_lossy(&self) -> std::borrow::Cow<'_, str> {
        self.name.to_string_lossy()
    }
}

pub type EntryIter<'a> = Box<dyn Iterator<Item = io::Result<DirEntry>> + 'a>;

/// Filesystem primitives needed to prune a tree.
pub trait Filesystem: std::fmt::Debug {
    /// List a directory lazily, excluding the self/parent entries.
    fn read_dir(&self, path: &Path) -> io::Result<EntryIter<'_>>;

    /// Probe a node without following a trailing symlink (`lstat`).
    fn symlink_kind(&self, path: &Path) -> io::Result<NodeKind>;

    /// Probe a node, following symlinks (`stat`).
    fn kind(&self, path: &Path) -> io::Result<NodeKind>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;
}

/// Classify a listed entry: the listing's hint if present, else an `lstat`
/// probe, else `UnknownType`.
pub fn classify<F: Filesystem + ?Sized>(fs: &F, entry: &DirEntry, path: &Path) -> NodeKind {
    entry
        .kind_hint
        .or_else(|| fs.symlink_kind(path).ok())
        .unwrap_or(NodeKind::UnknownType)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_special_kinds() {
        assert!(NodeKind::SpecialFile.is_special());
        assert!(NodeKind::SymbolicLink.is_special());
        assert!(!NodeKind::RegularFile.is_special());
        assert!(!NodeKind::UnknownType.is_special());
        assert!(!NodeKind::Directory.is_special());
    }

    #[test]
    fn test_classify_prefers_hint() {
        let fs = MockFs::new();
        fs.add_file("d/a.nfo");
        let entry = DirEntry {
            name: "a.nfo".into(),
            kind_hint: Some(NodeKind::SpecialFile),
        };
        assert_eq!(
            classify(&fs, &entry, Path::new("d/a.nfo")),
            NodeKind::SpecialFile
        );
    }

    #[test]
    fn test_classify_falls_back_to_probe() {
        let fs = MockFs::new();
        fs.add_dir("d/sub");
        let entry = DirEntry {
            name: "sub".into(),
            kind_hint: None,
        };
        assert_eq!(classify(&fs, &entry, Path::new("d/sub")), NodeKind::Directory);
    }

    #[test]
    fn test_classify_unknown_when_probe_fails() {
        let fs = MockFs::new();
        let entry = DirEntry {
            name: "gone".into(),
            kind_hint: None,
        };
        let path = PathBuf::from("d/gone");
        assert_eq!(classify(&fs, &entry, &path), NodeKind::UnknownType);
    }
}
