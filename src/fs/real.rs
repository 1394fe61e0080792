use std::fs;
use std::io;
use std::path::Path;

use super::{DirEntry, EntryIter, Filesystem, NodeKind};

/// [`Filesystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        RealFs
    }
}

impl Filesystem for RealFs {
    fn read_dir(&self, path: &Path) -> io::Result<EntryIter<'_>> {
        let entries = fs::read_dir(path)?;
        Ok(Box::new(entries.map(|entry| {
            entry.map(|entry| DirEntry {
                // file_type() uses d_type where the filesystem provides it
                kind_hint: entry.file_type().ok().map(NodeKind::from_file_type),
                name: entry.file_name(),
            })
        })))
    }

    fn symlink_kind(&self, path: &Path) -> io::Result<NodeKind> {
        fs::symlink_metadata(path).map(|meta| NodeKind::from_file_type(meta.file_type()))
    }

    fn kind(&self, path: &Path) -> io::Result<NodeKind> {
        fs::metadata(path).map(|meta| NodeKind::from_file_type(meta.file_type()))
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::tempdir;

    #[test]
    fn test_read_dir_lists_children_with_hints() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("album.nfo"), "info").unwrap();
        fs::create_dir(dir.path().join("art")).unwrap();

        let fs = RealFs::new();
        let entries: Vec<DirEntry> = fs
            .read_dir(dir.path())
            .unwrap()
            .collect::<io::Result<_>>()
            .unwrap();

        let names: HashSet<String> = entries.iter().map(|e| e.name_lossy().into_owned()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains("album.nfo"));
        assert!(names.contains("art"));
        for entry in &entries {
            let expected = if entry.name == "art" {
                NodeKind::Directory
            } else {
                NodeKind::RegularFile
            };
            assert_eq!(entry.kind_hint, Some(expected));
        }
    }

    #[test]
    fn test_empty_directory_yields_nothing() {
        let dir = tempdir().unwrap();
        let fs = RealFs::new();
        assert!(fs.read_dir(dir.path()).unwrap().next().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_probes() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("target"), dir.path().join("link")).unwrap();

        let fs = RealFs::new();
        let link = dir.path().join("link");
        assert_eq!(fs.symlink_kind(&link).unwrap(), NodeKind::SymbolicLink);
        assert_eq!(fs.kind(&link).unwrap(), NodeKind::Directory);
    }

    #[test]
    fn test_remove_primitives() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.md5sums");
        let sub = dir.path().join("sub");
        fs::write(&file, "x").unwrap();
        fs::create_dir(&sub).unwrap();

        let fs = RealFs::new();
        fs.remove_file(&file).unwrap();
        fs.remove_dir(&sub).unwrap();
        assert!(!file.exists());
        assert!(!sub.exists());
        assert!(fs.remove_file(&file).is_err());
    }
}
