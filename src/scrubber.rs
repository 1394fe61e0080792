//! Tree walking, clobbering and empty-directory removal.

use crate::config::ScrubConfig;
use crate::error::{Result, ScrubError};
use crate::fs::{classify, Filesystem, NodeKind};
use crate::rules::is_hidden;

use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// What happened to a single node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Did not match any rule; left alone
    Kept,
    Removed,
    /// Simulate mode: would have been removed
    WouldRemove,
}

/// Everything a run did, in visiting order
#[derive(Debug, Default)]
pub struct Report {
    pub removed_files: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
    pub would_remove: Vec<PathBuf>,
    /// Hidden directories and special files skipped by preservation flags
    pub preserved: Vec<PathBuf>,
    /// Files that matched no rule
    pub kept: usize,
    pub failures: Vec<ScrubError>,
}

impl Report {
    pub fn removed_count(&self) -> usize {
        self.removed_files.len() + self.removed_dirs.len()
    }
}

/// Result of scrubbing a set of input paths
#[derive(Debug, Default)]
pub struct RunSummary {
    pub report: Report,
    /// Inputs that still hold content after processing
    pub residue: Vec<PathBuf>,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.residue.is_empty()
    }
}

/// Prunes trees according to a [`ScrubConfig`].
#[derive(Debug)]
pub struct Scrubber<'a, F: Filesystem + ?Sized> {
    config: &'a ScrubConfig,
    fs: &'a F,
}

impl<'a, F: Filesystem + ?Sized> Scrubber<'a, F> {
    pub fn new(config: &'a ScrubConfig, fs: &'a F) -> Self {
        Scrubber { config, fs }
    }

    /// Scrub each input in order. A directory input is walked but never removed
    /// itself; it counts as residue unless it ends up empty.
    pub fn run<P: AsRef<Path>>(&self, inputs: &[P]) -> RunSummary {
        let mut summary = RunSummary::default();

        for input in inputs {
            let path = input.as_ref();
            if !self.scrub_input(path, &mut summary.report) {
                summary.residue.push(path.to_path_buf());
            }
        }

        summary
    }

    /// Returns false if the input still holds content afterwards
    fn scrub_input(&self, path: &Path, report: &mut Report) -> bool {
        // The input itself is resolved through symlinks, like `stat`. A
        // dangling symlink fails that but is still a node of its own.
        let kind = match self.fs.kind(path) {
            Ok(kind) => kind,
            Err(source) => match self.fs.symlink_kind(path) {
                Ok(kind) => kind,
                Err(_) => {
                    let err = ScrubError::Inaccessible {
                        path: path.to_path_buf(),
                        source,
                    };
                    error!("{err}");
                    report.failures.push(err);
                    return true;
                }
            },
        };

        if kind == NodeKind::Directory {
            debug!("Processing directory {}", path.display());
            if let Err(err) = self.process_directory(path, report) {
                error!("{err}");
                report.failures.push(err);
                return false;
            }
            return self.is_empty(path);
        }

        debug!("Processing node {}", path.display());
        let own_kind = self.fs.symlink_kind(path).unwrap_or(kind);
        if own_kind.is_special() && self.config.preserve_special {
            debug!("Preserving special file {}", path.display());
            report.preserved.push(path.to_path_buf());
            return true;
        }

        match self.process_file(path, report) {
            Ok(_) => true,
            Err(err) => {
                report.failures.push(err);
                false
            }
        }
    }

    /// Walk a directory post-order, clobbering matching files and removing
    /// subdirectories that end up empty.
    ///
    /// Only fails if `path` itself cannot be listed. Failures below it are
    /// logged, recorded in `report`, and do not stop the iteration.
    pub fn process_directory(&self, path: &Path, report: &mut Report) -> Result<()> {
        let entries = self
            .fs
            .read_dir(path)
            .map_err(|source| ScrubError::DirectoryOpen {
                path: path.to_path_buf(),
                source,
            })?;

        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    error!("Error reading entry in {}: {}", path.display(), err);
                    continue;
                }
            };

            let child = path.join(&entry.name);

            match classify(self.fs, &entry, &child) {
                NodeKind::Directory => {
                    self.process_subdirectory(&entry.name_lossy(), &child, report);
                }
                kind if kind.is_special() && self.config.preserve_special => {
                    debug!("Preserving special file {}", child.display());
                    report.preserved.push(child);
                }
                _ => {
                    if let Err(err) = self.process_file(&child, report) {
                        debug!("Could not process {}: {}", child.display(), err);
                        report.failures.push(err);
                    }
                }
            }
        }

        Ok(())
    }

    fn process_subdirectory(&self, name: &str, path: &Path, report: &mut Report) {
        if self.config.preserve_hidden && is_hidden(name) {
            debug!("Preserving hidden directory {}", path.display());
            report.preserved.push(path.to_path_buf());
            return;
        }

        if let Err(err) = self.process_directory(path, report) {
            error!("{err}");
            report.failures.push(err);
            return;
        }

        if self.is_empty(path) {
            if let Err(err) = self.remove(path, NodeKind::Directory, report) {
                error!("{err}");
                report.failures.push(err);
            }
        } else {
            debug!("Directory {} is not empty. Not removing.", path.display());
        }
    }

    /// Clobber a single file if its base name matches the rules.
    pub fn process_file(&self, path: &Path, report: &mut Report) -> Result<Disposition> {
        let base_name = path.file_name().unwrap_or_default();

        if !self.config.rules.should_clobber_os(base_name) {
            report.kept += 1;
            return Ok(Disposition::Kept);
        }

        self.remove(path, NodeKind::RegularFile, report)
            .inspect_err(|err| error!("{err}"))
    }

    /// True iff the directory lists no entries. A directory that cannot be
    /// opened is reported as non-empty.
    pub fn is_empty(&self, path: &Path) -> bool {
        match self.fs.read_dir(path) {
            // Stop at the first entry
            Ok(mut entries) => entries.next().is_none(),
            Err(err) => {
                error!(
                    "Could not check whether {} is empty: {}",
                    path.display(),
                    err
                );
                false
            }
        }
    }

    /// Remove a node, or only report it in simulate mode.
    ///
    /// The node is probed again before removal; `kind` is used only when that
    /// probe fails.
    pub fn remove(&self, path: &Path, kind: NodeKind, report: &mut Report) -> Result<Disposition> {
        if self.config.simulate {
            info!("Would remove {}", path.display());
            report.would_remove.push(path.to_path_buf());
            return Ok(Disposition::WouldRemove);
        }

        let is_dir = self.fs.symlink_kind(path).unwrap_or(kind) == NodeKind::Directory;
        let result = if is_dir {
            self.fs.remove_dir(path)
        } else {
            self.fs.remove_file(path)
        };

        match result {
            Ok(()) => {
                debug!("Removed {}", path.display());
                if is_dir {
                    report.removed_dirs.push(path.to_path_buf());
                } else {
                    report.removed_files.push(path.to_path_buf());
                }
                Ok(Disposition::Removed)
            }
            Err(source) => Err(ScrubError::Deletion {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}
