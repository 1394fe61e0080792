//! Error types for scrub operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading rules or pruning a tree
#[derive(Error, Debug)]
pub enum ScrubError {
    /// A directory could not be listed; its subtree was skipped
    #[error("could not open directory {}: {source}", path.display())]
    DirectoryOpen { path: PathBuf, source: io::Error },

    /// A top-level input could not be probed
    #[error("cannot access {}: {source}", path.display())]
    Inaccessible { path: PathBuf, source: io::Error },

    /// Removing a file or directory failed
    #[error("could not remove {}: {source}", path.display())]
    Deletion { path: PathBuf, source: io::Error },

    /// A rules file could not be read
    #[error("could not read rules file {}: {source}", path.display())]
    RulesIo { path: PathBuf, source: io::Error },

    /// A rules file is not valid TOML or has unknown keys
    #[error("invalid rules file {}: {message}", path.display())]
    Rules { path: PathBuf, message: String },

    /// Malformed configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl ScrubError {
    /// The raw OS error number behind this error, if there is one
    pub fn os_code(&self) -> Option<i32> {
        match self {
            ScrubError::DirectoryOpen { source, .. }
            | ScrubError::Inaccessible { source, .. }
            | ScrubError::Deletion { source, .. }
            | ScrubError::RulesIo { source, .. } => source.raw_os_error(),
            ScrubError::Rules { .. } | ScrubError::Config(_) => None,
        }
    }

    /// The path the error refers to, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ScrubError::DirectoryOpen { path, .. }
            | ScrubError::Inaccessible { path, .. }
            | ScrubError::Deletion { path, .. }
            | ScrubError::RulesIo { path, .. }
            | ScrubError::Rules { path, .. } => Some(path),
            ScrubError::Config(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrubError>;
