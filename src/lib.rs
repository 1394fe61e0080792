//! Scrub - Sidecar Pruner
//!
//! Scrub deletes files whose exact name or extension is on a clobber list,
//! then removes every directory left empty, bottom-up, so a tree collapses as
//! far as its remaining content allows. Useful for the checksum and metadata
//! files an import pipeline leaves behind.
//!
//! ## Architecture
//!
//! - [`rules`]: exact-match name and extension lists, loadable from TOML
//! - [`fs`]: the filesystem seam (`RealFs` on disk, `MockFs` in memory)
//! - [`scrubber`]: post-order walker, clobbering, emptiness checks and removal
//! - [`config`]: the read-only run configuration

pub mod config;
pub mod error;
pub mod fs;
pub mod logging;
pub mod rules;
pub mod scrubber;

// Re-export commonly used items
pub use config::ScrubConfig;
pub use error::{Result, ScrubError};
pub use fs::{Filesystem, MockFs, NodeKind, RealFs};
pub use logging::init_tracing;
pub use rules::{extension_of, is_hidden, ClobberRules};
pub use scrubber::{Disposition, Report, RunSummary, Scrubber};
