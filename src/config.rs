//! Run configuration handed to the scrubber.

use crate::rules::ClobberRules;

/// Flags and rules for one run. Built once, then only read.
#[derive(Debug, Clone, Default)]
pub struct ScrubConfig {
    /// Treat directories whose name starts with `.` as traversal barriers
    pub preserve_hidden: bool,
    /// Never delete devices, sockets, pipes or symlinks
    pub preserve_special: bool,
    /// Report removals instead of performing them
    pub simulate: bool,
    /// Log progress and skipped entries
    pub verbose: bool,
    pub rules: ClobberRules,
}

impl ScrubConfig {
    pub fn new(rules: ClobberRules) -> Self {
        ScrubConfig {
            rules,
            ..Default::default()
        }
    }

    pub fn preserve_hidden(mut self, yes: bool) -> Self {
        self.preserve_hidden = yes;
        self
    }

    pub fn preserve_special(mut self, yes: bool) -> Self {
        self.preserve_special = yes;
        self
    }

    pub fn simulate(mut self, yes: bool) -> Self {
        self.simulate = yes;
        self
    }

    pub fn verbose(mut self, yes: bool) -> Self {
        self.verbose = yes;
        self
    }
}
