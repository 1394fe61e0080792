//! Clobber rule loading and matching.

use crate::error::{Result, ScrubError};
use serde::Deserialize;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

/// The two exact-match lists that decide which files get clobbered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClobberRules {
    /// Full base names to delete (e.g. "Thumbs.db")
    names: Vec<String>,
    /// Extensions to delete, without the leading dot (e.g. "nfo")
    extensions: Vec<String>,
}

/// Structure to deserialize clobber rules from TOML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesFile {
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    extensions: Vec<String>,
}

impl ClobberRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a base name to the list of things to clobber
    pub fn clobber_name(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    /// Add an extension to the list of things to clobber
    pub fn clobber_extension(&mut self, extension: impl Into<String>) {
        self.extensions.push(extension.into());
    }

    /// Parse rules from TOML text
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self> {
        let file: RulesFile = toml::from_str(text).map_err(|e| ScrubError::Rules {
            path: origin.to_path_buf(),
            message: e.message().to_string(),
        })?;

        Ok(ClobberRules {
            names: file.names,
            extensions: file.extensions,
        })
    }

    /// Load rules from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ScrubError::RulesIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Append another rule set to this one
    pub fn merge(&mut self, other: ClobberRules) {
        self.names.extend(other.names);
        self.extensions.extend(other.extensions);
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.extensions.is_empty()
    }

    /// Returns true if the provided base name is on the name list
    pub fn should_clobber_name(&self, name: &str) -> bool {
        // Linear scan; both lists are operator-supplied and small
        self.names.iter().any(|n| n == name)
    }

    /// Returns true if the provided extension is on the extension list
    pub fn should_clobber_extension(&self, extension: &str) -> bool {
        self.extensions.iter().any(|e| e == extension)
    }

    /// Returns true if a file with this base name should be clobbered
    pub fn should_clobber(&self, base_name: &str) -> bool {
        self.should_clobber_os(OsStr::new(base_name))
    }

    /// Same as [`should_clobber`](Self::should_clobber), for names straight
    /// from a directory listing. Compares raw bytes, so a name that is not
    /// valid UTF-8 only matches a rule with exactly the same bytes.
    pub fn should_clobber_os(&self, base_name: &OsStr) -> bool {
        let bytes = base_name.as_encoded_bytes();
        if self.names.iter().any(|n| n.as_bytes() == bytes) {
            return true;
        }

        match bytes.iter().rposition(|&b| b == b'.') {
            Some(idx) => {
                let extension = &bytes[idx + 1..];
                self.extensions.iter().any(|e| e.as_bytes() == extension)
            }
            None => false,
        }
    }
}

/// Everything after the last `.` of a base name, or None if there is no `.`
///
/// A leading dot counts like any other, so `.bashrc` has the extension
/// `bashrc`, and `album.` has the empty extension.
pub fn extension_of(base_name: &str) -> Option<&str> {
    base_name.rfind('.').map(|idx| &base_name[idx + 1..])
}

/// A name is hidden when its first character is `.`
pub fn is_hidden(base_name: &str) -> bool {
    base_name.starts_with('.')
}
