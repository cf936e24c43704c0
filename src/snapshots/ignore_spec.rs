use std::ffi::OsString;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use derive_more::Display;
use regex::Regex;

use crate::ext::normalize_path;

/// A regular expression that must match a whole path string, not just part of it.
///
/// Equality and hashing use the pattern text as written by the user, so two specs
/// built from the same pattern deduplicate inside a set.
#[derive(Debug, Clone)]
pub struct IgnorePattern {
    pattern: String,
    anchored: Regex,
}

impl IgnorePattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        // Validate on its own first so the wrapping group cannot change its meaning.
        Regex::new(pattern)?;
        let anchored = Regex::new(&format!(r"\A(?:{pattern})\z"))?;
        Ok(Self {
            pattern: pattern.to_string(),
            anchored,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn is_full_match(&self, haystack: &str) -> bool {
        self.anchored.is_match(haystack)
    }
}

impl PartialEq for IgnorePattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for IgnorePattern {}

impl Hash for IgnorePattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
    }
}

/// Rule excluding paths from snapshots and from comparison results.
///
/// Matching is purely structural: nothing here touches the filesystem, so paths that
/// no longer exist (deleted litter) are matched exactly like live ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum IgnoreSpec {
    /// The directory itself and everything below it, at any depth.
    #[display("directory '{}'", _0.display())]
    Directory(PathBuf),
    /// Any path having this name as one of its components.
    #[display("name '{}'", _0.to_string_lossy())]
    Name(OsString),
    /// Any path whose full string form matches the pattern.
    #[display("pattern '{}'", _0.as_str())]
    Regex(IgnorePattern),
}

impl IgnoreSpec {
    pub fn directory(directory: impl AsRef<Path>) -> Self {
        IgnoreSpec::Directory(normalize_path(directory.as_ref()))
    }

    pub fn name(name: impl Into<OsString>) -> Self {
        IgnoreSpec::Name(name.into())
    }

    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        IgnorePattern::new(pattern).map(IgnoreSpec::Regex)
    }

    /// Builds a full-match rule from an already compiled expression.
    pub fn from_regex(regex: &Regex) -> Result<Self, regex::Error> {
        Self::regex(regex.as_str())
    }

    pub fn matches(&self, path: &Path) -> bool {
        match self {
            IgnoreSpec::Directory(directory) => normalize_path(path).starts_with(directory),
            IgnoreSpec::Name(name) => path
                .components()
                .any(|component| component.as_os_str() == name.as_os_str()),
            IgnoreSpec::Regex(pattern) => pattern.is_full_match(&path.to_string_lossy()),
        }
    }
}
