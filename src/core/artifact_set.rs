//! Sets of expected or observed artifacts.
//!
//! Files and symlinks are tracked in two separate sets. A symlink existing
//! and the file it points to existing are different facts, so the two are
//! never merged.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A `/`-separated path relative to a package or tree root.
///
/// Empty components and `.` are dropped on construction, so `bin//./app`
/// and `bin/app` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// Create a normalized relative path from a `/` or `\` separated string.
    pub fn new(path: impl AsRef<str>) -> Self {
        let joined = path
            .as_ref()
            .split(['/', '\\'])
            .filter(|part| !part.is_empty() && *part != ".")
            .collect::<Vec<_>>()
            .join("/");
        RelativePath(joined)
    }

    /// The empty path, i.e. the root itself.
    pub fn root() -> Self {
        RelativePath(String::new())
    }

    /// Build a relative path from a filesystem path, keeping only normal components.
    pub fn from_path(path: &Path) -> Self {
        let parts: Vec<String> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_string()),
                _ => None,
            })
            .collect();
        RelativePath(parts.join("/"))
    }

    /// Append one or more `/`-separated components.
    pub fn join(&self, tail: impl AsRef<str>) -> Self {
        let tail = RelativePath::new(tail);
        if self.0.is_empty() {
            tail
        } else if tail.0.is_empty() {
            self.clone()
        } else {
            RelativePath(format!("{}/{}", self.0, tail.0))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve against a root directory on disk.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.0
            .split('/')
            .filter(|p| !p.is_empty())
            .fold(root.to_path_buf(), |acc, part| acc.join(part))
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        RelativePath::new(s)
    }
}

impl From<String> for RelativePath {
    fn from(s: String) -> Self {
        RelativePath::new(s)
    }
}

/// Files and symlinks, each without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSet {
    pub files: BTreeSet<RelativePath>,
    pub symlinks: BTreeSet<RelativePath>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<RelativePath>) -> &mut Self {
        self.files.insert(path.into());
        self
    }

    pub fn add_symlink(&mut self, path: impl Into<RelativePath>) -> &mut Self {
        self.symlinks.insert(path.into());
        self
    }

    pub fn add_files<I, P>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<RelativePath>,
    {
        self.files.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn add_symlinks<I, P>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<RelativePath>,
    {
        self.symlinks.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Merge another set into this one.
    pub fn extend(&mut self, other: ArtifactSet) -> &mut Self {
        self.files.extend(other.files);
        self.symlinks.extend(other.symlinks);
        self
    }

    /// True when every file and symlink of `other` is also in `self`.
    pub fn is_superset(&self, other: &ArtifactSet) -> bool {
        self.files.is_superset(&other.files) && self.symlinks.is_superset(&other.symlinks)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.symlinks.is_empty()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.files.len() + self.symlinks.len()
    }

    /// Iterate over every path, files first.
    pub fn iter(&self) -> impl Iterator<Item = &RelativePath> {
        self.files.iter().chain(self.symlinks.iter())
    }
}
