//! Test utilities for cpfverify unit tests.
//!
//! Provides a temporary directory tree that can be populated from an
//! [`ArtifactSet`] and then changed entry by entry, so tests can produce
//! exactly the tree shape they want the verifier to see.
//!
//! # Example
//!
//! ```rust,ignore
//! use cpfverify::test_support::{packages, TempTree};
//!
//! #[test]
//! fn test_example() {
//!     let tree = TempTree::from_artifacts(&expected).unwrap();
//!     tree.add_file("stray.txt").unwrap();
//!     // Verify tree.path()...
//! }
//! ```

pub mod fixtures;

use std::path::Path;

use anyhow::Result;
use tempfile::TempDir;

use crate::core::ArtifactSet;

// Re-export fixtures for convenience
pub use fixtures::*;

/// A directory tree under a temporary root, removed on drop.
#[derive(Debug)]
pub struct TempTree {
    dir: TempDir,
}

impl TempTree {
    /// Create an empty tree.
    pub fn new() -> Result<Self> {
        Ok(TempTree {
            dir: TempDir::new()?,
        })
    }

    /// Create a tree holding exactly the entries of `artifacts`.
    pub fn from_artifacts(artifacts: &ArtifactSet) -> Result<Self> {
        let tree = TempTree::new()?;
        materialize(tree.path(), artifacts)?;
        Ok(tree)
    }

    /// Root directory of the tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add an empty regular file.
    pub fn add_file(&self, rel: &str) -> Result<()> {
        crate::util::fs::write_string(&self.path().join(rel), "")
    }

    /// Add a symlink pointing at `target`, which need not exist.
    pub fn add_symlink(&self, rel: &str, target: &str) -> Result<()> {
        let link = self.path().join(rel);
        if let Some(parent) = link.parent() {
            crate::util::fs::ensure_dir(parent)?;
        }
        crate::util::fs::symlink(Path::new(target), &link)?;
        Ok(())
    }

    /// Remove a file or symlink.
    pub fn remove(&self, rel: &str) -> Result<()> {
        std::fs::remove_file(self.path().join(rel))?;
        Ok(())
    }
}
