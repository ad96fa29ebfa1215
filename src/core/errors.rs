//! Error types for the artifact model.
//!
//! Every error here is fatal for the scenario that produced it. The model is
//! deterministic, so nothing is retried: a mismatch means either the model or
//! the build under test is wrong.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use super::artifact_set::RelativePath;

/// Failure to turn a configuration tag into a profile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unknown configuration tag `{tag}` (known tags: {})", .known.join(", "))]
    UnknownTag { tag: String, known: Vec<String> },

    #[error("contradictory configuration `{tag}`: {reason}")]
    ContradictoryProfile { tag: String, reason: String },

    #[error("missing case for configuration `{tag}`: {what}")]
    UnsupportedCombination { tag: String, what: String },
}

/// Failure while computing expected artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("missing case: {0}")]
    MissingCase(String),

    #[error("unknown content type `{0}`, valid values: runtime, runtime-portable, developer, sources")]
    UnknownContentType(String),

    #[error("unknown package kind `{0}`, valid values: console-app, gui-app, lib, static-lib, interface")]
    UnknownPackageKind(String),

    #[error("invalid version `{0}`: expected dotted numbers like 1.2.3")]
    InvalidVersion(String),

    #[error("invalid name `{0}`: names must be non-empty and must not contain path separators")]
    InvalidName(String),

    #[error("invalid plugin directory `{0}`: must be a relative path without `..`")]
    InvalidPluginDir(String),
}

/// A directory tree that does not match its expected artifact set.
///
/// Holds the complete four-way diff. An empty set means that category matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationMismatch {
    pub missing_files: BTreeSet<RelativePath>,
    pub extra_files: BTreeSet<RelativePath>,
    pub missing_symlinks: BTreeSet<RelativePath>,
    pub extra_symlinks: BTreeSet<RelativePath>,
}

impl fmt::Display for VerificationMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "directory tree does not match the expected artifacts")?;
        let sections = [
            ("missing files", &self.missing_files),
            ("unexpected files", &self.extra_files),
            ("missing symlinks", &self.missing_symlinks),
            ("unexpected symlinks", &self.extra_symlinks),
        ];
        for (title, paths) in sections {
            if paths.is_empty() {
                continue;
            }
            write!(f, "\n  {} ({}):", title, paths.len())?;
            for path in paths {
                write!(f, "\n    {}", path)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for VerificationMismatch {}

/// Build output that lacks required text, or still contains text that
/// proves a step ran when it should have been skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureMismatch {
    #[error(
        "output of target `{target}` is missing signature parts: {}{}",
        quoted(.missing),
        trigger_note(.trigger.as_deref())
    )]
    Missing {
        target: String,
        missing: Vec<String>,
        trigger: Option<String>,
    },

    #[error(
        "output of target `{target}` contains the full signature {} although it should be up-to-date",
        quoted(.present)
    )]
    Present { target: String, present: Vec<String> },
}

fn quoted(parts: &[String]) -> String {
    parts
        .iter()
        .map(|p| format!("\"{}\"", p))
        .collect::<Vec<_>>()
        .join(", ")
}

fn trigger_note(trigger: Option<&str>) -> String {
    match trigger {
        Some(file) => format!(" (rebuild was triggered by touching `{}`)", file),
        None => String::new(),
    }
}
