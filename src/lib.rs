//! cpfverify - expected build artifacts for CMakeProjectFramework packages
//!
//! This crate models which files and symlinks a CPF package build produces
//! for a given configuration and archive content type, and verifies real
//! directory trees and build output against that model.

pub mod core;
pub mod layout;
pub mod ops;
pub mod util;

/// Test utilities for cpfverify unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It writes artifact sets to disk so the verifier can be
/// exercised against real trees.
#[cfg(test)]
pub mod test_support;

pub use core::{
    resolve, ArtifactSet, ConfigurationProfile, ContentType, PackageDescriptor, PackageKind,
    RelativePath,
};
pub use layout::ArtifactLayout;
pub use ops::{expected_content, verify, verify_artifacts, VerificationResult};
