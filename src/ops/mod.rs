//! High-level operations.
//!
//! This module contains the operations behind the `cpfverify` commands:
//! computing the expected content of a package archive, comparing a
//! directory tree against it, and checking build output for tool signatures.

pub mod content;
pub mod signature;
pub mod tree_verify;

pub use content::expected_content;
pub use signature::{
    assert_absent, assert_contains, binary_target_signature, install_target_signature,
    missing_target_signature, run_tests_signature, SignatureTarget,
};
pub use tree_verify::{
    format_result, format_result_json, render, verify, verify_artifacts, OutputFormat,
    VerificationResult,
};
