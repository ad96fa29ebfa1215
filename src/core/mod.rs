//! Core data structures for the artifact model.
//!
//! This module contains the foundational types used throughout the crate:
//! - Configuration profiles resolved from configuration tags
//! - Package descriptors, kinds and versions
//! - Content types and artifact sets
//! - Error types

pub mod artifact_set;
pub mod content;
pub mod errors;
pub mod package;
pub mod profile;

pub use artifact_set::{ArtifactSet, RelativePath};
pub use content::ContentType;
pub use errors::{ConfigurationError, ModelError, SignatureMismatch, VerificationMismatch};
pub use package::{
    ExternalLibrary, PackageDescriptor, PackageKind, SourceLayout, TargetRole, Version,
};
pub use profile::{
    known_tags, resolve, CompilerConfig, ConfigurationProfile, Generator, Linkage, Platform,
    Toolchain,
};
