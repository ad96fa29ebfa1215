//! Distribution package archive names.
//!
//! Binary archives are named
//! `<package>.<version>.<system>.<content-tag>.<config>.<ext>`, source
//! archives `<package>.<version>.src.<ext>`. Portable runtime archives that
//! leave out some dependency targets carry a short hash of the excluded
//! target list in their content tag, so differently trimmed archives never
//! collide.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{ConfigurationProfile, ContentType, ModelError, PackageDescriptor};
use crate::util::hash::sha256_str;

/// Archive format produced by CPack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageGenerator {
    #[serde(rename = "7Z", alias = "7z")]
    SevenZip,
    #[serde(rename = "ZIP", alias = "zip")]
    Zip,
    #[serde(rename = "TGZ", alias = "tgz", alias = "tar.gz")]
    TarGz,
}

impl PackageGenerator {
    pub fn extension(&self) -> &'static str {
        match self {
            PackageGenerator::SevenZip => "7z",
            PackageGenerator::Zip => "zip",
            PackageGenerator::TarGz => "tar.gz",
        }
    }
}

impl fmt::Display for PackageGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PackageGenerator::SevenZip => "7Z",
            PackageGenerator::Zip => "ZIP",
            PackageGenerator::TarGz => "TGZ",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for PackageGenerator {
    type Err = PackageGeneratorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "7z" => Ok(PackageGenerator::SevenZip),
            "zip" => Ok(PackageGenerator::Zip),
            "tgz" | "tar.gz" => Ok(PackageGenerator::TarGz),
            _ => Err(PackageGeneratorParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid package generator.
#[derive(Debug, Clone)]
pub struct PackageGeneratorParseError(pub String);

impl fmt::Display for PackageGeneratorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid package generator '{}', valid values: 7Z, ZIP, TGZ",
            self.0
        )
    }
}

impl std::error::Error for PackageGeneratorParseError {}

/// First 8 hex characters of the hash of the sorted, `;`-joined target names.
///
/// Returns `None` when nothing is excluded. The order of `excluded` does not
/// matter.
pub fn excluded_targets_hash(excluded: &[String]) -> Option<String> {
    if excluded.is_empty() {
        return None;
    }
    let mut names: Vec<&str> = excluded.iter().map(String::as_str).collect();
    names.sort_unstable();
    names.dedup();
    Some(sha256_str(&names.join(";"))[..8].to_string())
}

/// The content tag of a binary archive.
pub fn content_tag(content: ContentType, excluded: &[String]) -> Result<String, ModelError> {
    match content {
        ContentType::Runtime => Ok("runtime".to_string()),
        ContentType::RuntimePortable => Ok(portable_tag(excluded)),
        ContentType::Developer => Ok("dev".to_string()),
        ContentType::Sources => Err(ModelError::MissingCase(
            "source archives have no binary content tag".to_string(),
        )),
    }
}

fn portable_tag(excluded: &[String]) -> String {
    match excluded_targets_hash(excluded) {
        Some(hash) => format!("runtime-port-{}", hash),
        None => "runtime-port".to_string(),
    }
}

/// Archive file name without extension.
///
/// This is also the name of the directory the archive unpacks into.
pub fn archive_stem(
    package: &PackageDescriptor,
    profile: &ConfigurationProfile,
    content: ContentType,
    excluded: &[String],
) -> String {
    let tag = match content {
        ContentType::Sources => return format!("{}.{}.src", package.name, package.version),
        ContentType::Runtime => "runtime".to_string(),
        ContentType::RuntimePortable => portable_tag(excluded),
        ContentType::Developer => "dev".to_string(),
    };
    format!(
        "{}.{}.{}.{}.{}",
        package.name,
        package.version,
        profile.platform.system_name(),
        tag,
        profile.compiler_config
    )
}

/// Full archive file name.
pub fn archive_file_name(
    package: &PackageDescriptor,
    profile: &ConfigurationProfile,
    content: ContentType,
    generator: PackageGenerator,
    excluded: &[String],
) -> String {
    format!(
        "{}.{}",
        archive_stem(package, profile, content, excluded),
        generator.extension()
    )
}
