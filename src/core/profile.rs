//! Configuration profiles.
//!
//! A build configuration is named by an opaque tag such as `Gcc-shared-debug`.
//! [`resolve`] maps the tag onto a [`ConfigurationProfile`] once; every other
//! part of the crate asks the profile's predicates instead of looking at the
//! tag again.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::ConfigurationError;

/// Operating system the build runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
}

impl Platform {
    /// The system name used in package archive names.
    pub fn system_name(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::Linux => "Linux",
        }
    }
}

/// Compiler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toolchain {
    Msvc,
    Gcc,
    Clang,
}

/// Build tool that CMake generates files for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    Make,
    Ninja,
    VisualStudio,
}

impl Generator {
    /// Multi-config generators hold all compiler configs in one build tree.
    pub fn is_multi_config(&self) -> bool {
        matches!(self, Generator::VisualStudio)
    }
}

/// Whether the package libraries are built as shared or static libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
    Shared,
    Static,
}

/// CMake compiler configuration (`CMAKE_BUILD_TYPE` or the VS config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompilerConfig {
    Debug,
    Release,
}

impl CompilerConfig {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompilerConfig::Debug => "Debug",
            CompilerConfig::Release => "Release",
        }
    }

    /// Lowercase spelling used in binary postfixes and CMake file names.
    pub fn lower(&self) -> &'static str {
        match self {
            CompilerConfig::Debug => "debug",
            CompilerConfig::Release => "release",
        }
    }
}

impl fmt::Display for CompilerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CompilerConfig {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(CompilerConfig::Debug),
            "release" => Ok(CompilerConfig::Release),
            _ => Err(ConfigurationError::UnknownTag {
                tag: s.to_string(),
                known: vec!["Debug".to_string(), "Release".to_string()],
            }),
        }
    }
}

/// The resolved facts about one build configuration.
///
/// Immutable once resolved. [`ConfigurationProfile::with_compiler_config`]
/// returns a new value rather than changing this one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigurationProfile {
    pub tag: String,
    pub platform: Platform,
    pub toolchain: Toolchain,
    pub generator: Generator,
    pub linkage: Linkage,
    pub compiler_config: CompilerConfig,
}

/// The recognized configuration tags.
const KNOWN_CONFIGURATIONS: &[(&str, Platform, Toolchain, Generator, Linkage, CompilerConfig)] = &[
    ("VS2017-shared", Platform::Windows, Toolchain::Msvc, Generator::VisualStudio, Linkage::Shared, CompilerConfig::Debug),
    ("VS2017-static", Platform::Windows, Toolchain::Msvc, Generator::VisualStudio, Linkage::Static, CompilerConfig::Debug),
    ("VS2017-shared-release", Platform::Windows, Toolchain::Msvc, Generator::VisualStudio, Linkage::Shared, CompilerConfig::Release),
    ("VS2017-static-release", Platform::Windows, Toolchain::Msvc, Generator::VisualStudio, Linkage::Static, CompilerConfig::Release),
    ("Gcc-shared-debug", Platform::Linux, Toolchain::Gcc, Generator::Make, Linkage::Shared, CompilerConfig::Debug),
    ("Gcc-static-release", Platform::Linux, Toolchain::Gcc, Generator::Ninja, Linkage::Static, CompilerConfig::Release),
    ("Clang-shared-debug", Platform::Linux, Toolchain::Clang, Generator::Make, Linkage::Shared, CompilerConfig::Debug),
    ("Clang-static-release", Platform::Linux, Toolchain::Clang, Generator::Ninja, Linkage::Static, CompilerConfig::Release),
];

/// All configuration tags [`resolve`] accepts.
pub fn known_tags() -> Vec<&'static str> {
    KNOWN_CONFIGURATIONS.iter().map(|entry| entry.0).collect()
}

/// Resolve a configuration tag into its profile.
pub fn resolve(tag: &str) -> Result<ConfigurationProfile, ConfigurationError> {
    let entry = KNOWN_CONFIGURATIONS
        .iter()
        .find(|entry| entry.0 == tag)
        .ok_or_else(|| ConfigurationError::UnknownTag {
            tag: tag.to_string(),
            known: known_tags().into_iter().map(String::from).collect(),
        })?;

    let (tag, platform, toolchain, generator, linkage, compiler_config) = *entry;
    let profile = ConfigurationProfile {
        tag: tag.to_string(),
        platform,
        toolchain,
        generator,
        linkage,
        compiler_config,
    };
    profile.validate()?;
    tracing::debug!("resolved configuration {} to {:?}", tag, profile);
    Ok(profile)
}

impl ConfigurationProfile {
    /// Check that the facts of this profile do not contradict each other.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let contradiction = match (self.platform, self.toolchain, self.generator) {
            (Platform::Windows, Toolchain::Gcc | Toolchain::Clang, _) => {
                Some("gcc and clang configurations are not supported on windows")
            }
            (Platform::Linux, Toolchain::Msvc, _) => Some("msvc only exists on windows"),
            (Platform::Linux, _, Generator::VisualStudio) => {
                Some("visual studio solutions are only generated on windows")
            }
            (_, Toolchain::Gcc | Toolchain::Clang, Generator::VisualStudio) => {
                Some("visual studio solutions always use msvc")
            }
            _ => None,
        };

        match contradiction {
            Some(reason) => Err(ConfigurationError::ContradictoryProfile {
                tag: self.tag.clone(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Switch to another compiler config of the same build tree.
    ///
    /// Only multi-config generators can build more than one compiler config
    /// from a single configuration.
    pub fn with_compiler_config(
        &self,
        compiler_config: CompilerConfig,
    ) -> Result<ConfigurationProfile, ConfigurationError> {
        if compiler_config != self.compiler_config && !self.generator.is_multi_config() {
            return Err(ConfigurationError::ContradictoryProfile {
                tag: self.tag.clone(),
                reason: format!(
                    "single-config generator is fixed to {}, cannot build {}",
                    self.compiler_config, compiler_config
                ),
            });
        }
        Ok(ConfigurationProfile {
            compiler_config,
            ..self.clone()
        })
    }

    /// Compiler configs this configuration's build tree can produce.
    pub fn compiler_configs(&self) -> Vec<CompilerConfig> {
        if self.generator.is_multi_config() {
            vec![CompilerConfig::Debug, CompilerConfig::Release]
        } else {
            vec![self.compiler_config]
        }
    }

    pub fn is_windows(&self) -> bool {
        self.platform == Platform::Windows
    }

    pub fn is_linux(&self) -> bool {
        self.platform == Platform::Linux
    }

    pub fn is_msvc(&self) -> bool {
        self.toolchain == Toolchain::Msvc
    }

    pub fn is_gcc_config(&self) -> bool {
        self.toolchain == Toolchain::Gcc
    }

    pub fn is_clang_config(&self) -> bool {
        self.toolchain == Toolchain::Clang
    }

    pub fn is_shared_libraries_config(&self) -> bool {
        self.linkage == Linkage::Shared
    }

    pub fn is_debug_compiler_config(&self) -> bool {
        self.compiler_config == CompilerConfig::Debug
    }

    pub fn is_visual_studio_config(&self) -> bool {
        self.generator == Generator::VisualStudio
    }

    pub fn is_make_config(&self) -> bool {
        self.generator == Generator::Make
    }

    pub fn is_ninja_config(&self) -> bool {
        self.generator == Generator::Ninja
    }

    pub fn is_linux_debug_config(&self) -> bool {
        self.is_linux() && self.is_debug_compiler_config()
    }

    pub fn is_visual_studio_debug_config(&self) -> bool {
        self.is_visual_studio_config() && self.is_debug_compiler_config()
    }

    pub fn is_msvc_or_debug_config(&self) -> bool {
        self.is_visual_studio_config() || self.is_linux_debug_config()
    }
}

impl std::str::FromStr for ConfigurationProfile {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_gcc_shared_debug() {
        let profile = resolve("Gcc-shared-debug").unwrap();
        assert!(profile.is_linux());
        assert!(profile.is_gcc_config());
        assert!(profile.is_make_config());
        assert!(profile.is_shared_libraries_config());
        assert!(profile.is_debug_compiler_config());
        assert!(profile.is_linux_debug_config());
    }

    #[test]
    fn test_resolve_unknown_tag() {
        let err = resolve("Gcc-shared").unwrap_err();
        match err {
            ConfigurationError::UnknownTag { tag, known } => {
                assert_eq!(tag, "Gcc-shared");
                assert_eq!(known.len(), KNOWN_CONFIGURATIONS.len());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert!(resolve("gcc-shared-debug").is_err());
    }

    #[test]
    fn test_predicates_are_exclusive_for_every_tag() {
        for tag in known_tags() {
            let p = resolve(tag).unwrap();
            let generators = [p.is_make_config(), p.is_ninja_config(), p.is_visual_studio_config()];
            assert_eq!(generators.iter().filter(|b| **b).count(), 1, "{tag}");

            let toolchains = [p.is_msvc(), p.is_gcc_config(), p.is_clang_config()];
            assert_eq!(toolchains.iter().filter(|b| **b).count(), 1, "{tag}");

            assert_ne!(p.is_windows(), p.is_linux(), "{tag}");
            assert_eq!(p.is_visual_studio_config(), p.is_windows(), "{tag}");
            assert_eq!(p.tag, tag);
        }
    }

    #[test]
    fn test_with_compiler_config_for_visual_studio() {
        let debug = resolve("VS2017-shared").unwrap();
        let release = debug.with_compiler_config(CompilerConfig::Release).unwrap();
        assert!(!release.is_debug_compiler_config());
        assert!(debug.is_debug_compiler_config());
        assert_eq!(debug.compiler_configs().len(), 2);
    }

    #[test]
    fn test_with_compiler_config_rejects_single_config_generators() {
        let profile = resolve("Clang-static-release").unwrap();
        assert!(profile.with_compiler_config(CompilerConfig::Release).is_ok());
        let err = profile.with_compiler_config(CompilerConfig::Debug).unwrap_err();
        assert!(matches!(err, ConfigurationError::ContradictoryProfile { .. }));
        assert_eq!(profile.compiler_configs(), vec![CompilerConfig::Release]);
    }

    #[test]
    fn test_validate_rejects_msvc_on_linux() {
        let profile = ConfigurationProfile {
            tag: "custom".into(),
            platform: Platform::Linux,
            toolchain: Toolchain::Msvc,
            generator: Generator::Ninja,
            linkage: Linkage::Shared,
            compiler_config: CompilerConfig::Debug,
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_compiler_config_from_str() {
        assert_eq!("debug".parse::<CompilerConfig>().unwrap(), CompilerConfig::Debug);
        assert_eq!("Release".parse::<CompilerConfig>().unwrap(), CompilerConfig::Release);
        assert!("MinSizeRel".parse::<CompilerConfig>().is_err());
    }
}
