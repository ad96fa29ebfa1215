//! Package descriptors.
//!
//! A [`PackageDescriptor`] is everything the artifact model needs to know
//! about one CPF package: its name, what kind of binary it produces, the
//! namespace of its export macros, its version, and which external
//! libraries and plugins a portable runtime package has to carry along.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::ModelError;
use super::profile::{ConfigurationProfile, Linkage};

/// Dotted numeric core with an optional non-release suffix (`1.2.3.4-gabc`).
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)+)(?:-([0-9A-Za-z][0-9A-Za-z.\-]*))?$").expect("valid regex")
});

/// The kind of package, which decides what binaries it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageKind {
    /// Command line executable
    #[serde(alias = "CONSOLE_APP", alias = "exe")]
    ConsoleApp,

    /// Executable with a graphical user interface
    #[serde(alias = "GUI_APP")]
    GuiApp,

    /// Library whose linkage follows the configuration
    #[serde(rename = "lib", alias = "LIB", alias = "shared-lib")]
    SharedLib,

    /// Library that is always linked statically
    #[serde(alias = "STATIC_LIB")]
    StaticLib,

    /// Header-only library without binaries
    #[serde(rename = "interface", alias = "INTERFACE_LIB", alias = "interface-lib")]
    InterfaceLib,
}

impl PackageKind {
    /// Executables get a versioned binary plus a name-link.
    pub fn is_executable(&self) -> bool {
        matches!(self, PackageKind::ConsoleApp | PackageKind::GuiApp)
    }

    pub fn is_interface(&self) -> bool {
        matches!(self, PackageKind::InterfaceLib)
    }

    /// Linkage of the package's own library, `None` if it has no binaries.
    pub fn library_linkage(&self, profile: &ConfigurationProfile) -> Option<Linkage> {
        match self {
            PackageKind::ConsoleApp | PackageKind::GuiApp | PackageKind::SharedLib => {
                Some(profile.linkage)
            }
            PackageKind::StaticLib => Some(Linkage::Static),
            PackageKind::InterfaceLib => None,
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PackageKind::ConsoleApp => "console-app",
            PackageKind::GuiApp => "gui-app",
            PackageKind::SharedLib => "lib",
            PackageKind::StaticLib => "static-lib",
            PackageKind::InterfaceLib => "interface",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for PackageKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "console-app" | "exe" => Ok(PackageKind::ConsoleApp),
            "gui-app" => Ok(PackageKind::GuiApp),
            "lib" | "shared-lib" => Ok(PackageKind::SharedLib),
            "static-lib" => Ok(PackageKind::StaticLib),
            "interface" | "interface-lib" => Ok(PackageKind::InterfaceLib),
            _ => Err(ModelError::UnknownPackageKind(s.to_string())),
        }
    }
}

/// A package version such as `1.2.3` or `0.0.4.12-ab3f`.
///
/// File names are built from the version exactly as written, so the
/// validated text is kept alongside the parsed numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    components: Vec<u64>,
    suffix: Option<String>,
    text: String,
}

impl Version {
    /// Parse a version string, requiring at least `major.minor`.
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        let text = s.trim();
        let caps = VERSION_RE
            .captures(text)
            .ok_or_else(|| ModelError::InvalidVersion(s.to_string()))?;

        let components = caps[1]
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ModelError::InvalidVersion(s.to_string()))?;

        Ok(Version {
            components,
            suffix: caps.get(2).map(|m| m.as_str().to_string()),
            text: text.to_string(),
        })
    }

    /// The `major.minor` prefix used for ABI compatibility links.
    pub fn major_minor(&self) -> String {
        let core = self.text.split('-').next().unwrap_or(&self.text);
        core.split('.').take(2).collect::<Vec<_>>().join(".")
    }

    /// The next release after this version: the first three components
    /// with the patch number incremented and any suffix dropped.
    pub fn next_release(&self) -> Version {
        let mut components: Vec<u64> = self.components.iter().copied().take(3).collect();
        while components.len() < 3 {
            components.push(0);
        }
        components[2] += 1;
        let text = components
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(".");
        Version {
            components,
            suffix: None,
            text,
        }
    }

    pub fn is_release(&self) -> bool {
        self.suffix.is_none() && self.components.len() <= 3
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for Version {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Version::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// An external library a package links against, written `Name` or `Name@1.2.3`.
///
/// Without a version the library is expected under its short name only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExternalLibrary {
    pub name: String,
    pub version: Option<Version>,
}

impl ExternalLibrary {
    pub fn new(name: impl Into<String>) -> Self {
        ExternalLibrary {
            name: name.into(),
            version: None,
        }
    }

    pub fn versioned(name: impl Into<String>, version: Version) -> Self {
        ExternalLibrary {
            name: name.into(),
            version: Some(version),
        }
    }
}

impl fmt::Display for ExternalLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}@{}", self.name, v),
            None => f.write_str(&self.name),
        }
    }
}

impl std::str::FromStr for ExternalLibrary {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, version) = match s.split_once('@') {
            Some((name, version)) => (name, Some(Version::parse(version)?)),
            None => (s, None),
        };
        validate_name(name)?;
        Ok(ExternalLibrary {
            name: name.to_string(),
            version,
        })
    }
}

impl Serialize for ExternalLibrary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExternalLibrary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Source files of a package, relative to its source directory.
///
/// The defaults are the files of the single-library CPF test project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SourceLayout {
    pub public_headers: Vec<String>,
    pub implementation_files: Vec<String>,
    pub fixture_headers: Vec<String>,
    pub fixture_sources: Vec<String>,
    pub test_sources: Vec<String>,
    /// Windows resource scripts (`.rc`)
    pub resource_files: Vec<String>,
}

impl Default for SourceLayout {
    fn default() -> Self {
        SourceLayout {
            public_headers: vec!["function.h".to_string()],
            implementation_files: vec!["function.cpp".to_string()],
            fixture_headers: vec!["fixture.h".to_string()],
            fixture_sources: vec!["fixture.cpp".to_string()],
            test_sources: vec!["function_tests.cpp".to_string()],
            resource_files: Vec::new(),
        }
    }
}

/// Description of one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageDescriptor {
    pub name: String,
    pub kind: PackageKind,
    /// Prefix of the generated export macro headers
    pub namespace: String,
    pub version: Version,
    #[serde(default)]
    pub dependencies: Vec<ExternalLibrary>,
    /// Plugin directory (relative to the runtime dir) to plugin targets
    #[serde(default)]
    pub plugin_dependencies: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub sources: SourceLayout,
}

impl PackageDescriptor {
    /// Create a descriptor with default sources and no dependencies.
    pub fn new(
        name: impl Into<String>,
        kind: PackageKind,
        namespace: impl Into<String>,
        version: Version,
    ) -> Self {
        PackageDescriptor {
            name: name.into(),
            kind,
            namespace: namespace.into(),
            version,
            dependencies: Vec::new(),
            plugin_dependencies: BTreeMap::new(),
            sources: SourceLayout::default(),
        }
    }

    pub fn with_dependency(mut self, dependency: ExternalLibrary) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_plugins(mut self, dir: impl Into<String>, targets: Vec<String>) -> Self {
        self.plugin_dependencies.insert(dir.into(), targets);
        self
    }

    /// Check names and plugin directories before any paths are built from them.
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_name(&self.name)?;
        validate_name(&self.namespace)?;
        for dependency in &self.dependencies {
            validate_name(&dependency.name)?;
        }
        for (dir, targets) in &self.plugin_dependencies {
            validate_plugin_dir(dir)?;
            for target in targets {
                validate_name(target)?;
            }
        }
        Ok(())
    }
}

/// The targets a package creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetRole {
    /// The package's main target, named after the package
    Primary,
    /// The library holding the package code; `lib<name>` for executables
    Implementation,
    Fixtures,
    Tests,
}

impl TargetRole {
    /// Name of this target for the given package.
    pub fn target_name(&self, package: &PackageDescriptor) -> String {
        match self {
            TargetRole::Primary => package.name.clone(),
            TargetRole::Implementation if package.kind.is_executable() => {
                format!("lib{}", package.name)
            }
            TargetRole::Implementation => package.name.clone(),
            TargetRole::Fixtures => format!("{}_fixtures", package.name),
            TargetRole::Tests => format!("{}_tests", package.name),
        }
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ModelError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn validate_plugin_dir(dir: &str) -> Result<(), ModelError> {
    let absolute = dir.starts_with('/') || dir.starts_with('\\') || dir.contains(':');
    let escapes = dir.split(['/', '\\']).any(|part| part == "..");
    if dir.is_empty() || absolute || escapes {
        return Err(ModelError::InvalidPluginDir(dir.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.to_string(), "1.2.3");
        assert_eq!(v.major_minor(), "1.2");
        assert!(v.is_release());

        let v = Version::parse("0.0.4.12-ab3f").unwrap();
        assert_eq!(v.to_string(), "0.0.4.12-ab3f");
        assert_eq!(v.major_minor(), "0.0");
        assert!(!v.is_release());
    }

    #[test]
    fn test_version_keeps_leading_zeros() {
        let v = Version::parse("1.02.3").unwrap();
        assert_eq!(v.to_string(), "1.02.3");
        assert_eq!(v.major_minor(), "1.02");
        assert_eq!(v.next_release().to_string(), "1.2.4");

        let v: Version = serde_json::from_str("\"01.0.0-rc1\"").unwrap();
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"01.0.0-rc1\"");
    }

    #[test]
    fn test_version_rejects_garbage() {
        assert!(Version::parse("1").is_err());
        assert!(Version::parse("1.x").is_err());
        assert!(Version::parse("").is_err());
        assert!(Version::parse("v1.2").is_err());
    }

    #[test]
    fn test_next_release() {
        let v = Version::parse("1.2.3.17-gdeadbeef").unwrap();
        assert_eq!(v.next_release().to_string(), "1.2.4");
        let v = Version::parse("1.2").unwrap();
        assert_eq!(v.next_release().to_string(), "1.2.1");
    }

    #[test]
    fn test_external_library_parse() {
        let lib: ExternalLibrary = "Ext".parse().unwrap();
        assert_eq!(lib, ExternalLibrary::new("Ext"));
        let lib: ExternalLibrary = "Ext@2.1.0".parse().unwrap();
        assert_eq!(lib.version.unwrap().to_string(), "2.1.0");
        assert!("Ext@abc".parse::<ExternalLibrary>().is_err());
        assert!("@1.0".parse::<ExternalLibrary>().is_err());
    }

    #[test]
    fn test_package_kind_aliases() {
        assert_eq!("LIB".parse::<PackageKind>().unwrap(), PackageKind::SharedLib);
        assert_eq!("CONSOLE_APP".parse::<PackageKind>().unwrap(), PackageKind::ConsoleApp);
        assert_eq!("interface".parse::<PackageKind>().unwrap(), PackageKind::InterfaceLib);
        assert!("plugin".parse::<PackageKind>().is_err());
    }

    #[test]
    fn test_target_names() {
        let version = Version::parse("1.0.0").unwrap();
        let app = PackageDescriptor::new("APackage", PackageKind::ConsoleApp, "a", version.clone());
        assert_eq!(TargetRole::Primary.target_name(&app), "APackage");
        assert_eq!(TargetRole::Implementation.target_name(&app), "libAPackage");
        assert_eq!(TargetRole::Tests.target_name(&app), "APackage_tests");

        let lib = PackageDescriptor::new("BPackage", PackageKind::SharedLib, "b", version);
        assert_eq!(TargetRole::Implementation.target_name(&lib), "BPackage");
        assert_eq!(TargetRole::Fixtures.target_name(&lib), "BPackage_fixtures");
    }

    #[test]
    fn test_validate_plugin_dirs() {
        let version = Version::parse("1.0.0").unwrap();
        let base = PackageDescriptor::new("A", PackageKind::ConsoleApp, "a", version);
        assert!(base.clone().with_plugins("plugins/x", vec!["P".into()]).validate().is_ok());
        assert!(base.clone().with_plugins("../x", vec!["P".into()]).validate().is_err());
        assert!(base.clone().with_plugins("/abs", vec!["P".into()]).validate().is_err());
        assert!(base.with_plugins("ok", vec!["a/b".into()]).validate().is_err());
    }

    #[test]
    fn test_descriptor_from_toml() {
        let text = r#"
            name = "MyLib"
            kind = "lib"
            namespace = "mylib"
            version = "1.2.3"
            dependencies = ["Ext", "Other@2.0"]

            [plugin-dependencies]
            plugins = ["PluginA"]
        "#;
        let package: PackageDescriptor = toml::from_str(text).unwrap();
        assert_eq!(package.kind, PackageKind::SharedLib);
        assert_eq!(package.dependencies.len(), 2);
        assert_eq!(package.plugin_dependencies["plugins"], vec!["PluginA".to_string()]);
        assert_eq!(package.sources, SourceLayout::default());
    }
}
