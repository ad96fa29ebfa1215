//! Test fixtures for common test scenarios.
//!
//! Sample packages modelled on the CPF test projects, scenario file
//! templates, and a helper that writes an artifact set to disk.

use std::path::Path;

use anyhow::Result;

use crate::core::{ArtifactSet, PackageDescriptor, PackageKind, RelativePath, Version};
use crate::util::fs::{ensure_dir, symlink, write_string};

/// Write every file and symlink of `artifacts` below `root`.
///
/// Files are created empty. Each symlink points at the file in the same
/// directory whose name extends the link's name (`a.so` -> `a.so.1.2.3`),
/// the way compatibility links do, and dangles if there is none.
pub fn materialize(root: &Path, artifacts: &ArtifactSet) -> Result<()> {
    for file in &artifacts.files {
        write_string(&file.to_path(root), "")?;
    }
    for link in &artifacts.symlinks {
        let path = link.to_path(root);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        symlink(Path::new(&link_target(link, artifacts)), &path)?;
    }
    Ok(())
}

fn link_target(link: &RelativePath, artifacts: &ArtifactSet) -> String {
    let (dir, name) = match link.as_str().rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, link.as_str()),
    };
    artifacts
        .files
        .iter()
        .find_map(|file| {
            let (file_dir, file_name) = match file.as_str().rsplit_once('/') {
                Some((d, n)) => (Some(d), n),
                None => (None, file.as_str()),
            };
            (file_dir == dir && file_name.starts_with(name) && file_name != name)
                .then(|| file_name.to_string())
        })
        .unwrap_or_else(|| format!("{}.target", name))
}

/// Sample packages.
pub mod packages {
    use super::*;

    fn version(v: &str) -> Version {
        Version::parse(v).unwrap()
    }

    /// A command line application.
    pub fn a_package() -> PackageDescriptor {
        PackageDescriptor::new("APackage", PackageKind::ConsoleApp, "apackage", version("1.0.0"))
    }

    /// A library package.
    pub fn b_package() -> PackageDescriptor {
        PackageDescriptor::new("BPackage", PackageKind::SharedLib, "bpackage", version("1.0.0"))
    }

    /// A header-only package.
    pub fn interface_package() -> PackageDescriptor {
        PackageDescriptor::new("EPackage", PackageKind::InterfaceLib, "epackage", version("1.0.0"))
    }

    /// A package of any kind with versioned and unversioned dependencies,
    /// a plugin directory and a resource script.
    pub fn full_package(name: &str, kind: PackageKind) -> PackageDescriptor {
        let mut package = PackageDescriptor::new(name, kind, name.to_lowercase(), version("1.2.3"))
            .with_dependency(crate::core::ExternalLibrary::new("Ext"))
            .with_dependency(crate::core::ExternalLibrary::versioned("Dep", version("2.0.1")))
            .with_plugins("platforms", vec!["qxcb".to_string()]);
        package.sources.resource_files.push("app.rc".to_string());
        package
    }
}

/// Scenario file templates.
pub mod scenarios {
    /// A scenario for a package of the given kind.
    pub fn package(name: &str, kind: &str, config: &str) -> String {
        format!(
            r#"config = "{config}"

[package]
name = "{name}"
kind = "{kind}"
namespace = "{ns}"
version = "1.2.3"
"#,
            ns = name.to_lowercase()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn test_materialize_links_point_at_versioned_file() {
        let tmp = TempDir::new().unwrap();
        let mut set = ArtifactSet::new();
        set.add_file("lib/a.so.1.2.3").add_symlink("lib/a.so").add_symlink("lib/a.so.1.2");
        materialize(tmp.path(), &set).unwrap();

        let target = std::fs::read_link(tmp.path().join("lib/a.so")).unwrap();
        assert_eq!(target, Path::new("a.so.1.2.3"));
        assert!(tmp.path().join("lib/a.so.1.2").exists());
    }

    #[test]
    fn test_scenario_template_parses() {
        let text = scenarios::package("MyLib", "lib", "Gcc-shared-debug");
        let scenario = crate::util::ScenarioConfig::parse(&text).unwrap();
        assert_eq!(scenario.package.name, "MyLib");
    }
}
