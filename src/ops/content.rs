//! Expected package content.
//!
//! Composes the paths of [`ArtifactLayout`] into the complete set of files
//! and symlinks a distribution package of a given content type must hold.
//!
//! Content types build on each other:
//!
//! - `runtime`: the package's own runtime binaries
//! - `runtime-portable`: runtime plus external shared libraries and plugins
//! - `developer`: runtime plus libraries, tests, CMake package files,
//!   headers and debug artifacts
//! - `sources`: the buildable source tree, independent of the others

use crate::core::{
    ArtifactSet, ConfigurationProfile, ContentType, Linkage, ModelError, PackageDescriptor,
    PackageKind, RelativePath, TargetRole,
};
use crate::layout::names::{
    self, cmake_package_dir, cmake_package_files, export_header, include_dir,
    mirrored_source_dir, tests_export_header, version_header,
};
use crate::layout::ArtifactLayout;

/// Compute the files and symlinks a package archive of `content` must contain.
///
/// Paths are relative to the package directory inside the unpacked archive.
pub fn expected_content(
    package: &PackageDescriptor,
    content: ContentType,
    profile: &ConfigurationProfile,
) -> Result<ArtifactSet, ModelError> {
    package.validate()?;
    let layout = ArtifactLayout::new(package, profile);

    let mut set = ArtifactSet::new();
    match content {
        ContentType::Runtime => {
            set.extend(runtime_component(&layout)?);
        }
        ContentType::RuntimePortable => {
            set.extend(runtime_component(&layout)?);
            set.extend(portable_component(&layout));
        }
        ContentType::Developer => {
            set.extend(runtime_component(&layout)?);
            set.extend(developer_component(&layout)?);
        }
        ContentType::Sources => {
            set.extend(sources_component(package, profile));
        }
    }

    tracing::debug!(
        "{} content of {} under {}: {} files, {} symlinks",
        content,
        package.name,
        profile.tag,
        set.files.len(),
        set.symlinks.len()
    );
    Ok(set)
}

/// The package's own runtime binaries.
fn runtime_component(layout: &ArtifactLayout<'_>) -> Result<ArtifactSet, ModelError> {
    let set = match layout.package().kind {
        PackageKind::ConsoleApp | PackageKind::GuiApp => {
            layout.executable(TargetRole::Primary)?.into()
        }
        PackageKind::SharedLib | PackageKind::StaticLib => match layout.library_linkage() {
            Some(Linkage::Shared) => layout.shared_library(TargetRole::Primary)?.into(),
            _ => ArtifactSet::new(),
        },
        PackageKind::InterfaceLib => ArtifactSet::new(),
    };
    Ok(set)
}

/// External shared libraries and plugins that make the runtime relocatable.
fn portable_component(layout: &ArtifactLayout<'_>) -> ArtifactSet {
    let package = layout.package();
    let mut set = ArtifactSet::new();

    if layout.profile().is_shared_libraries_config() {
        for dependency in &package.dependencies {
            set.extend(layout.external_shared_library(dependency).into());
        }
    }

    // Plugins are loaded at runtime whatever the package's own linkage is.
    for (plugin_dir, targets) in &package.plugin_dependencies {
        for target in targets {
            set.add_file(layout.plugin_library(plugin_dir, target));
        }
    }

    set
}

fn developer_component(layout: &ArtifactLayout<'_>) -> Result<ArtifactSet, ModelError> {
    let package = layout.package();
    let profile = layout.profile();
    let is_interface = package.kind.is_interface();
    let mut set = ArtifactSet::new();

    let cmake_dir = cmake_package_dir(&package.name);
    set.add_files(
        cmake_package_files(&package.name, profile.compiler_config)
            .iter()
            .map(|file| cmake_dir.join(file)),
    );

    let include = include_dir(&package.name);
    set.add_files(public_headers(package).map(|h| include.join(h)));

    if is_interface {
        return Ok(set);
    }

    for role in [TargetRole::Implementation, TargetRole::Fixtures] {
        set.extend(layout.library(role)?);
        set.add_files(layout.linker_debug_info(role));
        set.add_files(layout.abi_dump(role));
    }
    set.extend(layout.executable(TargetRole::Tests)?.into());

    for role in [TargetRole::Implementation, TargetRole::Fixtures, TargetRole::Tests] {
        set.add_files(layout.compiler_debug_info(role));
    }

    // MSVC debug info references sources by path, so debuggers need them.
    if layout.has_debug_info() {
        let src = mirrored_source_dir(&package.name);
        set.add_files(debug_sources(package).map(|file| src.join(file)));
    }

    Ok(set)
}

/// Headers installed under `include/<package>`.
fn public_headers(package: &PackageDescriptor) -> impl Iterator<Item = String> + '_ {
    let sources = &package.sources;
    let binary_headers = if package.kind.is_interface() {
        Vec::new()
    } else {
        let mut headers = sources.fixture_headers.clone();
        headers.push(export_header(&package.namespace));
        headers.push(tests_export_header(&package.namespace));
        headers
    };

    sources
        .public_headers
        .iter()
        .cloned()
        .chain(binary_headers)
        .chain(std::iter::once(version_header(&package.name)))
}

/// Sources a debugger needs to step through the package's binaries.
fn debug_sources(package: &PackageDescriptor) -> impl Iterator<Item = String> + '_ {
    let sources = &package.sources;
    sources
        .implementation_files
        .iter()
        .chain(&sources.public_headers)
        .chain(&sources.fixture_sources)
        .chain(&sources.fixture_headers)
        .cloned()
        .chain([
            version_header(&package.name),
            export_header(&package.namespace),
            tests_export_header(&package.namespace),
        ])
}

/// The buildable source tree of the package.
fn sources_component(package: &PackageDescriptor, profile: &ConfigurationProfile) -> ArtifactSet {
    let sources = &package.sources;
    let root = RelativePath::root();
    let is_interface = package.kind.is_interface();
    let mut set = ArtifactSet::new();

    set.add_file(root.join(names::BUILD_SCRIPT));
    set.add_file(root.join(version_header(&package.name)));
    set.add_files(sources.public_headers.iter().map(|f| root.join(f)));
    if !is_interface {
        set.add_files(sources.implementation_files.iter().map(|f| root.join(f)));
        set.add_file(root.join(export_header(&package.namespace)));
    }

    set.add_files(
        sources
            .fixture_headers
            .iter()
            .chain(&sources.fixture_sources)
            .chain(&sources.test_sources)
            .map(|f| root.join(f)),
    );
    set.add_file(root.join(tests_export_header(&package.namespace)));

    if profile.is_windows() {
        set.add_files(sources.resource_files.iter().map(|f| root.join(f)));
    }

    set
}
