//! Artifact path calculation.
//!
//! [`ArtifactLayout`] computes the relative path of every binary, library,
//! symlink, debug-info file and ABI dump a package produces under one
//! configuration. It knows nothing about content types; the content model in
//! [`crate::ops::content`] decides which of these artifacts an archive holds.
//!
//! All methods are pure. Calling them twice with the same inputs yields the
//! same paths.

pub mod archive;
pub mod names;

use crate::core::{
    ArtifactSet, ConfigurationProfile, ExternalLibrary, Linkage, ModelError, PackageDescriptor,
    RelativePath, TargetRole, Version,
};

use self::names::{
    binary_base_name, compatibility_suffix, exe_extension, exe_version_postfix, runtime_dir,
    shared_lib_dir, shared_lib_extension, shared_lib_version_suffix, static_lib_dir,
    static_lib_extension,
};

pub use archive::{archive_file_name, archive_stem, excluded_targets_hash, PackageGenerator};

/// An executable and its unversioned name-link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableArtifact {
    pub file: RelativePath,
    /// Present on Linux only
    pub name_link: Option<RelativePath>,
}

/// A shared library and its compatibility links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedLibraryArtifact {
    pub file: RelativePath,
    /// The unversioned and the `major.minor` links, Linux only
    pub symlinks: Vec<RelativePath>,
}

impl From<ExecutableArtifact> for ArtifactSet {
    fn from(exe: ExecutableArtifact) -> Self {
        let mut set = ArtifactSet::new();
        set.add_file(exe.file);
        set.add_symlinks(exe.name_link);
        set
    }
}

impl From<SharedLibraryArtifact> for ArtifactSet {
    fn from(lib: SharedLibraryArtifact) -> Self {
        let mut set = ArtifactSet::new();
        set.add_file(lib.file);
        set.add_symlinks(lib.symlinks);
        set
    }
}

/// Path calculator for one package under one configuration.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactLayout<'a> {
    package: &'a PackageDescriptor,
    profile: &'a ConfigurationProfile,
}

impl<'a> ArtifactLayout<'a> {
    pub fn new(package: &'a PackageDescriptor, profile: &'a ConfigurationProfile) -> Self {
        ArtifactLayout { package, profile }
    }

    pub fn package(&self) -> &'a PackageDescriptor {
        self.package
    }

    pub fn profile(&self) -> &'a ConfigurationProfile {
        self.profile
    }

    /// File name stem of a target's binaries, including the config postfix.
    pub fn base_name(&self, role: TargetRole) -> String {
        binary_base_name(&role.target_name(self.package), self.profile.compiler_config)
    }

    /// Linkage of the package's libraries, `None` for interface libraries.
    pub fn library_linkage(&self) -> Option<Linkage> {
        self.package.kind.library_linkage(self.profile)
    }

    /// The executable of the primary target (executable packages) or the test target.
    pub fn executable(&self, role: TargetRole) -> Result<ExecutableArtifact, ModelError> {
        let kind = self.package.kind;
        let valid = match role {
            TargetRole::Primary => kind.is_executable(),
            TargetRole::Tests => !kind.is_interface(),
            TargetRole::Implementation | TargetRole::Fixtures => false,
        };
        if !valid {
            return Err(self.missing_case(role, "executable"));
        }

        let platform = self.profile.platform;
        let base = self.base_name(role);
        let dir = runtime_dir(platform);
        let file = dir.join(format!(
            "{}{}{}",
            base,
            exe_version_postfix(platform, &self.package.version),
            exe_extension(platform)
        ));
        let name_link = self.profile.is_linux().then(|| dir.join(&base));

        Ok(ExecutableArtifact { file, name_link })
    }

    /// The shared library of a library target.
    pub fn shared_library(&self, role: TargetRole) -> Result<SharedLibraryArtifact, ModelError> {
        let role = self.library_role(role, "shared library")?;
        Ok(self.shared_library_named(&self.base_name(role), Some(&self.package.version)))
    }

    /// The static library of a library target, also used for the MSVC
    /// import library of a shared build.
    pub fn static_library(&self, role: TargetRole) -> Result<RelativePath, ModelError> {
        let role = self.library_role(role, "static library")?;
        let platform = self.profile.platform;
        Ok(static_lib_dir().join(format!(
            "{}{}",
            self.base_name(role),
            static_lib_extension(platform)
        )))
    }

    /// Library files of a target as built under the package's linkage.
    ///
    /// Shared builds on Windows also produce an import library.
    pub fn library(&self, role: TargetRole) -> Result<ArtifactSet, ModelError> {
        match self.library_linkage() {
            Some(Linkage::Shared) => {
                let mut set: ArtifactSet = self.shared_library(role)?.into();
                if self.profile.is_msvc() {
                    set.add_file(self.static_library(role)?);
                }
                Ok(set)
            }
            Some(Linkage::Static) => {
                let mut set = ArtifactSet::new();
                set.add_file(self.static_library(role)?);
                Ok(set)
            }
            None => Err(self.missing_case(role, "library")),
        }
    }

    /// Debug info written by the MSVC linker beside a shared library.
    pub fn linker_debug_info(&self, role: TargetRole) -> Option<RelativePath> {
        let role = self.library_role(role, "linker debug info").ok()?;
        let shared = self.library_linkage() == Some(Linkage::Shared);
        (self.has_debug_info() && shared).then(|| {
            shared_lib_dir(self.profile.platform).join(format!("{}.pdb", self.base_name(role)))
        })
    }

    /// Debug info written by the MSVC compiler for the object files of a
    /// library or the test executable.
    pub fn compiler_debug_info(&self, role: TargetRole) -> Option<RelativePath> {
        let role = match role {
            TargetRole::Tests if !self.package.kind.is_interface() => TargetRole::Tests,
            other => self.library_role(other, "compiler debug info").ok()?,
        };
        self.has_debug_info()
            .then(|| static_lib_dir().join(format!("{}-compiler.pdb", self.base_name(role))))
    }

    /// ABI dump of a library target, created by debug builds on Linux.
    pub fn abi_dump(&self, role: TargetRole) -> Option<RelativePath> {
        let kind = self.package.kind;
        if kind.is_executable() || !self.profile.is_linux_debug_config() {
            return None;
        }
        let role = self.library_role(role, "abi dump").ok()?;
        Some(names::abi_dump_dir().join(format!(
            "ABI_{}.{}.dump",
            self.base_name(role),
            self.package.version
        )))
    }

    /// Debug info only exists for MSVC debug builds.
    pub fn has_debug_info(&self) -> bool {
        self.profile.is_msvc() && self.profile.is_debug_compiler_config()
    }

    /// Shared library of an external dependency.
    ///
    /// Versioned dependencies follow the package's own shared library
    /// naming, including the compatibility links on Linux.
    pub fn external_shared_library(&self, library: &ExternalLibrary) -> SharedLibraryArtifact {
        let base = binary_base_name(&library.name, self.profile.compiler_config);
        self.shared_library_named(&base, library.version.as_ref())
    }

    /// A plugin library, deployed under its short name into a plugin
    /// directory below the runtime directory.
    pub fn plugin_library(&self, plugin_dir: &str, target: &str) -> RelativePath {
        let platform = self.profile.platform;
        runtime_dir(platform).join(plugin_dir).join(format!(
            "{}{}",
            binary_base_name(target, self.profile.compiler_config),
            shared_lib_extension(platform)
        ))
    }

    fn shared_library_named(&self, base: &str, version: Option<&Version>) -> SharedLibraryArtifact {
        let platform = self.profile.platform;
        let dir = shared_lib_dir(platform);
        let short = format!("{}{}", base, shared_lib_extension(platform));

        match version {
            Some(version) if self.profile.is_linux() => SharedLibraryArtifact {
                file: dir.join(format!(
                    "{}{}",
                    short,
                    shared_lib_version_suffix(platform, version)
                )),
                symlinks: vec![
                    dir.join(&short),
                    dir.join(format!("{}{}", short, compatibility_suffix(version))),
                ],
            },
            _ => SharedLibraryArtifact {
                file: dir.join(short),
                symlinks: Vec::new(),
            },
        }
    }

    /// Map a role onto a library target, rejecting roles without one.
    fn library_role(&self, role: TargetRole, what: &str) -> Result<TargetRole, ModelError> {
        let kind = self.package.kind;
        if kind.is_interface() {
            return Err(self.missing_case(role, what));
        }
        match role {
            TargetRole::Implementation | TargetRole::Fixtures => Ok(role),
            TargetRole::Primary if !kind.is_executable() => Ok(TargetRole::Implementation),
            TargetRole::Primary | TargetRole::Tests => Err(self.missing_case(role, what)),
        }
    }

    fn missing_case(&self, role: TargetRole, what: &str) -> ModelError {
        ModelError::MissingCase(format!(
            "no {} for the {:?} target of {} package `{}`",
            what, role, self.package.kind, self.package.name
        ))
    }
}
