//! Naming primitives for installed files.
//!
//! These are the leaves of the artifact model: directory names, extensions
//! and base names as the CMake project framework lays them out on each
//! platform. Everything here is a pure function of its arguments.

use crate::core::{CompilerConfig, Platform, RelativePath, Version};

/// The build script at the root of every package source directory.
pub const BUILD_SCRIPT: &str = "CMakeLists.txt";

pub fn shared_lib_extension(platform: Platform) -> &'static str {
    match platform {
        Platform::Windows => ".dll",
        Platform::Linux => ".so",
    }
}

pub fn static_lib_extension(platform: Platform) -> &'static str {
    match platform {
        Platform::Windows => ".lib",
        Platform::Linux => ".a",
    }
}

pub fn exe_extension(platform: Platform) -> &'static str {
    match platform {
        Platform::Windows => ".exe",
        Platform::Linux => "",
    }
}

/// Directory of executables: the package root on Windows, `bin` elsewhere.
pub fn runtime_dir(platform: Platform) -> RelativePath {
    match platform {
        Platform::Windows => RelativePath::root(),
        Platform::Linux => RelativePath::new("bin"),
    }
}

/// Shared libraries sit beside the executables on Windows so they are found
/// at load time.
pub fn shared_lib_dir(platform: Platform) -> RelativePath {
    match platform {
        Platform::Windows => RelativePath::root(),
        Platform::Linux => RelativePath::new("lib"),
    }
}

pub fn static_lib_dir() -> RelativePath {
    RelativePath::new("lib")
}

/// Target name plus the compiler config postfix (`MyLib-debug`).
///
/// Release binaries carry no postfix.
pub fn binary_base_name(target: &str, config: CompilerConfig) -> String {
    match config {
        CompilerConfig::Release => target.to_string(),
        other => format!("{}-{}", target, other.lower()),
    }
}

/// Executables carry their version in the file name on Linux.
pub fn exe_version_postfix(platform: Platform, version: &Version) -> String {
    match platform {
        Platform::Windows => String::new(),
        Platform::Linux => format!("-{}", version),
    }
}

/// Full version appended to Linux shared libraries (`.so.1.2.3`).
pub fn shared_lib_version_suffix(platform: Platform, version: &Version) -> String {
    match platform {
        Platform::Windows => String::new(),
        Platform::Linux => format!(".{}", version),
    }
}

/// The `major.minor` suffix of the ABI compatibility link.
pub fn compatibility_suffix(version: &Version) -> String {
    format!(".{}", version.major_minor())
}

pub fn cmake_package_dir(package: &str) -> RelativePath {
    static_lib_dir().join("cmake").join(package)
}

pub fn include_dir(package: &str) -> RelativePath {
    RelativePath::new("include").join(package)
}

/// Sources that are installed next to MSVC debug info.
pub fn mirrored_source_dir(package: &str) -> RelativePath {
    RelativePath::new("src").join(package)
}

pub fn abi_dump_dir() -> RelativePath {
    RelativePath::new("other")
}

pub fn version_header(package: &str) -> String {
    format!("cpfPackageVersion_{}.h", package)
}

pub fn export_header(namespace: &str) -> String {
    format!("{}_export.h", namespace)
}

pub fn tests_export_header(namespace: &str) -> String {
    format!("{}_tests_export.h", namespace)
}

/// The four files of a CMake config package.
pub fn cmake_package_files(package: &str, config: CompilerConfig) -> [String; 4] {
    [
        format!("{}Config.cmake", package),
        format!("{}ConfigVersion.cmake", package),
        format!("{}Targets.cmake", package),
        format!("{}Targets-{}.cmake", package, config.lower()),
    ]
}
