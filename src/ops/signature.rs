//! Build output signatures.
//!
//! A signature is a list of substrings a tool prints when it actually runs.
//! Checking build output for the full signature proves a step was executed;
//! its absence after a second build proves the step was up-to-date.
//!
//! Most signatures depend on the generator and toolchain, so they are
//! computed from a [`ConfigurationProfile`].

use std::fmt;

use crate::core::{
    ConfigurationError, ConfigurationProfile, Generator, SignatureMismatch, Toolchain,
};

const ALL_TESTS_FILTER: &str = "*";
const FAST_TESTS_FILTER: &str = "*FastFixture*:*FastTests*";

/// A build target whose output can be checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SignatureTarget {
    /// `documentation`
    Documentation,
    /// `acyclic`
    Acyclic,
    /// `opencppcoverage`, the merged coverage report
    Coverage,
    /// `install`
    Install,
    /// `clean_cotire`
    CleanCotire,
    /// Targets that only bundle other targets and print nothing of their own
    Bundle(String),
    /// A library or executable target
    Binary(String),
    /// `distributionPackages_<package>`
    PackageArchives(String),
    /// `runAllTests_<package>` or `runFastTests_<package>`
    RunTests { package: String, fast: bool },
    /// `opencppcoverage_<package>`
    PackageCoverage(String),
    /// `clang-format_<package>`
    ClangFormat(String),
    /// `clang-tidy_<package>`
    ClangTidy(String),
    /// `valgrind_<package>`
    Valgrind(String),
    /// `abi-compliance-checker_<package>`
    AbiComplianceChecker(String),
}

const BUNDLE_TARGETS: &[&str] = &[
    "pipeline",
    "distributionPackages",
    "runAllTests",
    "runFastTests",
    "clang-format",
    "clang-tidy",
    "valgrind",
    "abi-compliance-checker",
    "install_all",
];

impl SignatureTarget {
    /// Classify a target by its name. Unrecognized names are binary targets.
    pub fn from_target_name(name: &str) -> Self {
        match name {
            "documentation" => return SignatureTarget::Documentation,
            "acyclic" => return SignatureTarget::Acyclic,
            "opencppcoverage" => return SignatureTarget::Coverage,
            "install" => return SignatureTarget::Install,
            "clean_cotire" => return SignatureTarget::CleanCotire,
            _ if BUNDLE_TARGETS.contains(&name) => {
                return SignatureTarget::Bundle(name.to_string())
            }
            _ => {}
        }

        let per_package: [(&str, fn(String) -> SignatureTarget); 8] = [
            ("distributionPackages_", SignatureTarget::PackageArchives),
            ("runAllTests_", |package| SignatureTarget::RunTests { package, fast: false }),
            ("runFastTests_", |package| SignatureTarget::RunTests { package, fast: true }),
            ("opencppcoverage_", SignatureTarget::PackageCoverage),
            ("clang-format_", SignatureTarget::ClangFormat),
            ("clang-tidy_", SignatureTarget::ClangTidy),
            ("valgrind_", SignatureTarget::Valgrind),
            ("abi-compliance-checker_", SignatureTarget::AbiComplianceChecker),
        ];
        per_package
            .iter()
            .find_map(|(prefix, make)| {
                name.strip_prefix(prefix)
                    .filter(|package| !package.is_empty())
                    .map(|package| make(package.to_string()))
            })
            .unwrap_or_else(|| SignatureTarget::Binary(name.to_string()))
    }

    /// The substrings the target's output must contain when it runs.
    pub fn signature(
        &self,
        profile: &ConfigurationProfile,
    ) -> Result<Vec<String>, ConfigurationError> {
        let signature = match self {
            SignatureTarget::Documentation => {
                fixed(&["doxygen", "Parsing layout file", "lookup cache used"])
            }
            SignatureTarget::Acyclic => fixed(&["-nv", "CPFDependencies.dot"]),
            SignatureTarget::Coverage => fixed(&["OpenCppCoverage.exe", "--export_type=html"]),
            SignatureTarget::Install => install_target_signature(profile),
            SignatureTarget::CleanCotire => fixed(&["Cleaning up all cotire generated files"]),
            SignatureTarget::Bundle(_) => Vec::new(),
            SignatureTarget::Binary(target) => binary_target_signature(profile, target)?,
            SignatureTarget::PackageArchives(_) => fixed(&["CPack: Create package"]),
            SignatureTarget::RunTests { package, fast } => {
                run_tests_signature(profile, package, *fast)
            }
            SignatureTarget::PackageCoverage(_) => {
                fixed(&["OpenCppCoverage.exe", "--export_type=binary"])
            }
            SignatureTarget::ClangFormat(_) => fixed(&["clang-format", "-style=file"]),
            SignatureTarget::ClangTidy(_) => fixed(&["clang-tidy", "-checks="]),
            SignatureTarget::Valgrind(_) => fixed(&["valgrind", "--leak-check=full"]),
            SignatureTarget::AbiComplianceChecker(_) => {
                fixed(&["abi-compliance-checker", "-DBINARY_NAME="])
            }
        };
        Ok(signature)
    }
}

impl fmt::Display for SignatureTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureTarget::Documentation => f.write_str("documentation"),
            SignatureTarget::Acyclic => f.write_str("acyclic"),
            SignatureTarget::Coverage => f.write_str("opencppcoverage"),
            SignatureTarget::Install => f.write_str("install"),
            SignatureTarget::CleanCotire => f.write_str("clean_cotire"),
            SignatureTarget::Bundle(name) | SignatureTarget::Binary(name) => f.write_str(name),
            SignatureTarget::PackageArchives(p) => write!(f, "distributionPackages_{}", p),
            SignatureTarget::RunTests { package, fast } => {
                let prefix = if *fast { "runFastTests" } else { "runAllTests" };
                write!(f, "{}_{}", prefix, package)
            }
            SignatureTarget::PackageCoverage(p) => write!(f, "opencppcoverage_{}", p),
            SignatureTarget::ClangFormat(p) => write!(f, "clang-format_{}", p),
            SignatureTarget::ClangTidy(p) => write!(f, "clang-tidy_{}", p),
            SignatureTarget::Valgrind(p) => write!(f, "valgrind_{}", p),
            SignatureTarget::AbiComplianceChecker(p) => write!(f, "abi-compliance-checker_{}", p),
        }
    }
}

fn fixed(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

/// Output of compiling and linking a library or executable target.
///
/// Visual Studio only prints the compiler call with a verbose makefile.
/// Ninja prints commands that differ per target type, so only the compiler
/// driver is checked there.
pub fn binary_target_signature(
    profile: &ConfigurationProfile,
    target: &str,
) -> Result<Vec<String>, ConfigurationError> {
    match (profile.generator, profile.toolchain) {
        (Generator::VisualStudio, _) => {
            Ok(vec![format!("{}.vcxproj ->", target), "cl /c".to_string()])
        }
        (Generator::Make, _) => Ok(vec![
            format!("Built target {}", target),
            "Building CXX object".to_string(),
        ]),
        (Generator::Ninja, Toolchain::Clang) => Ok(vec!["clang++".to_string()]),
        (Generator::Ninja, Toolchain::Gcc) => Ok(vec!["gcc".to_string()]),
        (Generator::Ninja, Toolchain::Msvc) => Err(ConfigurationError::UnsupportedCombination {
            tag: profile.tag.clone(),
            what: "no binary target signature for ninja with msvc".to_string(),
        }),
    }
}

/// Output of the `install` target.
pub fn install_target_signature(profile: &ConfigurationProfile) -> Vec<String> {
    let first = match profile.generator {
        Generator::Make | Generator::Ninja => "Install the project...".to_string(),
        Generator::VisualStudio => {
            format!("Install configuration: \"{}\"", profile.compiler_config)
        }
    };
    vec![first, "Installing:".to_string()]
}

/// Text the build tool prints when asked for a target that does not exist.
pub fn missing_target_signature(profile: &ConfigurationProfile) -> &'static str {
    match profile.generator {
        Generator::VisualStudio => "MSBUILD : error MSB1009:",
        Generator::Make => "*** No rule to make target",
        Generator::Ninja => "ninja: error: unknown target",
    }
}

/// Output of a test run target.
///
/// Ninja expands the test executable's generator expression in its output;
/// the other generators print it unexpanded.
pub fn run_tests_signature(
    profile: &ConfigurationProfile,
    package: &str,
    fast: bool,
) -> Vec<String> {
    let tests_target = format!("{}_tests", package);
    let filter = format!(
        "--gtest_filter={}",
        if fast { FAST_TESTS_FILTER } else { ALL_TESTS_FILTER }
    );
    if profile.is_ninja_config() {
        vec![tests_target, filter]
    } else {
        vec![format!("$<TARGET_FILE:{}> {}", tests_target, filter)]
    }
}

/// Check that `output` contains every part of `required`.
///
/// All missing parts are reported at once. `trigger` names the source file
/// whose change caused the build and only affects the error message.
pub fn assert_contains<S: AsRef<str>>(
    output: &str,
    target: &str,
    required: &[S],
    trigger: Option<&str>,
) -> Result<(), SignatureMismatch> {
    let missing: Vec<String> = required
        .iter()
        .map(AsRef::as_ref)
        .filter(|part| !output.contains(part))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        tracing::debug!("output of `{}` contains its signature", target);
        return Ok(());
    }
    Err(SignatureMismatch::Missing {
        target: target.to_string(),
        missing,
        trigger: trigger.map(str::to_string),
    })
}

/// Check that `output` does not contain the complete `forbidden` signature.
///
/// Partial matches pass: a signature only proves a step ran when all of its
/// parts are present. An empty signature proves nothing and always passes.
pub fn assert_absent<S: AsRef<str>>(
    output: &str,
    target: &str,
    forbidden: &[S],
) -> Result<(), SignatureMismatch> {
    if forbidden.is_empty() {
        return Ok(());
    }
    let all_present = forbidden.iter().all(|part| output.contains(part.as_ref()));
    if !all_present {
        tracing::debug!("output of `{}` does not contain its signature", target);
        return Ok(());
    }
    Err(SignatureMismatch::Present {
        target: target.to_string(),
        present: forbidden.iter().map(|p| p.as_ref().to_string()).collect(),
    })
}
