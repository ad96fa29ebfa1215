//! Filesystem tree verification.
//!
//! Compares what actually exists below a root directory with an expected set
//! of files and symlinks. Symlinks are never followed: a symlink counts as a
//! symlink only, even if it points at a regular file, and a dangling symlink
//! still counts. Directories are not compared; they exist implicitly as
//! parents of the expected entries.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use walkdir::WalkDir;

use crate::core::{ArtifactSet, RelativePath, VerificationMismatch};
use crate::util::fs::{absolute_path, relative_path};

/// Output format for verification results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Machine-readable JSON output
    Json,
    /// GitHub Actions annotations
    Github,
}

impl std::str::FromStr for OutputFormat {
    type Err = OutputFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "github" | "github-actions" | "gha" => Ok(OutputFormat::Github),
            _ => Err(OutputFormatParseError(s.to_string())),
        }
    }
}

/// Error parsing output format option.
#[derive(Debug, Clone)]
pub struct OutputFormatParseError(pub String);

impl std::fmt::Display for OutputFormatParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid output format '{}', valid values: human, json, github",
            self.0
        )
    }
}

impl std::error::Error for OutputFormatParseError {}

/// Differences between an expected and an actual tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    /// The verified root directory
    pub root: PathBuf,
    pub missing_files: BTreeSet<RelativePath>,
    pub extra_files: BTreeSet<RelativePath>,
    pub missing_symlinks: BTreeSet<RelativePath>,
    pub extra_symlinks: BTreeSet<RelativePath>,
}

impl VerificationResult {
    /// True when the tree matches exactly.
    pub fn is_success(&self) -> bool {
        self.missing_files.is_empty()
            && self.extra_files.is_empty()
            && self.missing_symlinks.is_empty()
            && self.extra_symlinks.is_empty()
    }

    /// Number of differing entries.
    pub fn mismatch_count(&self) -> usize {
        self.missing_files.len()
            + self.extra_files.len()
            + self.missing_symlinks.len()
            + self.extra_symlinks.len()
    }

    /// Turn a failed verification into an error carrying all differences.
    pub fn into_result(self) -> Result<(), VerificationMismatch> {
        if self.is_success() {
            return Ok(());
        }
        Err(VerificationMismatch {
            missing_files: self.missing_files,
            extra_files: self.extra_files,
            missing_symlinks: self.missing_symlinks,
            extra_symlinks: self.extra_symlinks,
        })
    }
}

/// Entries found below a root directory.
#[derive(Debug, Default)]
struct ActualTree {
    files: BTreeSet<RelativePath>,
    symlinks: BTreeSet<RelativePath>,
}

/// Verify that `root` contains exactly the expected files and symlinks.
///
/// Expected paths may be relative to `root` or absolute paths below it. A
/// missing root is treated as an empty tree, so every expected entry is
/// reported missing.
pub fn verify<F, S, P, Q>(
    root: &Path,
    expected_files: F,
    expected_symlinks: S,
) -> Result<VerificationResult>
where
    F: IntoIterator<Item = P>,
    S: IntoIterator<Item = Q>,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let base = absolute_path(root)?;
    let expected_files = normalize(&base, expected_files);
    let expected_symlinks = normalize(&base, expected_symlinks);
    let actual = scan(&base);

    let result = VerificationResult {
        root: root.to_path_buf(),
        missing_files: expected_files.difference(&actual.files).cloned().collect(),
        extra_files: actual.files.difference(&expected_files).cloned().collect(),
        missing_symlinks: expected_symlinks.difference(&actual.symlinks).cloned().collect(),
        extra_symlinks: actual.symlinks.difference(&expected_symlinks).cloned().collect(),
    };

    if result.is_success() {
        tracing::debug!(
            "{} matches: {} files, {} symlinks",
            root.display(),
            actual.files.len(),
            actual.symlinks.len()
        );
    } else {
        tracing::debug!("{} differs in {} entries", root.display(), result.mismatch_count());
    }
    Ok(result)
}

/// Verify `root` against an expected artifact set.
pub fn verify_artifacts(root: &Path, expected: &ArtifactSet) -> Result<VerificationResult> {
    verify(
        root,
        expected.files.iter().map(RelativePath::as_str),
        expected.symlinks.iter().map(RelativePath::as_str),
    )
}

fn normalize<I, P>(root: &Path, paths: I) -> BTreeSet<RelativePath>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths
        .into_iter()
        .map(|path| {
            let path = path.as_ref();
            if path.is_absolute() {
                RelativePath::from_path(&relative_path(root, path))
            } else {
                RelativePath::from_path(path)
            }
        })
        .collect()
}

fn scan(root: &Path) -> ActualTree {
    let mut tree = ActualTree::default();
    if !root.is_dir() {
        tracing::debug!("{} does not exist, treating it as empty", root.display());
        return tree;
    }

    for entry in WalkDir::new(root).follow_links(false).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };

        let file_type = entry.file_type();
        let path = RelativePath::from_path(&relative_path(root, entry.path()));
        if file_type.is_symlink() {
            tree.symlinks.insert(path);
        } else if file_type.is_file() {
            tree.files.insert(path);
        }
    }

    tree
}

/// Format a verification result for display (human-readable).
pub fn format_result(result: &VerificationResult) -> String {
    let mut output = String::new();

    writeln!(output, "Verify: {}", result.root.display()).unwrap();
    writeln!(output, "{}", "=".repeat(50)).unwrap();

    let sections = [
        ("Missing files", &result.missing_files),
        ("Unexpected files", &result.extra_files),
        ("Missing symlinks", &result.missing_symlinks),
        ("Unexpected symlinks", &result.extra_symlinks),
    ];
    for (title, paths) in sections {
        if paths.is_empty() {
            continue;
        }
        writeln!(output, "\n{} ({}):", title, paths.len()).unwrap();
        for path in paths {
            writeln!(output, "  - {}", path).unwrap();
        }
    }

    writeln!(output).unwrap();
    if result.is_success() {
        writeln!(output, "Result: PASSED").unwrap();
    } else {
        writeln!(output, "Result: FAILED ({} differences)", result.mismatch_count()).unwrap();
    }

    output
}

/// Format a verification result as JSON.
pub fn format_result_json(result: &VerificationResult) -> String {
    serde_json::to_string_pretty(result)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize result: {}"}}"#, e))
}

/// Format a verification result as GitHub Actions annotations.
pub fn format_result_github_actions(result: &VerificationResult) -> String {
    let mut output = String::new();
    let root = result.root.display();

    for path in &result.missing_files {
        writeln!(output, "::error title=Missing file::{}/{}", root, path).unwrap();
    }
    for path in &result.extra_files {
        writeln!(output, "::error title=Unexpected file::{}/{}", root, path).unwrap();
    }
    for path in &result.missing_symlinks {
        writeln!(output, "::error title=Missing symlink::{}/{}", root, path).unwrap();
    }
    for path in &result.extra_symlinks {
        writeln!(output, "::error title=Unexpected symlink::{}/{}", root, path).unwrap();
    }
    if result.is_success() {
        writeln!(output, "::notice::{} matches the expected tree", root).unwrap();
    }

    output
}

/// Format a verification result in the requested format.
pub fn render(result: &VerificationResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_result(result),
        OutputFormat::Json => format_result_json(result),
        OutputFormat::Github => format_result_github_actions(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{resolve, ContentType, PackageKind};
    use crate::ops::expected_content;
    use crate::test_support::{materialize, packages, TempTree};
    use tempfile::TempDir;

    fn expected() -> ArtifactSet {
        let mut set = ArtifactSet::new();
        set.add_file("lib/MyLib-debug.so.1.2.3")
            .add_file("lib/cmake/MyLib/MyLibConfig.cmake")
            .add_file("include/MyLib/function.h")
            .add_symlink("lib/MyLib-debug.so")
            .add_symlink("lib/MyLib-debug.so.1.2");
        set
    }

    #[test]
    fn test_materialized_tree_verifies() {
        let tmp = TempDir::new().unwrap();
        materialize(tmp.path(), &expected()).unwrap();

        let result = verify_artifacts(tmp.path(), &expected()).unwrap();
        assert!(result.is_success(), "{}", format_result(&result));
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn test_extra_file_is_reported() {
        let tmp = TempDir::new().unwrap();
        materialize(tmp.path(), &expected()).unwrap();
        std::fs::write(tmp.path().join("stray.txt"), "").unwrap();

        let result = verify_artifacts(tmp.path(), &expected()).unwrap();
        assert!(!result.is_success());
        assert_eq!(
            result.extra_files.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
            vec!["stray.txt"]
        );
        assert!(result.missing_files.is_empty());
        assert!(result.missing_symlinks.is_empty());
        assert!(result.extra_symlinks.is_empty());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let tmp = TempDir::new().unwrap();
        materialize(tmp.path(), &expected()).unwrap();
        std::fs::remove_file(tmp.path().join("lib/cmake/MyLib/MyLibConfig.cmake")).unwrap();

        let err = verify_artifacts(tmp.path(), &expected())
            .unwrap()
            .into_result()
            .unwrap_err();
        assert!(err
            .missing_files
            .contains(&RelativePath::new("lib/cmake/MyLib/MyLibConfig.cmake")));
        assert!(err.to_string().contains("MyLibConfig.cmake"));
    }

    #[test]
    fn test_empty_directories_are_ignored() {
        let tmp = TempDir::new().unwrap();
        materialize(tmp.path(), &expected()).unwrap();
        std::fs::create_dir_all(tmp.path().join("share/empty")).unwrap();

        let result = verify_artifacts(tmp.path(), &expected()).unwrap();
        assert!(result.is_success());
    }

    #[test]
    fn test_missing_root_reports_everything_missing() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("not-there");

        let result = verify_artifacts(&root, &expected()).unwrap();
        assert_eq!(result.missing_files.len(), 3);
        assert_eq!(result.missing_symlinks.len(), 2);
        assert!(result.extra_files.is_empty());
    }

    #[test]
    fn test_absolute_expected_paths() {
        let tmp = TempDir::new().unwrap();
        materialize(tmp.path(), &expected()).unwrap();

        let files: Vec<PathBuf> = expected().files.iter().map(|f| f.to_path(tmp.path())).collect();
        let links: Vec<PathBuf> =
            expected().symlinks.iter().map(|l| l.to_path(tmp.path())).collect();
        let result = verify(tmp.path(), &files, &links).unwrap();
        assert!(result.is_success(), "{}", format_result(&result));
    }

    #[test]
    fn test_relative_root_with_absolute_expected_paths() {
        let tmp = tempfile::Builder::new().tempdir_in(".").unwrap();
        let root = tmp.path();
        assert!(root.is_relative());
        materialize(root, &expected()).unwrap();

        let base = std::env::current_dir().unwrap().join(root);
        let files: Vec<PathBuf> = expected().files.iter().map(|f| f.to_path(&base)).collect();
        let links: Vec<PathBuf> = expected().symlinks.iter().map(|l| l.to_path(&base)).collect();

        let result = verify(root, &files, &links).unwrap();
        assert!(result.is_success(), "{}", format_result(&result));
        assert_eq!(result.root.as_path(), root);
    }

    #[test]
    fn test_every_expected_content_verifies_when_materialized() {
        let kinds = [
            PackageKind::ConsoleApp,
            PackageKind::GuiApp,
            PackageKind::SharedLib,
            PackageKind::StaticLib,
            PackageKind::InterfaceLib,
        ];
        for tag in crate::core::profile::known_tags() {
            let profile = resolve(tag).unwrap();
            for kind in kinds {
                let package = packages::full_package("MyPkg", kind);
                for content in ContentType::ALL {
                    let expected = expected_content(&package, content, &profile).unwrap();
                    let tree = TempTree::from_artifacts(&expected).unwrap();
                    let result = verify_artifacts(tree.path(), &expected).unwrap();
                    assert!(
                        result.is_success(),
                        "{tag} {kind} {content}\n{}",
                        format_result(&result)
                    );
                }
            }
        }
    }

    #[test]
    fn test_empty_tree_matches_empty_expectation() {
        let tmp = TempDir::new().unwrap();
        let result = verify_artifacts(tmp.path(), &ArtifactSet::new()).unwrap();
        assert!(result.is_success());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_not_counted_as_file() {
        let tmp = TempDir::new().unwrap();
        let mut set = ArtifactSet::new();
        set.add_file("bin/App-1.0.0").add_symlink("bin/App");
        materialize(tmp.path(), &set).unwrap();

        // The link points at an existing file but is still only a symlink.
        let mut files_only = ArtifactSet::new();
        files_only.add_file("bin/App-1.0.0").add_file("bin/App");
        let result = verify_artifacts(tmp.path(), &files_only).unwrap();
        assert_eq!(result.missing_files.len(), 1);
        assert_eq!(result.extra_symlinks.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_counted() {
        let tree = TempTree::new().unwrap();
        tree.add_symlink("gone.so", "gone.so.1").unwrap();

        let mut set = ArtifactSet::new();
        set.add_symlink("gone.so");
        let result = verify_artifacts(tree.path(), &set).unwrap();
        assert!(result.is_success());

        let result = verify_artifacts(tree.path(), &ArtifactSet::new()).unwrap();
        assert_eq!(
            result.extra_symlinks.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
            vec!["gone.so"]
        );
    }

    #[test]
    fn test_developer_tree_missing_one_cmake_file() {
        let profile = resolve("VS2017-static-release").unwrap();
        let package = packages::b_package();
        let expected = expected_content(&package, ContentType::Developer, &profile).unwrap();
        let tree = TempTree::from_artifacts(&expected).unwrap();
        assert!(verify_artifacts(tree.path(), &expected).unwrap().is_success());

        tree.remove("lib/cmake/BPackage/BPackageConfigVersion.cmake").unwrap();
        let result = verify_artifacts(tree.path(), &expected).unwrap();
        assert_eq!(
            result.missing_files.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
            vec!["lib/cmake/BPackage/BPackageConfigVersion.cmake"]
        );
        assert!(result.extra_files.is_empty());
        assert!(result.missing_symlinks.is_empty());
        assert!(result.extra_symlinks.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_linux_runtime_tree_with_stray_file() {
        let profile = resolve("Clang-static-release").unwrap();
        let expected =
            expected_content(&packages::a_package(), ContentType::Runtime, &profile).unwrap();
        let tree = TempTree::from_artifacts(&expected).unwrap();
        tree.add_file("bin/core").unwrap();

        let result = verify_artifacts(tree.path(), &expected).unwrap();
        assert_eq!(result.mismatch_count(), 1);
        assert!(result.extra_files.contains(&RelativePath::new("bin/core")));
    }

    #[test]
    fn test_interface_runtime_needs_no_tree() {
        let profile = resolve("Gcc-shared-debug").unwrap();
        let expected =
            expected_content(&packages::interface_package(), ContentType::Runtime, &profile)
                .unwrap();
        let tmp = TempDir::new().unwrap();
        let result = verify_artifacts(&tmp.path().join("EPackage"), &expected).unwrap();
        assert!(result.is_success());
    }

    #[test]
    fn test_formats() {
        let tmp = TempDir::new().unwrap();
        let result = verify_artifacts(tmp.path(), &expected()).unwrap();

        let human = render(&result, OutputFormat::Human);
        assert!(human.contains("Missing files (3):"));
        assert!(human.contains("Result: FAILED (5 differences)"));

        let json: serde_json::Value =
            serde_json::from_str(&render(&result, OutputFormat::Json)).unwrap();
        assert_eq!(json["missing_symlinks"].as_array().unwrap().len(), 2);

        let github = render(&result, OutputFormat::Github);
        assert_eq!(github.matches("::error").count(), 5);

        assert_eq!("gha".parse::<OutputFormat>().unwrap(), OutputFormat::Github);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
