//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// cpfverify - Expected build artifacts for CMakeProjectFramework packages
#[derive(Parser)]
#[command(name = "cpfverify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the known configuration tags
    Configs(ConfigsArgs),

    /// Print the files and symlinks a package archive must contain
    Expected(ExpectedArgs),

    /// Compare a directory tree with the expected package content
    Verify(VerifyArgs),

    /// Print the file name of a package archive
    ArchiveName(ArchiveNameArgs),

    /// Check build output for the signature of a target
    Signature(SignatureArgs),
}

/// Where the package and configuration come from.
#[derive(Args)]
pub struct ScenarioArgs {
    /// Path to the scenario file (defaults to the nearest Scenario.toml)
    #[arg(long, env = "CPFVERIFY_SCENARIO")]
    pub scenario: Option<PathBuf>,

    /// Configuration tag, overrides the scenario's `config`
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args)]
pub struct ConfigsArgs {
    /// Print the resolved profiles as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ExpectedArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Content type: runtime, runtime-portable, developer, sources
    #[arg(long, default_value = "developer")]
    pub content: String,

    /// Print the artifact set as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Root directory of the unpacked package
    pub root: PathBuf,

    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Content type: runtime, runtime-portable, developer, sources
    #[arg(long, default_value = "developer")]
    pub content: String,

    /// Output format: human, json, github
    #[arg(long, default_value = "human")]
    pub output_format: String,

    /// Shorthand for --output-format json
    #[arg(long, conflicts_with = "output_format")]
    pub json: bool,
}

#[derive(Args)]
pub struct ArchiveNameArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Content type: runtime, runtime-portable, developer, sources
    #[arg(long, default_value = "developer")]
    pub content: String,

    /// Archive format: 7Z, ZIP, TGZ
    #[arg(short, long, default_value = "7Z")]
    pub generator: String,

    /// Dependency target left out of a portable runtime archive (repeatable)
    #[arg(long = "exclude")]
    pub excluded: Vec<String>,
}

#[derive(Args)]
pub struct SignatureArgs {
    /// Target whose output is checked, e.g. `MyLib` or `runAllTests_MyLib`
    pub target: String,

    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// File holding the build output (defaults to stdin)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Require the signature to be absent, i.e. the target was up-to-date
    #[arg(long)]
    pub absent: bool,

    /// Source file whose change triggered the build, for the error message
    #[arg(long)]
    pub trigger: Option<String>,
}
