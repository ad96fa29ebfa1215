//! `cpfverify archive-name` command

use anyhow::{Context, Result};

use super::{load_scenario, parse_content};
use crate::cli::ArchiveNameArgs;
use cpfverify::layout::{archive_file_name, PackageGenerator};

pub fn execute(args: ArchiveNameArgs) -> Result<()> {
    let content = parse_content(&args.content)?;
    let generator: PackageGenerator = args
        .generator
        .parse()
        .with_context(|| format!("invalid package generator: {}", args.generator))?;

    let (scenario, profile) = load_scenario(&args.scenario)?;
    let excluded = if args.excluded.is_empty() {
        scenario.excluded_targets
    } else {
        args.excluded
    };

    println!(
        "{}",
        archive_file_name(&scenario.package, &profile, content, generator, &excluded)
    );
    Ok(())
}
