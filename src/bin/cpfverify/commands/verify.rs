//! `cpfverify verify` command

use anyhow::{Context, Result};

use super::{load_scenario, parse_content};
use crate::cli::VerifyArgs;
use cpfverify::ops::tree_verify::{render, verify_artifacts, OutputFormat};
use cpfverify::ops::expected_content;

pub fn execute(args: VerifyArgs) -> Result<()> {
    let content = parse_content(&args.content)?;
    let output_format: OutputFormat = if args.json {
        OutputFormat::Json
    } else {
        args.output_format
            .parse()
            .with_context(|| format!("invalid output format: {}", args.output_format))?
    };

    let (scenario, profile) = load_scenario(&args.scenario)?;
    let expected = expected_content(&scenario.package, content, &profile)?;
    let result = verify_artifacts(&args.root, &expected)?;

    print!("{}", render(&result, output_format));

    // Exit with error code if verification failed
    if !result.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
