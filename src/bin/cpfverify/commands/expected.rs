//! `cpfverify expected` command

use anyhow::Result;

use super::{load_scenario, parse_content};
use crate::cli::ExpectedArgs;
use cpfverify::ops::expected_content;

pub fn execute(args: ExpectedArgs) -> Result<()> {
    let content = parse_content(&args.content)?;
    let (scenario, profile) = load_scenario(&args.scenario)?;
    let expected = expected_content(&scenario.package, content, &profile)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&expected)?);
        return Ok(());
    }

    println!(
        "# {} content of `{}` for {}",
        content, scenario.package.name, profile.tag
    );
    for file in &expected.files {
        println!("{}", file);
    }
    for link in &expected.symlinks {
        println!("{} (symlink)", link);
    }
    Ok(())
}
