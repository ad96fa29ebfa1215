//! `cpfverify configs` command

use anyhow::Result;

use crate::cli::ConfigsArgs;
use cpfverify::core::{known_tags, resolve};

pub fn execute(args: ConfigsArgs) -> Result<()> {
    let profiles = known_tags()
        .into_iter()
        .map(resolve)
        .collect::<Result<Vec<_>, _>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    for profile in &profiles {
        println!(
            "{:<24} {:<8} {:<6} {:<13} {:<7} {}",
            profile.tag,
            format!("{:?}", profile.platform).to_lowercase(),
            format!("{:?}", profile.toolchain).to_lowercase(),
            format!("{:?}", profile.generator).to_lowercase(),
            format!("{:?}", profile.linkage).to_lowercase(),
            profile.compiler_config
        );
    }
    Ok(())
}
