//! `cpfverify signature` command

use std::io::Read;

use anyhow::{Context, Result};

use super::load_profile;
use crate::cli::SignatureArgs;
use cpfverify::ops::signature::{assert_absent, assert_contains, SignatureTarget};

pub fn execute(args: SignatureArgs) -> Result<()> {
    let profile = load_profile(&args.scenario)?;
    let target = SignatureTarget::from_target_name(&args.target);
    let signature = target.signature(&profile)?;

    let output = match &args.output {
        Some(path) => cpfverify::util::fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read build output from stdin")?;
            text
        }
    };

    let name = target.to_string();
    if args.absent {
        assert_absent(&output, &name, &signature)?;
        println!("`{}` did not run", name);
    } else {
        assert_contains(&output, &name, &signature, args.trigger.as_deref())?;
        println!("`{}` ran", name);
    }
    Ok(())
}
