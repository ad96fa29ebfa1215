//! Command implementations

pub mod archive_name;
pub mod configs;
pub mod expected;
pub mod signature;
pub mod verify;

use anyhow::{Context, Result};

use crate::cli::ScenarioArgs;
use cpfverify::core::{ConfigurationProfile, ContentType};
use cpfverify::util::config::find_scenario;
use cpfverify::util::ScenarioConfig;

/// Load the scenario file and resolve its configuration.
pub fn load_scenario(args: &ScenarioArgs) -> Result<(ScenarioConfig, ConfigurationProfile)> {
    let path = match &args.scenario {
        Some(path) => path.clone(),
        None => {
            let cwd = std::env::current_dir().context("failed to get current directory")?;
            find_scenario(&cwd).ok_or_else(|| {
                anyhow::anyhow!(
                    "could not find `Scenario.toml` in `{}` or any parent directory\n\
                     help: pass --scenario <path>",
                    cwd.display()
                )
            })?
        }
    };
    tracing::debug!("using scenario {}", path.display());

    let scenario = ScenarioConfig::load(&path)?;
    let profile = scenario.profile(args.config.as_deref())?;
    Ok((scenario, profile))
}

/// Resolve a profile from `--config` alone, falling back to the scenario file.
pub fn load_profile(args: &ScenarioArgs) -> Result<ConfigurationProfile> {
    match (&args.config, &args.scenario) {
        (Some(tag), None) => Ok(cpfverify::core::resolve(tag)?),
        _ => load_scenario(args).map(|(_, profile)| profile),
    }
}

pub fn parse_content(content: &str) -> Result<ContentType> {
    content
        .parse()
        .with_context(|| format!("invalid content type: {}", content))
}
