//! Scenario file support.
//!
//! A scenario file describes one package and, optionally, the configuration
//! tag it is built with:
//!
//! ```toml
//! config = "Gcc-shared-debug"
//!
//! [package]
//! name = "MyLib"
//! kind = "lib"
//! namespace = "mylib"
//! version = "1.2.3"
//! dependencies = ["Ext@2.0.1"]
//!
//! [package.plugin-dependencies]
//! plugins = ["PluginA"]
//! ```
//!
//! A configuration tag given on the command line takes precedence over the
//! one in the file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{resolve, ConfigurationProfile, PackageDescriptor};

/// Default scenario file name.
pub const SCENARIO_FILE: &str = "Scenario.toml";

/// Package plus optional configuration tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScenarioConfig {
    /// Configuration tag, e.g. `VS2017-shared`
    #[serde(default)]
    pub config: Option<String>,

    /// Targets left out of portable runtime archives
    #[serde(default)]
    pub excluded_targets: Vec<String>,

    pub package: PackageDescriptor,
}

impl ScenarioConfig {
    /// Load a scenario from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse scenario: {}", path.display()))
    }

    /// Parse and validate scenario text.
    pub fn parse(contents: &str) -> Result<Self> {
        let scenario: ScenarioConfig = toml::from_str(contents)?;
        scenario.package.validate()?;
        Ok(scenario)
    }

    /// Resolve the configuration profile, preferring an explicit tag.
    pub fn profile(&self, override_tag: Option<&str>) -> Result<ConfigurationProfile> {
        let tag = match (override_tag, self.config.as_deref()) {
            (Some(tag), _) | (None, Some(tag)) => tag,
            (None, None) => bail!(
                "no configuration given: pass --config or set `config` in the scenario file"
            ),
        };
        Ok(resolve(tag)?)
    }
}

/// Find a scenario file by walking up from `start`.
pub fn find_scenario(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(SCENARIO_FILE))
        .find(|candidate| candidate.is_file())
}
