use std::path::Path;

use almoner_import::ContributionCsvProfile;
use almoner_recon::loader::{DEFAULT_BATCH_NAME, DEFAULT_PERSON_ID_WIDTH};
use almoner_recon::MatchConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "almoner.toml";

/// Settings for one run, read from `almoner.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub matching: MatchConfig,
    pub import: ContributionCsvProfile,
    pub loader: LoaderConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub batch_name: String,
    pub person_id_width: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_name: DEFAULT_BATCH_NAME.to_string(),
            person_id_width: DEFAULT_PERSON_ID_WIDTH,
        }
    }
}

impl AppConfig {
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s).context("invalid config")?;
        config.matching.validate()?;
        Ok(config)
    }

    /// Reads `path` if given, else `almoner.toml` in the working directory
    /// when present, else the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Path::new(DEFAULT_CONFIG_FILE),
            None => {
                tracing::debug!("no config file, using defaults");
                return Ok(Self::default());
            }
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let config = Self::from_toml(&text).with_context(|| format!("in {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
