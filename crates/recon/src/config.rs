use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Score thresholds for one reconciliation run. All values are on the
/// 0–100 scale produced by [`crate::similarity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// A fuzzy name match is accepted only when its score is strictly above this.
    pub name_match_accept_threshold: u8,
    /// Exclusive lower bound of the questionable band.
    pub name_questionable_low: u8,
    /// Inclusive upper bound of the questionable band.
    pub name_questionable_high: u8,
    /// Batch names scoring strictly above this against another batch name are excluded.
    pub ambiguity_threshold: u8,
    /// The first fund scoring at least this is taken.
    pub fund_match_threshold: u8,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            name_match_accept_threshold: 90,
            name_questionable_low: 80,
            name_questionable_high: 90,
            ambiguity_threshold: 80,
            fund_match_threshold: 80,
        }
    }
}

impl MatchConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("name_match_accept_threshold", self.name_match_accept_threshold),
            ("name_questionable_low", self.name_questionable_low),
            ("name_questionable_high", self.name_questionable_high),
            ("ambiguity_threshold", self.ambiguity_threshold),
            ("fund_match_threshold", self.fund_match_threshold),
        ];
        if let Some((name, value)) = named.iter().find(|(_, v)| *v > 100) {
            return Err(ConfigError::OutOfRange {
                name: (*name).to_string(),
                value: *value,
            });
        }
        if self.name_questionable_low > self.name_questionable_high {
            return Err(ConfigError::InvertedBand {
                low: self.name_questionable_low,
                high: self.name_questionable_high,
            });
        }
        Ok(())
    }

    pub(crate) fn is_questionable_score(&self, score: u8) -> bool {
        score > self.name_questionable_low && score <= self.name_questionable_high
    }
}
