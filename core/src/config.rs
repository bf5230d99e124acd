use crate::{
    error::{check_balance, check_cost_rate, SimError, SimResult},
    rng::DEFAULT_STIMULUS_SPREAD,
    types::{Stimulus, Tokens},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// All caller-tunable parameters of a session.
/// Missing fields in a config file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed:             u64,
    pub initial_balance:  Tokens,
    /// Stimulus used for the behaviour table and consensus display.
    pub stimulus:         Stimulus,
    pub action_cost_rate: f64,
    pub steps:            u64,
    pub stimulus_mean:    f64,
    pub stimulus_spread:  f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:             42,
            initial_balance:  1000.0,
            stimulus:         0.0,
            action_cost_rate: 5.0,
            steps:            10,
            stimulus_mean:    0.0,
            stimulus_spread:  DEFAULT_STIMULUS_SPREAD,
        }
    }
}

impl SimConfig {
    /// Load from a JSON file.
    /// In tests, use SimConfig::default() or from_json().
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config = Self::from_json(&content)?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Natural-range checks. Zero steps is allowed and runs nothing.
    pub fn validate(&self) -> SimResult<()> {
        check_balance(self.initial_balance)?;
        check_cost_rate(self.action_cost_rate)?;
        if !(self.stimulus_spread.is_finite() && self.stimulus_spread >= 0.0) {
            return Err(SimError::InvalidSpread { spread: self.stimulus_spread });
        }
        if !self.stimulus.is_finite() {
            return Err(SimError::InvalidStimulus { stimulus: self.stimulus });
        }
        if !self.stimulus_mean.is_finite() {
            return Err(SimError::InvalidStimulus { stimulus: self.stimulus_mean });
        }
        Ok(())
    }
}
