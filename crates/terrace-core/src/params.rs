use cosmwasm_std::{Coin, Decimal256};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::clamp::clamp;
use crate::constants::*;
use crate::error::PolicyError;

/// Bounds for one controlled rate (tax rate or reward weight).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConstraints {
    pub rate_min: Decimal256,
    pub rate_max: Decimal256,
    /// Largest move allowed in a single epoch. `None` disables the limit.
    #[serde(default)]
    pub change_rate_max: Option<Decimal256>,
    /// Reference cap. Only meaningful for the tax policy.
    pub cap: Coin,
}

impl PolicyConstraints {
    /// The single authority for what a valid new rate is under this policy.
    pub fn clamp(&self, old: Decimal256, candidate: Decimal256) -> Decimal256 {
        clamp(old, candidate, self.rate_min, self.rate_max, self.change_rate_max)
    }

    fn validate(&self, name: &str) -> Result<(), PolicyError> {
        if self.rate_min > self.rate_max {
            return Err(PolicyError::InvalidParams(format!(
                "{name}: rate_min {} exceeds rate_max {}",
                self.rate_min, self.rate_max
            )));
        }
        if self.cap.denom.is_empty() {
            return Err(PolicyError::InvalidParams(format!(
                "{name}: cap denom must not be empty"
            )));
        }
        Ok(())
    }

    pub fn default_tax() -> Self {
        Self {
            rate_min: DEFAULT_TAX_RATE_MIN,
            rate_max: DEFAULT_TAX_RATE_MAX,
            change_rate_max: Some(DEFAULT_TAX_CHANGE_RATE_MAX),
            cap: Coin::new(DEFAULT_TAX_CAP_AMOUNT, MICRO_SDR_DENOM),
        }
    }

    pub fn default_reward() -> Self {
        Self {
            rate_min: DEFAULT_REWARD_WEIGHT_MIN,
            rate_max: DEFAULT_REWARD_WEIGHT_MAX,
            change_rate_max: Some(DEFAULT_REWARD_CHANGE_RATE_MAX),
            cap: Coin::new(0, UNUSED_CAP_DENOM),
        }
    }
}

/// Treasury policy configuration. Fixed within an epoch, governance-mutable
/// across epochs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    pub tax_policy: PolicyConstraints,
    pub reward_policy: PolicyConstraints,
    pub seigniorage_burden_target: Decimal256,
    pub mining_increment: Decimal256,
    /// Short rolling window, in epochs.
    pub window_short: u64,
    /// Long rolling window, in epochs.
    pub window_long: u64,
    /// Epochs after genesis before the first policy update.
    pub window_probation: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            tax_policy: PolicyConstraints::default_tax(),
            reward_policy: PolicyConstraints::default_reward(),
            seigniorage_burden_target: DEFAULT_SEIGNIORAGE_BURDEN_TARGET,
            mining_increment: DEFAULT_MINING_INCREMENT,
            window_short: DEFAULT_WINDOW_SHORT,
            window_long: DEFAULT_WINDOW_LONG,
            window_probation: DEFAULT_WINDOW_PROBATION,
        }
    }
}

impl Params {
    /// Reject configurations the controllers are not defined for. Called at
    /// load time; the controllers themselves assume a valid config.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.window_short == 0 {
            return Err(PolicyError::InvalidParams("window_short must be positive".into()));
        }
        if self.window_long < self.window_short {
            return Err(PolicyError::InvalidParams(format!(
                "window_long ({}) must be at least window_short ({})",
                self.window_long, self.window_short
            )));
        }
        if self.window_probation == 0 {
            return Err(PolicyError::InvalidParams(
                "window_probation must be positive".into(),
            ));
        }
        if self.mining_increment.is_zero() {
            return Err(PolicyError::InvalidParams(
                "mining_increment must be positive".into(),
            ));
        }
        if self.seigniorage_burden_target.is_zero()
            || self.seigniorage_burden_target > Decimal256::one()
        {
            return Err(PolicyError::InvalidParams(format!(
                "seigniorage_burden_target {} must be in (0, 1]",
                self.seigniorage_burden_target
            )));
        }
        self.tax_policy.validate("tax_policy")?;
        self.reward_policy.validate("reward_policy")?;
        Ok(())
    }

    /// Parse and validate a JSON params document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, PolicyError> {
        let params: Params =
            serde_json::from_slice(bytes).map_err(|e| PolicyError::Serialization(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| {
            PolicyError::Storage(format!("reading {}: {e}", path.as_ref().display()))
        })?;
        Self::from_json(&bytes)
    }
}
