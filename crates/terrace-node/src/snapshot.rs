use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use terrace_core::{Coins, Decimal256, Denom, Epoch, IndicatorKind, ParamStore, PolicyError};
use terrace_state::StateDb;

/// One recorded indicator value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub kind: IndicatorKind,
    pub epoch: Epoch,
    pub value: Decimal256,
}

/// Chain state fed to the policy controllers: what the supply ledger, the
/// oracle and the indicator recorder would otherwise have written.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub supply: Coins,
    /// Price of one unit of the staking denom, per denom.
    pub exchange_rates: BTreeMap<Denom, Decimal256>,
    pub indicators: Vec<IndicatorRecord>,
    pub tax_rate: Option<Decimal256>,
    pub reward_weight: Option<Decimal256>,
}

impl Snapshot {
    pub fn apply(&self, db: &StateDb) -> Result<(), PolicyError> {
        for (denom, amount) in &self.supply {
            db.set_supply(denom, *amount)?;
        }
        for (denom, rate) in &self.exchange_rates {
            db.set_exchange_rate(denom, *rate)?;
        }
        for record in &self.indicators {
            db.put_indicator(record.kind, record.epoch, record.value)?;
        }
        if let Some(rate) = self.tax_rate {
            db.set_tax_rate(rate)?;
        }
        if let Some(weight) = self.reward_weight {
            db.set_reward_weight(weight)?;
        }
        Ok(())
    }
}

/// Current policy state, as printed by `show`.
#[derive(Debug, Serialize)]
pub struct PolicyState {
    /// Epoch of the most recent policy update; `None` before the first.
    pub epoch: Option<Epoch>,
    pub tax_rate: Decimal256,
    pub reward_weight: Decimal256,
    pub tax_caps: Coins,
}

impl PolicyState {
    pub fn read(db: &StateDb) -> Result<Self, PolicyError> {
        Ok(Self {
            epoch: db.last_policy_epoch()?,
            tax_rate: db.tax_rate()?,
            reward_weight: db.reward_weight()?,
            tax_caps: db.tax_caps()?,
        })
    }
}
