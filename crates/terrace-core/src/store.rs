//! Interfaces of the collaborators the policy controllers consume.
//!
//! The controllers never reach for global state: every read and write goes
//! through one of these traits, injected by the caller.

use cosmwasm_std::{Decimal256, Uint128};

use crate::error::PolicyError;
use crate::params::Params;
use crate::types::{Coins, Epoch, IndicatorKind};

/// Rolling-window views over per-epoch indicators.
///
/// A window covers at most `window` epochs ending at `epoch` inclusive;
/// nothing recorded after `epoch` is visible. Both methods must return
/// exact zero when the window holds no data.
pub trait IndicatorStore {
    fn rolling_average(
        &self,
        epoch: Epoch,
        window: u64,
        kind: IndicatorKind,
    ) -> Result<Decimal256, PolicyError>;

    fn rolling_sum(
        &self,
        epoch: Epoch,
        window: u64,
        kind: IndicatorKind,
    ) -> Result<Decimal256, PolicyError>;
}

/// Token supply and internal-swap price conversion.
pub trait SupplyOracle {
    fn total_supply(&self) -> Result<Coins, PolicyError>;

    /// Convert `amount` of `from` into `to`. Fails with
    /// `PolicyError::NoConversionRoute` when the pair is not priced.
    fn convert_amount(&self, amount: Decimal256, from: &str, to: &str)
        -> Result<Decimal256, PolicyError>;
}

/// Policy state and configuration.
pub trait ParamStore {
    fn params(&self) -> Result<Params, PolicyError>;

    fn tax_rate(&self) -> Result<Decimal256, PolicyError>;
    fn set_tax_rate(&self, rate: Decimal256) -> Result<(), PolicyError>;

    fn reward_weight(&self) -> Result<Decimal256, PolicyError>;
    fn set_reward_weight(&self, weight: Decimal256) -> Result<(), PolicyError>;

    /// Stored cap for `denom`, or the reference cap amount if none was ever
    /// stored.
    fn tax_cap(&self, denom: &str) -> Result<Uint128, PolicyError>;
    fn set_tax_cap(&self, denom: &str, cap: Uint128) -> Result<(), PolicyError>;

    /// Every explicitly stored cap.
    fn tax_caps(&self) -> Result<Coins, PolicyError>;
}
