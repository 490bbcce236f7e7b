use cosmwasm_std::{Coin, Decimal256, Uint128};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::PolicyError;

/// Denomination identifier, e.g. "uluna" or "ukrw".
pub type Denom = String;

/// Block height.
pub type BlockHeight = u64;

/// Policy epoch number (height / blocks per epoch).
pub type Epoch = u64;

/// Integer amounts keyed by denomination. Ordered, so anything emitted from
/// it (events, logs, JSON) is stable across validators.
pub type Coins = BTreeMap<Denom, Uint128>;

// ── IndicatorKind ────────────────────────────────────────────────────────────

/// Which rolling series to query from the indicator store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    /// Tax rewards per unit of staking supply (TRL).
    TaxRevenue,
    /// Seigniorage rewards (SR).
    SeigniorageRevenue,
    /// Total mining rewards, tax plus seigniorage (MR).
    MiningRevenue,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 3] = [
        IndicatorKind::TaxRevenue,
        IndicatorKind::SeigniorageRevenue,
        IndicatorKind::MiningRevenue,
    ];

    /// One-byte storage prefix.
    pub fn tag(self) -> u8 {
        match self {
            IndicatorKind::TaxRevenue => 0x01,
            IndicatorKind::SeigniorageRevenue => 0x02,
            IndicatorKind::MiningRevenue => 0x03,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IndicatorKind::TaxRevenue => "tax_revenue",
            IndicatorKind::SeigniorageRevenue => "seigniorage_revenue",
            IndicatorKind::MiningRevenue => "mining_revenue",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DecCoin ──────────────────────────────────────────────────────────────────

/// A denomination amount with a fractional part.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecCoin {
    pub denom: Denom,
    pub amount: Decimal256,
}

impl DecCoin {
    pub fn new(denom: impl Into<Denom>, amount: Decimal256) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Lift an integer coin into decimal form.
    pub fn from_coin(coin: &Coin) -> Result<Self, PolicyError> {
        Ok(Self {
            denom: coin.denom.clone(),
            amount: int_to_decimal(coin.amount)?,
        })
    }

    /// Drop the fractional part (round toward zero).
    pub fn truncate(&self) -> Result<Coin, PolicyError> {
        let whole = Uint128::try_from(self.amount.to_uint_floor())?;
        Ok(Coin::new(whole.u128(), self.denom.clone()))
    }
}

/// Exact conversion of an integer amount into a decimal.
pub fn int_to_decimal(amount: Uint128) -> Result<Decimal256, PolicyError> {
    Ok(Decimal256::from_atomics(amount, 0)?)
}
