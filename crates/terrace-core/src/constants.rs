//! ─── Terrace Treasury Constants ─────────────────────────────────────────────
//!
//! Protocol defaults for the treasury policy controller. Every decimal here
//! is an exact fixed-point value (18 fractional digits); nothing in the
//! policy path touches floating point.

use cosmwasm_std::Decimal256;

// ── Denominations ────────────────────────────────────────────────────────────

/// Native staking denomination. Never taxed, so it never carries a tax cap.
pub const MICRO_LUNA_DENOM: &str = "uluna";

/// Micro-SDR: the reference denomination the tax cap is expressed in.
pub const MICRO_SDR_DENOM: &str = "usdr";

/// Base units per whole token (1 LUNA = 1_000_000 uluna).
pub const MICRO_UNIT: u128 = 1_000_000;

// ── Epochs ───────────────────────────────────────────────────────────────────

/// Blocks per policy epoch: one week at ~6 second block times.
pub const BLOCKS_PER_EPOCH: u64 = 100_800;

/// Short rolling window (epochs), roughly a month.
pub const DEFAULT_WINDOW_SHORT: u64 = 4;

/// Long rolling window (epochs), roughly a year.
pub const DEFAULT_WINDOW_LONG: u64 = 52;

/// Epochs after genesis during which policy is frozen at its initial values.
pub const DEFAULT_WINDOW_PROBATION: u64 = 18;

// ── Decimal256 helpers ──────────────────────────────────────────────────────────

/// Atomics of one millionth at 18 fractional digits.
const ATOMICS_PER_MILLIONTH: u128 = 1_000_000_000_000;

/// Exact decimal `n / 1_000_000`, usable in const context.
pub const fn per_million(n: u128) -> Decimal256 {
    Decimal256::raw(n * ATOMICS_PER_MILLIONTH)
}

// ── Tax policy ───────────────────────────────────────────────────────────────

/// Tax rate floor: 0.05%.
pub const DEFAULT_TAX_RATE_MIN: Decimal256 = per_million(500);

/// Tax rate ceiling: 1%.
pub const DEFAULT_TAX_RATE_MAX: Decimal256 = per_million(10_000);

/// Largest tax-rate move allowed in one epoch: 0.025%.
pub const DEFAULT_TAX_CHANGE_RATE_MAX: Decimal256 = per_million(250);

/// Reference tax cap: 1 SDR.
pub const DEFAULT_TAX_CAP_AMOUNT: u128 = MICRO_UNIT;

/// Tax rate in force before the first policy update: 0.1%.
pub const DEFAULT_TAX_RATE: Decimal256 = per_million(1_000);

// ── Reward policy ────────────────────────────────────────────────────────────

/// Reward weight floor: 5%.
pub const DEFAULT_REWARD_WEIGHT_MIN: Decimal256 = per_million(50_000);

/// Reward weight ceiling: 90%.
pub const DEFAULT_REWARD_WEIGHT_MAX: Decimal256 = per_million(900_000);

/// Largest reward-weight move allowed in one epoch: 2.5%.
pub const DEFAULT_REWARD_CHANGE_RATE_MAX: Decimal256 = per_million(25_000);

/// Reward weight in force before the first policy update: 5%.
pub const DEFAULT_REWARD_WEIGHT: Decimal256 = per_million(50_000);

/// Placeholder denom for the reward policy's unused cap.
pub const UNUSED_CAP_DENOM: &str = "unused";

// ── Feedback targets ─────────────────────────────────────────────────────────

/// Target share of mining rewards paid out of seigniorage: 67%.
pub const DEFAULT_SEIGNIORAGE_BURDEN_TARGET: Decimal256 = per_million(670_000);

/// Yearly growth factor applied to long-window tax revenue: 1.07.
pub const DEFAULT_MINING_INCREMENT: Decimal256 = per_million(1_070_000);
