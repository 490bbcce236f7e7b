use cosmwasm_std::{
    CheckedFromRatioError, ConversionOverflowError, Decimal256RangeExceeded, OverflowError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    // ── Conversion ───────────────────────────────────────────────────────────
    #[error("no conversion route from {from} to {to}")]
    NoConversionRoute { from: String, to: String },

    // ── Arithmetic ───────────────────────────────────────────────────────────
    #[error("decimal overflow: {0}")]
    Overflow(#[from] OverflowError),

    #[error("decimal division failed: {0}")]
    Division(#[from] CheckedFromRatioError),

    #[error("amount exceeds decimal range: {0}")]
    DecimalRange(#[from] Decimal256RangeExceeded),

    #[error("amount does not fit an integer coin: {0}")]
    CoinRange(#[from] ConversionOverflowError),

    // ── Configuration ────────────────────────────────────────────────────────
    #[error("invalid params: {0}")]
    InvalidParams(String),

    // ── Serialization / storage ──────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl PolicyError {
    /// True for failures that are local to converting one amount: a missing
    /// price route, or a conversion whose result does not fit a decimal or
    /// an integer coin.
    /// The tax-cap updater skips the denomination on these.
    pub fn is_conversion_failure(&self) -> bool {
        matches!(
            self,
            PolicyError::NoConversionRoute { .. }
                | PolicyError::Overflow(_)
                | PolicyError::Division(_)
                | PolicyError::DecimalRange(_)
                | PolicyError::CoinRange(_)
        )
    }
}
