use serde::{Deserialize, Serialize};
use terrace_core::{
    BlockHeight, Coins, Decimal256, Epoch, IndicatorStore, ParamStore, PolicyError, SupplyOracle,
    BLOCKS_PER_EPOCH,
};
use tracing::{debug, info};

use crate::reward_weight::update_reward_weight;
use crate::tax_cap::update_tax_cap;
use crate::tax_rate::update_tax_rate;

/// True if `height` is the last block of its epoch.
pub fn is_period_last_block(height: BlockHeight, blocks_per_epoch: u64) -> bool {
    blocks_per_epoch != 0 && height % blocks_per_epoch == blocks_per_epoch - 1
}

/// Epoch containing `height`.
pub fn epoch_of(height: BlockHeight, blocks_per_epoch: u64) -> Epoch {
    if blocks_per_epoch == 0 {
        return 0;
    }
    height / blocks_per_epoch
}

/// Emitted once per epoch after the three updaters ran.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyUpdate {
    pub epoch: Epoch,
    pub tax_rate: Decimal256,
    pub reward_weight: Decimal256,
    pub tax_caps: Coins,
}

/// Runs the policy updaters at epoch boundaries.
pub struct EpochDriver<'a, P: ?Sized, I: ?Sized, O: ?Sized> {
    store: &'a P,
    indicators: &'a I,
    oracle: &'a O,
    blocks_per_epoch: u64,
}

impl<'a, P, I, O> EpochDriver<'a, P, I, O>
where
    P: ParamStore + ?Sized,
    I: IndicatorStore + ?Sized,
    O: SupplyOracle + ?Sized,
{
    pub fn new(store: &'a P, indicators: &'a I, oracle: &'a O) -> Self {
        Self {
            store,
            indicators,
            oracle,
            blocks_per_epoch: BLOCKS_PER_EPOCH,
        }
    }

    pub fn with_blocks_per_epoch(mut self, blocks_per_epoch: u64) -> Self {
        self.blocks_per_epoch = blocks_per_epoch;
        self
    }

    /// Heights below this keep the genesis policy.
    pub fn probation_end(&self) -> Result<BlockHeight, PolicyError> {
        let window = self.store.params()?.window_probation;
        Ok(self.blocks_per_epoch.saturating_mul(window))
    }

    /// End-of-block hook. Returns the policy update when `height` closes an
    /// epoch past the probation window, `None` otherwise.
    pub fn end_block(&self, height: BlockHeight) -> Result<Option<PolicyUpdate>, PolicyError> {
        if !is_period_last_block(height, self.blocks_per_epoch) {
            return Ok(None);
        }
        if height < self.probation_end()? {
            debug!(height, "policy frozen during probation");
            return Ok(None);
        }
        self.run_epoch(epoch_of(height, self.blocks_per_epoch)).map(Some)
    }

    /// Run all three updaters unconditionally for the close of `epoch`.
    /// Indicator windows end at `epoch`.
    pub fn run_epoch(&self, epoch: Epoch) -> Result<PolicyUpdate, PolicyError> {
        let tax_rate = update_tax_rate(self.store, self.indicators, epoch)?;
        let reward_weight = update_reward_weight(self.store, self.indicators, epoch)?;
        let tax_caps = update_tax_cap(self.store, self.oracle)?;

        let update = PolicyUpdate {
            epoch,
            tax_rate,
            reward_weight,
            tax_caps,
        };
        info!(
            epoch,
            tax_rate = %update.tax_rate,
            reward_weight = %update.reward_weight,
            tax_caps = update.tax_caps.len(),
            "policy update"
        );
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use terrace_core::{IndicatorKind, Uint128};
    use terrace_state::MemoryStore;

    fn dec(s: &str) -> Decimal256 {
        Decimal256::from_str(s).unwrap()
    }

    #[test]
    fn last_block_of_period() {
        assert!(is_period_last_block(9, 10));
        assert!(is_period_last_block(19, 10));
        assert!(!is_period_last_block(10, 10));
        assert!(!is_period_last_block(0, 10));
        assert!(!is_period_last_block(5, 0));
        assert_eq!(epoch_of(19, 10), 1);
        assert_eq!(epoch_of(20, 10), 2);
    }

    #[test]
    fn mid_epoch_blocks_do_nothing() {
        let store = MemoryStore::default();
        let driver = EpochDriver::new(&store, &store, &store).with_blocks_per_epoch(10);
        assert_eq!(driver.end_block(1_000).unwrap(), None);
        assert_eq!(store.tax_rate().unwrap(), terrace_core::DEFAULT_TAX_RATE);
    }

    #[test]
    fn probation_freezes_policy() {
        let store = MemoryStore::default();
        let driver = EpochDriver::new(&store, &store, &store).with_blocks_per_epoch(10);
        // window_probation = 18 → first update at height 189
        assert_eq!(driver.probation_end().unwrap(), 180);
        assert_eq!(driver.end_block(179).unwrap(), None);
        assert_eq!(store.tax_rate().unwrap(), terrace_core::DEFAULT_TAX_RATE);

        let update = driver.end_block(189).unwrap().expect("update after probation");
        assert_eq!(update.epoch, 18);
        assert_eq!(store.tax_rate().unwrap(), update.tax_rate);
    }

    #[test]
    fn epoch_update_reports_all_three_parameters() {
        let store = MemoryStore::default();
        store.set_supply("uluna", Uint128::new(1));
        store.set_supply("ukrw", Uint128::new(1));
        store.set_exchange_rate("usdr", dec("1"));
        store.set_exchange_rate("ukrw", dec("1200"));
        for epoch in 0..4 {
            store.put_indicator(IndicatorKind::TaxRevenue, epoch, dec("0.5"));
            store.put_indicator(IndicatorKind::SeigniorageRevenue, epoch, dec("67"));
            store.put_indicator(IndicatorKind::MiningRevenue, epoch, dec("100"));
        }

        let driver = EpochDriver::new(&store, &store, &store);
        let update = driver.run_epoch(3).unwrap();

        assert_eq!(update.reward_weight, store.reward_weight().unwrap());
        assert_eq!(update.tax_rate, store.tax_rate().unwrap());
        assert_eq!(update.tax_caps["ukrw"], Uint128::new(1_200_000_000));
        assert_eq!(update.tax_caps.len(), 1);

        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains("\"ukrw\":\"1200000000\""), "got: {json}");
    }

    #[test]
    fn windows_follow_the_closing_epoch_not_the_latest_record() {
        let mut params = terrace_core::Params::default();
        params.window_probation = 1;
        params.tax_policy.change_rate_max = None;
        let store = MemoryStore::new(params.clone());
        for epoch in 0..=4 {
            store.put_indicator(IndicatorKind::TaxRevenue, epoch, dec("1"));
        }

        let driver = EpochDriver::new(&store, &store, &store).with_blocks_per_epoch(10);
        let update = driver.end_block(309).unwrap().expect("epoch 30 closes at 309");
        assert_eq!(update.epoch, 30);
        // nothing was recorded in epochs 27..=30
        assert_eq!(update.tax_rate, params.tax_policy.rate_max);
    }
}
