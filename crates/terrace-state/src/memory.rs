use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use terrace_core::{
    Coins, Decimal256, Denom, Epoch, IndicatorKind, IndicatorStore, ParamStore, Params, PolicyError,
    SupplyOracle, Uint128, DEFAULT_REWARD_WEIGHT, DEFAULT_TAX_RATE,
};

use crate::rolling::{convert_with_rates, window_average, window_sum};

/// In-memory implementation of every collaborator trait. Same window and
/// conversion rules as `StateDb`, no persistence.
#[derive(Debug)]
pub struct MemoryStore {
    params: RefCell<Params>,
    tax_rate: Cell<Decimal256>,
    reward_weight: Cell<Decimal256>,
    tax_caps: RefCell<Coins>,
    indicators: RefCell<BTreeMap<(IndicatorKind, Epoch), Decimal256>>,
    supply: RefCell<Coins>,
    exchange_rates: RefCell<BTreeMap<Denom, Decimal256>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl MemoryStore {
    pub fn new(params: Params) -> Self {
        Self {
            params: RefCell::new(params),
            tax_rate: Cell::new(DEFAULT_TAX_RATE),
            reward_weight: Cell::new(DEFAULT_REWARD_WEIGHT),
            tax_caps: RefCell::new(Coins::new()),
            indicators: RefCell::new(BTreeMap::new()),
            supply: RefCell::new(Coins::new()),
            exchange_rates: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn set_params(&self, params: Params) -> Result<(), PolicyError> {
        params.validate()?;
        *self.params.borrow_mut() = params;
        Ok(())
    }

    pub fn put_indicator(&self, kind: IndicatorKind, epoch: Epoch, value: Decimal256) {
        self.indicators.borrow_mut().insert((kind, epoch), value);
    }

    pub fn set_supply(&self, denom: &str, amount: Uint128) {
        self.supply.borrow_mut().insert(denom.to_string(), amount);
    }

    pub fn set_exchange_rate(&self, denom: &str, rate: Decimal256) {
        self.exchange_rates.borrow_mut().insert(denom.to_string(), rate);
    }

    fn indicator(
        &self,
        kind: IndicatorKind,
        epoch: Epoch,
    ) -> Result<Option<Decimal256>, PolicyError> {
        Ok(self.indicators.borrow().get(&(kind, epoch)).copied())
    }
}

impl ParamStore for MemoryStore {
    fn params(&self) -> Result<Params, PolicyError> {
        Ok(self.params.borrow().clone())
    }

    fn tax_rate(&self) -> Result<Decimal256, PolicyError> {
        Ok(self.tax_rate.get())
    }

    fn set_tax_rate(&self, rate: Decimal256) -> Result<(), PolicyError> {
        self.tax_rate.set(rate);
        Ok(())
    }

    fn reward_weight(&self) -> Result<Decimal256, PolicyError> {
        Ok(self.reward_weight.get())
    }

    fn set_reward_weight(&self, weight: Decimal256) -> Result<(), PolicyError> {
        self.reward_weight.set(weight);
        Ok(())
    }

    fn tax_cap(&self, denom: &str) -> Result<Uint128, PolicyError> {
        match self.tax_caps.borrow().get(denom) {
            Some(cap) => Ok(*cap),
            None => Ok(self.params.borrow().tax_policy.cap.amount),
        }
    }

    fn set_tax_cap(&self, denom: &str, cap: Uint128) -> Result<(), PolicyError> {
        self.tax_caps.borrow_mut().insert(denom.to_string(), cap);
        Ok(())
    }

    fn tax_caps(&self) -> Result<Coins, PolicyError> {
        Ok(self.tax_caps.borrow().clone())
    }
}

impl IndicatorStore for MemoryStore {
    fn rolling_average(
        &self,
        epoch: Epoch,
        window: u64,
        kind: IndicatorKind,
    ) -> Result<Decimal256, PolicyError> {
        window_average(epoch, window, |e| self.indicator(kind, e))
    }

    fn rolling_sum(
        &self,
        epoch: Epoch,
        window: u64,
        kind: IndicatorKind,
    ) -> Result<Decimal256, PolicyError> {
        window_sum(epoch, window, |e| self.indicator(kind, e)).map(|(sum, _)| sum)
    }
}

impl SupplyOracle for MemoryStore {
    fn total_supply(&self) -> Result<Coins, PolicyError> {
        Ok(self.supply.borrow().clone())
    }

    fn convert_amount(
        &self,
        amount: Decimal256,
        from: &str,
        to: &str,
    ) -> Result<Decimal256, PolicyError> {
        let rates = self.exchange_rates.borrow();
        convert_with_rates(amount, from, to, |denom| Ok(rates.get(denom).copied()))
    }
}
