use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use terrace_core::{
    Coins, Decimal256, Epoch, IndicatorKind, IndicatorStore, ParamStore, Params, PolicyError,
    SupplyOracle, Uint128, DEFAULT_REWARD_WEIGHT, DEFAULT_TAX_RATE,
};
use tracing::debug;

use crate::rolling::{convert_with_rates, window_average, window_sum};

const PARAMS_KEY: &str = "params";
const TAX_RATE_KEY: &str = "tax_rate";
const REWARD_WEIGHT_KEY: &str = "reward_weight";
const LAST_POLICY_EPOCH_KEY: &str = "last_policy_epoch";

/// Persistent treasury state backed by sled (pure-Rust, no C dependencies).
///
/// Named trees (analogous to column families):
///   params         — "params"               → bincode(Params)
///   policy         — "tax_rate" | "reward_weight" → bincode(Decimal256)
///   tax_caps       — denom utf8             → bincode(Uint128)
///   indicators     — [kind tag] ++ epoch BE → bincode(Decimal256)
///   supply         — denom utf8             → bincode(Uint128)
///   exchange_rates — denom utf8             → bincode(Decimal256)
///   meta           — utf8 key bytes         → raw bytes
pub struct StateDb {
    _db: sled::Db,
    params: sled::Tree,
    policy: sled::Tree,
    tax_caps: sled::Tree,
    indicators: sled::Tree,
    supply: sled::Tree,
    exchange_rates: sled::Tree,
    meta: sled::Tree,
}

fn storage(e: sled::Error) -> PolicyError {
    PolicyError::Storage(e.to_string())
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, PolicyError> {
    bincode::serialize(value).map_err(|e| PolicyError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, PolicyError> {
    bincode::deserialize(bytes).map_err(|e| PolicyError::Serialization(e.to_string()))
}

fn indicator_key(kind: IndicatorKind, epoch: Epoch) -> [u8; 9] {
    let mut key = [0u8; 9];
    key[0] = kind.tag();
    key[1..].copy_from_slice(&epoch.to_be_bytes());
    key
}

impl StateDb {
    /// Open or create the state database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        Self::from_db(sled::open(path).map_err(storage)?)
    }

    /// A throwaway database removed when dropped.
    pub fn temporary() -> Result<Self, PolicyError> {
        Self::from_db(sled::Config::new().temporary(true).open().map_err(storage)?)
    }

    fn from_db(db: sled::Db) -> Result<Self, PolicyError> {
        let params         = db.open_tree("params").map_err(storage)?;
        let policy         = db.open_tree("policy").map_err(storage)?;
        let tax_caps       = db.open_tree("tax_caps").map_err(storage)?;
        let indicators     = db.open_tree("indicators").map_err(storage)?;
        let supply         = db.open_tree("supply").map_err(storage)?;
        let exchange_rates = db.open_tree("exchange_rates").map_err(storage)?;
        let meta           = db.open_tree("meta").map_err(storage)?;
        Ok(Self { _db: db, params, policy, tax_caps, indicators, supply, exchange_rates, meta })
    }

    fn get<T: DeserializeOwned>(tree: &sled::Tree, key: &[u8]) -> Result<Option<T>, PolicyError> {
        match tree.get(key).map_err(storage)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put<T: Serialize>(tree: &sled::Tree, key: &[u8], value: &T) -> Result<(), PolicyError> {
        tree.insert(key, encode(value)?).map_err(storage)?;
        Ok(())
    }

    fn coins(tree: &sled::Tree) -> Result<Coins, PolicyError> {
        let mut coins = Coins::new();
        for item in tree.iter() {
            let (key, value) = item.map_err(storage)?;
            let denom = String::from_utf8(key.to_vec())
                .map_err(|e| PolicyError::Serialization(e.to_string()))?;
            coins.insert(denom, decode(&value)?);
        }
        Ok(coins)
    }

    // ── Params ───────────────────────────────────────────────────────────────

    /// Store a new configuration. Rejected here, at load time, if invalid.
    pub fn put_params(&self, params: &Params) -> Result<(), PolicyError> {
        params.validate()?;
        Self::put(&self.params, PARAMS_KEY.as_bytes(), params)
    }

    // ── Indicators ───────────────────────────────────────────────────────────

    /// Record the value of one indicator for one epoch.
    pub fn put_indicator(
        &self,
        kind: IndicatorKind,
        epoch: Epoch,
        value: Decimal256,
    ) -> Result<(), PolicyError> {
        Self::put(&self.indicators, &indicator_key(kind, epoch), &value)
    }

    pub fn get_indicator(
        &self,
        kind: IndicatorKind,
        epoch: Epoch,
    ) -> Result<Option<Decimal256>, PolicyError> {
        Self::get(&self.indicators, &indicator_key(kind, epoch))
    }

    /// Epoch of the most recent policy update, if any ran.
    pub fn last_policy_epoch(&self) -> Result<Option<Epoch>, PolicyError> {
        match self.get_meta(LAST_POLICY_EPOCH_KEY)? {
            Some(bytes) => {
                let arr: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    PolicyError::Serialization("last_policy_epoch: bad length".into())
                })?;
                Ok(Some(u64::from_be_bytes(arr)))
            }
            None => Ok(None),
        }
    }

    pub fn set_last_policy_epoch(&self, epoch: Epoch) -> Result<(), PolicyError> {
        self.put_meta(LAST_POLICY_EPOCH_KEY, &epoch.to_be_bytes())
    }

    // ── Supply / exchange rates ──────────────────────────────────────────────

    pub fn set_supply(&self, denom: &str, amount: Uint128) -> Result<(), PolicyError> {
        Self::put(&self.supply, denom.as_bytes(), &amount)
    }

    /// Price of one unit of the staking denom, in `denom`.
    pub fn set_exchange_rate(&self, denom: &str, rate: Decimal256) -> Result<(), PolicyError> {
        Self::put(&self.exchange_rates, denom.as_bytes(), &rate)
    }

    pub fn delete_exchange_rate(&self, denom: &str) -> Result<(), PolicyError> {
        self.exchange_rates.remove(denom.as_bytes()).map_err(storage)?;
        Ok(())
    }

    // ── Meta ─────────────────────────────────────────────────────────────────

    pub fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), PolicyError> {
        self.meta.insert(key.as_bytes(), value).map_err(storage)?;
        Ok(())
    }

    pub fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, PolicyError> {
        self.meta
            .get(key.as_bytes())
            .map(|v| v.map(|iv| iv.to_vec()))
            .map_err(storage)
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), PolicyError> {
        self._db.flush().map_err(storage)?;
        Ok(())
    }
}

impl ParamStore for StateDb {
    fn params(&self) -> Result<Params, PolicyError> {
        Ok(Self::get::<Params>(&self.params, PARAMS_KEY.as_bytes())?.unwrap_or_default())
    }

    fn tax_rate(&self) -> Result<Decimal256, PolicyError> {
        let rate = Self::get::<Decimal256>(&self.policy, TAX_RATE_KEY.as_bytes())?;
        Ok(rate.unwrap_or(DEFAULT_TAX_RATE))
    }

    fn set_tax_rate(&self, rate: Decimal256) -> Result<(), PolicyError> {
        Self::put(&self.policy, TAX_RATE_KEY.as_bytes(), &rate)
    }

    fn reward_weight(&self) -> Result<Decimal256, PolicyError> {
        let weight = Self::get::<Decimal256>(&self.policy, REWARD_WEIGHT_KEY.as_bytes())?;
        Ok(weight.unwrap_or(DEFAULT_REWARD_WEIGHT))
    }

    fn set_reward_weight(&self, weight: Decimal256) -> Result<(), PolicyError> {
        Self::put(&self.policy, REWARD_WEIGHT_KEY.as_bytes(), &weight)
    }

    fn tax_cap(&self, denom: &str) -> Result<Uint128, PolicyError> {
        match Self::get::<Uint128>(&self.tax_caps, denom.as_bytes())? {
            Some(cap) => Ok(cap),
            None => Ok(self.params()?.tax_policy.cap.amount),
        }
    }

    fn set_tax_cap(&self, denom: &str, cap: Uint128) -> Result<(), PolicyError> {
        debug!(denom, %cap, "storing tax cap");
        Self::put(&self.tax_caps, denom.as_bytes(), &cap)
    }

    fn tax_caps(&self) -> Result<Coins, PolicyError> {
        Self::coins(&self.tax_caps)
    }
}

impl IndicatorStore for StateDb {
    fn rolling_average(
        &self,
        epoch: Epoch,
        window: u64,
        kind: IndicatorKind,
    ) -> Result<Decimal256, PolicyError> {
        window_average(epoch, window, |e| self.get_indicator(kind, e))
    }

    fn rolling_sum(
        &self,
        epoch: Epoch,
        window: u64,
        kind: IndicatorKind,
    ) -> Result<Decimal256, PolicyError> {
        window_sum(epoch, window, |e| self.get_indicator(kind, e)).map(|(sum, _)| sum)
    }
}

impl SupplyOracle for StateDb {
    fn total_supply(&self) -> Result<Coins, PolicyError> {
        Self::coins(&self.supply)
    }

    fn convert_amount(
        &self,
        amount: Decimal256,
        from: &str,
        to: &str,
    ) -> Result<Decimal256, PolicyError> {
        convert_with_rates(amount, from, to, |denom| {
            Self::get(&self.exchange_rates, denom.as_bytes())
        })
    }
}
