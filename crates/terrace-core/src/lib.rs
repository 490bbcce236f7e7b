pub mod clamp;
pub mod constants;
pub mod error;
pub mod params;
pub mod store;
pub mod types;

pub use clamp::clamp;
pub use constants::*;
pub use error::PolicyError;
pub use params::{Params, PolicyConstraints};
pub use store::{IndicatorStore, ParamStore, SupplyOracle};
pub use types::*;

pub use cosmwasm_std::{Coin, Decimal256, Uint128};
