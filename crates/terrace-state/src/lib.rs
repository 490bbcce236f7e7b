//! terrace-state
//!
//! Concrete collaborators for the policy controllers: a sled-backed
//! `StateDb` for nodes and an in-memory `MemoryStore` for tests and
//! simulations. Both implement `ParamStore`, `IndicatorStore` and
//! `SupplyOracle` with the same window and conversion rules.

pub mod db;
pub mod memory;
pub mod rolling;

pub use db::StateDb;
pub use memory::MemoryStore;
