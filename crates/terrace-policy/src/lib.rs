//! terrace-policy
//!
//! Epoch-boundary monetary policy for the transaction tax: the tax cap
//! updater, the tax-rate and reward-weight feedback controllers, and the
//! epoch driver that runs them. All three updaters read only the pre-epoch
//! snapshot and write disjoint keys, so they may run in any order.

pub mod epoch;
pub mod feedback;
pub mod reward_weight;
pub mod tax_cap;
pub mod tax_rate;

pub use epoch::{epoch_of, is_period_last_block, EpochDriver, PolicyUpdate};
pub use feedback::FeedbackBranch;
pub use reward_weight::{compute_reward_weight, update_reward_weight};
pub use tax_cap::update_tax_cap;
pub use tax_rate::{compute_tax_rate, update_tax_rate};
