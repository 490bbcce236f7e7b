use terrace_core::{Decimal256, Epoch, IndicatorKind, IndicatorStore, ParamStore, PolicyError};
use tracing::info;

use crate::feedback::FeedbackBranch;

/// Reward-weight feedback law:
///
///   w(n+1) = w(n) × SB_target / SB
///
/// with the seigniorage burden SB = seigniorage sum / mining-revenue sum
/// over the short window. Either sum being zero leaves no burden to steer
/// by, and the policy hikes to the ceiling. A burden too small to represent
/// (below 1e-18) is treated the same way.
pub fn compute_reward_weight(
    old_weight: Decimal256,
    seigniorage_sum: Decimal256,
    total_sum: Decimal256,
    burden_target: Decimal256,
) -> Result<FeedbackBranch, PolicyError> {
    if total_sum.is_zero() || seigniorage_sum.is_zero() {
        return Ok(FeedbackBranch::MaxOnDormant);
    }
    let burden = seigniorage_sum.checked_div(total_sum)?;
    if burden.is_zero() {
        return Ok(FeedbackBranch::MaxOnDormant);
    }
    Ok(FeedbackBranch::Formula(
        old_weight.checked_mul(burden_target.checked_div(burden)?)?,
    ))
}

/// Recompute the reward weight at the close of `epoch` and persist it.
pub fn update_reward_weight<P, I>(
    store: &P,
    indicators: &I,
    epoch: Epoch,
) -> Result<Decimal256, PolicyError>
where
    P: ParamStore + ?Sized,
    I: IndicatorStore + ?Sized,
{
    let params = store.params()?;
    let old_weight = store.reward_weight()?;

    let window = params.window_short;
    let seigniorage_sum =
        indicators.rolling_sum(epoch, window, IndicatorKind::SeigniorageRevenue)?;
    let total_sum = indicators.rolling_sum(epoch, window, IndicatorKind::MiningRevenue)?;

    let branch = compute_reward_weight(
        old_weight,
        seigniorage_sum,
        total_sum,
        params.seigniorage_burden_target,
    )?;
    let new_weight = branch.resolve(old_weight, &params.reward_policy);

    store.set_reward_weight(new_weight)?;
    info!(
        epoch,
        old = %old_weight,
        new = %new_weight,
        dormant = branch.is_dormant(),
        "reward weight updated"
    );
    Ok(new_weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use terrace_core::DEFAULT_REWARD_WEIGHT;
    use terrace_state::MemoryStore;

    fn dec(s: &str) -> Decimal256 {
        Decimal256::from_str(s).unwrap()
    }

    #[test]
    fn burden_above_target_lowers_weight() {
        // burden 0.8 against a 0.4 target halves the weight
        let branch = compute_reward_weight(dec("0.5"), dec("80"), dec("100"), dec("0.4")).unwrap();
        assert_eq!(branch, FeedbackBranch::Formula(dec("0.25")));
    }

    #[test]
    fn burden_below_target_raises_weight() {
        let branch = compute_reward_weight(dec("0.1"), dec("25"), dec("100"), dec("0.5")).unwrap();
        assert_eq!(branch, FeedbackBranch::Formula(dec("0.2")));
    }

    #[test]
    fn either_sum_zero_is_dormant() {
        for (sr, mr) in [("0", "100"), ("100", "0"), ("0", "0")] {
            let branch =
                compute_reward_weight(dec("0.3"), dec(sr), dec(mr), dec("0.67")).unwrap();
            assert_eq!(branch, FeedbackBranch::MaxOnDormant, "sr={sr} mr={mr}");
        }
    }

    #[test]
    fn vanishing_burden_is_dormant_not_a_division_error() {
        // 0.0001 / 1e17 is below the smallest representable decimal
        let branch = compute_reward_weight(
            dec("0.3"),
            dec("0.0001"),
            dec("100000000000000000"),
            dec("0.67"),
        )
        .unwrap();
        assert_eq!(branch, FeedbackBranch::MaxOnDormant);

        let store = MemoryStore::default();
        store.put_indicator(IndicatorKind::SeigniorageRevenue, 0, dec("0.0001"));
        store.put_indicator(IndicatorKind::MiningRevenue, 0, dec("100000000000000000"));
        let weight = update_reward_weight(&store, &store, 0).unwrap();
        let policy = store.params().unwrap().reward_policy;
        assert_eq!(weight, DEFAULT_REWARD_WEIGHT + policy.change_rate_max.unwrap());
    }

    #[test]
    fn dormant_weight_moves_toward_reward_max() {
        let store = MemoryStore::default();
        let params = store.params().unwrap();
        let old = store.reward_weight().unwrap();
        store.put_indicator(IndicatorKind::MiningRevenue, 3, dec("500"));

        let weight = update_reward_weight(&store, &store, 3).unwrap();
        let step = params.reward_policy.change_rate_max.unwrap();
        assert_eq!(weight, old + step);
        assert_eq!(store.reward_weight().unwrap(), weight);
    }

    #[test]
    fn dormant_without_delta_limit_lands_on_reward_max() {
        let store = MemoryStore::default();
        let mut params = store.params().unwrap();
        params.reward_policy.change_rate_max = None;
        store.set_params(params.clone()).unwrap();

        let weight = update_reward_weight(&store, &store, 0).unwrap();
        assert_eq!(weight, params.reward_policy.rate_max);
        assert_ne!(weight, params.tax_policy.rate_max);
    }

    #[test]
    fn sums_use_short_window_only() {
        let store = MemoryStore::default();
        store.set_reward_weight(dec("0.2")).unwrap();
        // window_short = 4: epochs 6..=9 count, epoch 5 does not
        store.put_indicator(IndicatorKind::SeigniorageRevenue, 5, dec("1000"));
        store.put_indicator(IndicatorKind::MiningRevenue, 5, dec("1000"));
        for epoch in 6..=9 {
            store.put_indicator(IndicatorKind::SeigniorageRevenue, epoch, dec("67"));
            store.put_indicator(IndicatorKind::MiningRevenue, epoch, dec("100"));
        }
        // burden equals the 0.67 target exactly, so the weight holds
        assert_eq!(update_reward_weight(&store, &store, 9).unwrap(), dec("0.2"));
    }

    #[test]
    fn weight_stays_within_bounds() {
        let store = MemoryStore::default();
        let policy = store.params().unwrap().reward_policy;
        store.put_indicator(IndicatorKind::SeigniorageRevenue, 0, dec("1"));
        store.put_indicator(IndicatorKind::MiningRevenue, 0, dec("1000000"));
        for _ in 0..100 {
            let weight = update_reward_weight(&store, &store, 0).unwrap();
            assert!(weight >= policy.rate_min && weight <= policy.rate_max);
        }
        assert_eq!(store.reward_weight().unwrap(), policy.rate_max);
    }
}
