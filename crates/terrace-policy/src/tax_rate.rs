use terrace_core::{Decimal256, Epoch, IndicatorKind, IndicatorStore, ParamStore, PolicyError};
use tracing::info;

use crate::feedback::FeedbackBranch;

/// Tax-rate feedback law:
///
///   t(n+1) = t(n) × (TL_long × INC) / TL_short
///
/// where TL_long and TL_short are the rolling averages of tax revenue over
/// the long and short windows. With no short-window revenue there is no
/// ratio to compute and the policy hikes to the ceiling.
///
/// Every multiplication and division truncates to 18 fractional digits.
pub fn compute_tax_rate(
    old_rate: Decimal256,
    tl_long: Decimal256,
    tl_short: Decimal256,
    mining_increment: Decimal256,
) -> Result<FeedbackBranch, PolicyError> {
    if tl_short.is_zero() {
        return Ok(FeedbackBranch::MaxOnDormant);
    }
    let scaled = old_rate.checked_mul(tl_long.checked_mul(mining_increment)?)?;
    Ok(FeedbackBranch::Formula(scaled.checked_div(tl_short)?))
}

/// Recompute the tax rate at the close of `epoch` and persist it. Both
/// windows end at `epoch`.
pub fn update_tax_rate<P, I>(
    store: &P,
    indicators: &I,
    epoch: Epoch,
) -> Result<Decimal256, PolicyError>
where
    P: ParamStore + ?Sized,
    I: IndicatorStore + ?Sized,
{
    let params = store.params()?;
    let old_rate = store.tax_rate()?;

    let tl_long =
        indicators.rolling_average(epoch, params.window_long, IndicatorKind::TaxRevenue)?;
    let tl_short =
        indicators.rolling_average(epoch, params.window_short, IndicatorKind::TaxRevenue)?;

    let branch = compute_tax_rate(old_rate, tl_long, tl_short, params.mining_increment)?;
    let new_rate = branch.resolve(old_rate, &params.tax_policy);

    store.set_tax_rate(new_rate)?;
    info!(
        epoch,
        old = %old_rate,
        new = %new_rate,
        dormant = branch.is_dormant(),
        "tax rate updated"
    );
    Ok(new_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use terrace_core::{Coin, Params, PolicyConstraints};
    use terrace_state::MemoryStore;

    fn dec(s: &str) -> Decimal256 {
        Decimal256::from_str(s).unwrap()
    }

    /// Wide bounds and no delta limit so the raw law is observable.
    fn open_params() -> Params {
        Params {
            tax_policy: PolicyConstraints {
                rate_min: Decimal256::zero(),
                rate_max: dec("0.05"),
                change_rate_max: None,
                cap: Coin::new(1_000_000, "usdr"),
            },
            window_short: 1,
            window_long: 2,
            ..Params::default()
        }
    }

    #[test]
    fn formula_matches_worked_example() {
        let branch =
            compute_tax_rate(dec("0.02"), dec("1.10"), dec("1.00"), dec("1.05")).unwrap();
        assert_eq!(branch, FeedbackBranch::Formula(dec("0.0231")));
    }

    #[test]
    fn dormant_short_window_ignores_everything_else() {
        for (old, long) in [("0.02", "1.10"), ("0.0005", "0"), ("0.5", "99")] {
            let branch =
                compute_tax_rate(dec(old), dec(long), Decimal256::zero(), dec("1.07")).unwrap();
            assert_eq!(branch, FeedbackBranch::MaxOnDormant);
        }
    }

    #[test]
    fn quotient_is_truncated_to_eighteen_digits() {
        // 0.02 / 3 = 0.00666...; the last digit is cut, not rounded up
        let branch = compute_tax_rate(dec("0.02"), dec("1"), dec("3"), dec("1")).unwrap();
        assert_eq!(branch, FeedbackBranch::Formula(dec("0.006666666666666666")));
    }

    #[test]
    fn revenue_beyond_u128_decimal_range_still_computes() {
        // averages near 1e21 overflow a 128-bit decimal once multiplied by INC
        let long = dec("1000000000000000000000");
        let branch = compute_tax_rate(dec("0.01"), long, long, dec("1.07")).unwrap();
        assert_eq!(branch, FeedbackBranch::Formula(dec("0.0107")));
    }

    #[test]
    fn worked_example_through_the_store() {
        let mut params = open_params();
        params.mining_increment = dec("1.05");
        let store = MemoryStore::new(params);
        store.set_tax_rate(dec("0.02")).unwrap();
        // long window averages epochs 0 and 1 to 1.10; short window sees epoch 1 only
        store.put_indicator(IndicatorKind::TaxRevenue, 0, dec("1.20"));
        store.put_indicator(IndicatorKind::TaxRevenue, 1, dec("1.00"));

        let rate = update_tax_rate(&store, &store, 1).unwrap();
        assert_eq!(rate, dec("0.0231"));
        assert_eq!(store.tax_rate().unwrap(), dec("0.0231"));
    }

    #[test]
    fn no_revenue_hikes_to_max() {
        let store = MemoryStore::new(open_params());
        store.set_tax_rate(dec("0.001")).unwrap();
        let rate = update_tax_rate(&store, &store, 0).unwrap();
        assert_eq!(rate, dec("0.05"));
    }

    #[test]
    fn revenue_that_stopped_arriving_reads_as_dormant() {
        let store = MemoryStore::new(open_params());
        store.set_tax_rate(dec("0.001")).unwrap();
        for epoch in 0..=4 {
            store.put_indicator(IndicatorKind::TaxRevenue, epoch, dec("1"));
        }
        // the short window at epoch 30 holds nothing
        assert_eq!(update_tax_rate(&store, &store, 30).unwrap(), dec("0.05"));
    }

    #[test]
    fn dormant_branch_is_still_delta_limited() {
        let store = MemoryStore::default();
        let params = store.params().unwrap();
        let old = store.tax_rate().unwrap();
        let rate = update_tax_rate(&store, &store, 0).unwrap();
        let step = params.tax_policy.change_rate_max.unwrap();
        assert_eq!(rate, old + step);
        assert!(rate < params.tax_policy.rate_max);
    }

    #[test]
    fn result_stays_within_bounds() {
        let store = MemoryStore::default();
        let params = store.params().unwrap();
        for epoch in 0..12u64 {
            let v = if epoch < 8 { "1000" } else { "0.0001" };
            store.put_indicator(IndicatorKind::TaxRevenue, epoch, dec(v));
        }
        for _ in 0..200 {
            let rate = update_tax_rate(&store, &store, 11).unwrap();
            assert!(rate >= params.tax_policy.rate_min && rate <= params.tax_policy.rate_max);
        }
        // revenue collapsed in the short window relative to the long one, so
        // the rate has been pushed all the way up
        assert_eq!(store.tax_rate().unwrap(), params.tax_policy.rate_max);
    }

    #[test]
    fn same_snapshot_gives_same_rate() {
        let a = MemoryStore::default();
        let b = MemoryStore::default();
        for store in [&a, &b] {
            store.put_indicator(IndicatorKind::TaxRevenue, 0, dec("3"));
            store.put_indicator(IndicatorKind::TaxRevenue, 1, dec("2"));
        }
        assert_eq!(
            update_tax_rate(&a, &a, 1).unwrap(),
            update_tax_rate(&b, &b, 1).unwrap()
        );
    }
}
