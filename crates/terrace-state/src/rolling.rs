//! Window and conversion rules shared by every store implementation.

use terrace_core::{int_to_decimal, Decimal256, Epoch, PolicyError, Uint128, MICRO_LUNA_DENOM};

/// Sum an indicator over at most `window` epochs ending at `current`,
/// never walking below epoch 0. Returns the sum and the number of epochs
/// visited. Epochs with no recorded value count as zero.
pub fn window_sum<F>(
    current: Epoch,
    window: u64,
    mut value_at: F,
) -> Result<(Decimal256, u64), PolicyError>
where
    F: FnMut(Epoch) -> Result<Option<Decimal256>, PolicyError>,
{
    let mut sum = Decimal256::zero();
    let mut visited = 0u64;
    while visited < window && visited <= current {
        if let Some(value) = value_at(current - visited)? {
            sum = sum.checked_add(value)?;
        }
        visited += 1;
    }
    Ok((sum, visited))
}

/// Average over the epochs actually visited; exact zero for an empty window.
pub fn window_average<F>(
    current: Epoch,
    window: u64,
    value_at: F,
) -> Result<Decimal256, PolicyError>
where
    F: FnMut(Epoch) -> Result<Option<Decimal256>, PolicyError>,
{
    let (sum, visited) = window_sum(current, window, value_at)?;
    if visited == 0 {
        return Ok(Decimal256::zero());
    }
    Ok(sum.checked_div(int_to_decimal(Uint128::from(visited))?)?)
}

/// Internal-swap conversion through staking-denom exchange rates.
///
/// `rate_of(d)` is the price of one unit of the staking denom in `d`. The
/// staking denom itself has rate 1. A missing or zero rate means the pair
/// is not priced.
pub fn convert_with_rates<F>(
    amount: Decimal256,
    from: &str,
    to: &str,
    mut rate_of: F,
) -> Result<Decimal256, PolicyError>
where
    F: FnMut(&str) -> Result<Option<Decimal256>, PolicyError>,
{
    if from == to {
        return Ok(amount);
    }

    let mut priced = |denom: &str| -> Result<Decimal256, PolicyError> {
        if denom == MICRO_LUNA_DENOM {
            return Ok(Decimal256::one());
        }
        match rate_of(denom)? {
            Some(rate) if !rate.is_zero() => Ok(rate),
            _ => Err(PolicyError::NoConversionRoute {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    };

    let offer_rate = priced(from)?;
    let ask_rate = priced(to)?;
    Ok(amount.checked_mul(ask_rate)?.checked_div(offer_rate)?)
}
