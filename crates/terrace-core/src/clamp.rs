use cosmwasm_std::Decimal256;

/// Bound a candidate policy value.
///
/// The per-epoch move relative to `old` is limited to `max_delta` first (when
/// one is configured), then the result is forced into `[min, max]`. Applying
/// the bounds last keeps the result in range even if `old` was not.
///
/// Never panics: with `min > max` (a configuration the loader rejects) the
/// result is `max`.
pub fn clamp(
    old: Decimal256,
    candidate: Decimal256,
    min: Decimal256,
    max: Decimal256,
    max_delta: Option<Decimal256>,
) -> Decimal256 {
    let mut bounded = candidate;

    if let Some(delta) = max_delta {
        if bounded > old {
            let ceiling = old.checked_add(delta).unwrap_or(Decimal256::MAX);
            bounded = bounded.min(ceiling);
        } else {
            let floor = old.checked_sub(delta).unwrap_or_else(|_| Decimal256::zero());
            bounded = bounded.max(floor);
        }
    }

    bounded.max(min).min(max)
}
