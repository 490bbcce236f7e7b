use terrace_core::{Coins, DecCoin, ParamStore, PolicyError, SupplyOracle, MICRO_LUNA_DENOM};
use tracing::{debug, warn};

/// Re-derive the tax cap of every taxed denomination from the reference cap.
///
/// The staking denom is untaxed and the reference denom's cap is the
/// reference amount by definition; neither is touched. A denom the oracle
/// cannot price keeps its previous cap. Each new cap is persisted as soon
/// as it is computed and returned in the result.
pub fn update_tax_cap<P, O>(store: &P, oracle: &O) -> Result<Coins, PolicyError>
where
    P: ParamStore + ?Sized,
    O: SupplyOracle + ?Sized,
{
    let reference = DecCoin::from_coin(&store.params()?.tax_policy.cap)?;
    let mut new_caps = Coins::new();

    for denom in oracle.total_supply()?.into_keys() {
        if denom == MICRO_LUNA_DENOM || denom == reference.denom {
            continue;
        }

        let converted = match oracle.convert_amount(reference.amount, &reference.denom, &denom) {
            Ok(amount) => DecCoin::new(denom, amount),
            Err(e) if e.is_conversion_failure() => {
                warn!(denom = %denom, error = %e, "tax cap left unchanged");
                continue;
            }
            Err(e) => return Err(e),
        };

        let cap = converted.truncate()?;
        store.set_tax_cap(&cap.denom, cap.amount)?;
        debug!(denom = %cap.denom, cap = %cap.amount, "tax cap updated");
        new_caps.insert(cap.denom, cap.amount);
    }

    Ok(new_caps)
}
