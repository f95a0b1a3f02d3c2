use cosmwasm_std::Uint128;
use nft_marketplace::auction_house::{FeeSchedule, FeeTier};

use crate::ContractError;

/// Hard ceiling of any fee, 10%
pub const MAX_FEE_BPS: u16 = 1_000;
pub const BPS_DENOMINATOR: u128 = 10_000;

/// One USD with the oracle's 8 decimals
const ONE_USD: u128 = 100_000_000;

/// Schedule every fresh deployment starts with.
pub fn default_fee_schedule() -> FeeSchedule {
    let tier = |min: u128, max: Uint128, fee_bps: u16| FeeTier {
        min_usd: Uint128::new(min * ONE_USD),
        max_usd: max,
        fee_bps,
    };

    FeeSchedule {
        tiers: vec![
            tier(0, Uint128::new(1_000 * ONE_USD), 500),
            tier(1_000, Uint128::new(10_000 * ONE_USD), 300),
            tier(10_000, Uint128::new(100_000 * ONE_USD), 200),
            tier(100_000, Uint128::MAX, 100),
        ],
        default_fee_bps: 200,
        min_usd_threshold: Uint128::new(10 * ONE_USD),
    }
}

/// Fee rate applicable to a sale worth `usd_value`.
///
/// Values under the minimum threshold, or not covered by any tier, are charged the default fee.
pub fn compute_fee_bps(schedule: &FeeSchedule, usd_value: Uint128) -> u16 {
    if usd_value < schedule.min_usd_threshold {
        return schedule.default_fee_bps;
    }

    schedule
        .tiers
        .iter()
        .find(|tier| tier.min_usd <= usd_value && usd_value < tier.max_usd)
        .map(|tier| tier.fee_bps)
        .unwrap_or(schedule.default_fee_bps)
}

/// Splits `amount` into `(fee, seller_amount)`. The fee is floored, the seller gets the remainder.
pub fn split_payment(amount: Uint128, fee_bps: u16) -> Result<(Uint128, Uint128), ContractError> {
    let fee = amount.multiply_ratio(fee_bps as u128, BPS_DENOMINATOR);
    Ok((fee, amount.checked_sub(fee)?))
}

/// Validates a fee rate
pub(crate) fn validate_fee_bps(fee_bps: u16) -> Result<u16, ContractError> {
    if fee_bps > MAX_FEE_BPS {
        return Err(ContractError::FeeTooHigh {
            fee_bps,
            max: MAX_FEE_BPS,
        });
    }
    Ok(fee_bps)
}

/// Validates a complete tier schedule: rates under the ceiling, non-empty brackets,
/// ascending order without overlap.
pub(crate) fn validate_fee_tiers(tiers: &[FeeTier]) -> Result<(), ContractError> {
    for (i, tier) in tiers.iter().enumerate() {
        validate_fee_bps(tier.fee_bps)?;

        if tier.min_usd >= tier.max_usd {
            return Err(ContractError::InvalidFeeTiers {
                reason: format!("tier {i} has min_usd >= max_usd"),
            });
        }
    }

    if let Some(i) = tiers.windows(2).position(|pair| pair[0].max_usd > pair[1].min_usd) {
        return Err(ContractError::InvalidFeeTiers {
            reason: format!("tier {} overlaps tier {}", i, i + 1),
        });
    }

    Ok(())
}
