//! Fee-adjusted constant-product arithmetic.
//!
//! All functions work on 256-bit integers with checked operations and
//! floor division. No floating point is involved: rounding down on every
//! output is what keeps `reserve_a * reserve_b` from shrinking across swaps.

use alloy_primitives::{U256, U512};

use crate::error::PoolError;

/// Fee numerator: the share of every input counted toward pricing.
pub const FEE_NUMERATOR: U256 = U256::from_limbs([997, 0, 0, 0]);

/// Fee denominator (0.3% fee = 3 / 1000).
pub const FEE_DENOMINATOR: U256 = U256::from_limbs([1000, 0, 0, 0]);

/// Fixed-point scale of prices (`10^18`).
pub const SCALE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Basis points in one whole.
pub const BPS: U256 = U256::from_limbs([10_000, 0, 0, 0]);

/// Output amount for swapping `amount_in` into a pool holding `reserve_in`
/// of the input asset and `reserve_out` of the output asset.
///
/// ```text
/// amount_in_with_fee = amount_in * 997
/// amount_out = amount_in_with_fee * reserve_out
///            / (reserve_in * 1000 + amount_in_with_fee)
/// ```
///
/// # Errors
///
/// - [`PoolError::InvalidAmount`] if `amount_in` is zero.
/// - [`PoolError::InsufficientOutput`] if the output rounds to zero or
///   exceeds `reserve_out`.
/// - [`PoolError::ArithmeticOverflow`] if an intermediate product does not
///   fit in 256 bits.
pub fn amount_out(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
) -> Result<U256, PoolError> {
    if amount_in.is_zero() {
        return Err(PoolError::InvalidAmount);
    }

    let amount_in_with_fee = amount_in
        .checked_mul(FEE_NUMERATOR)
        .ok_or(PoolError::ArithmeticOverflow)?;
    let numerator = amount_in_with_fee
        .checked_mul(reserve_out)
        .ok_or(PoolError::ArithmeticOverflow)?;
    let denominator = reserve_in
        .checked_mul(FEE_DENOMINATOR)
        .and_then(|scaled| scaled.checked_add(amount_in_with_fee))
        .ok_or(PoolError::ArithmeticOverflow)?;
    // Non-zero: amount_in_with_fee > 0.
    let amount_out = numerator
        .checked_div(denominator)
        .ok_or(PoolError::ArithmeticOverflow)?;

    if amount_out.is_zero() || amount_out > reserve_out {
        return Err(PoolError::InsufficientOutput);
    }
    Ok(amount_out)
}

/// Portion of `amount_in` withheld as the swap fee, rounded down.
#[must_use]
pub fn fee_amount(amount_in: U256) -> U256 {
    // floor(x * 997 / 1000) split as x = 1000q + r so it cannot overflow.
    let retained = amount_in / FEE_DENOMINATOR * FEE_NUMERATOR
        + amount_in % FEE_DENOMINATOR * FEE_NUMERATOR / FEE_DENOMINATOR;
    amount_in - retained
}

/// Price of the base asset denominated in the quote asset, scaled by
/// [`SCALE`]: `reserve_quote * SCALE / reserve_base`.
///
/// # Errors
///
/// Returns [`PoolError::ArithmeticOverflow`] if the scaled reserve does not
/// fit in 256 bits. A zero `reserve_base` yields `Ok(None)`; the caller
/// decides which asset to blame.
pub fn spot_price(reserve_base: U256, reserve_quote: U256) -> Result<Option<U256>, PoolError> {
    if reserve_base.is_zero() {
        return Ok(None);
    }
    let scaled = reserve_quote
        .checked_mul(SCALE)
        .ok_or(PoolError::ArithmeticOverflow)?;
    Ok(Some(scaled / reserve_base))
}

/// Swap fee in basis points of the input amount.
#[must_use]
pub fn fee_bps() -> u32 {
    let bps = (FEE_DENOMINATOR - FEE_NUMERATOR) * BPS / FEE_DENOMINATOR;
    u32::try_from(bps).unwrap_or(u32::MAX)
}

/// The product `reserve_a * reserve_b` in 512 bits, which cannot overflow.
#[must_use]
pub fn invariant(reserve_a: U256, reserve_b: U256) -> U512 {
    reserve_a.widening_mul(reserve_b)
}

/// Relative change from `old` to `new` in basis points, saturating at the
/// bounds of `i64`. Returns 0 when `old` is zero.
#[must_use]
pub fn price_change_bps(old: U256, new: U256) -> i64 {
    if old.is_zero() {
        return 0;
    }
    let (delta, negative) = if new >= old {
        (new - old, false)
    } else {
        (old - new, true)
    };
    let magnitude = delta
        .checked_mul(BPS)
        .map_or(U256::from(u64::MAX), |scaled| scaled / old);
    let magnitude = u64::try_from(magnitude)
        .ok()
        .and_then(|m| i64::try_from(m).ok())
        .unwrap_or(i64::MAX);
    if negative { -magnitude } else { magnitude }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    #[test]
    fn amount_out_matches_reference_trade() {
        // 10 * 997 * 200 / (100 * 1000 + 9970) = 1_994_000 / 109_970 = 18
        assert_eq!(amount_out(u(10), u(100), u(200)), Ok(u(18)));
    }

    #[test]
    fn amount_out_rejects_zero_input() {
        assert_eq!(
            amount_out(U256::ZERO, u(100), u(200)),
            Err(PoolError::InvalidAmount)
        );
    }

    #[test]
    fn amount_out_rejects_dust_output() {
        assert_eq!(
            amount_out(u(1), u(1_000), u(1)),
            Err(PoolError::InsufficientOutput)
        );
    }

    #[test]
    fn amount_out_on_empty_pool_is_insufficient() {
        assert_eq!(
            amount_out(u(1_000), U256::ZERO, U256::ZERO),
            Err(PoolError::InsufficientOutput)
        );
    }

    #[test]
    fn amount_out_overflow_is_reported() {
        assert_eq!(
            amount_out(U256::MAX, u(1), u(1)),
            Err(PoolError::ArithmeticOverflow)
        );
    }

    #[test]
    fn fee_is_three_tenths_of_a_percent() {
        assert_eq!(fee_amount(u(1_000)), u(3));
        assert_eq!(fee_amount(u(10)), u(1));
        assert_eq!(fee_amount(U256::ZERO), U256::ZERO);
        assert!(fee_amount(U256::MAX) <= U256::MAX / u(333));
    }

    #[test]
    fn spot_price_scales_by_1e18() {
        let price = spot_price(u(100), u(200));
        assert_eq!(price, Ok(Some(u(2) * SCALE)));
        assert_eq!(spot_price(U256::ZERO, u(200)), Ok(None));
    }

    #[test]
    fn invariant_does_not_overflow() {
        assert_eq!(invariant(u(3), u(4)), U512::from(12u64));
        assert!(invariant(U256::MAX, U256::MAX) > U512::from(u64::MAX));
    }

    #[test]
    fn price_change_in_bps() {
        assert_eq!(price_change_bps(u(100), u(110)), 1_000);
        assert_eq!(price_change_bps(u(100), u(95)), -500);
        assert_eq!(price_change_bps(U256::ZERO, u(95)), 0);
    }
}
