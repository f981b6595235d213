//! Money rounding helpers shared by the statistics and settlement passes.
//!
//! Balances accumulate at full `rust_decimal` precision; the canonical
//! two-decimal rounding rule is applied only when classifying a member as
//! creditor or debitor, never to the raw balance map itself.

use rust_decimal::{Decimal, RoundingStrategy};

/// Tolerance used when checking that a balance map sums to zero.
pub fn balance_tolerance() -> Decimal {
    Decimal::new(1, 9)
}

/// Rounds to two decimal places, half away from zero.
///
/// The absolute value is rounded and the sign restored, so positive and
/// negative balances of equal magnitude classify symmetrically:
/// `round2(0.005) == 0.01` and `round2(-0.005) == -0.01`.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `true` if `balance` rounds to zero at two decimal places.
pub fn is_settled(balance: Decimal) -> bool {
    round2(balance).is_zero()
}
