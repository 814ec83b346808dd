//! Factor-based, half-away-from-zero rounding (§4.1). Every stage that
//! produces a quantity or percentage must round through these two helpers so
//! recorded test values stay reproducible across rewrites of this crate.

use rust_decimal::Decimal;

/// Rounds to 4 fractional digits: `round(x * 10^4) / 10^4`, half-away-from-zero.
pub fn round4(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to 2 fractional digits (percentages).
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}
