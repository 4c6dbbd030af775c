//! Money helpers over `rust_decimal::Decimal`.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are stored with two decimal places and rounded with
//! Banker's Rounding (round half to even).

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places stored for monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a `NUMERIC(14,2)` money column holds.
// 99_999_999_999_999 with scale 2 (`Decimal::new` is not const).
pub const MAX_MONEY: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, MONEY_SCALE);

/// Rounds an amount to the money scale using Banker's Rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Returns `amount`, or zero when it is negative.
#[must_use]
pub fn clamp_non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}

/// Returns true if the amount is stored without loss: at most two decimal
/// places and within [`MAX_MONEY`].
#[must_use]
pub fn fits_money_column(amount: Decimal) -> bool {
    amount.abs() <= MAX_MONEY && amount.normalize().scale() <= MONEY_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(10.005), dec!(10.00))]
    #[case(dec!(10.015), dec!(10.02))]
    #[case(dec!(33.3333333), dec!(33.33))]
    #[case(dec!(66.666666), dec!(66.67))]
    #[case(dec!(12), dec!(12))]
    fn test_round_money(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_money(input), expected);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(clamp_non_negative(dec!(-0.01)), Decimal::ZERO);
        assert_eq!(clamp_non_negative(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(clamp_non_negative(dec!(15.50)), dec!(15.50));
    }

    #[rstest]
    #[case(dec!(10.50), true)]
    #[case(dec!(10.500), true)]
    #[case(dec!(0.001), false)]
    #[case(dec!(0.004), false)]
    #[case(dec!(999999999999.99), true)]
    #[case(dec!(1000000000000.00), false)]
    #[case(Decimal::MAX, false)]
    fn test_fits_money_column(#[case] amount: Decimal, #[case] fits: bool) {
        assert_eq!(fits_money_column(amount), fits);
    }
}
