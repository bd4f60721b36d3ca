//! Helpers for moving between raw on-chain balances and token amounts.

use {crate::conversions::u256_to_big_int, alloy::primitives::U256, bigdecimal::BigDecimal};

/// Returns `10^decimals`, one whole unit of a token in its raw representation.
pub fn decimal_multiplier(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

/// Scales a raw balance by the token's decimals. The result is exact since
/// this only shifts the decimal point.
pub fn token_amount(raw: &U256, decimals: u8) -> BigDecimal {
    BigDecimal::new(u256_to_big_int(raw), i64::from(decimals))
}

#[cfg(test)]
mod tests {
    use {super::*, std::str::FromStr};

    #[test]
    fn decimal_multiplier_scales_by_power_of_ten() {
        assert_eq!(decimal_multiplier(0), U256::from(1u64));
        assert_eq!(decimal_multiplier(6), U256::from(1_000_000u64));
        assert_eq!(
            decimal_multiplier(18),
            U256::from(1_000_000_000_000_000_000u64)
        );
    }

    #[test]
    fn token_amount_shifts_decimal_point() {
        assert_eq!(
            token_amount(&U256::from(1_500_000u64), 6),
            BigDecimal::from_str("1.5").unwrap()
        );
        assert_eq!(
            token_amount(&U256::from(1_500_000u64), 0),
            BigDecimal::from(1_500_000)
        );
        // More decimals than digits still yields an exact fraction.
        assert_eq!(
            token_amount(&U256::from(5u64), 18),
            BigDecimal::from_str("0.000000000000000005").unwrap()
        );
    }
}
