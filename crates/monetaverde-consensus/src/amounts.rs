//! Amount formatting, parsing and canonical decomposition.

use crate::currency::Currency;
use crate::error::{CurrencyError, CurrencyResult};

/// Every canonical output denomination: `d * 10^k` for `d` in 1..=9,
/// plus the lone `10^19` that still fits into 64 bits.
pub const PRETTY_AMOUNTS: [u64; 172] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9,
    10, 20, 30, 40, 50, 60, 70, 80, 90,
    100, 200, 300, 400, 500, 600, 700, 800, 900,
    1_000, 2_000, 3_000, 4_000, 5_000, 6_000, 7_000, 8_000, 9_000,
    10_000, 20_000, 30_000, 40_000, 50_000, 60_000, 70_000, 80_000, 90_000,
    100_000, 200_000, 300_000, 400_000, 500_000, 600_000, 700_000, 800_000, 900_000,
    1_000_000, 2_000_000, 3_000_000, 4_000_000, 5_000_000, 6_000_000, 7_000_000, 8_000_000,
    9_000_000,
    10_000_000, 20_000_000, 30_000_000, 40_000_000, 50_000_000, 60_000_000, 70_000_000,
    80_000_000, 90_000_000,
    100_000_000, 200_000_000, 300_000_000, 400_000_000, 500_000_000, 600_000_000, 700_000_000,
    800_000_000, 900_000_000,
    1_000_000_000, 2_000_000_000, 3_000_000_000, 4_000_000_000, 5_000_000_000, 6_000_000_000,
    7_000_000_000, 8_000_000_000, 9_000_000_000,
    10_000_000_000, 20_000_000_000, 30_000_000_000, 40_000_000_000, 50_000_000_000,
    60_000_000_000, 70_000_000_000, 80_000_000_000, 90_000_000_000,
    100_000_000_000, 200_000_000_000, 300_000_000_000, 400_000_000_000, 500_000_000_000,
    600_000_000_000, 700_000_000_000, 800_000_000_000, 900_000_000_000,
    1_000_000_000_000, 2_000_000_000_000, 3_000_000_000_000, 4_000_000_000_000,
    5_000_000_000_000, 6_000_000_000_000, 7_000_000_000_000, 8_000_000_000_000,
    9_000_000_000_000,
    10_000_000_000_000, 20_000_000_000_000, 30_000_000_000_000, 40_000_000_000_000,
    50_000_000_000_000, 60_000_000_000_000, 70_000_000_000_000, 80_000_000_000_000,
    90_000_000_000_000,
    100_000_000_000_000, 200_000_000_000_000, 300_000_000_000_000, 400_000_000_000_000,
    500_000_000_000_000, 600_000_000_000_000, 700_000_000_000_000, 800_000_000_000_000,
    900_000_000_000_000,
    1_000_000_000_000_000, 2_000_000_000_000_000, 3_000_000_000_000_000, 4_000_000_000_000_000,
    5_000_000_000_000_000, 6_000_000_000_000_000, 7_000_000_000_000_000, 8_000_000_000_000_000,
    9_000_000_000_000_000,
    10_000_000_000_000_000, 20_000_000_000_000_000, 30_000_000_000_000_000,
    40_000_000_000_000_000, 50_000_000_000_000_000, 60_000_000_000_000_000,
    70_000_000_000_000_000, 80_000_000_000_000_000, 90_000_000_000_000_000,
    100_000_000_000_000_000, 200_000_000_000_000_000, 300_000_000_000_000_000,
    400_000_000_000_000_000, 500_000_000_000_000_000, 600_000_000_000_000_000,
    700_000_000_000_000_000, 800_000_000_000_000_000, 900_000_000_000_000_000,
    1_000_000_000_000_000_000, 2_000_000_000_000_000_000, 3_000_000_000_000_000_000,
    4_000_000_000_000_000_000, 5_000_000_000_000_000_000, 6_000_000_000_000_000_000,
    7_000_000_000_000_000_000, 8_000_000_000_000_000_000, 9_000_000_000_000_000_000,
    10_000_000_000_000_000_000,
];

/// Decimal-digit decomposition of `amount`.
///
/// Chunks are one significant digit each, emitted in ascending order; the
/// run of low chunks below `dust_threshold` is folded into one leading
/// dust element. The result always sums to `amount`.
pub fn decompose_amount(amount: u64, dust_threshold: u64) -> Vec<u64> {
    let mut decomposed = Vec::new();
    let mut rest = amount;
    let mut order = 1u64;
    let mut dust = 0u64;
    let mut dust_handled = false;
    while rest != 0 {
        let chunk = (rest % 10) * order;
        rest /= 10;
        order = order.saturating_mul(10);
        if !dust_handled && chunk < dust_threshold {
            dust += chunk;
        } else {
            if !dust_handled {
                if dust != 0 {
                    decomposed.push(dust);
                }
                dust_handled = true;
            }
            if chunk != 0 {
                decomposed.push(chunk);
            }
        }
    }
    // every digit stayed below the threshold: the amount is pure dust
    if !dust_handled && dust != 0 {
        decomposed.push(dust);
    }
    decomposed
}

impl Currency {
    /// Render an atomic amount with the configured decimal point.
    pub fn format_amount(&self, amount: u64) -> String {
        let mut s = amount.to_string();
        let width = self.number_of_decimal_places + 1;
        if s.len() < width {
            s.insert_str(0, &"0".repeat(width - s.len()));
        }
        s.insert(s.len() - self.number_of_decimal_places, '.');
        s
    }

    /// Render a signed amount (emission changes, fee deltas).
    pub fn format_signed_amount(&self, amount: i64) -> String {
        let s = self.format_amount(amount.unsigned_abs());
        if amount < 0 {
            format!("-{s}")
        } else {
            s
        }
    }

    /// Parse a decimal amount string into atomic units.
    ///
    /// Whitespace is trimmed and redundant fractional zeros are dropped;
    /// anything beyond the configured precision is an error, as is a
    /// value that does not fit 64 bits.
    pub fn parse_amount(&self, input: &str) -> CurrencyResult<u64> {
        let trimmed = input.trim();
        let mut s = trimmed.to_string();

        let mut fraction = 0usize;
        if let Some(point) = s.find('.') {
            fraction = s.len() - point - 1;
            while fraction > self.number_of_decimal_places && s.ends_with('0') {
                s.pop();
                fraction -= 1;
            }
            if fraction > self.number_of_decimal_places {
                return Err(CurrencyError::Parse(format!(
                    "amount '{trimmed}' has more than {} fractional digits",
                    self.number_of_decimal_places
                )));
            }
            s.remove(point);
        }

        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CurrencyError::Parse(format!(
                "amount '{trimmed}' is not a decimal number"
            )));
        }

        if fraction < self.number_of_decimal_places {
            s.push_str(&"0".repeat(self.number_of_decimal_places - fraction));
        }

        s.parse::<u64>()
            .map_err(|_| CurrencyError::Parse(format!("amount '{trimmed}' is out of range")))
    }

    /// Whether `amount` can serve as a fusion input under `threshold`;
    /// returns the power-of-ten bucket of the denomination when it can.
    pub fn is_amount_applicable_in_fusion_transaction_input(
        &self,
        amount: u64,
        threshold: u64,
    ) -> Option<u8> {
        if amount >= threshold || amount < self.default_dust_threshold {
            return None;
        }
        let index = PRETTY_AMOUNTS.binary_search(&amount).ok()?;
        Some((index / 9) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyBuilder;
    use proptest::prelude::*;

    fn currency() -> Currency {
        CurrencyBuilder::new().build().unwrap()
    }

    #[test]
    fn pretty_amounts_table_shape() {
        assert_eq!(PRETTY_AMOUNTS.len(), 172);
        assert_eq!(PRETTY_AMOUNTS[0], 1);
        assert_eq!(PRETTY_AMOUNTS[171], 10_000_000_000_000_000_000);
        assert!(PRETTY_AMOUNTS.windows(2).all(|w| w[0] < w[1]));
        for (i, &amount) in PRETTY_AMOUNTS.iter().enumerate().take(171) {
            let digit = (i % 9 + 1) as u64;
            assert_eq!(amount, digit * 10u64.pow((i / 9) as u32));
        }
    }

    #[test]
    fn format_amount_literals() {
        let c = currency();
        assert_eq!(c.format_amount(1), "0.000000000001");
        assert_eq!(c.format_amount(1_000_000_000_000), "1.000000000000");
        assert_eq!(c.format_amount(0), "0.000000000000");
        assert_eq!(c.format_signed_amount(-500_000_000_000), "-0.500000000000");
        assert_eq!(c.format_signed_amount(500_000_000_000), "0.500000000000");
    }

    #[test]
    fn parse_amount_literals() {
        let c = currency();
        assert_eq!(c.parse_amount("1.5").unwrap(), 1_500_000_000_000);
        assert_eq!(c.parse_amount("  1.5  ").unwrap(), 1_500_000_000_000);
        assert_eq!(c.parse_amount("12").unwrap(), 12_000_000_000_000);
        assert_eq!(c.parse_amount("0.000000000001").unwrap(), 1);
        // thirteen fractional digits, but the tail zeros are redundant
        assert_eq!(c.parse_amount("1.5000000000000").unwrap(), 1_500_000_000_000);
        // a significant thirteenth digit is not representable
        assert!(c.parse_amount("0.0000000000001").is_err());
    }

    #[test]
    fn parse_amount_rejects_malformed() {
        let c = currency();
        for bad in ["", ".", "1.2.3", "abc", "1,5", "-1", "1e3"] {
            assert!(c.parse_amount(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn parse_amount_range() {
        let c = currency();
        assert_eq!(
            c.parse_amount("18446744.073709551615").unwrap(),
            u64::MAX
        );
        assert!(c.parse_amount("18446744.073709551616").is_err());
    }

    #[test]
    fn decompose_sums_and_orders() {
        // no dust: one chunk per significant digit, ascending
        assert_eq!(
            decompose_amount(120_000_000, 1_000_000),
            vec![20_000_000, 100_000_000]
        );
        // low digits fold into a single leading dust element
        assert_eq!(
            decompose_amount(1_234_567, 1_000_000),
            vec![234_567, 1_000_000]
        );
        assert_eq!(decompose_amount(0, 1_000_000), Vec::<u64>::new());
        // everything below the threshold is one dust output
        assert_eq!(decompose_amount(999, 1_000_000), vec![999]);
    }

    #[test]
    fn fusion_input_applicability() {
        let c = currency();
        assert_eq!(
            c.is_amount_applicable_in_fusion_transaction_input(10_000_000, 100_000_000),
            Some(7)
        );
        assert_eq!(
            c.is_amount_applicable_in_fusion_transaction_input(9_000_000, 100_000_000),
            Some(6)
        );
        // at or above the threshold
        assert_eq!(
            c.is_amount_applicable_in_fusion_transaction_input(100_000_000, 100_000_000),
            None
        );
        // below the dust threshold
        assert_eq!(
            c.is_amount_applicable_in_fusion_transaction_input(900, 100_000_000),
            None
        );
        // not a canonical denomination
        assert_eq!(
            c.is_amount_applicable_in_fusion_transaction_input(1_500_000, 100_000_000),
            None
        );
    }

    proptest! {
        #[test]
        fn format_parse_round_trip(amount in any::<u64>()) {
            let c = currency();
            prop_assert_eq!(c.parse_amount(&c.format_amount(amount)).unwrap(), amount);
        }

        #[test]
        fn decompose_preserves_sum(amount in any::<u64>(), dust_threshold in 1u64..10_000_000) {
            let parts = decompose_amount(amount, dust_threshold);
            let sum: u128 = parts.iter().map(|&p| u128::from(p)).sum();
            prop_assert_eq!(sum, u128::from(amount));

            // each part is canonical, or the single leading dust residue;
            // a pure-dust amount comes back as its own single element
            for (i, &part) in parts.iter().enumerate() {
                let pretty = PRETTY_AMOUNTS.binary_search(&part).is_ok();
                let dust = i == 0 && (part < dust_threshold || parts.len() == 1);
                prop_assert!(pretty || dust);
            }
        }
    }
}
