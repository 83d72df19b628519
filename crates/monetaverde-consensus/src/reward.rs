//! Block reward computation.
//!
//! The base reward is a fixed-point base-2 logarithm of the block
//! difficulty, so harder chains mint more per block. The classic
//! quadratic size penalty then scales the reward down between the median
//! block size and twice the median.

use crate::currency::Currency;
use crate::difficulty::Difficulty;
use crate::error::{CurrencyError, CurrencyResult};
use crate::params;
use tracing::debug;

/// Fraction bits of [`log2_fix`].
pub const LOG_FIX_PRECISION: u32 = 20;

/// `floor(log2(x) * 2^20)` for `x` in 2^20 fixed point.
///
/// Shifts the integer part out first, then squares the mantissa once per
/// fraction bit. `x` must be non-zero.
pub fn log2_fix(mut x: u64) -> u64 {
    debug_assert!(x != 0);

    let mut b = 1u64 << (LOG_FIX_PRECISION - 1);
    let mut y = 0u64;

    while x >= 2 << LOG_FIX_PRECISION {
        x >>= 1;
        y += 1 << LOG_FIX_PRECISION;
    }

    // x < 2^21 here, so z * z stays inside 64 bits
    let mut z = x;
    for _ in 0..LOG_FIX_PRECISION {
        z = (z * z) >> LOG_FIX_PRECISION;
        if z >= 2 << LOG_FIX_PRECISION {
            z >>= 1;
            y += b;
        }
        b >>= 1;
    }

    y
}

/// Quadratic block-size penalty.
///
/// Full `amount` up to the median, zero at twice the median, and
/// `amount * (2*median - current) * current / median^2` in between.
/// Block sizes stay far below 2^32, so the 128-bit product cannot
/// overflow.
pub fn penalized_amount(amount: u64, median_size: usize, current_block_size: usize) -> u64 {
    debug_assert!(current_block_size <= 2 * median_size);
    if amount == 0 {
        return 0;
    }
    if current_block_size <= median_size {
        return amount;
    }

    let median = median_size as u128;
    let current = current_block_size as u128;
    let product = u128::from(amount) * ((2 * median - current) * current);
    (product / (median * median)) as u64
}

impl Currency {
    /// Reward and emission change for a block of `current_block_size`
    /// against the rolling `median_size`.
    ///
    /// Fees are penalized alongside the base reward from major version 3.
    /// The supply argument is accepted for interface stability; the base
    /// reward is a function of difficulty alone.
    pub fn get_block_reward(
        &self,
        block_major_version: u8,
        median_size: usize,
        current_block_size: usize,
        _already_generated_coins: u128,
        fee: u64,
        difficulty: Difficulty,
    ) -> CurrencyResult<(u64, i64)> {
        if difficulty == 0 || difficulty >= 1u64 << (64 - LOG_FIX_PRECISION) {
            return Err(CurrencyError::InvalidParameter {
                name: "difficulty",
                reason: format!("{difficulty} is outside the representable reward range"),
            });
        }
        let base_reward = log2_fix(difficulty << LOG_FIX_PRECISION) << LOG_FIX_PRECISION;

        let full_reward_zone =
            self.block_granted_full_reward_zone_by_block_version(block_major_version);
        let median_size = median_size.max(full_reward_zone);
        if current_block_size > 2 * median_size {
            debug!(
                current_block_size,
                limit = 2 * median_size,
                "block cumulative size is too big"
            );
            return Err(CurrencyError::BlockTooBig {
                actual: current_block_size,
                limit: 2 * median_size,
            });
        }

        let penalized_base_reward = penalized_amount(base_reward, median_size, current_block_size);
        let penalized_fee = if block_major_version >= params::BLOCK_MAJOR_VERSION_3 {
            penalized_amount(fee, median_size, current_block_size)
        } else {
            fee
        };

        let reward = penalized_base_reward + penalized_fee;
        let emission_change = penalized_base_reward as i64 - (fee - penalized_fee) as i64;
        Ok((reward, emission_change))
    }

    /// Hard cap on a block's cumulative size at `height`; grows linearly
    /// from the initial limit.
    pub fn max_block_cumulative_size(&self, height: u64) -> usize {
        self.max_block_size_initial
            + ((height * self.max_block_size_growth_speed_numerator)
                / self.max_block_size_growth_speed_denominator) as usize
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
    fn log2_fix_powers_of_two() {
        assert_eq!(log2_fix(1 << 20), 0);
        assert_eq!(log2_fix(2 << 20), 1 << 20);
        assert_eq!(log2_fix(4 << 20), 2 << 20);
        assert_eq!(log2_fix(1 << 40), 20 << 20);
    }

    #[test]
    fn log2_fix_is_monotonic_between_anchors() {
        let three = log2_fix(3 << 20);
        assert!(three > 1 << 20 && three < 2 << 20);
        // floor(log2(3) * 2^20), within truncation error of the exact value
        let exact = (3f64.log2() * f64::from(1u32 << 20)) as u64;
        assert!(three.abs_diff(exact) <= 1, "{three} vs {exact}");
    }

    #[test]
    fn penalty_endpoints() {
        let reward = 10_000_000_000u64;
        assert_eq!(penalized_amount(reward, 20_000, 0), reward);
        assert_eq!(penalized_amount(reward, 20_000, 20_000), reward);
        assert_eq!(penalized_amount(reward, 20_000, 40_000), 0);
        assert_eq!(penalized_amount(0, 20_000, 30_000), 0);
    }

    #[test]
    fn penalty_midpoint() {
        // (2m - c) * c / m^2 = 0.75 at c = 1.5m
        assert_eq!(penalized_amount(1_000_000, 20_000, 30_000), 750_000);
    }

    #[test]
    fn reward_from_difficulty() {
        let c = currency();
        // difficulty 2: log2(2 * 2^20) in 20-bit fixed point is 1 << 20
        let (reward, emission) = c.get_block_reward(1, 0, 0, 0, 0, 2).unwrap();
        assert_eq!(reward, 1u64 << 40);
        assert_eq!(emission, 1i64 << 40);

        // difficulty 1 yields a zero base reward, not an error
        let (reward, emission) = c.get_block_reward(1, 0, 0, 0, 0, 1).unwrap();
        assert_eq!(reward, 0);
        assert_eq!(emission, 0);
    }

    #[test]
    fn reward_rejects_out_of_range_difficulty() {
        let c = currency();
        assert!(matches!(
            c.get_block_reward(1, 0, 0, 0, 0, 0),
            Err(CurrencyError::InvalidParameter { name: "difficulty", .. })
        ));
        assert!(c.get_block_reward(1, 0, 0, 0, 0, 1u64 << 44).is_err());
        assert!(c.get_block_reward(1, 0, 0, 0, 0, (1u64 << 44) - 1).is_ok());
    }

    #[test]
    fn reward_rejects_oversized_block() {
        let c = currency();
        // the median is floored at the full reward zone (20_000)
        let result = c.get_block_reward(1, 0, 40_001, 0, 0, 2);
        assert!(matches!(
            result,
            Err(CurrencyError::BlockTooBig {
                actual: 40_001,
                limit: 40_000
            })
        ));
        assert!(c.get_block_reward(1, 0, 40_000, 0, 0, 2).is_ok());
    }

    #[test]
    fn fee_is_untouched_before_v3() {
        let c = currency();
        let fee = 1_000_000u64;
        let base = 1u64 << 40;
        let penalized_base = penalized_amount(base, 20_000, 30_000);

        let (reward_v2, emission_v2) = c.get_block_reward(2, 0, 30_000, 0, fee, 2).unwrap();
        assert_eq!(reward_v2, penalized_base + fee);
        assert_eq!(emission_v2, penalized_base as i64);

        let (reward_v3, emission_v3) = c.get_block_reward(3, 0, 30_000, 0, fee, 2).unwrap();
        let penalized_fee = penalized_amount(fee, 20_000, 30_000);
        assert_eq!(reward_v3, penalized_base + penalized_fee);
        assert_eq!(
            emission_v3,
            penalized_base as i64 - (fee - penalized_fee) as i64
        );
    }

    #[test]
    fn reward_zone_dispatch() {
        let c = CurrencyBuilder::new()
            .block_granted_full_reward_zone_v1(10_000)
            .build()
            .unwrap();
        // v1 median floors at 10_000, so 25_000 overflows twice the median
        assert!(c.get_block_reward(1, 0, 25_000, 0, 0, 2).is_err());
        // v2 floors at 20_000 and accepts the same block
        assert!(c.get_block_reward(2, 0, 25_000, 0, 0, 2).is_ok());
    }

    #[test]
    fn max_cumulative_size_growth() {
        let c = currency();
        assert_eq!(c.max_block_cumulative_size(0), 1_000_000);
        // one year of blocks adds the full numerator
        assert_eq!(c.max_block_cumulative_size(525_600), 1_000_000 + 102_400);
    }

    proptest! {
        #[test]
        fn penalty_is_monotonic_in_block_size(
            amount in 1u64..=u64::MAX / 2,
            median in 1usize..=1_000_000,
            step in 0usize..=1_000_000,
        ) {
            let median = median.max(1);
            let current = median + step.min(median);
            let next = (current + 1).min(2 * median);
            let here = penalized_amount(amount, median, current);
            let there = penalized_amount(amount, median, next);
            prop_assert!(there <= here);
            prop_assert!(here <= amount);
        }
    }
}
