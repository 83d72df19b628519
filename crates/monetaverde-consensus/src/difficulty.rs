//! Difficulty retargeting.
//!
//! Four algorithm generations, dispatched on block major version: the
//! original sorted-window retarget for v1 and v2, then two linearly
//! weighted moving averages after Zawy's reference algorithm for v3 and
//! v4. The legacy retarget sorts timestamps and cuts outliers; the LWMA
//! variants consume solve-time deltas in chain order and clamp them
//! instead. That difference is consensus-critical, as are the IEEE-754
//! double products behind the LWMA aimed target.

use crate::currency::Currency;
use crate::params;

/// 64-bit work target; expected hash attempts to find a block.
pub type Difficulty = u64;

/// Widening 64x64 multiply returning `(low, high)`. A non-zero high half
/// is treated as overflow by every caller.
#[inline]
pub(crate) fn mul128(a: u64, b: u64) -> (u64, u64) {
    let product = u128::from(a) * u128::from(b);
    (product as u64, (product >> 64) as u64)
}

impl Currency {
    /// Target difficulty for the next block from the recent window of
    /// timestamps and cumulative difficulties. Never returns less than 1;
    /// the per-version routines below surface overflow as 0 for callers
    /// that need to distinguish it.
    pub fn next_difficulty(
        &self,
        version: u8,
        timestamps: Vec<u64>,
        cumulative_difficulties: Vec<Difficulty>,
    ) -> Difficulty {
        let next = if version >= params::BLOCK_MAJOR_VERSION_4 {
            self.next_difficulty_v4(timestamps, cumulative_difficulties)
        } else if version == params::BLOCK_MAJOR_VERSION_3 {
            self.next_difficulty_v3(timestamps, cumulative_difficulties)
        } else if version == params::BLOCK_MAJOR_VERSION_2 {
            self.next_difficulty_v2(timestamps, cumulative_difficulties)
        } else {
            self.next_difficulty_v1(timestamps, cumulative_difficulties)
        };
        next.max(1)
    }

    /// Original retarget over the v1 window.
    pub fn next_difficulty_v1(
        &self,
        timestamps: Vec<u64>,
        cumulative_difficulties: Vec<Difficulty>,
    ) -> Difficulty {
        self.legacy_retarget(
            timestamps,
            cumulative_difficulties,
            self.difficulty_window,
            self.difficulty_cut,
        )
    }

    /// Same shape as v1, over the v2 window.
    pub fn next_difficulty_v2(
        &self,
        timestamps: Vec<u64>,
        cumulative_difficulties: Vec<Difficulty>,
    ) -> Difficulty {
        self.legacy_retarget(
            timestamps,
            cumulative_difficulties,
            self.difficulty_window_v2,
            self.difficulty_cut,
        )
    }

    /// Sort timestamps, cut `cut` outliers from both ends, then spread
    /// the cut window's total work over its timespan.
    fn legacy_retarget(
        &self,
        mut timestamps: Vec<u64>,
        mut cumulative_difficulties: Vec<Difficulty>,
        window: usize,
        cut: usize,
    ) -> Difficulty {
        debug_assert!(window >= 2 && 2 * cut <= window - 2);
        if timestamps.len() > window {
            timestamps.truncate(window);
            cumulative_difficulties.truncate(window);
        }
        let length = timestamps.len();
        debug_assert_eq!(length, cumulative_difficulties.len());
        if length <= 1 {
            return 1;
        }

        timestamps.sort_unstable();
        let (cut_begin, cut_end) = if length <= window - 2 * cut {
            (0, length)
        } else {
            let cut_begin = (length - (window - 2 * cut) + 1) / 2;
            (cut_begin, cut_begin + (window - 2 * cut))
        };
        let time_span = (timestamps[cut_end - 1] - timestamps[cut_begin]).max(1);
        let total_work = cumulative_difficulties[cut_end - 1] - cumulative_difficulties[cut_begin];

        let (low, high) = mul128(total_work, self.difficulty_target);
        if high != 0 || low.checked_add(time_span - 1).is_none() {
            return 0;
        }
        (low + time_span - 1) / time_span
    }

    /// LWMA with symmetric solve-time clamps of -5 and +6 targets.
    pub fn next_difficulty_v3(
        &self,
        mut timestamps: Vec<u64>,
        mut cumulative_difficulties: Vec<Difficulty>,
    ) -> Difficulty {
        let window = self.difficulty_window_by_block_version(params::BLOCK_MAJOR_VERSION_3);
        let target = self.difficulty_target as i64;
        if timestamps.len() > window {
            timestamps.truncate(window);
            cumulative_difficulties.truncate(window);
        }
        let length = timestamps.len();
        debug_assert_eq!(length, cumulative_difficulties.len());
        if length <= 1 {
            return 1;
        }

        let mut weighted_solve_times: i64 = 0;
        for i in 1..length {
            let solve_time =
                (timestamps[i] as i64 - timestamps[i - 1] as i64).clamp(-5 * target, 6 * target);
            weighted_solve_times += solve_time * i as i64;
        }
        let min_weighted = (target * length as i64 * (length as i64 + 1) / 8).max(1);
        if weighted_solve_times < min_weighted {
            weighted_solve_times = min_weighted;
        }

        let total_work = cumulative_difficulties[length - 1] - cumulative_difficulties[0];
        let aimed_target =
            (0.9909 * ((length + 1) as f64 / 2.0) * self.difficulty_target as f64) as u64;
        let (low, high) = mul128(total_work, aimed_target);
        if high != 0 {
            return 0;
        }
        low / weighted_solve_times as u64
    }

    /// LWMA clamping only from below, at the block future time limit.
    pub fn next_difficulty_v4(
        &self,
        mut timestamps: Vec<u64>,
        mut cumulative_difficulties: Vec<Difficulty>,
    ) -> Difficulty {
        let window = self.difficulty_window_by_block_version(params::BLOCK_MAJOR_VERSION_4);
        let target = self.difficulty_target as i64;
        if timestamps.len() > window {
            timestamps.truncate(window);
            cumulative_difficulties.truncate(window);
        }
        let length = timestamps.len();
        debug_assert_eq!(length, cumulative_difficulties.len());
        if length <= 1 {
            return 1;
        }

        let mut weighted_solve_times: i64 = 0;
        for i in 1..length {
            let solve_time = (timestamps[i] as i64 - timestamps[i - 1] as i64)
                .max(-(self.block_future_time_limit as i64));
            weighted_solve_times += solve_time * i as i64;
        }
        let min_weighted = (target * length as i64 * (length as i64 - 1) / 8).max(1);
        if weighted_solve_times < min_weighted {
            weighted_solve_times = min_weighted;
        }

        let total_work = cumulative_difficulties[length - 1] - cumulative_difficulties[0];
        let aimed_target = (0.9909 * (length as f64 / 2.0) * self.difficulty_target as f64) as u64;
        let (low, high) = mul128(total_work, aimed_target);
        if high != 0 {
            return 0;
        }
        low / weighted_solve_times as u64
    }
}
