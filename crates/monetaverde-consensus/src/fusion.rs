//! Fusion transaction recognition.
//!
//! A fusion transaction consolidates many dust-free inputs into exactly
//! the canonical decomposition of their sum. Recognition is structural:
//! amounts and encoded size only, no chain lookups.

use crate::amounts::decompose_amount;
use crate::currency::Currency;
use monetaverde_types::{Transaction, TransactionInput};

impl Currency {
    /// Classify from input/output amounts and the encoded size. Output
    /// amounts must be in ascending order, as consensus requires of a
    /// fusion transaction.
    pub fn is_fusion_amounts(
        &self,
        input_amounts: &[u64],
        output_amounts: &[u64],
        size: usize,
    ) -> bool {
        if size > self.fusion_tx_max_size {
            return false;
        }
        if input_amounts.len() < self.fusion_tx_min_input_count {
            return false;
        }
        if input_amounts.len() < output_amounts.len() * self.fusion_tx_min_in_out_count_ratio {
            return false;
        }

        let mut input_total: u64 = 0;
        for &amount in input_amounts {
            if amount < self.default_dust_threshold {
                return false;
            }
            input_total = match input_total.checked_add(amount) {
                Some(total) => total,
                None => return false,
            };
        }

        let mut expected = decompose_amount(input_total, self.default_dust_threshold);
        expected.sort_unstable();
        expected == output_amounts
    }

    /// Classify a full transaction given its encoded size.
    pub fn is_fusion_transaction(&self, transaction: &Transaction, size: usize) -> bool {
        let input_amounts: Vec<u64> = transaction
            .inputs
            .iter()
            .filter_map(|input| match input {
                TransactionInput::Key(key_input) => Some(key_input.amount),
                TransactionInput::Base(_) => None,
            })
            .collect();
        let output_amounts: Vec<u64> = transaction
            .outputs
            .iter()
            .map(|output| output.amount)
            .collect();
        self.is_fusion_amounts(&input_amounts, &output_amounts, size)
    }
}
