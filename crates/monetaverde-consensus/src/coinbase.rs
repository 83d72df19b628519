//! Miner (coinbase) transaction construction.

use crate::amounts::decompose_amount;
use crate::currency::Currency;
use crate::difficulty::Difficulty;
use crate::error::{CurrencyError, CurrencyResult};
use crate::params;
use monetaverde_types::{
    extra, AccountPublicAddress, BaseInput, KeyOps, KeyOutput, Transaction, TransactionInput,
    TransactionOutput, TransactionOutputTarget,
};
use tracing::debug;

impl Currency {
    /// Build the miner transaction for a new block template.
    ///
    /// The block reward is decomposed into canonical denominations,
    /// folded down to at most `max_outs` outputs, and paid to one-time
    /// keys derived for `miner_address` from a fresh transaction key.
    /// The coinbase unlocks `mined_money_unlock_window` blocks after
    /// `height`.
    #[allow(clippy::too_many_arguments)]
    pub fn construct_miner_tx<K: KeyOps>(
        &self,
        key_ops: &K,
        block_major_version: u8,
        height: u32,
        median_size: usize,
        already_generated_coins: u128,
        current_block_size: usize,
        fee: u64,
        miner_address: &AccountPublicAddress,
        extra_nonce: &[u8],
        max_outs: usize,
        difficulty: Difficulty,
    ) -> CurrencyResult<Transaction> {
        let tx_keys = key_ops.generate_key_pair();
        let mut tx_extra = Vec::new();
        extra::add_public_key(&mut tx_extra, &tx_keys.public);
        if !extra_nonce.is_empty() && !extra::add_nonce(&mut tx_extra, extra_nonce) {
            return Err(CurrencyError::InvalidParameter {
                name: "extra_nonce",
                reason: format!(
                    "{} bytes exceeds the {}-byte nonce bound",
                    extra_nonce.len(),
                    extra::NONCE_MAX_SIZE
                ),
            });
        }

        let (block_reward, _emission_change) = self.get_block_reward(
            block_major_version,
            median_size,
            current_block_size,
            already_generated_coins,
            fee,
            difficulty,
        )?;

        if max_outs < 1 {
            return Err(CurrencyError::InvalidParameter {
                name: "max_outs",
                reason: "at least one output is required".to_string(),
            });
        }
        let mut out_amounts = decompose_amount(block_reward, self.default_dust_threshold);
        while out_amounts.len() > max_outs {
            if let Some(last) = out_amounts.pop() {
                if let Some(previous) = out_amounts.last_mut() {
                    *previous += last;
                }
            }
        }

        let derivation = key_ops
            .generate_key_derivation(&miner_address.view_public_key, &tx_keys.secret)
            .ok_or(CurrencyError::OutputDerivation { output_index: 0 })?;

        let mut outputs = Vec::with_capacity(out_amounts.len());
        let mut summary = 0u64;
        for (output_index, &amount) in out_amounts.iter().enumerate() {
            let key = key_ops
                .derive_public_key(&derivation, output_index, &miner_address.spend_public_key)
                .ok_or(CurrencyError::OutputDerivation { output_index })?;
            outputs.push(TransactionOutput {
                amount,
                target: TransactionOutputTarget::Key(KeyOutput { key }),
            });
            summary += amount;
        }
        if summary != block_reward {
            return Err(CurrencyError::RewardMismatch {
                summary,
                reward: block_reward,
            });
        }

        debug!(
            height,
            block_reward,
            outputs = outputs.len(),
            "constructed miner transaction"
        );

        Ok(Transaction {
            version: params::CURRENT_TRANSACTION_VERSION,
            unlock_time: u64::from(height) + u64::from(self.mined_money_unlock_window),
            inputs: vec![TransactionInput::Base(BaseInput {
                block_index: height,
            })],
            outputs,
            extra: tx_extra,
        })
    }
}

/// Upper bound on the ring inputs that fit into `transaction_size` with
/// `output_count` outputs at `mixin_count` decoys per input. Wallets use
/// it to cap fusion candidates.
pub fn approximate_maximum_input_count(
    transaction_size: usize,
    output_count: usize,
    mixin_count: usize,
) -> usize {
    const KEY_IMAGE_SIZE: usize = 32;
    const OUTPUT_KEY_SIZE: usize = 32;
    const AMOUNT_SIZE: usize = 8 + 2;
    const GLOBAL_INDEXES_VECTOR_SIZE_SIZE: usize = 1;
    const GLOBAL_INDEXES_INITIAL_VALUE_SIZE: usize = 4;
    const GLOBAL_INDEXES_DIFFERENCE_SIZE: usize = 4;
    const SIGNATURE_SIZE: usize = 64;
    const EXTRA_TAG_SIZE: usize = 1;
    const INPUT_TAG_SIZE: usize = 1;
    const OUTPUT_TAG_SIZE: usize = 1;
    const PUBLIC_KEY_SIZE: usize = 32;
    const TRANSACTION_VERSION_SIZE: usize = 1;
    const TRANSACTION_UNLOCK_TIME_SIZE: usize = 8;

    let outputs_size = output_count * (OUTPUT_TAG_SIZE + OUTPUT_KEY_SIZE + AMOUNT_SIZE);
    let header_size =
        TRANSACTION_VERSION_SIZE + TRANSACTION_UNLOCK_TIME_SIZE + EXTRA_TAG_SIZE + PUBLIC_KEY_SIZE;
    let input_size = INPUT_TAG_SIZE
        + AMOUNT_SIZE
        + KEY_IMAGE_SIZE
        + SIGNATURE_SIZE
        + GLOBAL_INDEXES_VECTOR_SIZE_SIZE
        + GLOBAL_INDEXES_INITIAL_VALUE_SIZE
        + mixin_count * (GLOBAL_INDEXES_DIFFERENCE_SIZE + SIGNATURE_SIZE);

    (transaction_size - header_size - outputs_size) / input_size
}
