//! Genesis block derivation.
//!
//! The genesis coinbase is a hard-coded blob: the regular miner
//! transaction path draws a fresh key pair, and the genesis block must be
//! identical on every node.

use crate::error::{CurrencyError, CurrencyResult};
use crate::params;
use monetaverde_types::{BlockTemplate, Hash, Transaction};
use tracing::debug;

/// Mainnet genesis nonce; testnet bumps it by one.
pub(crate) const GENESIS_NONCE: u32 = 10_000;

pub(crate) fn generate_genesis_block(testnet: bool) -> CurrencyResult<BlockTemplate> {
    let blob = hex::decode(params::GENESIS_COINBASE_TX_HEX)
        .map_err(|e| CurrencyError::Parse(format!("genesis coinbase hex: {e}")))?;
    let base_transaction = Transaction::from_bytes(&blob)
        .map_err(|e| CurrencyError::Parse(format!("genesis coinbase blob: {e}")))?;

    let mut block = BlockTemplate {
        major_version: params::BLOCK_MAJOR_VERSION_1,
        minor_version: params::BLOCK_MINOR_VERSION_0,
        timestamp: 0,
        nonce: GENESIS_NONCE,
        previous_block_hash: Hash::NULL,
        parent_block: None,
        base_transaction,
        transaction_hashes: Vec::new(),
    };
    if testnet {
        block.nonce += 1;
    }
    debug!(nonce = block.nonce, "generated genesis block template");
    Ok(block)
}
