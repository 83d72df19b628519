//! Blocks and their cached hashes.

use crate::crypto::PowHash;
use crate::hash::{fast_hash, tree_hash, Hash};
use crate::serialization::write_varint;
use crate::transaction::Transaction;
use std::cell::OnceCell;

/// Header of the parent-chain block a merge-mined block rides on.
///
/// The parent coinbase carries the merge-mining tag; `blockchain_branch`
/// proves this chain's header into the tag's auxiliary Merkle root.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ParentBlock {
    pub major_version: u8,
    pub minor_version: u8,
    pub previous_block_hash: Hash,
    pub transaction_count: u16,
    pub base_transaction_branch: Vec<Hash>,
    pub base_transaction: Transaction,
    pub blockchain_branch: Vec<Hash>,
}

/// A block as assembled by a miner or received from a peer.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct BlockTemplate {
    pub major_version: u8,
    pub minor_version: u8,
    pub timestamp: u64,
    pub nonce: u32,
    pub previous_block_hash: Hash,
    /// Merge-mining envelope, populated from major version 2 on.
    pub parent_block: Option<ParentBlock>,
    pub base_transaction: Transaction,
    pub transaction_hashes: Vec<Hash>,
}

impl BlockTemplate {
    /// Bare header bytes. Doubles as the merge-mining leaf for this block.
    pub fn header_blob(&self) -> Vec<u8> {
        let mut blob = Vec::with_capacity(64);
        write_varint(&mut blob, u64::from(self.major_version));
        write_varint(&mut blob, u64::from(self.minor_version));
        write_varint(&mut blob, self.timestamp);
        blob.extend_from_slice(self.previous_block_hash.as_bytes());
        blob.extend_from_slice(&self.nonce.to_le_bytes());
        blob
    }

    /// Header, transactions Merkle root and transaction count; the blob
    /// both hash flavors run over.
    pub fn hashing_blob(&self) -> Vec<u8> {
        let mut tx_hashes = Vec::with_capacity(1 + self.transaction_hashes.len());
        tx_hashes.push(self.base_transaction.hash());
        tx_hashes.extend_from_slice(&self.transaction_hashes);

        let mut blob = self.header_blob();
        blob.extend_from_slice(tree_hash(&tx_hashes).as_bytes());
        write_varint(&mut blob, tx_hashes.len() as u64);
        blob
    }
}

/// A block paired with its lazily computed hashes.
///
/// The slow hash is the only one that needs an external context; all
/// three are computed at most once.
#[derive(Debug)]
pub struct CachedBlock {
    block: BlockTemplate,
    block_hash: OnceCell<Hash>,
    aux_header_hash: OnceCell<Hash>,
    long_hash: OnceCell<Hash>,
}

impl CachedBlock {
    pub fn new(block: BlockTemplate) -> Self {
        Self {
            block,
            block_hash: OnceCell::new(),
            aux_header_hash: OnceCell::new(),
            long_hash: OnceCell::new(),
        }
    }

    pub fn block(&self) -> &BlockTemplate {
        &self.block
    }

    pub fn into_block(self) -> BlockTemplate {
        self.block
    }

    /// Block identifier: fast hash of the size-prefixed hashing blob.
    pub fn block_hash(&self) -> Hash {
        *self.block_hash.get_or_init(|| {
            let blob = self.block.hashing_blob();
            let mut prefixed = Vec::with_capacity(blob.len() + 4);
            write_varint(&mut prefixed, blob.len() as u64);
            prefixed.extend_from_slice(&blob);
            fast_hash(&prefixed)
        })
    }

    /// Merge-mining leaf hash: the bare header, without parent-block data.
    pub fn aux_header_hash(&self) -> Hash {
        *self
            .aux_header_hash
            .get_or_init(|| fast_hash(&self.block.header_blob()))
    }

    /// Proof-of-work hash over the hashing blob, computed once per block.
    pub fn long_hash<H: PowHash>(&self, context: &mut H) -> Hash {
        *self
            .long_hash
            .get_or_init(|| context.slow_hash(&self.block.hashing_blob()))
    }
}

impl From<BlockTemplate> for CachedBlock {
    fn from(block: BlockTemplate) -> Self {
        CachedBlock::new(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> BlockTemplate {
        BlockTemplate {
            major_version: 1,
            minor_version: 0,
            timestamp: 1_400_000_000,
            nonce: 10_000,
            previous_block_hash: fast_hash(b"previous"),
            parent_block: None,
            base_transaction: Transaction {
                version: 1,
                unlock_time: 60,
                ..Transaction::default()
            },
            transaction_hashes: vec![fast_hash(b"tx1"), fast_hash(b"tx2")],
        }
    }

    #[test]
    fn hashing_blob_is_deterministic() {
        assert_eq!(sample_block().hashing_blob(), sample_block().hashing_blob());
    }

    #[test]
    fn block_hash_depends_on_nonce() {
        let a = CachedBlock::new(sample_block());
        let mut changed = sample_block();
        changed.nonce += 1;
        let b = CachedBlock::new(changed);
        assert_ne!(a.block_hash(), b.block_hash());
    }

    #[test]
    fn block_hash_depends_on_transactions() {
        let a = CachedBlock::new(sample_block());
        let mut changed = sample_block();
        changed.transaction_hashes.pop();
        let b = CachedBlock::new(changed);
        assert_ne!(a.block_hash(), b.block_hash());
    }

    #[test]
    fn aux_header_hash_ignores_transactions() {
        let a = CachedBlock::new(sample_block());
        let mut changed = sample_block();
        changed.transaction_hashes.clear();
        let b = CachedBlock::new(changed);
        assert_eq!(a.aux_header_hash(), b.aux_header_hash());
        assert_ne!(a.block_hash(), b.block_hash());
    }

    #[test]
    fn long_hash_is_computed_once() {
        struct CountingPow(u32);
        impl PowHash for CountingPow {
            fn slow_hash(&mut self, blob: &[u8]) -> Hash {
                self.0 += 1;
                fast_hash(blob)
            }
        }

        let cached = CachedBlock::new(sample_block());
        let mut pow = CountingPow(0);
        let first = cached.long_hash(&mut pow);
        let second = cached.long_hash(&mut pow);
        assert_eq!(first, second);
        assert_eq!(pow.0, 1);
    }
}
