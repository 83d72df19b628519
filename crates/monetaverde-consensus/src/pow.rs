//! Proof-of-work validation.
//!
//! Version 1 blocks stand on their own hash. From version 2 the chain is
//! merge-mined: the block additionally carries a parent-chain header
//! whose coinbase commits, through a merge-mining tag and a Merkle
//! branch, to this chain's auxiliary block header.

use crate::currency::Currency;
use crate::difficulty::Difficulty;
use crate::params;
use monetaverde_types::{extra, tree_hash_from_branch, CachedBlock, Hash, PowHash, HASH_SIZE};
use num_bigint::BigUint;
use tracing::{debug, warn};

/// The standard 256-bit work predicate: the hash value, read little
/// endian, times the difficulty must fit into 256 bits.
pub fn check_hash(hash: &Hash, difficulty: Difficulty) -> bool {
    let value = BigUint::from_bytes_le(hash.as_bytes());
    value * difficulty < BigUint::from(1u8) << 256usize
}

impl Currency {
    /// Validate a version 1 block against `current_difficulty`.
    pub fn check_proof_of_work_v1<H: PowHash>(
        &self,
        context: &mut H,
        block: &CachedBlock,
        current_difficulty: Difficulty,
    ) -> bool {
        if block.block().major_version != params::BLOCK_MAJOR_VERSION_1 {
            return false;
        }
        check_hash(&block.long_hash(context), current_difficulty)
    }

    /// Validate a merge-mined block: its own hash must meet
    /// `current_difficulty`, and the parent coinbase must commit to this
    /// chain's auxiliary header.
    pub fn check_proof_of_work_v2<H: PowHash>(
        &self,
        context: &mut H,
        block: &CachedBlock,
        current_difficulty: Difficulty,
    ) -> bool {
        let template = block.block();
        if template.major_version < params::BLOCK_MAJOR_VERSION_2 {
            return false;
        }
        if !check_hash(&block.long_hash(context), current_difficulty) {
            return false;
        }

        let Some(parent) = template.parent_block.as_ref() else {
            debug!("merge mined block has no parent block data");
            return false;
        };
        let Some(mm_tag) = extra::merge_mining_tag(&parent.base_transaction.extra) else {
            debug!("merge mining tag not found in the parent block miner transaction");
            return false;
        };
        if parent.blockchain_branch.len() > 8 * HASH_SIZE {
            return false;
        }

        let aux_root = tree_hash_from_branch(
            &parent.blockchain_branch,
            &block.aux_header_hash(),
            Some(&self.genesis_block_hash),
        );
        if aux_root != mm_tag.merkle_root {
            debug!(
                computed = %aux_root,
                committed = %mm_tag.merkle_root,
                "auxiliary block hash is not in the committed merkle tree"
            );
            return false;
        }

        true
    }

    /// Dispatch on the block major version; unknown versions are
    /// rejected outright.
    pub fn check_proof_of_work<H: PowHash>(
        &self,
        context: &mut H,
        block: &CachedBlock,
        current_difficulty: Difficulty,
    ) -> bool {
        match block.block().major_version {
            params::BLOCK_MAJOR_VERSION_1 => {
                self.check_proof_of_work_v1(context, block, current_difficulty)
            }
            params::BLOCK_MAJOR_VERSION_2
            | params::BLOCK_MAJOR_VERSION_3
            | params::BLOCK_MAJOR_VERSION_4 => {
                self.check_proof_of_work_v2(context, block, current_difficulty)
            }
            version => {
                warn!(version, "unknown block major version");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyBuilder;
    use monetaverde_types::{fast_hash, BlockTemplate, ParentBlock, Transaction};

    /// Returns a fixed hash regardless of input.
    struct FixedPow(Hash);

    impl PowHash for FixedPow {
        fn slow_hash(&mut self, _blob: &[u8]) -> Hash {
            self.0
        }
    }

    fn currency() -> Currency {
        CurrencyBuilder::new().build().unwrap()
    }

    fn easy_pow() -> FixedPow {
        FixedPow(Hash::NULL)
    }

    fn v1_block() -> BlockTemplate {
        BlockTemplate {
            major_version: 1,
            minor_version: 0,
            timestamp: 1_400_000_000,
            nonce: 1,
            previous_block_hash: fast_hash(b"prev"),
            parent_block: None,
            base_transaction: Transaction::default(),
            transaction_hashes: Vec::new(),
        }
    }

    /// A v2 block whose parent commits to it through a one-node branch.
    fn merge_mined_block(currency: &Currency, tamper_root: bool) -> BlockTemplate {
        let mut block = v1_block();
        block.major_version = 2;

        let branch = vec![fast_hash(b"sibling")];
        let aux_hash = CachedBlock::new(block.clone()).aux_header_hash();
        let mut root = tree_hash_from_branch(
            &branch,
            &aux_hash,
            Some(&currency.genesis_block_hash()),
        );
        if tamper_root {
            root.0[0] ^= 1;
        }

        let mut parent_coinbase = Transaction::default();
        extra::add_merge_mining_tag(
            &mut parent_coinbase.extra,
            &extra::MergeMiningTag {
                depth: branch.len() as u64,
                merkle_root: root,
            },
        );

        block.parent_block = Some(ParentBlock {
            major_version: 1,
            minor_version: 0,
            previous_block_hash: fast_hash(b"parent prev"),
            transaction_count: 1,
            base_transaction_branch: Vec::new(),
            base_transaction: parent_coinbase,
            blockchain_branch: branch,
        });
        block
    }

    #[test]
    fn check_hash_boundary() {
        // value 2^255 times difficulty 2 is exactly 2^256: rejected
        let mut bytes = [0u8; HASH_SIZE];
        bytes[31] = 0x80;
        let hash = Hash(bytes);
        assert!(check_hash(&hash, 1));
        assert!(!check_hash(&hash, 2));
        assert!(check_hash(&Hash::NULL, u64::MAX));
    }

    #[test]
    fn v1_accepts_and_dispatches() {
        let c = currency();
        let block = CachedBlock::new(v1_block());
        assert!(c.check_proof_of_work(&mut easy_pow(), &block, 1_000_000));
        assert!(c.check_proof_of_work_v1(&mut easy_pow(), &block, 1_000_000));
    }

    #[test]
    fn v1_rejects_failing_hash() {
        let c = currency();
        let block = CachedBlock::new(v1_block());
        let mut hard = FixedPow(Hash([0xff; HASH_SIZE]));
        assert!(!c.check_proof_of_work(&mut hard, &block, 2));
    }

    #[test]
    fn version_mismatch_between_paths() {
        let c = currency();
        let v1 = CachedBlock::new(v1_block());
        assert!(!c.check_proof_of_work_v2(&mut easy_pow(), &v1, 1));

        let v2 = CachedBlock::new(merge_mined_block(&c, false));
        assert!(!c.check_proof_of_work_v1(&mut easy_pow(), &v2, 1));
    }

    #[test]
    fn merge_mined_block_validates() {
        let c = currency();
        let block = CachedBlock::new(merge_mined_block(&c, false));
        assert!(c.check_proof_of_work(&mut easy_pow(), &block, 1_000));
    }

    #[test]
    fn missing_merge_mining_tag_rejects_even_with_good_hash() {
        let c = currency();
        let mut template = merge_mined_block(&c, false);
        if let Some(parent) = template.parent_block.as_mut() {
            parent.base_transaction.extra.clear();
        }
        let block = CachedBlock::new(template);
        assert!(!c.check_proof_of_work(&mut easy_pow(), &block, 1_000));
    }

    #[test]
    fn missing_parent_block_rejects() {
        let c = currency();
        let mut template = merge_mined_block(&c, false);
        template.parent_block = None;
        let block = CachedBlock::new(template);
        assert!(!c.check_proof_of_work(&mut easy_pow(), &block, 1_000));
    }

    #[test]
    fn mismatched_root_rejects() {
        let c = currency();
        let block = CachedBlock::new(merge_mined_block(&c, true));
        assert!(!c.check_proof_of_work(&mut easy_pow(), &block, 1_000));
    }

    #[test]
    fn overlong_branch_rejects() {
        let c = currency();
        let mut template = merge_mined_block(&c, false);
        if let Some(parent) = template.parent_block.as_mut() {
            parent.blockchain_branch = vec![Hash::NULL; 8 * HASH_SIZE + 1];
        }
        let block = CachedBlock::new(template);
        assert!(!c.check_proof_of_work(&mut easy_pow(), &block, 1_000));
    }

    #[test]
    fn failing_hash_rejects_before_merge_mining_checks() {
        let c = currency();
        let block = CachedBlock::new(merge_mined_block(&c, false));
        let mut hard = FixedPow(Hash([0xff; HASH_SIZE]));
        assert!(!c.check_proof_of_work(&mut hard, &block, 2));
    }

    #[test]
    fn unknown_version_rejects() {
        let c = currency();
        let mut template = v1_block();
        template.major_version = 7;
        let block = CachedBlock::new(template);
        assert!(!c.check_proof_of_work(&mut easy_pow(), &block, 1));
    }

    #[test]
    fn v3_and_v4_use_the_merge_mined_path() {
        let c = currency();
        for version in [3u8, 4] {
            let mut template = merge_mined_block(&c, false);
            template.major_version = version;
            // the aux header hash changed with the version, recommit to it
            let branch = vec![fast_hash(b"sibling")];
            let aux_hash = CachedBlock::new(template.clone()).aux_header_hash();
            let root = tree_hash_from_branch(
                &branch,
                &aux_hash,
                Some(&c.genesis_block_hash()),
            );
            if let Some(parent) = template.parent_block.as_mut() {
                parent.base_transaction.extra.clear();
                extra::add_merge_mining_tag(
                    &mut parent.base_transaction.extra,
                    &extra::MergeMiningTag {
                        depth: 1,
                        merkle_root: root,
                    },
                );
            }
            let block = CachedBlock::new(template);
            assert!(c.check_proof_of_work(&mut easy_pow(), &block, 1_000), "v{version}");
        }
    }
}
