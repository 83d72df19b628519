//! Hashes and Merkle helpers.
//!
//! The chain's fast hash is Keccak-256 with the original Keccak padding,
//! not the NIST SHA-3 variant. Transaction identifiers, block identifiers,
//! address checksums and the merge-mining Merkle tree all derive from it.

use sha3::{Digest, Keccak256};
use std::fmt;

/// Size of a hash in bytes.
pub const HASH_SIZE: usize = 32;

/// A 32-byte hash value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hash(pub [u8; HASH_SIZE]);

impl Hash {
    /// The all-zero hash.
    pub const NULL: Hash = Hash([0u8; HASH_SIZE]);

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Parse a hash from 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Hash, hex::FromHexError> {
        let mut out = [0u8; HASH_SIZE];
        hex::decode_to_slice(s, &mut out)?;
        Ok(Hash(out))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", hex::encode(self.0))
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }
}

/// Keccak-256 of `data`.
pub fn fast_hash(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    Hash(hasher.finalize().into())
}

/// Hash of the concatenation of two hashes; one internal Merkle node.
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(left.0);
    hasher.update(right.0);
    Hash(hasher.finalize().into())
}

/// Merkle root of a non-empty list of hashes.
///
/// The leaf count is first folded down to the largest power of two below
/// it by pairing off the tail; the remaining levels then halve cleanly.
pub fn tree_hash(hashes: &[Hash]) -> Hash {
    assert!(!hashes.is_empty(), "tree_hash of an empty list");
    match hashes.len() {
        1 => hashes[0],
        2 => hash_pair(&hashes[0], &hashes[1]),
        count => {
            let mut cnt = 1usize;
            while cnt * 2 < count {
                cnt *= 2;
            }
            let mut row: Vec<Hash> = hashes[..2 * cnt - count].to_vec();
            for pair in hashes[2 * cnt - count..].chunks(2) {
                row.push(hash_pair(&pair[0], &pair[1]));
            }
            while row.len() > 1 {
                row = row.chunks(2).map(|p| hash_pair(&p[0], &p[1])).collect();
            }
            row[0]
        }
    }
}

/// Reconstruct a Merkle root from a leaf and its authentication branch.
///
/// `branch` runs from the root level down to the leaf's sibling. Bit `i`
/// of `path` puts the running hash on the right side of the pair at depth
/// `i`; without a path it stays on the left. Merge mining derives the
/// path from the auxiliary chain's genesis hash, which pins each chain to
/// one slot of the tree.
pub fn tree_hash_from_branch(branch: &[Hash], leaf: &Hash, path: Option<&Hash>) -> Hash {
    let mut root = *leaf;
    for (depth, sibling) in branch.iter().enumerate().rev() {
        let leaf_on_right = match path {
            Some(p) => (p.0[depth >> 3] >> (depth & 7)) & 1 == 1,
            None => false,
        };
        root = if leaf_on_right {
            hash_pair(sibling, &root)
        } else {
            hash_pair(&root, sibling)
        };
    }
    root
}
