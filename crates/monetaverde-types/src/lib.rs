//! # monetaverde-types
//!
//! Chain entities and binary primitives shared by the MonetaVerde node
//! crates:
//!
//! - 32-byte hashes, the Keccak-256 fast hash and the Merkle helpers
//! - transactions and blocks with their canonical binary encoding
//! - the tagged transaction `extra` blob
//! - block-wise base58 and public account addresses
//! - the seams to the crypto backend ([`PowHash`], [`KeyOps`])
//!
//! Nothing here decides validity; consensus rules live in
//! `monetaverde-consensus` and operate on these types.

pub mod account;
pub mod base58;
pub mod block;
pub mod crypto;
pub mod hash;
pub mod serialization;
pub mod transaction;

pub use account::{
    account_address_as_string, parse_account_address_string, AccountPublicAddress,
    AddressParseError, ADDRESS_CHECKSUM_SIZE,
};
pub use block::{BlockTemplate, CachedBlock, ParentBlock};
pub use crypto::{KeyDerivation, KeyImage, KeyOps, KeyPair, PowHash, PublicKey, SecretKey};
pub use hash::{fast_hash, hash_pair, tree_hash, tree_hash_from_branch, Hash, HASH_SIZE};
pub use serialization::{varint_size, write_varint, BinaryReader, SerializationError};
pub use transaction::{
    extra, BaseInput, KeyInput, KeyOutput, Transaction, TransactionInput, TransactionOutput,
    TransactionOutputTarget,
};
