//! Transaction entities, their canonical binary form, and the tagged
//! `extra` field.

use crate::crypto::{KeyImage, PublicKey};
use crate::hash::{fast_hash, Hash};
use crate::serialization::{write_varint, BinaryReader, SerializationError};

const TAG_BASE_INPUT: u8 = 0xff;
const TAG_KEY_INPUT: u8 = 0x02;
const TAG_KEY_OUTPUT: u8 = 0x02;

/// Input minting the block reward; carries the block height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseInput {
    pub block_index: u32,
}

/// Input spending a key output through a ring of decoys.
///
/// `output_indexes` are global output indexes, delta-encoded by callers
/// that persist them; here they are plain values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyInput {
    pub amount: u64,
    pub output_indexes: Vec<u32>,
    pub key_image: KeyImage,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionInput {
    Base(BaseInput),
    Key(KeyInput),
}

/// A one-time destination key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyOutput {
    pub key: PublicKey,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionOutputTarget {
    Key(KeyOutput),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionOutput {
    pub amount: u64,
    pub target: TransactionOutputTarget,
}

/// A transaction prefix: everything that is hashed and relayed, without
/// ring signatures.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Transaction {
    pub version: u8,
    pub unlock_time: u64,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub extra: Vec<u8>,
}

impl Transaction {
    /// Canonical binary encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64 + self.extra.len());
        write_varint(&mut out, u64::from(self.version));
        write_varint(&mut out, self.unlock_time);

        write_varint(&mut out, self.inputs.len() as u64);
        for input in &self.inputs {
            match input {
                TransactionInput::Base(base) => {
                    out.push(TAG_BASE_INPUT);
                    write_varint(&mut out, u64::from(base.block_index));
                }
                TransactionInput::Key(key) => {
                    out.push(TAG_KEY_INPUT);
                    write_varint(&mut out, key.amount);
                    write_varint(&mut out, key.output_indexes.len() as u64);
                    for &index in &key.output_indexes {
                        write_varint(&mut out, u64::from(index));
                    }
                    out.extend_from_slice(&key.key_image.0);
                }
            }
        }

        write_varint(&mut out, self.outputs.len() as u64);
        for output in &self.outputs {
            write_varint(&mut out, output.amount);
            let TransactionOutputTarget::Key(key_output) = output.target;
            out.push(TAG_KEY_OUTPUT);
            out.extend_from_slice(&key_output.key.0);
        }

        write_varint(&mut out, self.extra.len() as u64);
        out.extend_from_slice(&self.extra);
        out
    }

    /// Strict decoding; the whole input must be consumed.
    pub fn from_bytes(data: &[u8]) -> Result<Transaction, SerializationError> {
        let mut reader = BinaryReader::new(data);

        let version = read_narrow(&mut reader, "transaction version", u64::from(u8::MAX))? as u8;
        let unlock_time = reader.read_varint()?;

        let input_count = read_narrow(&mut reader, "input count", data.len() as u64)? as usize;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            let position = reader.position();
            let tag = reader.read_u8()?;
            let input = match tag {
                TAG_BASE_INPUT => TransactionInput::Base(BaseInput {
                    block_index: read_narrow(&mut reader, "block index", u64::from(u32::MAX))?
                        as u32,
                }),
                TAG_KEY_INPUT => {
                    let amount = reader.read_varint()?;
                    let offset_count =
                        read_narrow(&mut reader, "ring size", data.len() as u64)? as usize;
                    let mut output_indexes = Vec::with_capacity(offset_count);
                    for _ in 0..offset_count {
                        output_indexes.push(read_narrow(
                            &mut reader,
                            "output index",
                            u64::from(u32::MAX),
                        )? as u32);
                    }
                    TransactionInput::Key(KeyInput {
                        amount,
                        output_indexes,
                        key_image: KeyImage(reader.read_array()?),
                    })
                }
                tag => return Err(SerializationError::UnknownTag { tag, position }),
            };
            inputs.push(input);
        }

        let output_count = read_narrow(&mut reader, "output count", data.len() as u64)? as usize;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            let amount = reader.read_varint()?;
            let position = reader.position();
            let tag = reader.read_u8()?;
            if tag != TAG_KEY_OUTPUT {
                return Err(SerializationError::UnknownTag { tag, position });
            }
            outputs.push(TransactionOutput {
                amount,
                target: TransactionOutputTarget::Key(KeyOutput {
                    key: PublicKey(reader.read_array()?),
                }),
            });
        }

        let extra_len = read_narrow(&mut reader, "extra length", data.len() as u64)? as usize;
        let extra = reader.read_bytes(extra_len)?.to_vec();
        reader.expect_end()?;

        Ok(Transaction {
            version,
            unlock_time,
            inputs,
            outputs,
            extra,
        })
    }

    /// Size of the canonical encoding in bytes.
    pub fn binary_size(&self) -> usize {
        self.to_bytes().len()
    }

    /// Transaction identifier: fast hash of the canonical bytes.
    pub fn hash(&self) -> Hash {
        fast_hash(&self.to_bytes())
    }
}

fn read_narrow(
    reader: &mut BinaryReader<'_>,
    what: &'static str,
    max: u64,
) -> Result<u64, SerializationError> {
    let value = reader.read_varint()?;
    if value > max {
        return Err(SerializationError::OutOfRange { what, value });
    }
    Ok(value)
}

/// Tagged sub-entries of a transaction's `extra` blob.
pub mod extra {
    use super::*;
    use crate::serialization::varint_size;

    pub const TAG_PADDING: u8 = 0x00;
    pub const TAG_PUBLIC_KEY: u8 = 0x01;
    pub const TAG_NONCE: u8 = 0x02;
    pub const TAG_MERGE_MINING: u8 = 0x03;

    /// Upper bound on an extra-nonce payload.
    pub const NONCE_MAX_SIZE: usize = 255;

    /// Commitment of a parent-chain coinbase to an auxiliary block.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MergeMiningTag {
        pub depth: u64,
        pub merkle_root: Hash,
    }

    enum Entry {
        PublicKey(PublicKey),
        Nonce(Vec<u8>),
        MergeMining(MergeMiningTag),
    }

    /// Append a transaction public key entry.
    pub fn add_public_key(extra: &mut Vec<u8>, key: &PublicKey) {
        extra.push(TAG_PUBLIC_KEY);
        extra.extend_from_slice(&key.0);
    }

    /// Append an extra-nonce entry; `false` when `nonce` exceeds the
    /// one-byte length bound.
    pub fn add_nonce(extra: &mut Vec<u8>, nonce: &[u8]) -> bool {
        if nonce.len() > NONCE_MAX_SIZE {
            return false;
        }
        extra.push(TAG_NONCE);
        extra.push(nonce.len() as u8);
        extra.extend_from_slice(nonce);
        true
    }

    /// Append a merge-mining tag entry.
    pub fn add_merge_mining_tag(extra: &mut Vec<u8>, tag: &MergeMiningTag) {
        extra.push(TAG_MERGE_MINING);
        write_varint(extra, (varint_size(tag.depth) + tag.merkle_root.0.len()) as u64);
        write_varint(extra, tag.depth);
        extra.extend_from_slice(&tag.merkle_root.0);
    }

    /// First transaction public key in `extra`, if any.
    pub fn public_key(extra: &[u8]) -> Option<PublicKey> {
        parse_entries(extra).into_iter().find_map(|entry| match entry {
            Entry::PublicKey(key) => Some(key),
            _ => None,
        })
    }

    /// First extra-nonce payload in `extra`, if any.
    pub fn nonce(extra: &[u8]) -> Option<Vec<u8>> {
        parse_entries(extra).into_iter().find_map(|entry| match entry {
            Entry::Nonce(nonce) => Some(nonce),
            _ => None,
        })
    }

    /// First merge-mining tag in `extra`, if any.
    pub fn merge_mining_tag(extra: &[u8]) -> Option<MergeMiningTag> {
        parse_entries(extra).into_iter().find_map(|entry| match entry {
            Entry::MergeMining(tag) => Some(tag),
            _ => None,
        })
    }

    /// Scan entries front to back; an unknown tag or a malformed entry
    /// ends the scan without invalidating what came before it.
    fn parse_entries(extra: &[u8]) -> Vec<Entry> {
        let mut entries = Vec::new();
        let mut reader = BinaryReader::new(extra);
        while !reader.is_empty() {
            let Ok(tag) = reader.read_u8() else { break };
            match tag {
                TAG_PADDING => continue,
                TAG_PUBLIC_KEY => {
                    let Ok(key) = reader.read_array() else { break };
                    entries.push(Entry::PublicKey(PublicKey(key)));
                }
                TAG_NONCE => {
                    let Ok(len) = reader.read_u8() else { break };
                    let Ok(payload) = reader.read_bytes(usize::from(len)) else {
                        break;
                    };
                    entries.push(Entry::Nonce(payload.to_vec()));
                }
                TAG_MERGE_MINING => {
                    let Ok(size) = reader.read_varint() else { break };
                    let Ok(payload) = reader.read_bytes(size as usize) else {
                        break;
                    };
                    let mut tag_reader = BinaryReader::new(payload);
                    let Ok(depth) = tag_reader.read_varint() else { break };
                    let Ok(root) = tag_reader.read_array() else { break };
                    entries.push(Entry::MergeMining(MergeMiningTag {
                        depth,
                        merkle_root: Hash(root),
                    }));
                }
                _ => break,
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transaction() -> Transaction {
        Transaction {
            version: 1,
            unlock_time: 60,
            inputs: vec![
                TransactionInput::Base(BaseInput { block_index: 7 }),
                TransactionInput::Key(KeyInput {
                    amount: 1_000_000,
                    output_indexes: vec![1, 5, 300],
                    key_image: KeyImage(fast_hash(b"image").0),
                }),
            ],
            outputs: vec![TransactionOutput {
                amount: 900_000,
                target: TransactionOutputTarget::Key(KeyOutput {
                    key: PublicKey(fast_hash(b"out").0),
                }),
            }],
            extra: vec![0x01; 33],
        }
    }

    #[test]
    fn binary_round_trip() {
        let tx = sample_transaction();
        let bytes = tx.to_bytes();
        assert_eq!(bytes.len(), tx.binary_size());
        assert_eq!(Transaction::from_bytes(&bytes).unwrap(), tx);
    }

    #[test]
    fn hash_is_stable_and_sensitive() {
        let tx = sample_transaction();
        assert_eq!(tx.hash(), tx.hash());
        let mut other = tx.clone();
        other.unlock_time += 1;
        assert_ne!(tx.hash(), other.hash());
    }

    #[test]
    fn rejects_unknown_input_tag() {
        let mut bytes = Vec::new();
        write_varint(&mut bytes, 1); // version
        write_varint(&mut bytes, 0); // unlock
        write_varint(&mut bytes, 1); // one input
        bytes.push(0xee); // no such tag
        assert!(matches!(
            Transaction::from_bytes(&bytes),
            Err(SerializationError::UnknownTag { tag: 0xee, .. })
        ));
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = sample_transaction().to_bytes();
        bytes.push(0);
        assert!(matches!(
            Transaction::from_bytes(&bytes),
            Err(SerializationError::TrailingBytes(1))
        ));
    }

    #[test]
    fn rejects_truncation_everywhere() {
        let bytes = sample_transaction().to_bytes();
        for len in 0..bytes.len() {
            assert!(Transaction::from_bytes(&bytes[..len]).is_err(), "len {len}");
        }
    }

    mod extra_entries {
        use super::super::extra::*;
        use super::*;

        #[test]
        fn public_key_round_trip() {
            let key = PublicKey(fast_hash(b"tx key").0);
            let mut blob = Vec::new();
            add_public_key(&mut blob, &key);
            assert_eq!(public_key(&blob), Some(key));
        }

        #[test]
        fn nonce_round_trip_and_bound() {
            let mut blob = Vec::new();
            assert!(add_nonce(&mut blob, b"abc"));
            assert_eq!(nonce(&blob).as_deref(), Some(&b"abc"[..]));

            let mut blob = Vec::new();
            assert!(!add_nonce(&mut blob, &[0u8; NONCE_MAX_SIZE + 1]));
            assert!(blob.is_empty());
        }

        #[test]
        fn merge_mining_tag_round_trip() {
            let tag = MergeMiningTag {
                depth: 3,
                merkle_root: fast_hash(b"root"),
            };
            let mut blob = Vec::new();
            add_public_key(&mut blob, &PublicKey(fast_hash(b"key").0));
            add_merge_mining_tag(&mut blob, &tag);
            assert_eq!(merge_mining_tag(&blob), Some(tag));
        }

        #[test]
        fn padding_is_skipped() {
            let key = PublicKey(fast_hash(b"padded").0);
            let mut blob = vec![TAG_PADDING, TAG_PADDING];
            add_public_key(&mut blob, &key);
            assert_eq!(public_key(&blob), Some(key));
        }

        #[test]
        fn unknown_tag_ends_scan() {
            let key = PublicKey(fast_hash(b"first").0);
            let mut blob = Vec::new();
            add_public_key(&mut blob, &key);
            blob.push(0x7e);
            blob.extend_from_slice(&[0u8; 5]);
            // the entry before the unknown tag is still visible
            assert_eq!(public_key(&blob), Some(key));
            assert_eq!(merge_mining_tag(&blob), None);
        }

        #[test]
        fn truncated_entry_yields_nothing() {
            let blob = vec![TAG_PUBLIC_KEY, 1, 2, 3];
            assert_eq!(public_key(&blob), None);
        }
    }
}
