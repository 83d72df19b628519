//! Public account addresses and their string form.

use crate::base58;
use crate::crypto::PublicKey;
use crate::hash::fast_hash;
use crate::serialization::{write_varint, BinaryReader};
use thiserror::Error;

/// Checksum bytes appended to the address payload.
pub const ADDRESS_CHECKSUM_SIZE: usize = 4;

/// The public half of an account: spend and view keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AccountPublicAddress {
    pub spend_public_key: PublicKey,
    pub view_public_key: PublicKey,
}

/// Reasons an address string is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("address is not valid base58")]
    Base58,
    #[error("address payload has an unexpected length")]
    Length,
    #[error("address checksum mismatch")]
    Checksum,
}

/// Render `address` under the given base58 `prefix` tag.
pub fn account_address_as_string(prefix: u64, address: &AccountPublicAddress) -> String {
    let mut data = Vec::with_capacity(2 + 64 + ADDRESS_CHECKSUM_SIZE);
    write_varint(&mut data, prefix);
    data.extend_from_slice(&address.spend_public_key.0);
    data.extend_from_slice(&address.view_public_key.0);
    let checksum = fast_hash(&data);
    data.extend_from_slice(&checksum.as_bytes()[..ADDRESS_CHECKSUM_SIZE]);
    base58::encode(&data)
}

/// Decode an address string into its prefix tag and keys.
pub fn parse_account_address_string(
    s: &str,
) -> Result<(u64, AccountPublicAddress), AddressParseError> {
    let data = base58::decode(s).ok_or(AddressParseError::Base58)?;
    if data.len() <= ADDRESS_CHECKSUM_SIZE {
        return Err(AddressParseError::Length);
    }
    let (body, checksum) = data.split_at(data.len() - ADDRESS_CHECKSUM_SIZE);
    if &fast_hash(body).as_bytes()[..ADDRESS_CHECKSUM_SIZE] != checksum {
        return Err(AddressParseError::Checksum);
    }

    let mut reader = BinaryReader::new(body);
    let prefix = reader.read_varint().map_err(|_| AddressParseError::Length)?;
    let spend_public_key = PublicKey(reader.read_array().map_err(|_| AddressParseError::Length)?);
    let view_public_key = PublicKey(reader.read_array().map_err(|_| AddressParseError::Length)?);
    reader.expect_end().map_err(|_| AddressParseError::Length)?;

    Ok((
        prefix,
        AccountPublicAddress {
            spend_public_key,
            view_public_key,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAINNET_PREFIX: u64 = 6699;

    fn sample_address() -> AccountPublicAddress {
        AccountPublicAddress {
            spend_public_key: PublicKey(fast_hash(b"spend").0),
            view_public_key: PublicKey(fast_hash(b"view").0),
        }
    }

    #[test]
    fn round_trip() {
        let address = sample_address();
        let s = account_address_as_string(MAINNET_PREFIX, &address);
        let (prefix, parsed) = parse_account_address_string(&s).unwrap();
        assert_eq!(prefix, MAINNET_PREFIX);
        assert_eq!(parsed, address);
    }

    #[test]
    fn mainnet_addresses_start_with_vd() {
        for seed in ["one", "two", "three"] {
            let address = AccountPublicAddress {
                spend_public_key: PublicKey(fast_hash(seed.as_bytes()).0),
                view_public_key: PublicKey(fast_hash(b"view").0),
            };
            let s = account_address_as_string(MAINNET_PREFIX, &address);
            assert!(s.starts_with("Vd"), "got {s}");
        }
    }

    #[test]
    fn corrupted_checksum_rejected() {
        let mut s = account_address_as_string(MAINNET_PREFIX, &sample_address());
        let tail = s.pop().unwrap();
        s.push(if tail == '1' { '2' } else { '1' });
        assert!(matches!(
            parse_account_address_string(&s),
            Err(AddressParseError::Checksum) | Err(AddressParseError::Base58)
        ));
    }

    #[test]
    fn garbage_rejected() {
        assert_eq!(
            parse_account_address_string("not#base58"),
            Err(AddressParseError::Base58)
        );
        assert_eq!(
            parse_account_address_string("11"),
            Err(AddressParseError::Length)
        );
    }
}
