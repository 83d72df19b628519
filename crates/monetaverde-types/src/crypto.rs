//! Key material newtypes and the seams to the crypto backend.
//!
//! The consensus core does not implement CryptoNight or the curve
//! arithmetic itself; both arrive through the traits below so that the
//! rules stay testable without the native hashing library.

use crate::hash::Hash;
use std::fmt;

macro_rules! key_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), hex::encode(self.0))
            }
        }
    };
}

key_type!(
    /// A compressed curve point.
    PublicKey
);
key_type!(
    /// A curve scalar kept by the producing side.
    SecretKey
);
key_type!(
    /// Shared secret between a transaction key and a view key.
    KeyDerivation
);
key_type!(
    /// Double-spend marker of a spent key output.
    KeyImage
);

/// A public/secret key pair.
#[derive(Clone, Copy, Debug)]
pub struct KeyPair {
    pub public: PublicKey,
    pub secret: SecretKey,
}

/// Proof-of-work hasher.
///
/// A CryptoNight context owns megabytes of scratchpad, so a context must
/// stay on the thread that created it.
pub trait PowHash {
    /// Slow hash of a block hashing blob.
    fn slow_hash(&mut self, blob: &[u8]) -> Hash;
}

/// Elliptic-curve operations for stealth output derivation.
pub trait KeyOps {
    /// Fresh random key pair for a new transaction.
    fn generate_key_pair(&self) -> KeyPair;

    /// Shared derivation between `public` (a view key) and `secret` (the
    /// transaction key). `None` when `public` is not a valid point.
    fn generate_key_derivation(
        &self,
        public: &PublicKey,
        secret: &SecretKey,
    ) -> Option<KeyDerivation>;

    /// One-time key for output `output_index`, bound to `base` (the
    /// recipient's spend key).
    fn derive_public_key(
        &self,
        derivation: &KeyDerivation,
        output_index: usize,
        base: &PublicKey,
    ) -> Option<PublicKey>;
}
