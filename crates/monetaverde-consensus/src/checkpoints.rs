//! Hard-coded trust anchors.
//!
//! Collaborators short-circuit historical validation below the highest
//! checkpoint they trust.

/// A known-good block at a fixed height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    pub height: u32,
    pub block_hash: &'static str,
}

/// The published checkpoint list, ascending by height.
pub const CHECKPOINTS: [Checkpoint; 8] = [
    Checkpoint {
        height: 200_000,
        block_hash: "23f18774eee12a43c80d7162fba4d5fb10290128f31890a7cd0ff6c4e2948277",
    },
    Checkpoint {
        height: 400_000,
        block_hash: "a1d34d9e229c6e425f7a9d5dfa1fa35525e3f387ed664a04c6ef5cc609357057",
    },
    Checkpoint {
        height: 600_000,
        block_hash: "2a9461eb7ae8a934a111b2e9f570e81efaf02c5382a9c707cadce88e768a9205",
    },
    Checkpoint {
        height: 800_000,
        block_hash: "a1ed05e9671acce3cfa7dd283f0be5320b8d626fe84be4703fc8d3be95ffcc59",
    },
    Checkpoint {
        height: 1_000_000,
        block_hash: "d410152f30e4c21e0bc1d82ee80f757fd2223e8a1636774b8759101f4f21dd91",
    },
    Checkpoint {
        height: 1_500_000,
        block_hash: "23e3e5273df28de9036b7336894578873257e1b1a2d2d14ab9945b7333ce8707",
    },
    Checkpoint {
        height: 2_000_000,
        block_hash: "2d5892e15d7b2066d0b26aa150c4419676dbf7678d220b2d111c74c54c0fe6ad",
    },
    Checkpoint {
        height: 2_100_000,
        block_hash: "8246ae723a4581483d2ebd76d4d0c54d342373e94d762d910cc375f453bd1f18",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use monetaverde_types::Hash;

    #[test]
    fn hashes_are_well_formed() {
        for checkpoint in CHECKPOINTS {
            assert!(
                Hash::from_hex(checkpoint.block_hash).is_ok(),
                "bad checkpoint at {}",
                checkpoint.height
            );
        }
    }

    #[test]
    fn heights_are_strictly_increasing() {
        assert!(CHECKPOINTS.windows(2).all(|w| w[0].height < w[1].height));
    }
}
