//! # monetaverde-consensus
//!
//! Consensus rules for the MonetaVerde blockchain.
//!
//! This crate provides:
//! - block reward computation from difficulty (fixed-point base-2 log)
//!   with the quadratic block-size penalty
//! - four generations of difficulty retargeting with version dispatch
//! - proof-of-work validation, merge-mined from major version 2
//! - miner (coinbase) transaction construction
//! - fusion transaction recognition
//! - amount formatting, parsing and canonical decomposition
//! - genesis block derivation and the published checkpoints
//!
//! Everything hangs off an immutable [`Currency`] value built once by
//! [`CurrencyBuilder`]; all operations are pure functions of that value
//! and their arguments, safe to call from any number of threads.

mod amounts;
mod checkpoints;
mod coinbase;
mod currency;
mod difficulty;
mod error;
mod fusion;
mod genesis;
mod pow;
mod reward;

pub use amounts::{decompose_amount, PRETTY_AMOUNTS};
pub use checkpoints::{Checkpoint, CHECKPOINTS};
pub use coinbase::approximate_maximum_input_count;
pub use currency::{Currency, CurrencyBuilder};
pub use difficulty::Difficulty;
pub use error::{CurrencyError, CurrencyResult};
pub use pow::check_hash;
pub use reward::{log2_fix, penalized_amount, LOG_FIX_PRECISION};

/// Network parameters.
///
/// These are the published defaults the builder is seeded with; testnet
/// variants carry a `TESTNET_` prefix and replace their mainnet
/// counterparts when the testnet flag is set.
pub mod params {
    /// Chain name, used by collaborators for data directories.
    pub const CRYPTONOTE_NAME: &str = "monetaverde";

    /// Hard-coded genesis coinbase transaction.
    pub const GENESIS_COINBASE_TX_HEX: &str =
        "013c01ff00002101274a48ea82cb5d54547e6dd7ed87af943761d82c9050f60f56da4a7e71baa2f5";

    // ------------------------------------------------------------------
    // Limits
    // ------------------------------------------------------------------

    pub const MAX_BLOCK_NUMBER: u32 = 500_000_000;
    pub const MAX_BLOCK_BLOB_SIZE: usize = 500_000_000;
    pub const MAX_TX_SIZE: usize = 1_000_000_000;

    // ------------------------------------------------------------------
    // Coinage
    // ------------------------------------------------------------------

    /// Addresses start with "Vd".
    pub const PUBLIC_ADDRESS_BASE58_PREFIX: u64 = 6699;
    /// Atomic units shown after the decimal point.
    pub const DISPLAY_DECIMAL_POINT: usize = 12;
    pub const MINIMUM_FEE: u64 = 1_000_000;
    pub const DEFAULT_DUST_THRESHOLD: u64 = 1_000_000;

    // ------------------------------------------------------------------
    // Emission
    // ------------------------------------------------------------------

    /// Total number of atomic units to be generated.
    pub const MONEY_SUPPLY: u64 = u64::MAX;
    pub const EMISSION_SPEED_FACTOR: u32 = 23;
    pub const MINED_MONEY_UNLOCK_WINDOW: u32 = 60;
    pub const REWARD_BLOCKS_WINDOW: u32 = 100;
    pub const BLOCK_GRANTED_FULL_REWARD_ZONE: usize = 20_000;
    pub const BLOCK_GRANTED_FULL_REWARD_ZONE_V1: usize = 20_000;
    pub const COINBASE_BLOB_RESERVED_SIZE: usize = 600;

    // ------------------------------------------------------------------
    // Difficulty
    // ------------------------------------------------------------------

    /// Target block interval in seconds.
    pub const DIFFICULTY_TARGET: u64 = 60;
    pub const EXPECTED_NUMBER_OF_BLOCKS_PER_DAY: u64 = 24 * 60 * 60 / DIFFICULTY_TARGET;
    pub const DIFFICULTY_WINDOW: usize = 720;
    pub const DIFFICULTY_WINDOW_V2: usize = 720;
    pub const DIFFICULTY_WINDOW_V4: usize = 720;
    pub const DIFFICULTY_CUT: usize = 60;
    pub const DIFFICULTY_LAG: usize = 15;
    pub const DIFFICULTY_LAG_V2: usize = 15;

    // ------------------------------------------------------------------
    // Block size growth
    // ------------------------------------------------------------------

    pub const MAX_BLOCK_SIZE_INITIAL: usize = 1_000_000;
    pub const MAX_BLOCK_SIZE_GROWTH_SPEED_NUMERATOR: u64 = 100 * 1024;
    pub const MAX_BLOCK_SIZE_GROWTH_SPEED_DENOMINATOR: u64 =
        365 * 24 * 60 * 60 / DIFFICULTY_TARGET;

    // ------------------------------------------------------------------
    // Time and mempool
    // ------------------------------------------------------------------

    pub const BLOCK_FUTURE_TIME_LIMIT: u64 = 60 * 60 * 2;
    pub const BLOCKCHAIN_TIMESTAMP_CHECK_WINDOW: usize = 60;
    pub const BLOCKCHAIN_TIMESTAMP_CHECK_WINDOW_V4: usize = 11;
    pub const LOCKED_TX_ALLOWED_DELTA_BLOCKS: u64 = 1;
    pub const LOCKED_TX_ALLOWED_DELTA_SECONDS: u64 =
        DIFFICULTY_TARGET * LOCKED_TX_ALLOWED_DELTA_BLOCKS;
    pub const MEMPOOL_TX_LIVETIME: u64 = 60 * 60 * 24;
    pub const MEMPOOL_TX_FROM_ALT_BLOCK_LIVETIME: u64 = 60 * 60 * 24 * 7;
    pub const NUMBER_OF_PERIODS_TO_FORGET_TX_DELETED_FROM_POOL: u64 = 7;

    // ------------------------------------------------------------------
    // Fusion
    // ------------------------------------------------------------------

    pub const FUSION_TX_MAX_SIZE: usize = BLOCK_GRANTED_FULL_REWARD_ZONE * 15 / 100;
    pub const FUSION_TX_MIN_INPUT_COUNT: usize = 12;
    pub const FUSION_TX_MIN_IN_OUT_COUNT_RATIO: usize = 4;

    // ------------------------------------------------------------------
    // Versioning
    // ------------------------------------------------------------------

    pub const UPGRADE_HEIGHT_V2: u32 = 0;
    pub const UPGRADE_HEIGHT_V3: u32 = u32::MAX;
    pub const UPGRADE_HEIGHT_V4: u32 = u32::MAX;
    /// Percent of in-window votes required to arm an upgrade.
    pub const UPGRADE_VOTING_THRESHOLD: u32 = 90;
    pub const UPGRADE_VOTING_WINDOW: u32 = EXPECTED_NUMBER_OF_BLOCKS_PER_DAY as u32;
    pub const UPGRADE_WINDOW: u32 = EXPECTED_NUMBER_OF_BLOCKS_PER_DAY as u32;

    pub const TESTNET_UPGRADE_HEIGHT_V2: u32 = 2;
    pub const TESTNET_UPGRADE_HEIGHT_V3: u32 = 5;
    pub const TESTNET_UPGRADE_HEIGHT_V4: u32 = 10;
    pub const TESTNET_DIFFICULTY_TARGET: u64 = 15;

    // ------------------------------------------------------------------
    // Mixin policy
    // ------------------------------------------------------------------

    pub const MANDATORY_MIXIN_BLOCK_VERSION: u8 = 4;
    pub const MIN_MIXIN: usize = 1;
    pub const MAX_MIXIN: usize = 101;

    // ------------------------------------------------------------------
    // Wire versions
    // ------------------------------------------------------------------

    pub const TRANSACTION_VERSION_1: u8 = 1;
    pub const TRANSACTION_VERSION_2: u8 = 2;
    pub const CURRENT_TRANSACTION_VERSION: u8 = TRANSACTION_VERSION_1;
    pub const BLOCK_MAJOR_VERSION_1: u8 = 1;
    pub const BLOCK_MAJOR_VERSION_2: u8 = 2;
    pub const BLOCK_MAJOR_VERSION_3: u8 = 3;
    pub const BLOCK_MAJOR_VERSION_4: u8 = 4;
    pub const BLOCK_MINOR_VERSION_0: u8 = 0;
    pub const BLOCK_MINOR_VERSION_1: u8 = 1;

    // ------------------------------------------------------------------
    // Persisted file names
    // ------------------------------------------------------------------

    pub const BLOCKS_FILENAME: &str = "blocks.dat";
    pub const BLOCKINDEXES_FILENAME: &str = "blockindexes.dat";
    pub const POOLDATA_FILENAME: &str = "poolstate.dat";
    pub const P2P_NET_DATA_FILENAME: &str = "p2pstate.dat";
    pub const MINER_CONFIG_FILE_NAME: &str = "miner_conf.json";

    // ------------------------------------------------------------------
    // Network defaults, published for the p2p and rpc layers
    // ------------------------------------------------------------------

    pub const P2P_DEFAULT_PORT: u16 = 26080;
    pub const RPC_DEFAULT_PORT: u16 = 26081;

    pub const BLOCKS_IDS_SYNCHRONIZING_DEFAULT_COUNT: usize = 10_000;
    pub const BLOCKS_SYNCHRONIZING_DEFAULT_COUNT: usize = 300;
    pub const COMMAND_RPC_GET_BLOCKS_FAST_MAX_COUNT: usize = 1_000;

    pub const P2P_LOCAL_WHITE_PEERLIST_LIMIT: usize = 1_000;
    pub const P2P_LOCAL_GRAY_PEERLIST_LIMIT: usize = 5_000;
    pub const P2P_CONNECTION_MAX_WRITE_BUFFER_SIZE: usize = 64 * 1024 * 1024;
    pub const P2P_DEFAULT_CONNECTIONS_COUNT: u32 = 8;
    pub const P2P_DEFAULT_WHITELIST_CONNECTIONS_PERCENT: usize = 70;
    /// Seconds between handshakes.
    pub const P2P_DEFAULT_HANDSHAKE_INTERVAL: u32 = 60;
    pub const P2P_DEFAULT_PACKET_MAX_SIZE: u32 = 100_000_000;
    pub const P2P_DEFAULT_PEERS_IN_HANDSHAKE: u32 = 250;
    /// Milliseconds.
    pub const P2P_DEFAULT_CONNECTION_TIMEOUT: u32 = 5_000;
    /// Milliseconds.
    pub const P2P_DEFAULT_PING_CONNECTION_TIMEOUT: u32 = 2_000;
    /// Milliseconds.
    pub const P2P_DEFAULT_INVOKE_TIMEOUT: u64 = 60 * 2 * 1000;
    /// Milliseconds.
    pub const P2P_DEFAULT_HANDSHAKE_INVOKE_TIMEOUT: u64 = 5_000;

    /// Key the p2p stats commands are authenticated against.
    pub const P2P_STAT_TRUSTED_PUB_KEY: &str =
        "db9eabe971890012a4071a96468155c2c360f80d18e73caa97bffd3b7381eed7";

    pub const SEED_NODES: [&str; 5] = [
        "176.9.47.243:8580",
        "66.85.133.156:26080",
        "35.227.28.16:26080",
        "144.217.84.27:26080",
        "51.38.127.186:26080",
    ];
}
