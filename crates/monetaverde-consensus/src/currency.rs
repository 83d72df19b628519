//! The frozen currency rule set and its validating builder.

use crate::error::{CurrencyError, CurrencyResult};
use crate::genesis;
use crate::params;
use monetaverde_types::{
    account_address_as_string, parse_account_address_string, AccountPublicAddress, BlockTemplate,
    CachedBlock, Hash,
};
use tracing::debug;

/// Immutable consensus parameters plus the derived genesis block.
///
/// Built once by [`CurrencyBuilder`]; every rule operation is a pure
/// function of this value and its arguments, so a `Currency` can be
/// shared across threads without synchronization.
#[derive(Clone, Debug)]
pub struct Currency {
    pub(crate) max_block_number: u32,
    pub(crate) max_block_blob_size: usize,
    pub(crate) max_tx_size: usize,
    pub(crate) public_address_base58_prefix: u64,
    pub(crate) mined_money_unlock_window: u32,

    pub(crate) timestamp_check_window: usize,
    pub(crate) timestamp_check_window_v4: usize,
    pub(crate) block_future_time_limit: u64,

    pub(crate) money_supply: u64,
    pub(crate) emission_speed_factor: u32,
    pub(crate) reward_blocks_window: u32,
    pub(crate) block_granted_full_reward_zone: usize,
    pub(crate) block_granted_full_reward_zone_v1: usize,
    pub(crate) miner_tx_blob_reserved_size: usize,

    pub(crate) number_of_decimal_places: usize,
    pub(crate) coin: u64,
    pub(crate) minimum_fee: u64,
    pub(crate) default_dust_threshold: u64,

    pub(crate) difficulty_target: u64,
    pub(crate) testnet_difficulty_target: u64,
    pub(crate) difficulty_window: usize,
    pub(crate) difficulty_window_v2: usize,
    pub(crate) difficulty_window_v4: usize,
    pub(crate) difficulty_lag: usize,
    pub(crate) difficulty_lag_v2: usize,
    pub(crate) difficulty_cut: usize,

    pub(crate) max_block_size_initial: usize,
    pub(crate) max_block_size_growth_speed_numerator: u64,
    pub(crate) max_block_size_growth_speed_denominator: u64,

    pub(crate) locked_tx_allowed_delta_seconds: u64,
    pub(crate) locked_tx_allowed_delta_blocks: u64,
    pub(crate) mempool_tx_live_time: u64,
    pub(crate) mempool_tx_from_alt_block_live_time: u64,
    pub(crate) number_of_periods_to_forget_tx_deleted_from_pool: u64,

    pub(crate) fusion_tx_max_size: usize,
    pub(crate) fusion_tx_min_input_count: usize,
    pub(crate) fusion_tx_min_in_out_count_ratio: usize,

    pub(crate) upgrade_height_v2: u32,
    pub(crate) upgrade_height_v3: u32,
    pub(crate) upgrade_height_v4: u32,
    pub(crate) testnet_upgrade_height_v2: u32,
    pub(crate) testnet_upgrade_height_v3: u32,
    pub(crate) testnet_upgrade_height_v4: u32,
    pub(crate) upgrade_voting_threshold: u32,
    pub(crate) upgrade_voting_window: u32,
    pub(crate) upgrade_window: u32,

    pub(crate) min_mixin: usize,
    pub(crate) max_mixin: usize,
    pub(crate) mandatory_mixin_block_version: u8,

    pub(crate) blocks_file_name: String,
    pub(crate) block_indexes_file_name: String,
    pub(crate) tx_pool_file_name: String,

    pub(crate) testnet: bool,

    pub(crate) genesis_block: BlockTemplate,
    pub(crate) genesis_block_hash: Hash,
}

impl Currency {
    pub fn max_block_number(&self) -> u32 {
        self.max_block_number
    }
    pub fn max_block_blob_size(&self) -> usize {
        self.max_block_blob_size
    }
    pub fn max_tx_size(&self) -> usize {
        self.max_tx_size
    }
    pub fn public_address_base58_prefix(&self) -> u64 {
        self.public_address_base58_prefix
    }
    pub fn mined_money_unlock_window(&self) -> u32 {
        self.mined_money_unlock_window
    }
    pub fn timestamp_check_window(&self) -> usize {
        self.timestamp_check_window
    }
    pub fn block_future_time_limit(&self) -> u64 {
        self.block_future_time_limit
    }
    pub fn money_supply(&self) -> u64 {
        self.money_supply
    }
    pub fn emission_speed_factor(&self) -> u32 {
        self.emission_speed_factor
    }
    pub fn reward_blocks_window(&self) -> u32 {
        self.reward_blocks_window
    }
    pub fn block_granted_full_reward_zone(&self) -> usize {
        self.block_granted_full_reward_zone
    }
    pub fn miner_tx_blob_reserved_size(&self) -> usize {
        self.miner_tx_blob_reserved_size
    }
    pub fn number_of_decimal_places(&self) -> usize {
        self.number_of_decimal_places
    }
    /// Atomic units in one coin, `10^decimal_places`.
    pub fn coin(&self) -> u64 {
        self.coin
    }
    pub fn minimum_fee(&self) -> u64 {
        self.minimum_fee
    }
    pub fn default_dust_threshold(&self) -> u64 {
        self.default_dust_threshold
    }
    pub fn difficulty_target(&self) -> u64 {
        self.difficulty_target
    }
    pub fn testnet_difficulty_target(&self) -> u64 {
        self.testnet_difficulty_target
    }
    pub fn difficulty_window(&self) -> usize {
        self.difficulty_window
    }
    pub fn difficulty_lag(&self) -> usize {
        self.difficulty_lag
    }
    pub fn difficulty_cut(&self) -> usize {
        self.difficulty_cut
    }
    pub fn max_block_size_initial(&self) -> usize {
        self.max_block_size_initial
    }
    pub fn locked_tx_allowed_delta_seconds(&self) -> u64 {
        self.locked_tx_allowed_delta_seconds
    }
    pub fn locked_tx_allowed_delta_blocks(&self) -> u64 {
        self.locked_tx_allowed_delta_blocks
    }
    pub fn mempool_tx_live_time(&self) -> u64 {
        self.mempool_tx_live_time
    }
    pub fn mempool_tx_from_alt_block_live_time(&self) -> u64 {
        self.mempool_tx_from_alt_block_live_time
    }
    pub fn number_of_periods_to_forget_tx_deleted_from_pool(&self) -> u64 {
        self.number_of_periods_to_forget_tx_deleted_from_pool
    }
    pub fn fusion_tx_max_size(&self) -> usize {
        self.fusion_tx_max_size
    }
    pub fn fusion_tx_min_input_count(&self) -> usize {
        self.fusion_tx_min_input_count
    }
    pub fn fusion_tx_min_in_out_count_ratio(&self) -> usize {
        self.fusion_tx_min_in_out_count_ratio
    }
    pub fn testnet_upgrade_height_v2(&self) -> u32 {
        self.testnet_upgrade_height_v2
    }
    pub fn testnet_upgrade_height_v3(&self) -> u32 {
        self.testnet_upgrade_height_v3
    }
    pub fn testnet_upgrade_height_v4(&self) -> u32 {
        self.testnet_upgrade_height_v4
    }
    pub fn upgrade_voting_threshold(&self) -> u32 {
        self.upgrade_voting_threshold
    }
    pub fn upgrade_voting_window(&self) -> u32 {
        self.upgrade_voting_window
    }
    pub fn upgrade_window(&self) -> u32 {
        self.upgrade_window
    }
    pub fn min_mixin(&self) -> usize {
        self.min_mixin
    }
    pub fn max_mixin(&self) -> usize {
        self.max_mixin
    }
    pub fn mandatory_mixin_block_version(&self) -> u8 {
        self.mandatory_mixin_block_version
    }
    pub fn blocks_file_name(&self) -> &str {
        &self.blocks_file_name
    }
    pub fn block_indexes_file_name(&self) -> &str {
        &self.block_indexes_file_name
    }
    pub fn tx_pool_file_name(&self) -> &str {
        &self.tx_pool_file_name
    }
    pub fn is_testnet(&self) -> bool {
        self.testnet
    }
    pub fn genesis_block(&self) -> &BlockTemplate {
        &self.genesis_block
    }
    pub fn genesis_block_hash(&self) -> Hash {
        self.genesis_block_hash
    }

    /// Difficulty window for a block major version.
    pub fn difficulty_window_by_block_version(&self, block_major_version: u8) -> usize {
        if block_major_version >= params::BLOCK_MAJOR_VERSION_4 {
            self.difficulty_window_v4
        } else if block_major_version == params::BLOCK_MAJOR_VERSION_2
            || block_major_version == params::BLOCK_MAJOR_VERSION_3
        {
            self.difficulty_window_v2
        } else {
            self.difficulty_window
        }
    }

    pub fn difficulty_lag_by_block_version(&self, block_major_version: u8) -> usize {
        if block_major_version >= params::BLOCK_MAJOR_VERSION_2 {
            self.difficulty_lag_v2
        } else {
            self.difficulty_lag
        }
    }

    pub fn difficulty_cut_by_block_version(&self, _block_major_version: u8) -> usize {
        self.difficulty_cut
    }

    /// How many recent blocks a retarget caller must supply.
    pub fn difficulty_blocks_count_by_block_version(&self, block_major_version: u8) -> usize {
        if block_major_version == params::BLOCK_MAJOR_VERSION_2 {
            self.difficulty_window + self.difficulty_lag
        } else {
            self.difficulty_window_by_block_version(block_major_version)
                + self.difficulty_lag_by_block_version(block_major_version)
        }
    }

    /// Block size up to which the full reward is granted.
    pub fn block_granted_full_reward_zone_by_block_version(
        &self,
        block_major_version: u8,
    ) -> usize {
        if block_major_version >= params::BLOCK_MAJOR_VERSION_2 {
            self.block_granted_full_reward_zone
        } else {
            self.block_granted_full_reward_zone_v1
        }
    }

    /// Median window for timestamp sanity checks.
    pub fn timestamp_check_window_by_block_version(&self, block_major_version: u8) -> usize {
        if block_major_version >= params::BLOCK_MAJOR_VERSION_4 {
            self.timestamp_check_window_v4
        } else {
            self.timestamp_check_window
        }
    }

    /// First height at which blocks of `major_version` are valid.
    /// Unknown versions are never valid.
    pub fn upgrade_height(&self, major_version: u8) -> u32 {
        match major_version {
            params::BLOCK_MAJOR_VERSION_1 => 0,
            params::BLOCK_MAJOR_VERSION_2 => self.upgrade_height_v2,
            params::BLOCK_MAJOR_VERSION_3 => self.upgrade_height_v3,
            params::BLOCK_MAJOR_VERSION_4 => self.upgrade_height_v4,
            _ => u32::MAX,
        }
    }

    /// Render an account address with this chain's base58 prefix.
    pub fn account_address_as_string(&self, address: &AccountPublicAddress) -> String {
        account_address_as_string(self.public_address_base58_prefix, address)
    }

    /// Parse an account address, requiring this chain's prefix.
    pub fn parse_account_address_string(
        &self,
        s: &str,
    ) -> CurrencyResult<AccountPublicAddress> {
        let (prefix, address) =
            parse_account_address_string(s).map_err(|e| CurrencyError::Parse(e.to_string()))?;
        if prefix != self.public_address_base58_prefix {
            return Err(CurrencyError::AddressPrefixMismatch {
                found: prefix,
                expected: self.public_address_base58_prefix,
            });
        }
        Ok(address)
    }
}

/// Builder for [`Currency`].
///
/// Seeded with the published network defaults; setters that admit invalid
/// values reject them immediately, everything else assigns unconditionally.
#[derive(Clone, Debug)]
pub struct CurrencyBuilder {
    max_block_number: u32,
    max_block_blob_size: usize,
    max_tx_size: usize,
    public_address_base58_prefix: u64,
    mined_money_unlock_window: u32,
    timestamp_check_window: usize,
    timestamp_check_window_v4: usize,
    block_future_time_limit: u64,
    money_supply: u64,
    emission_speed_factor: u32,
    reward_blocks_window: u32,
    block_granted_full_reward_zone: usize,
    block_granted_full_reward_zone_v1: usize,
    miner_tx_blob_reserved_size: usize,
    number_of_decimal_places: usize,
    coin: u64,
    minimum_fee: u64,
    default_dust_threshold: u64,
    difficulty_target: u64,
    testnet_difficulty_target: u64,
    difficulty_window: usize,
    difficulty_window_v2: usize,
    difficulty_window_v4: usize,
    difficulty_lag: usize,
    difficulty_lag_v2: usize,
    difficulty_cut: usize,
    max_block_size_initial: usize,
    max_block_size_growth_speed_numerator: u64,
    max_block_size_growth_speed_denominator: u64,
    locked_tx_allowed_delta_seconds: u64,
    locked_tx_allowed_delta_blocks: u64,
    mempool_tx_live_time: u64,
    mempool_tx_from_alt_block_live_time: u64,
    number_of_periods_to_forget_tx_deleted_from_pool: u64,
    fusion_tx_max_size: usize,
    fusion_tx_min_input_count: usize,
    fusion_tx_min_in_out_count_ratio: usize,
    upgrade_height_v2: u32,
    upgrade_height_v3: u32,
    upgrade_height_v4: u32,
    testnet_upgrade_height_v2: u32,
    testnet_upgrade_height_v3: u32,
    testnet_upgrade_height_v4: u32,
    upgrade_voting_threshold: u32,
    upgrade_voting_window: u32,
    upgrade_window: u32,
    min_mixin: usize,
    max_mixin: usize,
    mandatory_mixin_block_version: u8,
    blocks_file_name: String,
    block_indexes_file_name: String,
    tx_pool_file_name: String,
    testnet: bool,
}

impl Default for CurrencyBuilder {
    fn default() -> Self {
        Self {
            max_block_number: params::MAX_BLOCK_NUMBER,
            max_block_blob_size: params::MAX_BLOCK_BLOB_SIZE,
            max_tx_size: params::MAX_TX_SIZE,
            public_address_base58_prefix: params::PUBLIC_ADDRESS_BASE58_PREFIX,
            mined_money_unlock_window: params::MINED_MONEY_UNLOCK_WINDOW,
            timestamp_check_window: params::BLOCKCHAIN_TIMESTAMP_CHECK_WINDOW,
            timestamp_check_window_v4: params::BLOCKCHAIN_TIMESTAMP_CHECK_WINDOW_V4,
            block_future_time_limit: params::BLOCK_FUTURE_TIME_LIMIT,
            money_supply: params::MONEY_SUPPLY,
            emission_speed_factor: params::EMISSION_SPEED_FACTOR,
            reward_blocks_window: params::REWARD_BLOCKS_WINDOW,
            block_granted_full_reward_zone: params::BLOCK_GRANTED_FULL_REWARD_ZONE,
            block_granted_full_reward_zone_v1: params::BLOCK_GRANTED_FULL_REWARD_ZONE_V1,
            miner_tx_blob_reserved_size: params::COINBASE_BLOB_RESERVED_SIZE,
            number_of_decimal_places: params::DISPLAY_DECIMAL_POINT,
            coin: 10u64.pow(params::DISPLAY_DECIMAL_POINT as u32),
            minimum_fee: params::MINIMUM_FEE,
            default_dust_threshold: params::DEFAULT_DUST_THRESHOLD,
            difficulty_target: params::DIFFICULTY_TARGET,
            testnet_difficulty_target: params::TESTNET_DIFFICULTY_TARGET,
            difficulty_window: params::DIFFICULTY_WINDOW,
            difficulty_window_v2: params::DIFFICULTY_WINDOW_V2,
            difficulty_window_v4: params::DIFFICULTY_WINDOW_V4,
            difficulty_lag: params::DIFFICULTY_LAG,
            difficulty_lag_v2: params::DIFFICULTY_LAG_V2,
            difficulty_cut: params::DIFFICULTY_CUT,
            max_block_size_initial: params::MAX_BLOCK_SIZE_INITIAL,
            max_block_size_growth_speed_numerator: params::MAX_BLOCK_SIZE_GROWTH_SPEED_NUMERATOR,
            max_block_size_growth_speed_denominator:
                params::MAX_BLOCK_SIZE_GROWTH_SPEED_DENOMINATOR,
            locked_tx_allowed_delta_seconds: params::LOCKED_TX_ALLOWED_DELTA_SECONDS,
            locked_tx_allowed_delta_blocks: params::LOCKED_TX_ALLOWED_DELTA_BLOCKS,
            mempool_tx_live_time: params::MEMPOOL_TX_LIVETIME,
            mempool_tx_from_alt_block_live_time: params::MEMPOOL_TX_FROM_ALT_BLOCK_LIVETIME,
            number_of_periods_to_forget_tx_deleted_from_pool:
                params::NUMBER_OF_PERIODS_TO_FORGET_TX_DELETED_FROM_POOL,
            fusion_tx_max_size: params::FUSION_TX_MAX_SIZE,
            fusion_tx_min_input_count: params::FUSION_TX_MIN_INPUT_COUNT,
            fusion_tx_min_in_out_count_ratio: params::FUSION_TX_MIN_IN_OUT_COUNT_RATIO,
            upgrade_height_v2: params::UPGRADE_HEIGHT_V2,
            upgrade_height_v3: params::UPGRADE_HEIGHT_V3,
            upgrade_height_v4: params::UPGRADE_HEIGHT_V4,
            testnet_upgrade_height_v2: params::TESTNET_UPGRADE_HEIGHT_V2,
            testnet_upgrade_height_v3: params::TESTNET_UPGRADE_HEIGHT_V3,
            testnet_upgrade_height_v4: params::TESTNET_UPGRADE_HEIGHT_V4,
            upgrade_voting_threshold: params::UPGRADE_VOTING_THRESHOLD,
            upgrade_voting_window: params::UPGRADE_VOTING_WINDOW,
            upgrade_window: params::UPGRADE_WINDOW,
            min_mixin: params::MIN_MIXIN,
            max_mixin: params::MAX_MIXIN,
            mandatory_mixin_block_version: params::MANDATORY_MIXIN_BLOCK_VERSION,
            blocks_file_name: params::BLOCKS_FILENAME.to_string(),
            block_indexes_file_name: params::BLOCKINDEXES_FILENAME.to_string(),
            tx_pool_file_name: params::POOLDATA_FILENAME.to_string(),
            testnet: false,
        }
    }
}

impl CurrencyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_block_number(mut self, val: u32) -> Self {
        self.max_block_number = val;
        self
    }
    pub fn max_block_blob_size(mut self, val: usize) -> Self {
        self.max_block_blob_size = val;
        self
    }
    pub fn max_tx_size(mut self, val: usize) -> Self {
        self.max_tx_size = val;
        self
    }
    pub fn public_address_base58_prefix(mut self, val: u64) -> Self {
        self.public_address_base58_prefix = val;
        self
    }
    pub fn mined_money_unlock_window(mut self, val: u32) -> Self {
        self.mined_money_unlock_window = val;
        self
    }
    pub fn timestamp_check_window(mut self, val: usize) -> Self {
        self.timestamp_check_window = val;
        self
    }
    pub fn timestamp_check_window_v4(mut self, val: usize) -> Self {
        self.timestamp_check_window_v4 = val;
        self
    }
    pub fn block_future_time_limit(mut self, val: u64) -> Self {
        self.block_future_time_limit = val;
        self
    }
    pub fn money_supply(mut self, val: u64) -> Self {
        self.money_supply = val;
        self
    }

    /// Emission shift; must stay inside the 64-bit supply.
    pub fn emission_speed_factor(mut self, val: u32) -> CurrencyResult<Self> {
        if val == 0 || val > 64 {
            return Err(CurrencyError::InvalidParameter {
                name: "emission_speed_factor",
                reason: format!("{val} is outside 1..=64"),
            });
        }
        self.emission_speed_factor = val;
        Ok(self)
    }

    pub fn reward_blocks_window(mut self, val: u32) -> Self {
        self.reward_blocks_window = val;
        self
    }
    pub fn block_granted_full_reward_zone(mut self, val: usize) -> Self {
        self.block_granted_full_reward_zone = val;
        self
    }
    pub fn block_granted_full_reward_zone_v1(mut self, val: usize) -> Self {
        self.block_granted_full_reward_zone_v1 = val;
        self
    }
    pub fn miner_tx_blob_reserved_size(mut self, val: usize) -> Self {
        self.miner_tx_blob_reserved_size = val;
        self
    }

    /// Sets the display precision and freezes `coin = 10^val`.
    pub fn number_of_decimal_places(mut self, val: usize) -> CurrencyResult<Self> {
        if val > 19 {
            return Err(CurrencyError::InvalidParameter {
                name: "number_of_decimal_places",
                reason: format!("10^{val} does not fit into 64 bits"),
            });
        }
        self.number_of_decimal_places = val;
        self.coin = 10u64.pow(val as u32);
        Ok(self)
    }

    pub fn minimum_fee(mut self, val: u64) -> Self {
        self.minimum_fee = val;
        self
    }
    pub fn default_dust_threshold(mut self, val: u64) -> Self {
        self.default_dust_threshold = val;
        self
    }
    pub fn difficulty_target(mut self, val: u64) -> Self {
        self.difficulty_target = val;
        self
    }
    pub fn testnet_difficulty_target(mut self, val: u64) -> Self {
        self.testnet_difficulty_target = val;
        self
    }

    pub fn difficulty_window(mut self, val: usize) -> CurrencyResult<Self> {
        if val < 2 {
            return Err(CurrencyError::InvalidParameter {
                name: "difficulty_window",
                reason: format!("{val} is below the minimum of 2"),
            });
        }
        self.difficulty_window = val;
        Ok(self)
    }

    pub fn difficulty_window_v2(mut self, val: usize) -> Self {
        self.difficulty_window_v2 = val;
        self
    }
    pub fn difficulty_window_v4(mut self, val: usize) -> Self {
        self.difficulty_window_v4 = val;
        self
    }
    pub fn difficulty_lag(mut self, val: usize) -> Self {
        self.difficulty_lag = val;
        self
    }
    pub fn difficulty_lag_v2(mut self, val: usize) -> Self {
        self.difficulty_lag_v2 = val;
        self
    }
    pub fn difficulty_cut(mut self, val: usize) -> Self {
        self.difficulty_cut = val;
        self
    }
    pub fn max_block_size_initial(mut self, val: usize) -> Self {
        self.max_block_size_initial = val;
        self
    }
    pub fn max_block_size_growth_speed_numerator(mut self, val: u64) -> Self {
        self.max_block_size_growth_speed_numerator = val;
        self
    }
    pub fn max_block_size_growth_speed_denominator(mut self, val: u64) -> Self {
        self.max_block_size_growth_speed_denominator = val;
        self
    }
    pub fn locked_tx_allowed_delta_seconds(mut self, val: u64) -> Self {
        self.locked_tx_allowed_delta_seconds = val;
        self
    }
    pub fn locked_tx_allowed_delta_blocks(mut self, val: u64) -> Self {
        self.locked_tx_allowed_delta_blocks = val;
        self
    }
    pub fn mempool_tx_live_time(mut self, val: u64) -> Self {
        self.mempool_tx_live_time = val;
        self
    }
    pub fn mempool_tx_from_alt_block_live_time(mut self, val: u64) -> Self {
        self.mempool_tx_from_alt_block_live_time = val;
        self
    }
    pub fn number_of_periods_to_forget_tx_deleted_from_pool(mut self, val: u64) -> Self {
        self.number_of_periods_to_forget_tx_deleted_from_pool = val;
        self
    }
    pub fn fusion_tx_max_size(mut self, val: usize) -> Self {
        self.fusion_tx_max_size = val;
        self
    }
    pub fn fusion_tx_min_input_count(mut self, val: usize) -> Self {
        self.fusion_tx_min_input_count = val;
        self
    }
    pub fn fusion_tx_min_in_out_count_ratio(mut self, val: usize) -> Self {
        self.fusion_tx_min_in_out_count_ratio = val;
        self
    }
    pub fn upgrade_height_v2(mut self, val: u32) -> Self {
        self.upgrade_height_v2 = val;
        self
    }
    pub fn upgrade_height_v3(mut self, val: u32) -> Self {
        self.upgrade_height_v3 = val;
        self
    }
    pub fn upgrade_height_v4(mut self, val: u32) -> Self {
        self.upgrade_height_v4 = val;
        self
    }
    pub fn testnet_upgrade_height_v2(mut self, val: u32) -> Self {
        self.testnet_upgrade_height_v2 = val;
        self
    }
    pub fn testnet_upgrade_height_v3(mut self, val: u32) -> Self {
        self.testnet_upgrade_height_v3 = val;
        self
    }
    pub fn testnet_upgrade_height_v4(mut self, val: u32) -> Self {
        self.testnet_upgrade_height_v4 = val;
        self
    }

    /// Percent of votes arming an upgrade; a percentage, never zero.
    pub fn upgrade_voting_threshold(mut self, val: u32) -> CurrencyResult<Self> {
        if val == 0 || val > 100 {
            return Err(CurrencyError::InvalidParameter {
                name: "upgrade_voting_threshold",
                reason: format!("{val} is outside 1..=100"),
            });
        }
        self.upgrade_voting_threshold = val;
        Ok(self)
    }

    pub fn upgrade_voting_window(mut self, val: u32) -> CurrencyResult<Self> {
        if val < 2 {
            return Err(CurrencyError::InvalidParameter {
                name: "upgrade_voting_window",
                reason: format!("{val} is below the minimum of 2"),
            });
        }
        self.upgrade_voting_window = val;
        Ok(self)
    }

    pub fn upgrade_window(mut self, val: u32) -> CurrencyResult<Self> {
        if val == 0 {
            return Err(CurrencyError::InvalidParameter {
                name: "upgrade_window",
                reason: "must be non-zero".to_string(),
            });
        }
        self.upgrade_window = val;
        Ok(self)
    }

    pub fn min_mixin(mut self, val: usize) -> Self {
        self.min_mixin = val;
        self
    }
    pub fn max_mixin(mut self, val: usize) -> Self {
        self.max_mixin = val;
        self
    }
    pub fn mandatory_mixin_block_version(mut self, val: u8) -> Self {
        self.mandatory_mixin_block_version = val;
        self
    }
    pub fn blocks_file_name(mut self, val: impl Into<String>) -> Self {
        self.blocks_file_name = val.into();
        self
    }
    pub fn block_indexes_file_name(mut self, val: impl Into<String>) -> Self {
        self.block_indexes_file_name = val.into();
        self
    }
    pub fn tx_pool_file_name(mut self, val: impl Into<String>) -> Self {
        self.tx_pool_file_name = val.into();
        self
    }
    pub fn testnet(mut self, val: bool) -> Self {
        self.testnet = val;
        self
    }

    /// Validate the cross-field invariants, derive the genesis block and
    /// freeze the rule set. Testnet overrides are applied last.
    pub fn build(self) -> CurrencyResult<Currency> {
        if 2 * self.difficulty_cut > self.difficulty_window - 2 {
            return Err(CurrencyError::InvalidParameter {
                name: "difficulty_cut",
                reason: format!(
                    "cut {} is too large for window {}",
                    self.difficulty_cut, self.difficulty_window
                ),
            });
        }

        let genesis_block = genesis::generate_genesis_block(self.testnet)?;
        let genesis_block_hash = CachedBlock::new(genesis_block.clone()).block_hash();

        let (upgrade_height_v2, upgrade_height_v3, upgrade_height_v4, difficulty_target) =
            if self.testnet {
                (
                    self.testnet_upgrade_height_v2,
                    self.testnet_upgrade_height_v3,
                    self.testnet_upgrade_height_v4,
                    self.testnet_difficulty_target,
                )
            } else {
                (
                    self.upgrade_height_v2,
                    self.upgrade_height_v3,
                    self.upgrade_height_v4,
                    self.difficulty_target,
                )
            };

        let (blocks_file_name, block_indexes_file_name, tx_pool_file_name) = if self.testnet {
            (
                format!("testnet_{}", self.blocks_file_name),
                format!("testnet_{}", self.block_indexes_file_name),
                format!("testnet_{}", self.tx_pool_file_name),
            )
        } else {
            (
                self.blocks_file_name,
                self.block_indexes_file_name,
                self.tx_pool_file_name,
            )
        };

        if self.testnet {
            debug!(
                upgrade_height_v2,
                upgrade_height_v3,
                upgrade_height_v4,
                target_seconds = difficulty_target,
                "testnet parameter overrides active"
            );
        }

        Ok(Currency {
            max_block_number: self.max_block_number,
            max_block_blob_size: self.max_block_blob_size,
            max_tx_size: self.max_tx_size,
            public_address_base58_prefix: self.public_address_base58_prefix,
            mined_money_unlock_window: self.mined_money_unlock_window,
            timestamp_check_window: self.timestamp_check_window,
            timestamp_check_window_v4: self.timestamp_check_window_v4,
            block_future_time_limit: self.block_future_time_limit,
            money_supply: self.money_supply,
            emission_speed_factor: self.emission_speed_factor,
            reward_blocks_window: self.reward_blocks_window,
            block_granted_full_reward_zone: self.block_granted_full_reward_zone,
            block_granted_full_reward_zone_v1: self.block_granted_full_reward_zone_v1,
            miner_tx_blob_reserved_size: self.miner_tx_blob_reserved_size,
            number_of_decimal_places: self.number_of_decimal_places,
            coin: self.coin,
            minimum_fee: self.minimum_fee,
            default_dust_threshold: self.default_dust_threshold,
            difficulty_target,
            testnet_difficulty_target: self.testnet_difficulty_target,
            difficulty_window: self.difficulty_window,
            difficulty_window_v2: self.difficulty_window_v2,
            difficulty_window_v4: self.difficulty_window_v4,
            difficulty_lag: self.difficulty_lag,
            difficulty_lag_v2: self.difficulty_lag_v2,
            difficulty_cut: self.difficulty_cut,
            max_block_size_initial: self.max_block_size_initial,
            max_block_size_growth_speed_numerator: self.max_block_size_growth_speed_numerator,
            max_block_size_growth_speed_denominator: self.max_block_size_growth_speed_denominator,
            locked_tx_allowed_delta_seconds: self.locked_tx_allowed_delta_seconds,
            locked_tx_allowed_delta_blocks: self.locked_tx_allowed_delta_blocks,
            mempool_tx_live_time: self.mempool_tx_live_time,
            mempool_tx_from_alt_block_live_time: self.mempool_tx_from_alt_block_live_time,
            number_of_periods_to_forget_tx_deleted_from_pool: self
                .number_of_periods_to_forget_tx_deleted_from_pool,
            fusion_tx_max_size: self.fusion_tx_max_size,
            fusion_tx_min_input_count: self.fusion_tx_min_input_count,
            fusion_tx_min_in_out_count_ratio: self.fusion_tx_min_in_out_count_ratio,
            upgrade_height_v2,
            upgrade_height_v3,
            upgrade_height_v4,
            testnet_upgrade_height_v2: self.testnet_upgrade_height_v2,
            testnet_upgrade_height_v3: self.testnet_upgrade_height_v3,
            testnet_upgrade_height_v4: self.testnet_upgrade_height_v4,
            upgrade_voting_threshold: self.upgrade_voting_threshold,
            upgrade_voting_window: self.upgrade_voting_window,
            upgrade_window: self.upgrade_window,
            min_mixin: self.min_mixin,
            max_mixin: self.max_mixin,
            mandatory_mixin_block_version: self.mandatory_mixin_block_version,
            blocks_file_name,
            block_indexes_file_name,
            tx_pool_file_name,
            testnet: self.testnet,
            genesis_block,
            genesis_block_hash,
        })
    }
}
