//! Consensus constants of the mainnet rule family.

use alloy_primitives::{address, b256, Address, B256, U256};

/// The Frontier contract code size limit: effectively unlimited.
pub const FRONTIER_CONTRACT_SIZE_LIMIT: usize = i32::MAX as usize;

/// The contract code size limit introduced by Spurious Dragon ([EIP-170](https://eips.ethereum.org/EIPS/eip-170)).
pub const SPURIOUS_DRAGON_CONTRACT_SIZE_LIMIT: usize = 24_576;

/// The init code size limit introduced by Shanghai ([EIP-3860](https://eips.ethereum.org/EIPS/eip-3860)).
pub const SHANGHAI_INIT_CODE_SIZE_LIMIT: usize = 2 * SPURIOUS_DRAGON_CONTRACT_SIZE_LIMIT;

/// The default maximum depth of the message frame stack.
pub const DEFAULT_MAX_STACK_SIZE: usize = 1024;

/// Multiplier for converting ether to wei.
pub const ETH_TO_WEI: u128 = 1_000_000_000_000_000_000;

/// The Frontier block reward: 5 ETH.
pub const FRONTIER_BLOCK_REWARD: U256 = U256::from_limbs([5_000_000_000_000_000_000, 0, 0, 0]);

/// The block reward from Byzantium ([EIP-649](https://eips.ethereum.org/EIPS/eip-649)): 3 ETH.
pub const BYZANTIUM_BLOCK_REWARD: U256 = U256::from_limbs([3_000_000_000_000_000_000, 0, 0, 0]);

/// The block reward from Constantinople ([EIP-1234](https://eips.ethereum.org/EIPS/eip-1234)): 2 ETH.
pub const CONSTANTINOPLE_BLOCK_REWARD: U256 = U256::from_limbs([2_000_000_000_000_000_000, 0, 0, 0]);

/// The RIPEMD-160 precompile address.
///
/// A consensus bug at mainnet transaction `0xcf416c53` deleted this account while it
/// was empty even though the message execution scope failed. The exception is carried
/// as first-class data from Spurious Dragon on.
pub const RIPEMD160_PRECOMPILE: Address = address!("0000000000000000000000000000000000000003");

/// Accounts that are force-deleted when empty regardless of the execution outcome,
/// from Spurious Dragon on.
pub const SPURIOUS_DRAGON_FORCE_DELETE_WHEN_EMPTY_ADDRESSES: [Address; 1] =
    [RIPEMD160_PRECOMPILE];

/// The bound divisor of gas limits: a block may move its gas limit by at most
/// `parent_gas_limit / 1024` in either direction.
pub const GAS_LIMIT_BOUND_DIVISOR: u64 = 1024;

/// Minimum gas limit allowed for any block.
pub const MIN_GAS_LIMIT: u64 = 5000;

/// Maximum allowed size of the header extra data field, in bytes.
pub const MAXIMUM_EXTRA_DATA_SIZE: usize = 32;

/// Initial base fee of the first EIP-1559 block, in wei.
pub const EIP1559_INITIAL_BASE_FEE: u64 = 1_000_000_000;

/// Gas consumed per blob ([EIP-4844](https://eips.ethereum.org/EIPS/eip-4844)).
pub const GAS_PER_BLOB: u64 = 1 << 17;

/// Target blob gas per block: three blobs.
pub const TARGET_BLOB_GAS_PER_BLOCK: u64 = 3 * GAS_PER_BLOB;

/// Maximum blob gas per block: six blobs.
pub const MAX_BLOB_GAS_PER_BLOCK: u64 = 6 * GAS_PER_BLOB;

/// Denominator of the blob base fee exponential update.
pub const BLOB_GASPRICE_UPDATE_FRACTION: u64 = 3_338_477;

/// Minimum blob gas price, in wei.
pub const MIN_BLOB_GASPRICE: u64 = 1;

/// Root hash of an empty ommer list.
pub const EMPTY_OMMER_ROOT_HASH: B256 =
    b256!("1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347");
