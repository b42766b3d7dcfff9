//! Constants used in the deploy scripts

use std::time::Duration;

/// The environment variable holding the network RPC URL
pub const RPC_URL_ENV_VAR: &str = "RPC_URL";

/// The environment variable holding the deployer's private key
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// The environment variable holding the Etherscan API key
pub const ETHERSCAN_API_KEY_ENV_VAR: &str = "ETHERSCAN_API_KEY";

/// The chain ID of the Sepolia testnet
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// The default Etherscan API endpoint.
///
/// This is the multichain (v2) endpoint, the target chain is selected with
/// the `chainid` query parameter.
pub const DEFAULT_EXPLORER_API_URL: &str = "https://api.etherscan.io/v2/api";

/// The default directory holding the Hardhat compilation artifacts
pub const DEFAULT_ARTIFACTS_PATH: &str = "artifacts";

/// The name of the directory, under the artifacts directory, holding build-info files
pub const BUILD_INFO_DIR: &str = "build-info";

/// The suffix of Hardhat's per-artifact debug files
pub const DBG_FILE_SUFFIX: &str = ".dbg.json";

/// The default amount of ether sent along with the DAO deployment
pub const DEFAULT_DAO_VALUE_ETHER: &str = "1";

/// The default number of seconds to wait before requesting verification,
/// giving the explorer's indexer time to observe the new contracts
pub const DEFAULT_VERIFY_DELAY_SECS: u64 = 30;

/// The number of confirmations to wait for the contract deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The solc version the contracts must be compiled with
pub const PINNED_SOLC_VERSION: &str = "0.8.20";

/// The optimizer runs the contracts must be compiled with
pub const PINNED_OPTIMIZER_RUNS: u64 = 1_000_000;

/// The interval between polls of a pending verification request
pub const VERIFICATION_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// The maximum number of times a pending verification request is polled
pub const MAX_VERIFICATION_POLLS: usize = 20;

/// The code format used when submitting sources to Etherscan
pub const STANDARD_JSON_CODE_FORMAT: &str = "solidity-standard-json-input";

/// The Etherscan status indicating a successful request
pub const ETHERSCAN_OK_STATUS: &str = "1";

/// The Etherscan result for a verification request still in the queue
pub const PENDING_IN_QUEUE: &str = "Pending in queue";

/// Substring of Etherscan messages reporting a contract that is already verified
pub const ALREADY_VERIFIED: &str = "already verified";
