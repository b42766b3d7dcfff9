//! Definitions of CLI arguments for the deploy script

use std::path::PathBuf;

use clap::Parser;

use crate::{
    constants::{
        DEFAULT_ARTIFACTS_PATH, DEFAULT_DAO_VALUE_ETHER, DEFAULT_EXPLORER_API_URL,
        DEFAULT_VERIFY_DELAY_SECS, ETHERSCAN_API_KEY_ENV_VAR, PRIVATE_KEY_ENV_VAR,
        RPC_URL_ENV_VAR,
    },
    types::Network,
};

/// Deploy the CryptoDevs NFT, marketplace & DAO contracts, then verify their
/// sources on Etherscan
///
/// The RPC URL, private key and Etherscan API key may be given in a `.env` file.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The network to deploy to
    #[arg(short, long, value_enum, default_value_t = Network::Sepolia)]
    pub network: Network,

    /// Network RPC URL
    #[arg(short, long, env = RPC_URL_ENV_VAR)]
    pub rpc_url: Option<String>,

    /// Private key of the deployer
    #[arg(short, long, env = PRIVATE_KEY_ENV_VAR, hide_env_values = true)]
    pub private_key: Option<String>,

    /// Etherscan API key used to verify the deployed contracts
    #[arg(long, env = ETHERSCAN_API_KEY_ENV_VAR, hide_env_values = true)]
    pub etherscan_api_key: Option<String>,

    /// Etherscan API endpoint
    #[arg(long, default_value = DEFAULT_EXPLORER_API_URL)]
    pub explorer_api_url: String,

    /// Path to the directory containing the Hardhat compilation artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_PATH)]
    pub artifacts_path: PathBuf,

    /// Amount of ether sent along with the DAO deployment
    #[arg(long, default_value = DEFAULT_DAO_VALUE_ETHER)]
    pub dao_value: String,

    /// Seconds to wait for the explorer to index the contracts before verifying them.
    /// Values below the default are rejected, the wait can only be lengthened.
    #[arg(long, default_value_t = DEFAULT_VERIFY_DELAY_SECS)]
    pub verify_delay_secs: u64,
}
