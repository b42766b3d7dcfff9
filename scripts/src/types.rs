//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use alloy::{dyn_abi::DynSolValue, primitives::Address};
use clap::ValueEnum;

use crate::constants::SEPOLIA_CHAIN_ID;

/// The networks the contracts can be deployed to
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Network {
    /// The Sepolia testnet
    Sepolia,
}

impl Network {
    /// The chain ID the network's RPC endpoint must report
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Sepolia => SEPOLIA_CHAIN_ID,
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Sepolia => write!(f, "sepolia"),
        }
    }
}

/// The contracts deployed by the scripts, in deployment order
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeployableContract {
    /// The NFT contract
    CryptoDevsNft,
    /// The mock NFT marketplace contract
    FakeNftMarketplace,
    /// The DAO contract, constructed with the marketplace and NFT addresses
    CryptoDevsDao,
}

impl DeployableContract {
    /// All deployable contracts, in deployment order
    pub const ALL: [DeployableContract; 3] = [
        DeployableContract::CryptoDevsNft,
        DeployableContract::FakeNftMarketplace,
        DeployableContract::CryptoDevsDao,
    ];

    /// The name of the contract as it appears in the compilation artifacts
    pub fn artifact_name(&self) -> &'static str {
        match self {
            DeployableContract::CryptoDevsNft => "CryptoDevsNft",
            DeployableContract::FakeNftMarketplace => "FakeNFTMarketplace",
            DeployableContract::CryptoDevsDao => "CryptoDevsDAO",
        }
    }
}

impl Display for DeployableContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.artifact_name())
    }
}

/// A record of a single successful contract deployment
#[derive(Clone, Debug, PartialEq)]
pub struct DeploymentRecord {
    /// The contract that was deployed
    contract: DeployableContract,
    /// The address the contract was deployed to
    address: Address,
    /// The constructor arguments the contract was deployed with, in order
    constructor_args: Vec<DynSolValue>,
}

impl DeploymentRecord {
    /// Create a record of a deployment
    pub fn new(
        contract: DeployableContract,
        address: Address,
        constructor_args: Vec<DynSolValue>,
    ) -> Self {
        Self {
            contract,
            address,
            constructor_args,
        }
    }

    /// The contract that was deployed
    pub fn contract(&self) -> DeployableContract {
        self.contract
    }

    /// The address the contract was deployed to
    pub fn address(&self) -> Address {
        self.address
    }

    /// The constructor arguments the contract was deployed with
    pub fn constructor_args(&self) -> &[DynSolValue] {
        &self.constructor_args
    }
}

/// The records of a complete deployment run
#[derive(Clone, Debug, PartialEq)]
pub struct Deployments {
    /// The NFT contract deployment
    pub nft: DeploymentRecord,
    /// The marketplace contract deployment
    pub marketplace: DeploymentRecord,
    /// The DAO contract deployment
    pub dao: DeploymentRecord,
}

impl Deployments {
    /// The deployment records, in deployment order
    pub fn records(&self) -> [&DeploymentRecord; 3] {
        [&self.nft, &self.marketplace, &self.dao]
    }
}
