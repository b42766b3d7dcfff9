//! Implementation of the deploy & verify script

use std::{sync::Arc, time::Duration};

use alloy::{dyn_abi::DynSolValue, primitives::U256};
use tracing::info;

use crate::{
    artifacts::CompiledContracts,
    config::DeployConfig,
    deployer::{ChainDeployer, ContractDeployer},
    errors::ScriptError,
    types::{DeployableContract, DeploymentRecord, Deployments},
    utils::setup_client,
    verifier::{EtherscanVerifier, SourceVerifier},
};

/// The parameters of a deployment run that are not contract addresses
#[derive(Clone, Debug)]
pub struct DeployOptions {
    /// The value, in wei, sent along with the DAO deployment
    pub dao_value: U256,
    /// How long to wait between the last deployment and the first verification
    pub verify_delay: Duration,
}

impl From<&DeployConfig> for DeployOptions {
    fn from(config: &DeployConfig) -> Self {
        Self {
            dao_value: config.dao_value,
            verify_delay: config.verify_delay,
        }
    }
}

/// Run the deployment against the configured network and explorer.
///
/// Artifacts are loaded before the RPC endpoint is contacted, so a missing
/// compilation fails before any transaction is sent.
pub async fn run(config: DeployConfig) -> Result<Deployments, ScriptError> {
    let contracts = Arc::new(CompiledContracts::load(&config.artifacts_path)?);
    let options = DeployOptions::from(&config);

    let provider = setup_client(config.signer, config.rpc_url, config.network).await?;
    let deployer = ChainDeployer::new(provider, contracts.clone());
    let verifier = EtherscanVerifier::new(
        config.explorer_api_url,
        config.explorer_api_key,
        config.network.chain_id(),
        contracts,
    );

    deploy_and_verify(&deployer, &verifier, &options).await
}

/// Deploy the NFT, marketplace and DAO contracts in order, wait for the
/// explorer to index them, then verify all three.
///
/// Every step is awaited before the next begins, and the first failure aborts
/// the run. Contracts deployed before a failure stay deployed.
pub async fn deploy_and_verify<D: ContractDeployer, V: SourceVerifier>(
    deployer: &D,
    verifier: &V,
    options: &DeployOptions,
) -> Result<Deployments, ScriptError> {
    let nft = deploy(deployer, DeployableContract::CryptoDevsNft, vec![], U256::ZERO).await?;
    let marketplace = deploy(
        deployer,
        DeployableContract::FakeNftMarketplace,
        vec![],
        U256::ZERO,
    )
    .await?;

    // The DAO constructor takes the marketplace first, then the NFT
    let dao_args = vec![
        DynSolValue::Address(marketplace.address()),
        DynSolValue::Address(nft.address()),
    ];
    let dao = deploy(
        deployer,
        DeployableContract::CryptoDevsDao,
        dao_args,
        options.dao_value,
    )
    .await?;

    let deployments = Deployments {
        nft,
        marketplace,
        dao,
    };

    info!(
        delay_secs = options.verify_delay.as_secs(),
        "waiting for the explorer to index the deployments"
    );
    tokio::time::sleep(options.verify_delay).await;

    for record in deployments.records() {
        info!(contract = %record.contract(), address = %record.address(), "verifying contract");
        verifier
            .verify(record.contract(), record.address(), record.constructor_args())
            .await?;
    }

    Ok(deployments)
}

/// Deploy a single contract and record the deployment
async fn deploy<D: ContractDeployer>(
    deployer: &D,
    contract: DeployableContract,
    constructor_args: Vec<DynSolValue>,
    value: U256,
) -> Result<DeploymentRecord, ScriptError> {
    info!(contract = %contract, %value, "deploying contract");
    let address = deployer.deploy(contract, &constructor_args, value).await?;

    println!("{contract} deployed to: {address}");
    Ok(DeploymentRecord::new(contract, address, constructor_args))
}
