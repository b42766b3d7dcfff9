//! Submission of contract-creation transactions

use std::{future::Future, sync::Arc};

use alloy::{
    dyn_abi::DynSolValue,
    network::TransactionBuilder,
    primitives::{Address, TxHash, U256},
    providers::{DynProvider, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use tracing::debug;

use crate::{
    artifacts::CompiledContracts, constants::NUM_DEPLOY_CONFIRMATIONS, errors::ScriptError,
    types::DeployableContract,
};

/// Deploys contracts, returning once the deployment is confirmed
pub trait ContractDeployer {
    /// Deploy `contract` with the given constructor arguments and attached value,
    /// resolving to the address of the new contract once it is mined
    fn deploy(
        &self,
        contract: DeployableContract,
        constructor_args: &[DynSolValue],
        value: U256,
    ) -> impl Future<Output = Result<Address, ScriptError>> + Send;
}

/// Deploys compiled contracts to a live network through a signing provider
#[derive(Clone)]
pub struct ChainDeployer {
    /// The provider, holding the deployer's wallet
    provider: DynProvider,
    /// The compiled contracts to deploy
    contracts: Arc<CompiledContracts>,
}

impl ChainDeployer {
    /// Create a deployer sending transactions through `provider`
    pub fn new(provider: DynProvider, contracts: Arc<CompiledContracts>) -> Self {
        Self {
            provider,
            contracts,
        }
    }
}

impl ContractDeployer for ChainDeployer {
    async fn deploy(
        &self,
        contract: DeployableContract,
        constructor_args: &[DynSolValue],
        value: U256,
    ) -> Result<Address, ScriptError> {
        let compiled = self.contracts.get(contract)?;
        let tx = TransactionRequest::default()
            .with_deploy_code(compiled.creation_code(constructor_args))
            .with_value(value);

        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(format!("{contract}: {e}")))?;

        let tx_hash = *pending_tx.tx_hash();
        debug!(contract = %contract, %tx_hash, "deployment transaction sent");

        let receipt = pending_tx
            .with_required_confirmations(NUM_DEPLOY_CONFIRMATIONS)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(format!("{contract}: {e}")))?;

        deployed_address(contract, tx_hash, &receipt)
    }
}

/// The address of the contract created by a deployment transaction, or an
/// error if the transaction reverted or created nothing
fn deployed_address(
    contract: DeployableContract,
    tx_hash: TxHash,
    receipt: &TransactionReceipt,
) -> Result<Address, ScriptError> {
    if !receipt.status() {
        return Err(ScriptError::ContractDeployment(format!(
            "{contract} deployment reverted in transaction {tx_hash}"
        )));
    }

    receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!(
            "receipt of transaction {tx_hash} has no contract address for {contract}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, b256};
    use serde_json::{json, Value};

    use super::*;

    /// The hash of the deployment transaction
    const TX_HASH: TxHash =
        b256!("968c2d0a7b38bfd7f57684298b5b4cda08b591e9f59b60e865a6eb8b531ef837");

    /// The address of the deployed contract
    const DEPLOYED: Address = address!("1111111111111111111111111111111111111111");

    /// An RPC receipt for the deployment transaction
    fn receipt(status: &str, contract_address: Value) -> TransactionReceipt {
        serde_json::from_value(json!({
            "type": "0x2",
            "status": status,
            "cumulativeGasUsed": "0x157e6",
            "logs": [],
            "logsBloom": format!("0x{}", "0".repeat(512)),
            "transactionHash": TX_HASH,
            "transactionIndex": "0x0",
            "blockHash": "0x0fe66313f8b3f8d88d19ac13b05de0f6e0ef7fcb3293db0869062493ff98f9db",
            "blockNumber": "0x4d34901",
            "gasUsed": "0x157e6",
            "effectiveGasPrice": "0x2e90edd00",
            "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            "to": null,
            "contractAddress": contract_address,
        }))
        .unwrap()
    }

    #[test]
    fn test_successful_deployment_address() {
        let receipt = receipt("0x1", json!(DEPLOYED));
        let address =
            deployed_address(DeployableContract::CryptoDevsNft, TX_HASH, &receipt).unwrap();
        assert_eq!(address, DEPLOYED);
    }

    #[test]
    fn test_reverted_deployment_rejected() {
        let receipt = receipt("0x0", json!(DEPLOYED));
        let res = deployed_address(DeployableContract::CryptoDevsDao, TX_HASH, &receipt);
        match res {
            Err(ScriptError::ContractDeployment(msg)) => assert!(msg.contains("reverted")),
            other => panic!("expected a deployment error, got {other:?}"),
        }
    }

    #[test]
    fn test_receipt_without_contract_address_rejected() {
        let receipt = receipt("0x1", Value::Null);
        let res = deployed_address(DeployableContract::FakeNftMarketplace, TX_HASH, &receipt);
        match res {
            Err(ScriptError::ContractDeployment(msg)) => {
                assert!(msg.contains("no contract address"))
            }
            other => panic!("expected a deployment error, got {other:?}"),
        }
    }
}
