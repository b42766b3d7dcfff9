//! Utilities for the deploy scripts.

use alloy::{
    dyn_abi::DynSolValue,
    hex,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::info;

use crate::{errors::ScriptError, types::Network};

/// Sets up the client with which to send the deployment transactions,
/// checking that the RPC endpoint serves the expected network.
pub async fn setup_client(
    signer: PrivateKeySigner,
    rpc_url: Url,
    network: Network,
) -> Result<DynProvider, ScriptError> {
    let deployer = signer.address();
    let provider = ProviderBuilder::new().wallet(signer).connect_http(rpc_url);

    let chain_id = check_chain_id(&provider, network).await?;
    info!(%network, chain_id, %deployer, "connected to network");
    Ok(DynProvider::new(provider))
}

/// Check that `provider` serves `network`, returning its chain ID
async fn check_chain_id(provider: &impl Provider, network: Network) -> Result<u64, ScriptError> {
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    if chain_id != network.chain_id() {
        return Err(ScriptError::ClientInitialization(format!(
            "RPC endpoint serves chain {chain_id}, but {network} is chain {}",
            network.chain_id()
        )));
    }

    Ok(chain_id)
}

/// ABI-encode constructor arguments as they are appended to creation code
pub fn encode_constructor_args(args: &[DynSolValue]) -> Vec<u8> {
    if args.is_empty() {
        return Vec::new();
    }

    DynSolValue::Tuple(args.to_vec()).abi_encode_params()
}

/// Hex-encode constructor arguments, without a `0x` prefix, for the block explorer
pub fn constructor_args_hex(args: &[DynSolValue]) -> String {
    hex::encode(encode_constructor_args(args))
}
