//! Source verification on Etherscan
//!
//! Verification is asynchronous on Etherscan's side: a submission returns a
//! GUID which is polled until the explorer reports a final status.

use std::{future::Future, sync::Arc, time::Duration};

use alloy::{dyn_abi::DynSolValue, primitives::Address, transports::http::reqwest::Url};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    artifacts::{CompiledContract, CompiledContracts},
    constants::{
        ALREADY_VERIFIED, ETHERSCAN_OK_STATUS, MAX_VERIFICATION_POLLS, PENDING_IN_QUEUE,
        STANDARD_JSON_CODE_FORMAT, VERIFICATION_POLL_INTERVAL,
    },
    errors::ScriptError,
    types::DeployableContract,
    utils::constructor_args_hex,
};

/// Publishes the sources of deployed contracts
pub trait SourceVerifier {
    /// Verify the source of `contract`, deployed at `address` with the given
    /// constructor arguments
    fn verify(
        &self,
        contract: DeployableContract,
        address: Address,
        constructor_args: &[DynSolValue],
    ) -> impl Future<Output = Result<(), ScriptError>> + Send;
}

/// The envelope of every Etherscan API response
#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    /// `"1"` on success, `"0"` otherwise
    status: String,
    /// A short description of the status
    message: String,
    /// The payload, a string for the verification endpoints
    result: Value,
}

impl EtherscanResponse {
    /// Whether the request succeeded
    fn is_ok(&self) -> bool {
        self.status == ETHERSCAN_OK_STATUS
    }

    /// The result as a string, empty if it is not one
    fn result_str(&self) -> &str {
        self.result.as_str().unwrap_or_default()
    }

    /// Whether the response reports the contract as already verified
    fn is_already_verified(&self) -> bool {
        self.result_str().to_lowercase().contains(ALREADY_VERIFIED)
    }
}

/// The outcome of a verification submission
#[derive(Debug, PartialEq, Eq)]
enum Submission {
    /// The submission was queued under the given GUID
    Queued(String),
    /// The explorer already has the contract's source
    AlreadyVerified,
}

/// The status of a queued verification request
#[derive(Debug, PartialEq, Eq)]
enum VerificationStatus {
    /// The request is still in the queue
    Pending,
    /// The source was verified
    Verified,
}

/// Verifies contract sources through the Etherscan API
#[derive(Clone)]
pub struct EtherscanVerifier {
    /// The HTTP client
    client: Client,
    /// The Etherscan API endpoint
    api_url: Url,
    /// The Etherscan API key
    api_key: String,
    /// The chain the contracts are deployed on
    chain_id: u64,
    /// The compiled contracts, providing the compiler input to submit
    contracts: Arc<CompiledContracts>,
    /// The interval between status polls
    poll_interval: Duration,
}

impl EtherscanVerifier {
    /// Create a verifier for contracts deployed on `chain_id`
    pub fn new(
        api_url: Url,
        api_key: String,
        chain_id: u64,
        contracts: Arc<CompiledContracts>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
            chain_id,
            contracts,
            poll_interval: VERIFICATION_POLL_INTERVAL,
        }
    }

    /// Set the interval between polls of a queued verification request
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Whether the explorer already publishes source code for `address`
    pub async fn is_verified(&self, address: Address) -> Result<bool, ScriptError> {
        let address = address.to_string();
        let response = self
            .get(&[
                ("module", "contract"),
                ("action", "getsourcecode"),
                ("address", address.as_str()),
            ])
            .await?;

        if !response.is_ok() {
            return Ok(false);
        }

        let source_code = response
            .result
            .as_array()
            .and_then(|entries| entries.first())
            .and_then(|entry| entry["SourceCode"].as_str());

        Ok(source_code.is_some_and(|source| !source.is_empty()))
    }

    /// Submit a contract's standard-JSON input for verification
    async fn submit(
        &self,
        compiled: &CompiledContract,
        address: Address,
        constructor_args: &[DynSolValue],
    ) -> Result<Submission, ScriptError> {
        let source_code = serde_json::to_string(&compiled.build_info.input)
            .map_err(|e| ScriptError::Verification(e.to_string()))?;
        let address = address.to_string();
        let contract_name = compiled.fully_qualified_name();
        let compiler_version = compiled.compiler_version();
        let constructor_args = constructor_args_hex(constructor_args);

        let form = [
            ("module", "contract"),
            ("action", "verifysourcecode"),
            ("apikey", self.api_key.as_str()),
            ("codeformat", STANDARD_JSON_CODE_FORMAT),
            ("sourceCode", source_code.as_str()),
            ("contractaddress", address.as_str()),
            ("contractname", contract_name.as_str()),
            ("compilerversion", compiler_version.as_str()),
            // The misspelling is Etherscan's
            ("constructorArguements", constructor_args.as_str()),
        ];

        let response: EtherscanResponse = self
            .client
            .post(self.api_url.clone())
            .query(&[("chainid", self.chain_id)])
            .form(&form)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| ScriptError::Verification(e.to_string()))?
            .json()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?;

        if response.is_ok() {
            Ok(Submission::Queued(response.result_str().to_string()))
        } else if response.is_already_verified() {
            Ok(Submission::AlreadyVerified)
        } else {
            Err(ScriptError::Verification(format!(
                "{} rejected: {} ({})",
                contract_name,
                response.result_str(),
                response.message
            )))
        }
    }

    /// Check the status of a queued verification request
    async fn check_status(&self, guid: &str) -> Result<VerificationStatus, ScriptError> {
        let response = self
            .get(&[
                ("module", "contract"),
                ("action", "checkverifystatus"),
                ("guid", guid),
            ])
            .await?;

        let result = response.result_str();
        if result == PENDING_IN_QUEUE {
            Ok(VerificationStatus::Pending)
        } else if response.is_ok() || response.is_already_verified() {
            Ok(VerificationStatus::Verified)
        } else {
            Err(ScriptError::Verification(format!(
                "verification {guid} failed: {result}"
            )))
        }
    }

    /// Send a GET request to the API with the given query parameters
    async fn get(&self, params: &[(&str, &str)]) -> Result<EtherscanResponse, ScriptError> {
        self.client
            .get(self.api_url.clone())
            .query(&[("chainid", self.chain_id)])
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| ScriptError::Verification(e.to_string()))?
            .json()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))
    }
}

impl SourceVerifier for EtherscanVerifier {
    async fn verify(
        &self,
        contract: DeployableContract,
        address: Address,
        constructor_args: &[DynSolValue],
    ) -> Result<(), ScriptError> {
        if self.is_verified(address).await? {
            info!(contract = %contract, %address, "contract is already verified");
            return Ok(());
        }

        let compiled = self.contracts.get(contract)?;
        let guid = match self.submit(compiled, address, constructor_args).await? {
            Submission::Queued(guid) => guid,
            Submission::AlreadyVerified => {
                info!(contract = %contract, %address, "contract is already verified");
                return Ok(());
            }
        };
        debug!(contract = %contract, %guid, "verification request queued");

        for _ in 0..MAX_VERIFICATION_POLLS {
            tokio::time::sleep(self.poll_interval).await;
            if self.check_status(&guid).await? == VerificationStatus::Verified {
                info!(contract = %contract, %address, "contract verified");
                return Ok(());
            }
        }

        Err(ScriptError::Verification(format!(
            "{contract} verification still pending after {MAX_VERIFICATION_POLLS} status checks"
        )))
    }
}
