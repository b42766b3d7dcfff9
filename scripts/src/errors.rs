//! Definitions of errors that can occur during the execution of the deploy scripts

use thiserror::Error;

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A configuration value is missing or invalid
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// Error reading or parsing a compilation artifact
    #[error("error parsing artifact: {0}")]
    ArtifactParsing(String),
    /// Error initializing the RPC client
    #[error("error initializing client: {0}")]
    ClientInitialization(String),
    /// Error deploying a contract
    #[error("error deploying contract: {0}")]
    ContractDeployment(String),
    /// Error verifying a contract's source on the block explorer
    #[error("error verifying contract: {0}")]
    Verification(String),
}
