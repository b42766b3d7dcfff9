//! Validated configuration for a deployment run
//!
//! Every value is checked when the config is built from the CLI, so a missing
//! or malformed value is reported before any network call is made.

use std::{path::PathBuf, str::FromStr, time::Duration};

use alloy::{
    primitives::{utils::parse_ether, U256},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};

use crate::{
    cli::Cli,
    constants::{
        DEFAULT_VERIFY_DELAY_SECS, ETHERSCAN_API_KEY_ENV_VAR, PRIVATE_KEY_ENV_VAR,
        RPC_URL_ENV_VAR,
    },
    errors::ScriptError,
    types::Network,
};

/// The configuration of a deployment run
#[derive(Clone)]
pub struct DeployConfig {
    /// The network to deploy to
    pub network: Network,
    /// The network RPC URL
    pub rpc_url: Url,
    /// The signer for all deployment transactions
    pub signer: PrivateKeySigner,
    /// The Etherscan API key
    pub explorer_api_key: String,
    /// The Etherscan API endpoint
    pub explorer_api_url: Url,
    /// The directory containing the Hardhat compilation artifacts
    pub artifacts_path: PathBuf,
    /// The value, in wei, sent along with the DAO deployment
    pub dao_value: U256,
    /// How long to wait between the last deployment and the first verification
    pub verify_delay: Duration,
}

impl TryFrom<Cli> for DeployConfig {
    type Error = ScriptError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let rpc_url = require(cli.rpc_url, RPC_URL_ENV_VAR)?;
        let private_key = require(cli.private_key, PRIVATE_KEY_ENV_VAR)?;
        let explorer_api_key = require(cli.etherscan_api_key, ETHERSCAN_API_KEY_ENV_VAR)?;

        let rpc_url = Url::parse(&rpc_url)
            .map_err(|e| ScriptError::Configuration(format!("{RPC_URL_ENV_VAR}: {e}")))?;

        // The key itself is never included in the error
        let signer = PrivateKeySigner::from_str(&private_key).map_err(|_| {
            ScriptError::Configuration(format!("{PRIVATE_KEY_ENV_VAR} is not a valid private key"))
        })?;

        let explorer_api_url = Url::parse(&cli.explorer_api_url)
            .map_err(|e| ScriptError::Configuration(format!("explorer API URL: {e}")))?;

        let dao_value = parse_ether(cli.dao_value.trim())
            .map_err(|e| ScriptError::Configuration(format!("DAO value: {e}")))?;

        // The explorer cannot verify a contract it has not indexed yet
        if cli.verify_delay_secs < DEFAULT_VERIFY_DELAY_SECS {
            return Err(ScriptError::Configuration(format!(
                "verify delay must be at least {DEFAULT_VERIFY_DELAY_SECS}s, got {}s",
                cli.verify_delay_secs
            )));
        }

        Ok(Self {
            network: cli.network,
            rpc_url,
            signer,
            explorer_api_key,
            explorer_api_url,
            artifacts_path: cli.artifacts_path,
            dao_value,
            verify_delay: Duration::from_secs(cli.verify_delay_secs),
        })
    }
}

/// Unwrap a required configuration value, rejecting absent and blank values
fn require(value: Option<String>, env_var: &str) -> Result<String, ScriptError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ScriptError::Configuration(format!("{env_var} is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_EXPLORER_API_URL;

    /// The first default Anvil account
    const TEST_PKEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    /// A CLI with every required value present and valid
    fn valid_cli() -> Cli {
        Cli {
            network: Network::Sepolia,
            rpc_url: Some("https://sepolia.example.com/rpc".to_string()),
            private_key: Some(TEST_PKEY.to_string()),
            etherscan_api_key: Some("ABCDEF".to_string()),
            explorer_api_url: DEFAULT_EXPLORER_API_URL.to_string(),
            artifacts_path: PathBuf::from("artifacts"),
            dao_value: "1".to_string(),
            verify_delay_secs: DEFAULT_VERIFY_DELAY_SECS,
        }
    }

    /// The message of the configuration error `cli` is rejected with
    fn config_error(cli: Cli) -> String {
        match DeployConfig::try_from(cli) {
            Err(ScriptError::Configuration(msg)) => msg,
            Err(e) => panic!("expected a configuration error, got {e}"),
            Ok(_) => panic!("expected a configuration error"),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = DeployConfig::try_from(valid_cli()).unwrap();

        assert_eq!(config.network.chain_id(), 11_155_111);
        assert_eq!(config.rpc_url.as_str(), "https://sepolia.example.com/rpc");
        assert_eq!(
            format!("{}", config.signer.address()),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
        assert_eq!(config.dao_value, parse_ether("1").unwrap());
        assert_eq!(config.verify_delay, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_private_key() {
        let cli = Cli {
            private_key: None,
            ..valid_cli()
        };
        assert_eq!(config_error(cli), "PRIVATE_KEY is not set");
    }

    #[test]
    fn test_blank_rpc_url() {
        let cli = Cli {
            rpc_url: Some("  ".to_string()),
            ..valid_cli()
        };
        assert_eq!(config_error(cli), "RPC_URL is not set");
    }

    #[test]
    fn test_missing_api_key() {
        let cli = Cli {
            etherscan_api_key: None,
            ..valid_cli()
        };
        assert_eq!(config_error(cli), "ETHERSCAN_API_KEY is not set");
    }

    #[test]
    fn test_malformed_private_key() {
        let cli = Cli {
            private_key: Some("0xnotakey".to_string()),
            ..valid_cli()
        };
        let msg = config_error(cli);
        assert!(msg.contains("PRIVATE_KEY"));
        assert!(!msg.contains("notakey"));
    }

    #[test]
    fn test_malformed_rpc_url() {
        let cli = Cli {
            rpc_url: Some("not a url".to_string()),
            ..valid_cli()
        };
        assert!(config_error(cli).starts_with("RPC_URL"));
    }

    #[test]
    fn test_fractional_dao_value() {
        let cli = Cli {
            dao_value: "0.05".to_string(),
            ..valid_cli()
        };
        let config = DeployConfig::try_from(cli).unwrap();
        assert_eq!(config.dao_value, U256::from(50_000_000_000_000_000u64));
    }

    #[test]
    fn test_invalid_dao_value() {
        let cli = Cli {
            dao_value: "one".to_string(),
            ..valid_cli()
        };
        assert!(config_error(cli).starts_with("DAO value"));
    }

    #[test]
    fn test_verify_delay_below_minimum_rejected() {
        for secs in [0, DEFAULT_VERIFY_DELAY_SECS - 1] {
            let cli = Cli {
                verify_delay_secs: secs,
                ..valid_cli()
            };
            assert!(config_error(cli).starts_with("verify delay"));
        }
    }

    #[test]
    fn test_longer_verify_delay_accepted() {
        let cli = Cli {
            verify_delay_secs: 90,
            ..valid_cli()
        };
        let config = DeployConfig::try_from(cli).unwrap();
        assert_eq!(config.verify_delay, Duration::from_secs(90));
    }
}
