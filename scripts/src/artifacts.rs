//! Loading of Hardhat compilation artifacts
//!
//! Hardhat writes one artifact per contract under `artifacts/<source path>/<Name>.json`,
//! next to a `<Name>.dbg.json` file pointing at the build-info of the compiler run
//! that produced it. The artifact supplies the creation bytecode, the build-info
//! supplies the standard-JSON compiler input Etherscan needs for verification.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use alloy::{dyn_abi::DynSolValue, primitives::Bytes};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::{
    constants::{BUILD_INFO_DIR, DBG_FILE_SUFFIX, PINNED_OPTIMIZER_RUNS, PINNED_SOLC_VERSION},
    errors::ScriptError,
    types::DeployableContract,
    utils::encode_constructor_args,
};

/// The subset of a Hardhat artifact used by the scripts
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardhatArtifact {
    /// The name of the contract
    pub contract_name: String,
    /// The path of the source file defining the contract, relative to the project root
    pub source_name: String,
    /// The contract creation bytecode
    pub bytecode: Bytes,
}

/// A Hardhat artifact debug file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    /// Path of the build-info file, relative to the debug file
    build_info: PathBuf,
}

/// The subset of a Hardhat build-info file used by the scripts
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    /// The short compiler version, e.g. `0.8.20`
    pub solc_version: String,
    /// The full compiler version, e.g. `0.8.20+commit.a1b79de6`
    pub solc_long_version: String,
    /// The standard-JSON input the compiler was invoked with
    pub input: Value,
}

impl BuildInfo {
    /// Check that the compiler run matches the pinned build configuration
    fn ensure_pinned(&self, path: &Path) -> Result<(), ScriptError> {
        if self.solc_version != PINNED_SOLC_VERSION {
            return Err(ScriptError::ArtifactParsing(format!(
                "{} was compiled with solc {}, expected {PINNED_SOLC_VERSION}",
                path.display(),
                self.solc_version
            )));
        }

        let optimizer = &self.input["settings"]["optimizer"];
        let enabled = optimizer["enabled"].as_bool().unwrap_or(false);
        let runs = optimizer["runs"].as_u64();
        if !enabled || runs != Some(PINNED_OPTIMIZER_RUNS) {
            return Err(ScriptError::ArtifactParsing(format!(
                "{} was compiled without the optimizer set to {PINNED_OPTIMIZER_RUNS} runs",
                path.display()
            )));
        }

        Ok(())
    }
}

/// A compiled contract: its artifact and the build-info it came from
#[derive(Debug, Clone)]
pub struct CompiledContract {
    /// The contract's artifact
    pub artifact: HardhatArtifact,
    /// The build-info of the compiler run that produced the artifact
    pub build_info: BuildInfo,
}

impl CompiledContract {
    /// The creation code for a deployment with the given constructor arguments
    pub fn creation_code(&self, constructor_args: &[DynSolValue]) -> Bytes {
        let mut code = self.artifact.bytecode.to_vec();
        code.extend(encode_constructor_args(constructor_args));
        code.into()
    }

    /// The fully qualified name of the contract, `<source path>:<contract name>`
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.artifact.source_name, self.artifact.contract_name)
    }

    /// The compiler version string in the form Etherscan expects
    pub fn compiler_version(&self) -> String {
        format!("v{}", self.build_info.solc_long_version)
    }
}

/// The compiled contracts needed for a deployment run
#[derive(Debug, Clone)]
pub struct CompiledContracts {
    /// The compiled contracts, by contract
    contracts: HashMap<DeployableContract, CompiledContract>,
}

impl CompiledContracts {
    /// Load the artifacts and build-info of every deployable contract
    pub fn load(artifacts_path: &Path) -> Result<Self, ScriptError> {
        if !artifacts_path.is_dir() {
            return Err(ScriptError::ArtifactParsing(format!(
                "artifacts directory {} not found, compile the contracts first",
                artifacts_path.display()
            )));
        }

        let mut contracts = HashMap::new();
        for contract in DeployableContract::ALL {
            let compiled = load_contract(artifacts_path, contract)?;
            debug!(
                contract = %contract,
                source = %compiled.artifact.source_name,
                solc = %compiled.build_info.solc_long_version,
                "loaded artifact"
            );
            contracts.insert(contract, compiled);
        }

        Ok(Self { contracts })
    }

    /// Get the compiled form of a contract
    pub fn get(&self, contract: DeployableContract) -> Result<&CompiledContract, ScriptError> {
        self.contracts.get(&contract).ok_or_else(|| {
            ScriptError::ArtifactParsing(format!("no artifact loaded for {contract}"))
        })
    }
}

/// Load a single contract's artifact and build-info
fn load_contract(
    artifacts_path: &Path,
    contract: DeployableContract,
) -> Result<CompiledContract, ScriptError> {
    let artifact_path = find_artifact(artifacts_path, contract.artifact_name())?;
    let artifact: HardhatArtifact = read_json(&artifact_path)?;
    if artifact.bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(format!(
            "{} has no creation bytecode",
            artifact_path.display()
        )));
    }

    let dbg_path = artifact_path.with_file_name(format!(
        "{}{DBG_FILE_SUFFIX}",
        contract.artifact_name()
    ));
    let dbg: DebugFile = read_json(&dbg_path)?;
    let build_info_path = artifact_path
        .parent()
        .unwrap_or(artifacts_path)
        .join(dbg.build_info);

    let build_info: BuildInfo = read_json(&build_info_path)?;
    build_info.ensure_pinned(&build_info_path)?;

    Ok(CompiledContract {
        artifact,
        build_info,
    })
}

/// Find the artifact file of the contract with the given name
fn find_artifact(artifacts_path: &Path, name: &str) -> Result<PathBuf, ScriptError> {
    let file_name = format!("{name}.json");
    let mut matches = WalkDir::new(artifacts_path)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != BUILD_INFO_DIR)
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == file_name.as_str())
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();

    match matches.len() {
        0 => Err(ScriptError::ArtifactParsing(format!(
            "no artifact for {name} under {}",
            artifacts_path.display()
        ))),
        1 => Ok(matches.remove(0)),
        _ => Err(ScriptError::ArtifactParsing(format!(
            "multiple artifacts for {name} under {}",
            artifacts_path.display()
        ))),
    }
}

/// Read and deserialize a JSON file
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ScriptError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", path.display())))
}


#[cfg(test)]
mod tests {
    use alloy::primitives::{address, bytes};

    use super::{test_helpers::*, *};

    #[test]
    fn test_load_all_contracts() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path());

        let contracts = CompiledContracts::load(dir.path()).unwrap();
        let dao = contracts.get(DeployableContract::CryptoDevsDao).unwrap();

        assert_eq!(dao.artifact.contract_name, "CryptoDevsDAO");
        assert_eq!(
            dao.fully_qualified_name(),
            "contracts/CryptoDevsDAO.sol:CryptoDevsDAO"
        );
        assert_eq!(dao.compiler_version(), "v0.8.20+commit.a1b79de6");
        assert_eq!(dao.build_info.input["language"], "Solidity");
    }

    #[test]
    fn test_creation_code_appends_constructor_args() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path());
        let contracts = CompiledContracts::load(dir.path()).unwrap();
        let nft = contracts.get(DeployableContract::CryptoDevsNft).unwrap();

        assert_eq!(nft.creation_code(&[]), bytes!("6080604052"));

        let arg = DynSolValue::Address(address!("2222222222222222222222222222222222222222"));
        let code = nft.creation_code(&[arg]);
        assert_eq!(code.len(), 5 + 32);
        assert_eq!(&code[..5], &bytes!("6080604052")[..]);
        assert_eq!(&code[17..], &[0x22; 20][..]);
    }

    #[test]
    fn test_missing_artifacts_dir() {
        let dir = tempfile::tempdir().unwrap();
        let res = CompiledContracts::load(&dir.path().join("missing"));
        assert!(matches!(res, Err(ScriptError::ArtifactParsing(_))));
    }

    #[test]
    fn test_missing_contract_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write_build_info(dir.path(), "0.8.20", 1_000_000);
        write_artifact(dir.path(), DeployableContract::CryptoDevsNft, "0x6080604052");
        write_artifact(dir.path(), DeployableContract::FakeNftMarketplace, "0x6080604052");

        match CompiledContracts::load(dir.path()) {
            Err(ScriptError::ArtifactParsing(msg)) => assert!(msg.contains("CryptoDevsDAO")),
            other => panic!("expected missing artifact error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_bytecode_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path());
        write_artifact(dir.path(), DeployableContract::FakeNftMarketplace, "0x");

        let res = CompiledContracts::load(dir.path());
        assert!(matches!(res, Err(ScriptError::ArtifactParsing(_))));
    }

    #[test]
    fn test_compiler_version_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path());
        write_build_info(dir.path(), "0.8.19", 1_000_000);

        match CompiledContracts::load(dir.path()) {
            Err(ScriptError::ArtifactParsing(msg)) => assert!(msg.contains("0.8.19")),
            other => panic!("expected compiler mismatch error, got {other:?}"),
        }
    }

    #[test]
    fn test_optimizer_runs_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path());
        write_build_info(dir.path(), "0.8.20", 200);

        let res = CompiledContracts::load(dir.path());
        assert!(matches!(res, Err(ScriptError::ArtifactParsing(_))));
    }
}
