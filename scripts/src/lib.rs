//! Scripts for deploying the CryptoDevs NFT, marketplace & DAO contracts and
//! verifying their sources on Etherscan.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod deployer;
pub mod errors;
pub mod types;
pub mod utils;
pub mod verifier;
