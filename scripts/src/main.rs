use clap::Parser;
use deploy_scripts::{cli::Cli, commands::run, config::DeployConfig};
use eyre::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing `.env` file is fine, values may come from the environment
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DeployConfig::try_from(Cli::parse())?;
    run(config).await?;

    Ok(())
}
