pub mod arguments;
pub mod artifact;
pub mod deployer;
pub mod env_file;

use {
    crate::{
        artifact::Artifact,
        deployer::{ContractFactory, Deployer, OnchainDeployer},
        env_file::EnvFile,
    },
    alloy::{primitives::Address, signers::local::PrivateKeySigner},
    anyhow::{Context, Result},
    std::path::PathBuf,
    url::Url,
};

/// Everything a deployment run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct Config {
    pub node_url: Url,
    pub owner_key: Option<PrivateKeySigner>,
    pub artifacts_dir: PathBuf,
    pub contract_name: String,
    pub env_file: PathBuf,
    pub env_key: String,
}

impl From<arguments::Arguments> for Config {
    fn from(args: arguments::Arguments) -> Self {
        Self {
            node_url: args.node_url,
            owner_key: args.owner_key,
            artifacts_dir: args.artifacts_dir,
            contract_name: args.contract_name,
            env_file: args.env_file,
            env_key: args.env_key,
        }
    }
}

pub async fn run(config: Config) -> Result<Address> {
    let env_file = EnvFile::new(&config.env_file, &config.env_key)?;
    let artifact = Artifact::load(&config.artifacts_dir, &config.contract_name)
        .await
        .context("failed to load contract artifact")?;
    let factory = ContractFactory::from_artifact(artifact);
    let deployer = OnchainDeployer::connect(&config.node_url, config.owner_key);

    deploy_registry(&deployer, &factory, &env_file).await
}

/// Deploys `factory` with the first available signer, waits for the creation
/// to be mined and records the new address in `env_file`.
///
/// Nothing is written unless the deployment is confirmed.
pub async fn deploy_registry(
    deployer: &dyn Deployer,
    factory: &ContractFactory,
    env_file: &EnvFile,
) -> Result<Address> {
    let signer = deployer.signer().await?;
    tracing::info!(%signer, "deploying with");

    let pending = deployer.deploy(signer, factory).await?;
    tracing::info!(
        contract = factory.name(),
        deployer = %pending.deployer,
        tx_hash = %pending.tx_hash,
        "deployment submitted"
    );

    let address = deployer.wait_for_deployment(pending).await?;
    tracing::info!(contract = factory.name(), %address, "contract deployed");

    env_file
        .write_entry(&address.to_string())
        .await
        .with_context(|| format!("{address} was deployed but could not be recorded"))?;
    tracing::info!(
        path = %env_file.path().display(),
        key = env_file.key(),
        "recorded deployed address"
    );

    Ok(address)
}
