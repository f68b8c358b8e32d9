//! Abstraction over submitting a contract creation and waiting for it, so the
//! deployment flow can be tested without a node.

mod onchain;

pub use onchain::OnchainDeployer;
use {
    crate::artifact::Artifact,
    alloy::primitives::{Address, Bytes, TxHash},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no signer available")]
    NoSignerAvailable,
    #[error("failed to list accounts of the node")]
    Accounts(#[source] anyhow::Error),
    #[error("failed to submit deployment of {contract}")]
    Submission {
        contract: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("deployment transaction {tx_hash} was not confirmed")]
    Confirmation {
        tx_hash: TxHash,
        #[source]
        source: anyhow::Error,
    },
}

/// Knows how to create one named contract. Deployments never pass
/// constructor arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractFactory {
    name: String,
    bytecode: Bytes,
}

impl ContractFactory {
    pub fn new(name: impl Into<String>, bytecode: Bytes) -> Self {
        Self {
            name: name.into(),
            bytecode,
        }
    }

    pub fn from_artifact(artifact: Artifact) -> Self {
        Self::new(artifact.contract_name, artifact.bytecode)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytecode(&self) -> &Bytes {
        &self.bytecode
    }
}

/// A submitted but not yet confirmed contract creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDeployment {
    pub deployer: Address,
    pub tx_hash: TxHash,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Deployer: Send + Sync {
    /// The first account able to sign the deployment.
    async fn signer(&self) -> Result<Address, Error>;

    /// Submits the creation transaction for `factory` from `signer`.
    async fn deploy(
        &self,
        signer: Address,
        factory: &ContractFactory,
    ) -> Result<PendingDeployment, Error>;

    /// Waits until the creation is mined and returns the new contract's
    /// address. There is no timeout.
    async fn wait_for_deployment(&self, pending: PendingDeployment) -> Result<Address, Error>;
}
