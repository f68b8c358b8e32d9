use {
    super::{ContractFactory, Deployer, Error, PendingDeployment},
    alloy::{
        network::{EthereumWallet, ReceiptResponse, TransactionBuilder},
        primitives::Address,
        providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
        rpc::types::{TransactionReceipt, TransactionRequest},
        signers::local::PrivateKeySigner,
    },
    anyhow::anyhow,
    url::Url,
};

/// [`Deployer`] talking to an Ethereum node over JSON-RPC.
///
/// With a local key every transaction is signed in-process. Without one the
/// node signs with its own unlocked accounts, which is what development nodes
/// like Hardhat or Anvil offer.
#[derive(Clone)]
pub struct OnchainDeployer {
    provider: DynProvider,
    local_signer: Option<Address>,
}

impl OnchainDeployer {
    pub fn new(provider: DynProvider, local_signer: Option<Address>) -> Self {
        Self {
            provider,
            local_signer,
        }
    }

    pub fn connect(node_url: &Url, owner_key: Option<PrivateKeySigner>) -> Self {
        match owner_key {
            Some(signer) => {
                let address = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .connect_http(node_url.clone())
                    .erased();
                Self::new(provider, Some(address))
            }
            None => {
                let provider = ProviderBuilder::new()
                    .connect_http(node_url.clone())
                    .erased();
                Self::new(provider, None)
            }
        }
    }
}

#[async_trait::async_trait]
impl Deployer for OnchainDeployer {
    async fn signer(&self) -> Result<Address, Error> {
        if let Some(address) = self.local_signer {
            return Ok(address);
        }
        let accounts = self
            .provider
            .get_accounts()
            .await
            .map_err(|err| Error::Accounts(err.into()))?;
        tracing::debug!(count = accounts.len(), "node accounts");
        accounts.first().copied().ok_or(Error::NoSignerAvailable)
    }

    async fn deploy(
        &self,
        signer: Address,
        factory: &ContractFactory,
    ) -> Result<PendingDeployment, Error> {
        let tx = TransactionRequest::default()
            .with_from(signer)
            .with_deploy_code(factory.bytecode().clone());
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|err| Error::Submission {
                contract: factory.name().to_owned(),
                source: err.into(),
            })?;

        Ok(PendingDeployment {
            deployer: signer,
            tx_hash: *pending.tx_hash(),
        })
    }

    async fn wait_for_deployment(&self, pending: PendingDeployment) -> Result<Address, Error> {
        let tx_hash = pending.tx_hash;
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await
            .map_err(|err| Error::Confirmation {
                tx_hash,
                source: err.into(),
            })?;
        deployed_address(&receipt)
    }
}

/// The created contract of a mined contract creation.
fn deployed_address(receipt: &TransactionReceipt) -> Result<Address, Error> {
    let tx_hash = receipt.transaction_hash;
    if !receipt.status() {
        return Err(Error::Confirmation {
            tx_hash,
            source: anyhow!("reverted in block {:?}", receipt.block_number()),
        });
    }
    receipt.contract_address().ok_or_else(|| Error::Confirmation {
        tx_hash,
        source: anyhow!("receipt carries no contract address"),
    })
}
