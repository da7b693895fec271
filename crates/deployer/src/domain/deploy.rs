//! The deployment operation and the boundary to the system that actually
//! creates the contract on chain.

use {
    super::{
        contract::{ContractFactory, Deployment, Receipt},
        network::Addresses,
    },
    alloy::{dyn_abi::DynSolValue, primitives::B256},
    observe::future::Measure,
    thiserror::Error,
};

/// What to deploy and what to pass to its constructor.
#[derive(Clone, Debug)]
pub struct Config {
    /// Name of the contract type, either bare (`CrossmintTester721`) or fully
    /// qualified (`contracts/CrossmintTester721.sol:CrossmintTester721`).
    pub contract: String,
    pub addresses: Addresses,
}

/// Abstracts the system that locates contract types, submits their creation
/// transactions and watches them until they are included in a block.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContractDeployer: Send + Sync {
    /// Resolves the factory for the contract type with the given name.
    async fn factory(&self, contract: &str) -> anyhow::Result<ContractFactory>;

    /// Submits a transaction creating a new instance of the contract and
    /// returns its hash. The constructor arguments are passed in order.
    async fn submit(
        &self,
        factory: &ContractFactory,
        constructor_args: &[DynSolValue],
    ) -> anyhow::Result<B256>;

    /// Waits until the transaction is confirmed and returns its receipt.
    async fn confirm(&self, tx_hash: B256) -> anyhow::Result<Receipt>;
}

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("failed to resolve contract factory for {contract}")]
    Factory {
        contract: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to submit deployment transaction")]
    Submission(#[source] anyhow::Error),
    #[error("failed to confirm deployment transaction {tx_hash}")]
    Confirmation {
        tx_hash: B256,
        #[source]
        source: anyhow::Error,
    },
    #[error("deployment transaction {0} reverted")]
    Reverted(B256),
    #[error("receipt of deployment transaction {0} contains no contract address")]
    MissingAddress(B256),
}

/// Deploys the configured contract with the USDC and Crossmint addresses as
/// constructor arguments and waits for the deployment to be confirmed.
///
/// The deployment transaction is submitted exactly once. Failures are not
/// retried.
pub async fn deploy(
    config: &Config,
    deployer: &dyn ContractDeployer,
) -> Result<Deployment, DeploymentError> {
    let factory =
        deployer
            .factory(&config.contract)
            .await
            .map_err(|source| DeploymentError::Factory {
                contract: config.contract.clone(),
                source,
            })?;

    tracing::info!(
        contract = %factory.name,
        usdc = %config.addresses.usdc,
        crossmint = %config.addresses.crossmint,
        "deploying contract"
    );
    let tx_hash = deployer
        .submit(&factory, &config.addresses.constructor_args())
        .await
        .map_err(DeploymentError::Submission)?;

    tracing::info!(?tx_hash, "waiting for deployment to be confirmed");
    let receipt = deployer
        .confirm(tx_hash)
        .measure("deployment_confirmation")
        .await
        .map_err(|source| DeploymentError::Confirmation { tx_hash, source })?;
    tracing::debug!(?receipt, "deployment transaction mined");

    if !receipt.success {
        return Err(DeploymentError::Reverted(tx_hash));
    }
    let address = receipt
        .contract_address
        .ok_or(DeploymentError::MissingAddress(tx_hash))?;

    Ok(Deployment {
        contract: factory.name,
        address,
        tx_hash,
    })
}
