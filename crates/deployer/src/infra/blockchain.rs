use {
    crate::{
        domain::{ContractDeployer, ContractFactory, Receipt},
        infra::artifacts::Artifacts,
    },
    alloy::{
        dyn_abi::DynSolValue,
        network::{TransactionBuilder, TxSigner},
        primitives::{Address, B256, Signature},
        providers::{PendingTransactionBuilder, Provider},
        rpc::types::TransactionRequest,
    },
    anyhow::{Context, Result},
    ethrpc::AlloyProvider,
    url::Url,
};

/// Deploys contracts from hardhat artifacts through an Ethereum node.
pub struct Blockchain {
    provider: AlloyProvider,
    deployer: Address,
    artifacts: Artifacts,
    confirmations: u64,
}

impl Blockchain {
    /// Connects to the node at `url`. Transactions are signed by `signer`.
    pub fn connect<S>(url: &Url, signer: S, artifacts: Artifacts, confirmations: u64) -> Self
    where
        S: TxSigner<Signature> + Send + Sync + 'static,
    {
        let deployer = signer.address();
        let provider = ethrpc::provider_with_signer(url, "deployer", signer);
        Self::new(provider, deployer, artifacts, confirmations)
    }

    pub fn new(
        provider: AlloyProvider,
        deployer: Address,
        artifacts: Artifacts,
        confirmations: u64,
    ) -> Self {
        Self {
            provider,
            deployer,
            artifacts,
            confirmations,
        }
    }

    /// Address that pays for and owns the deployment.
    pub fn deployer(&self) -> Address {
        self.deployer
    }

    pub async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .context("could not fetch chain id")
    }
}

#[async_trait::async_trait]
impl ContractDeployer for Blockchain {
    async fn factory(&self, contract: &str) -> Result<ContractFactory> {
        Ok(self.artifacts.factory(contract).await?)
    }

    async fn submit(
        &self,
        factory: &ContractFactory,
        constructor_args: &[DynSolValue],
    ) -> Result<B256> {
        let code = factory.deployment_code(constructor_args)?;
        let tx = TransactionRequest::default()
            .with_from(self.deployer)
            .with_deploy_code(code);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .context("node rejected deployment transaction")?;
        Ok(*pending.tx_hash())
    }

    async fn confirm(&self, tx_hash: B256) -> Result<Receipt> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await
            .with_context(|| format!("could not fetch receipt of transaction {tx_hash}"))?;
        Ok(Receipt {
            tx_hash,
            success: receipt.status(),
            contract_address: receipt.contract_address,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::{
            json_abi::JsonAbi,
            primitives::{Bytes, U64},
            providers::{ProviderBuilder, mock::Asserter},
        },
    };

    fn blockchain(asserter: Asserter) -> Blockchain {
        let provider = ProviderBuilder::new()
            .connect_mocked_client(asserter)
            .erased();
        Blockchain::new(provider, Address::repeat_byte(1), Artifacts::new("artifacts"), 1)
    }

    #[tokio::test]
    async fn reads_chain_id() {
        let asserter = Asserter::new();
        asserter.push_success(&U64::from(80001));

        assert_eq!(blockchain(asserter).chain_id().await.unwrap(), 80001);
    }

    #[tokio::test]
    async fn rejects_invalid_constructor_arguments_before_sending() {
        let blockchain = blockchain(Asserter::new());
        let factory = ContractFactory {
            name: "CrossmintTester721".to_string(),
            abi: JsonAbi::default(),
            bytecode: Bytes::from_static(&[0x60, 0x80]),
        };

        let err = blockchain
            .submit(&factory, &[DynSolValue::Address(Address::ZERO)])
            .await
            .unwrap_err();

        assert!(
            err.to_string()
                .contains("expects 0 arguments but 1 were given")
        );
    }
}
