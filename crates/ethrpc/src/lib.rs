//! Construction of the alloy providers used to talk to an Ethereum node.
mod instrumentation;

pub use instrumentation::InstrumentationLayer;
use {
    alloy::{
        network::{EthereumWallet, TxSigner},
        primitives::Signature,
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
    },
    url::Url,
};

pub type AlloyProvider = DynProvider;

/// Creates a provider that fills in nonce, gas and chain id and signs every
/// transaction it sends with `signer`.
pub fn provider_with_signer<S>(url: &Url, label: &str, signer: S) -> AlloyProvider
where
    S: TxSigner<Signature> + Send + Sync + 'static,
{
    let rpc = ClientBuilder::default()
        .layer(InstrumentationLayer::new(label))
        .http(url.clone());
    let wallet = EthereumWallet::new(signer);

    ProviderBuilder::new()
        .wallet(wallet)
        .connect_client(rpc)
        .erased()
}
