//! CLI arguments for the `deploy` binary.

use {
    crate::domain::Network,
    alloy::signers::local::PrivateKeySigner,
    clap::Parser,
    std::{fmt, path::PathBuf},
    url::Url,
};

/// Deploy the CrossmintTester721 contract
#[derive(Parser)]
#[command(version)]
pub struct Args {
    /// The log filter.
    #[arg(long, env, default_value = "warn,deployer=info,ethrpc=info")]
    pub log: String,

    /// Output log events as JSON.
    #[arg(long, env, default_value = "false")]
    pub log_json: bool,

    /// The network to deploy to. Selects the USDC and Crossmint payment
    /// processor addresses passed to the constructor.
    #[arg(long, env, value_enum, default_value = "staging")]
    pub network: Network,

    /// The Ethereum node URL to connect to.
    #[arg(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Private key of the account paying for the deployment.
    #[arg(long, env, hide_env_values = true)]
    pub private_key: PrivateKeySigner,

    /// Path to the artifacts directory created by `hardhat compile`.
    #[arg(long, env, default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// The contract to deploy. Either its bare name or its fully qualified
    /// name (`contracts/Foo.sol:Foo`).
    #[arg(long, env, default_value = "CrossmintTester721")]
    pub contract: String,

    /// Number of confirmations to wait for after the deployment transaction
    /// got included in a block.
    #[arg(long, env, default_value = "1")]
    pub confirmations: u64,

    /// Deploy even if the node is connected to a different chain than the
    /// one the selected network lives on.
    #[arg(long, env, default_value = "false")]
    pub skip_chain_check: bool,
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "log: {}", self.log)?;
        writeln!(f, "log_json: {}", self.log_json)?;
        writeln!(f, "network: {}", self.network)?;
        writeln!(f, "node_url: {}", self.node_url)?;
        writeln!(f, "private_key: SECRET")?;
        writeln!(f, "artifacts: {}", self.artifacts.display())?;
        writeln!(f, "contract: {}", self.contract)?;
        writeln!(f, "confirmations: {}", self.confirmations)?;
        writeln!(f, "skip_chain_check: {}", self.skip_chain_check)?;
        Ok(())
    }
}
