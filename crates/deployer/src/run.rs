use {
    crate::{
        cli,
        domain::{Deployment, Network, deploy},
        infra::{Artifacts, Blockchain},
    },
    anyhow::{Result, ensure},
    clap::{Parser, error::ErrorKind},
    std::{io::Write, process::ExitCode},
};

/// Parses the arguments, deploys the contract and reports the result. The
/// returned exit code is `0` on success and `1` otherwise.
pub async fn start(args: impl Iterator<Item = String>) -> ExitCode {
    let args = match parse(args, &mut std::io::stderr()) {
        Ok(args) => args,
        Err(code) => return ExitCode::from(code),
    };
    observe::tracing::initialize(&observe::Config::new(&args.log, args.log_json));
    tracing::info!("running deployer with validated arguments:\n{}", args);

    let result = run(args).await;
    let code = report(result, &mut std::io::stdout(), &mut std::io::stderr());
    ExitCode::from(code)
}

/// Parses the command line. Invalid arguments are written to `stderr` and
/// turned into exit code `1`; help and version requests exit right away.
fn parse(args: impl Iterator<Item = String>, stderr: &mut impl Write) -> Result<cli::Args, u8> {
    cli::Args::try_parse_from(args).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        _ => {
            let _ = write!(stderr, "{err}");
            1
        }
    })
}

/// Connects to the node and deploys the configured contract.
pub async fn run(args: cli::Args) -> Result<Deployment> {
    let artifacts = Artifacts::new(&args.artifacts);
    tracing::debug!(root = ?artifacts.root(), "using hardhat artifacts");
    let blockchain = Blockchain::connect(
        &args.node_url,
        args.private_key,
        artifacts,
        args.confirmations,
    );

    let chain_id = blockchain.chain_id().await?;
    tracing::info!(chain_id, deployer = %blockchain.deployer(), "connected to node");
    check_chain(args.network, chain_id, args.skip_chain_check)?;

    let config = deploy::Config {
        contract: args.contract,
        addresses: args.network.addresses(),
    };
    Ok(deploy::deploy(&config, &blockchain).await?)
}

/// Makes sure the node serves the chain the network's addresses belong to,
/// unless the check is skipped.
fn check_chain(network: Network, chain_id: u64, skip: bool) -> Result<()> {
    if skip {
        tracing::warn!(chain_id, %network, "skipping chain id check");
        return Ok(());
    }
    ensure!(
        chain_id == network.chain_id(),
        "node is connected to chain {chain_id} but network {network} lives on chain {}",
        network.chain_id(),
    );
    Ok(())
}

/// Writes the outcome of a deployment for the operator: the deployed address
/// on `stdout` or the error including its causes on `stderr`. Returns the
/// process exit code.
pub fn report(result: Result<Deployment>, stdout: &mut impl Write, stderr: &mut impl Write) -> u8 {
    let err = match result {
        Ok(deployment) => {
            tracing::info!(?deployment, "deployment confirmed");
            match writeln!(stdout, "{deployment}").and_then(|()| stdout.flush()) {
                Ok(()) => return 0,
                Err(err) => anyhow::Error::new(err).context("failed to report deployed address"),
            }
        }
        Err(err) => err,
    };

    tracing::debug!(?err, "deployment failed");
    // There is nothing left to report to if stderr is gone as well.
    let _ = writeln!(stderr, "Error: {err:?}");
    1
}
