//! Runs a deployment against a mocked deployment collaborator and checks
//! what the operator gets to see.

use {
    crate::{
        domain::{
            ContractFactory,
            Network,
            Receipt,
            deploy::{self, MockContractDeployer},
        },
        report,
    },
    alloy::{
        dyn_abi::DynSolValue,
        json_abi::JsonAbi,
        primitives::{Address, B256, Bytes, address},
    },
    anyhow::anyhow,
};

const USDC: Address = address!("0xFEca406dA9727A25E71e732F9961F680059eF1F9");
const CROSSMINT: Address = address!("0x13253aa4Abe1861124d4c286Ee4374cD054D3eb9");
const DEPLOYED: Address = address!("0xABCD00000000000000000000000000000000ABCD");

fn config() -> deploy::Config {
    deploy::Config {
        contract: "CrossmintTester721".to_string(),
        addresses: Network::Staging.addresses(),
    }
}

fn factory() -> ContractFactory {
    ContractFactory {
        name: "CrossmintTester721".to_string(),
        abi: JsonAbi::default(),
        bytecode: Bytes::from_static(&[0x60, 0x80]),
    }
}

struct Output {
    code: u8,
    stdout: String,
    stderr: String,
}

async fn deploy_and_report(deployer: MockContractDeployer) -> Output {
    let result = deploy::deploy(&config(), &deployer)
        .await
        .map_err(anyhow::Error::from);
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = report(result, &mut stdout, &mut stderr);
    Output {
        code,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
    }
}

#[tokio::test]
async fn successful_deployment_prints_address() {
    observe::tracing::initialize_reentrant("deployer=debug");

    let tx_hash = B256::repeat_byte(0xab);
    let mut deployer = MockContractDeployer::new();
    deployer
        .expect_factory()
        .times(1)
        .returning(|_| Ok(factory()));
    deployer
        .expect_submit()
        .withf(|_, args| args == [DynSolValue::Address(USDC), DynSolValue::Address(CROSSMINT)])
        .times(1)
        .returning(move |_, _| Ok(tx_hash));
    deployer.expect_confirm().times(1).returning(|tx_hash| {
        Ok(Receipt {
            tx_hash,
            success: true,
            contract_address: Some(DEPLOYED),
            block_number: Some(42),
            gas_used: 3_000_000,
        })
    });

    let output = deploy_and_report(deployer).await;

    assert_eq!(output.code, 0);
    assert_eq!(
        output.stdout,
        format!("CrossmintTester721 deployed to: {DEPLOYED}\n")
    );
    assert_eq!(output.stdout.lines().count(), 1);
    assert!(output.stderr.is_empty());
}

#[tokio::test]
async fn rejected_deployment_prints_error() {
    observe::tracing::initialize_reentrant("deployer=debug");

    let mut deployer = MockContractDeployer::new();
    deployer
        .expect_factory()
        .times(1)
        .returning(|_| Ok(factory()));
    deployer
        .expect_submit()
        .times(1)
        .returning(|_, _| Err(anyhow!("insufficient funds for gas * price + value")));
    deployer.expect_confirm().times(0);

    let output = deploy_and_report(deployer).await;

    assert_eq!(output.code, 1);
    assert!(output.stdout.is_empty());
    assert!(
        output
            .stderr
            .contains("failed to submit deployment transaction")
    );
    assert!(output.stderr.contains("insufficient funds"));
}

#[test]
fn failing_stdout_is_reported_as_error() {
    struct Closed;

    impl std::io::Write for Closed {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let deployment = crate::domain::Deployment {
        contract: "CrossmintTester721".to_string(),
        address: DEPLOYED,
        tx_hash: B256::ZERO,
    };
    let mut stderr = Vec::new();
    let code = report(Ok(deployment), &mut Closed, &mut stderr);

    assert_eq!(code, 1);
    assert!(
        String::from_utf8(stderr)
            .unwrap()
            .contains("failed to report deployed address")
    );
}
