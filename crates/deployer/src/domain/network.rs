use {
    alloy::{
        dyn_abi::DynSolValue,
        primitives::{Address, address},
    },
    std::fmt,
};

pub mod chain_ids {
    pub const POLYGON: u64 = 137;
    pub const MUMBAI: u64 = 80001;
}

/// The environments the contract can be deployed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Network {
    /// Polygon Mumbai testnet together with the Crossmint staging EVM
    /// payment processor.
    Staging,
    /// Polygon mainnet together with the Crossmint production EVM payment
    /// processor.
    Production,
}

/// Contracts the deployed contract gets wired to on construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Addresses {
    /// USDC token contract.
    pub usdc: Address,
    /// Crossmint payment processor.
    pub crossmint: Address,
}

impl Network {
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Staging => chain_ids::MUMBAI,
            Self::Production => chain_ids::POLYGON,
        }
    }

    pub fn addresses(&self) -> Addresses {
        match self {
            Self::Staging => Addresses {
                usdc: address!("0xFEca406dA9727A25E71e732F9961F680059eF1F9"),
                crossmint: address!("0x13253aa4Abe1861124d4c286Ee4374cD054D3eb9"),
            },
            Self::Production => Addresses {
                usdc: address!("0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174"),
                crossmint: address!("0xa8C10eC49dF815e73A881ABbE0Aa7b210f39E2Df"),
            },
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Staging => f.write_str("staging"),
            Self::Production => f.write_str("production"),
        }
    }
}

impl Addresses {
    /// Constructor arguments in the order the contract declares them.
    pub fn constructor_args(&self) -> Vec<DynSolValue> {
        vec![
            DynSolValue::Address(self.usdc),
            DynSolValue::Address(self.crossmint),
        ]
    }
}
