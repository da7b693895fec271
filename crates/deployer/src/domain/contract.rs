use {
    alloy::{
        dyn_abi::{DynSolType, DynSolValue, Specifier},
        json_abi::JsonAbi,
        primitives::{Address, B256, Bytes},
    },
    std::fmt,
    thiserror::Error,
};

/// Everything needed to create instances of a contract type: its creation
/// bytecode and the ABI describing the constructor.
#[derive(Clone, Debug, PartialEq)]
pub struct ContractFactory {
    pub name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

#[derive(Debug, Error)]
pub enum ConstructorError {
    #[error("{contract} constructor expects {expected} arguments but {actual} were given")]
    ArgumentCount {
        contract: String,
        expected: usize,
        actual: usize,
    },
    #[error("constructor argument `{name}` of type {ty} does not accept {value:?}")]
    ArgumentType {
        name: String,
        ty: String,
        value: DynSolValue,
    },
    #[error("constructor argument `{name}` has unsupported type {ty}")]
    UnsupportedType {
        name: String,
        ty: String,
        #[source]
        source: alloy::dyn_abi::Error,
    },
}

impl ContractFactory {
    /// Returns the init code of a deployment transaction: the creation
    /// bytecode followed by the ABI encoded constructor arguments.
    pub fn deployment_code(&self, args: &[DynSolValue]) -> Result<Bytes, ConstructorError> {
        let inputs = self
            .abi
            .constructor
            .as_ref()
            .map(|constructor| constructor.inputs.as_slice())
            .unwrap_or_default();
        if inputs.len() != args.len() {
            return Err(ConstructorError::ArgumentCount {
                contract: self.name.clone(),
                expected: inputs.len(),
                actual: args.len(),
            });
        }

        for (param, value) in inputs.iter().zip(args) {
            let ty: DynSolType =
                param
                    .resolve()
                    .map_err(|source| ConstructorError::UnsupportedType {
                        name: param.name.clone(),
                        ty: param.ty.clone(),
                        source,
                    })?;
            if !ty.matches(value) {
                return Err(ConstructorError::ArgumentType {
                    name: param.name.clone(),
                    ty: param.ty.clone(),
                    value: value.clone(),
                });
            }
        }

        if args.is_empty() {
            return Ok(self.bytecode.clone());
        }
        let encoded = DynSolValue::Tuple(args.to_vec()).abi_encode_params();
        Ok([&self.bytecode[..], &encoded[..]].concat().into())
    }
}

/// What the node reports about a mined deployment transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: B256,
    pub success: bool,
    pub contract_address: Option<Address>,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// A confirmed contract deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployment {
    pub contract: String,
    pub address: Address,
    pub tx_hash: B256,
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} deployed to: {}", self.contract, self.address)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::{U256, address, bytes},
    };

    fn factory() -> ContractFactory {
        let abi: JsonAbi = serde_json::from_str(
            r#"[{
                "inputs": [
                    {"internalType": "address", "name": "_usdc", "type": "address"},
                    {"internalType": "address", "name": "_crossmint", "type": "address"}
                ],
                "stateMutability": "nonpayable",
                "type": "constructor"
            }]"#,
        )
        .unwrap();
        ContractFactory {
            name: "CrossmintTester721".to_string(),
            abi,
            bytecode: bytes!("6080604052"),
        }
    }

    #[test]
    fn appends_encoded_constructor_arguments() {
        let usdc = address!("0xFEca406dA9727A25E71e732F9961F680059eF1F9");
        let crossmint = address!("0x13253aa4Abe1861124d4c286Ee4374cD054D3eb9");

        let code = factory()
            .deployment_code(&[DynSolValue::Address(usdc), DynSolValue::Address(crossmint)])
            .unwrap();

        assert_eq!(code.len(), 5 + 64);
        assert_eq!(&code[..5], &bytes!("6080604052")[..]);
        assert_eq!(&code[5..17], [0u8; 12].as_slice());
        assert_eq!(&code[17..37], usdc.as_slice());
        assert_eq!(&code[37..49], [0u8; 12].as_slice());
        assert_eq!(&code[49..69], crossmint.as_slice());
    }

    #[test]
    fn rejects_wrong_argument_count() {
        let err = factory()
            .deployment_code(&[DynSolValue::Address(Address::ZERO)])
            .unwrap_err();
        assert!(matches!(
            err,
            ConstructorError::ArgumentCount {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn rejects_mistyped_argument() {
        let err = factory()
            .deployment_code(&[
                DynSolValue::Address(Address::ZERO),
                DynSolValue::Uint(U256::from(1), 256),
            ])
            .unwrap_err();
        assert!(matches!(err, ConstructorError::ArgumentType { name, .. } if name == "_crossmint"));
    }

    #[test]
    fn contract_without_constructor_takes_no_arguments() {
        let factory = ContractFactory {
            abi: JsonAbi::default(),
            ..factory()
        };
        assert_eq!(
            factory.deployment_code(&[]).unwrap(),
            bytes!("6080604052")
        );
        assert!(
            factory
                .deployment_code(&[DynSolValue::Address(Address::ZERO)])
                .is_err()
        );
    }

    #[test]
    fn displays_deployed_address() {
        let deployment = Deployment {
            contract: "CrossmintTester721".to_string(),
            address: address!("0xABCD00000000000000000000000000000000ABCD"),
            tx_hash: B256::ZERO,
        };
        assert_eq!(
            deployment.to_string(),
            format!(
                "CrossmintTester721 deployed to: {}",
                deployment.address.to_checksum(None)
            )
        );
    }
}
