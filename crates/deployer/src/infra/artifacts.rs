//! Resolves contract factories from the artifacts directory produced by
//! `hardhat compile`.
//!
//! The directory mirrors the source tree: the artifact of contract `Foo`
//! declared in `contracts/Foo.sol` lives at `contracts/Foo.sol/Foo.json`.
//! Besides the artifacts themselves hardhat stores debug files (`*.dbg.json`)
//! next to them and the raw compiler output in `build-info/`. Both are
//! ignored.

use {
    crate::domain::ContractFactory,
    alloy::{
        json_abi::JsonAbi,
        primitives::{Bytes, hex::FromHexError},
    },
    serde::Deserialize,
    std::{
        collections::BTreeMap,
        path::{Path, PathBuf},
    },
    thiserror::Error,
    tokio::fs,
};

const BUILD_INFO_DIR: &str = "build-info";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("no artifact for contract {contract} found in {root:?}")]
    NotFound { contract: String, root: PathBuf },
    #[error(
        "there are multiple artifacts for contract {contract}, use one of the fully qualified \
         names: {}",
        .candidates.join(", ")
    )]
    Ambiguous {
        contract: String,
        candidates: Vec<String>,
    },
    #[error("I/O error while reading {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed artifact {path:?}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("artifact {path:?} contains invalid bytecode")]
    Bytecode {
        path: PathBuf,
        #[source]
        source: FromHexError,
    },
    #[error("{contract} is not a valid contract name")]
    InvalidName {
        contract: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("artifact {path:?} describes contract {actual} instead of {expected}")]
    NameMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
    #[error("contract {0} is abstract and can't be deployed")]
    Abstract(String),
    #[error(
        "contract {contract} must be linked to the following libraries before it can be \
         deployed: {}",
        .libraries.join(", ")
    )]
    Unlinked {
        contract: String,
        libraries: Vec<String>,
    },
}

/// The parts of a hardhat artifact needed to deploy the contract.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    contract_name: String,
    source_name: String,
    abi: JsonAbi,
    /// Hex string, with `__$<hash>$__` placeholders where libraries still
    /// have to be linked.
    bytecode: String,
    /// Source file -> library name -> placeholder offsets.
    #[serde(default)]
    link_references: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

/// Hardhat artifacts directory.
#[derive(Clone, Debug)]
pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads the factory of a contract. `name` is either the bare contract
    /// name, which has to be unique across all artifacts, or a fully
    /// qualified name like `contracts/Foo.sol:Foo`.
    pub async fn factory(&self, name: &str) -> Result<ContractFactory, ArtifactError> {
        let (path, contract) = match name.rsplit_once(':') {
            Some((source, contract)) => (
                self.qualified_path(name, source, contract).await?,
                contract,
            ),
            None => (self.find_unique(name).await?, name),
        };
        tracing::debug!(?path, "loading artifact");

        let data = fs::read_to_string(&path)
            .await
            .map_err(|source| ArtifactError::Io {
                path: path.clone(),
                source,
            })?;
        let artifact: Artifact =
            serde_json::from_str(&data).map_err(|source| ArtifactError::Malformed {
                path: path.clone(),
                source,
            })?;

        if artifact.contract_name != contract {
            return Err(ArtifactError::NameMismatch {
                path,
                expected: contract.to_string(),
                actual: artifact.contract_name,
            });
        }
        if artifact.bytecode.trim_start_matches("0x").is_empty() {
            return Err(ArtifactError::Abstract(artifact.contract_name));
        }
        let libraries: Vec<String> = artifact
            .link_references
            .iter()
            .flat_map(|(source, libraries)| {
                libraries
                    .keys()
                    .map(move |library| format!("{source}:{library}"))
            })
            .collect();
        if !libraries.is_empty() {
            return Err(ArtifactError::Unlinked {
                contract: artifact.contract_name,
                libraries,
            });
        }
        let bytecode: Bytes = artifact
            .bytecode
            .parse()
            .map_err(|source| ArtifactError::Bytecode { path, source })?;

        tracing::debug!(
            contract = %artifact.contract_name,
            source = %artifact.source_name,
            bytecode_len = bytecode.len(),
            "loaded contract factory"
        );
        Ok(ContractFactory {
            name: artifact.contract_name,
            abi: artifact.abi,
            bytecode,
        })
    }

    async fn qualified_path(
        &self,
        name: &str,
        source: &str,
        contract: &str,
    ) -> Result<PathBuf, ArtifactError> {
        let path = self.root.join(source).join(format!("{contract}.json"));
        match fs::try_exists(&path).await {
            Ok(true) => Ok(path),
            Ok(false) => Err(ArtifactError::NotFound {
                contract: name.to_string(),
                root: self.root.clone(),
            }),
            Err(source) => Err(ArtifactError::Io { path, source }),
        }
    }

    async fn find_unique(&self, contract: &str) -> Result<PathBuf, ArtifactError> {
        let mut candidates = self.find_all(contract).await?;
        match candidates.len() {
            0 => Err(ArtifactError::NotFound {
                contract: contract.to_string(),
                root: self.root.clone(),
            }),
            1 => Ok(candidates.remove(0)),
            _ => Err(ArtifactError::Ambiguous {
                contract: contract.to_string(),
                candidates: candidates
                    .iter()
                    .map(|path| self.qualified_name(path, contract))
                    .collect(),
            }),
        }
    }

    /// Collects every `<contract>.json` below the artifacts directory.
    async fn find_all(&self, contract: &str) -> Result<Vec<PathBuf>, ArtifactError> {
        let root = self.root.clone();
        let contract = contract.to_string();
        tokio::task::spawn_blocking(move || find_all(&root, &contract))
            .await
            .map_err(|err| ArtifactError::Io {
                path: self.root.clone(),
                source: std::io::Error::other(err),
            })?
    }

    /// `<root>/contracts/Foo.sol/Foo.json` -> `contracts/Foo.sol:Foo`
    fn qualified_name(&self, path: &Path, contract: &str) -> String {
        let source = path
            .parent()
            .and_then(|parent| parent.strip_prefix(&self.root).ok())
            .unwrap_or(path);
        format!("{}:{contract}", source.display())
    }
}

fn find_all(root: &Path, contract: &str) -> Result<Vec<PathBuf>, ArtifactError> {
    let pattern = format!(
        "{}/**/{contract}.json",
        glob::Pattern::escape(&root.to_string_lossy())
    );
    let paths = glob::glob(&pattern).map_err(|source| ArtifactError::InvalidName {
        contract: contract.to_string(),
        source,
    })?;

    let build_info = root.join(BUILD_INFO_DIR);
    let mut found = Vec::new();
    for path in paths {
        let path = path.map_err(|err| ArtifactError::Io {
            path: err.path().to_path_buf(),
            source: err.into_error(),
        })?;
        if !path.starts_with(&build_info) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}
