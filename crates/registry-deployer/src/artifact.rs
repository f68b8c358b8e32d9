//! Loading of Hardhat compiler artifacts.

use {
    alloy::primitives::Bytes,
    serde::Deserialize,
    std::{
        io,
        path::{Path, PathBuf},
    },
    tokio::fs,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read artifact {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed artifact {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("artifact {path:?} describes contract {found}, expected {expected}")]
    NameMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
    #[error("contract {0} has no creation bytecode")]
    EmptyBytecode(String),
}

/// The parts of a compiled contract needed to deploy it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    pub bytecode: Bytes,
}

impl Artifact {
    /// Location of the artifact for `name` in a Hardhat artifacts directory,
    /// e.g. `artifacts/contracts/IdentityRegistry.sol/IdentityRegistry.json`.
    pub fn path(artifacts_dir: &Path, name: &str) -> PathBuf {
        artifacts_dir
            .join("contracts")
            .join(format!("{name}.sol"))
            .join(format!("{name}.json"))
    }

    pub async fn load(artifacts_dir: &Path, name: &str) -> Result<Self, Error> {
        let path = Self::path(artifacts_dir, name);
        let data = fs::read_to_string(&path)
            .await
            .map_err(|source| Error::Read {
                path: path.clone(),
                source,
            })?;
        let artifact: Self = serde_json::from_str(&data).map_err(|source| Error::Parse {
            path: path.clone(),
            source,
        })?;

        if artifact.contract_name != name {
            return Err(Error::NameMismatch {
                path,
                expected: name.to_owned(),
                found: artifact.contract_name,
            });
        }
        // Interfaces and abstract contracts compile to `0x`.
        if artifact.bytecode.is_empty() {
            return Err(Error::EmptyBytecode(artifact.contract_name));
        }

        tracing::debug!(?path, size = artifact.bytecode.len(), "loaded artifact");
        Ok(artifact)
    }
}
