use starknet_rs_core::types::contract::{CompiledClass, SierraClass};
use starknet_rs_core::types::Felt;

use crate::artifacts::{CompiledArtifact, ContractArtifact, DeclarePayload};
use crate::error::{DeployerError, DeployerResult};

/// Hashes identifying a class on the network, together with the artifacts they were derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractHashes {
    pub class_hash: Felt,
    pub compiled_class_hash: Felt,
    pub contract: ContractArtifact,
    pub casm: CompiledArtifact,
}

/// Derives the class hash and compiled class hash of a declare payload. Implementations must be
/// deterministic and must not touch the network.
pub trait ClassHashExtractor: Send + Sync {
    fn extract(&self, payload: &DeclarePayload) -> DeployerResult<ContractHashes>;
}

/// Computes hashes with the starknet-rs class hash algorithms.
#[derive(Debug, Clone, Copy, Default)]
pub struct SierraClassHashExtractor;

impl SierraClassHashExtractor {
    pub(crate) fn sierra_class(contract: &ContractArtifact) -> DeployerResult<SierraClass> {
        serde_json::from_value(contract.as_value().clone()).map_err(|err| {
            DeployerError::InvalidArtifact { reason: format!("not a Sierra class: {err}") }
        })
    }

    pub(crate) fn compiled_class(casm: &CompiledArtifact) -> DeployerResult<CompiledClass> {
        serde_json::from_value(casm.as_value().clone()).map_err(|err| {
            DeployerError::InvalidArtifact { reason: format!("not a compiled class: {err}") }
        })
    }

    pub(crate) fn compiled_class_hash(casm: &CompiledArtifact) -> DeployerResult<Felt> {
        Self::compiled_class(casm)?
            .class_hash()
            .map_err(|err| DeployerError::HashComputation { reason: err.to_string() })
    }
}

impl ClassHashExtractor for SierraClassHashExtractor {
    fn extract(&self, payload: &DeclarePayload) -> DeployerResult<ContractHashes> {
        let class_hash = Self::sierra_class(&payload.contract)?
            .class_hash()
            .map_err(|err| DeployerError::HashComputation { reason: err.to_string() })?;
        let compiled_class_hash = Self::compiled_class_hash(&payload.casm)?;

        Ok(ContractHashes {
            class_hash,
            compiled_class_hash,
            contract: payload.contract.clone(),
            casm: payload.casm.clone(),
        })
    }
}
