use serde::Serialize;
use starknet_rs_core::types::Felt;

use crate::artifacts::{CompiledArtifact, ContractArtifact};
use crate::error::DeployerResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationStatus {
    /// The class was declared by this call.
    Declared,
    /// The class was found on the network; nothing was submitted.
    AlreadyDeclared,
}

/// Result of a declare or declare-and-deploy operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentOutcome {
    pub status: DeclarationStatus,
    pub class_hash: Felt,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiled_class_hash: Option<Felt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Felt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<Felt>,
    #[serde(skip)]
    pub contract: Option<ContractArtifact>,
    #[serde(skip)]
    pub casm: Option<CompiledArtifact>,
}

impl DeploymentOutcome {
    pub fn new(status: DeclarationStatus, class_hash: Felt) -> Self {
        Self {
            status,
            class_hash,
            compiled_class_hash: None,
            contract_address: None,
            transaction_hash: None,
            contract: None,
            casm: None,
        }
    }

    pub fn is_newly_declared(&self) -> bool {
        self.status == DeclarationStatus::Declared
    }
}

fn to_prefixed_hex_str(felt: &Felt) -> String {
    format!("{felt:#x}")
}

/// `{classHash, contractAddress}` view of a declare-and-deploy result. Failures become empty
/// strings, as do addresses of classes that were already declared and therefore not deployed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRecord {
    pub class_hash: String,
    pub contract_address: String,
}

impl From<&DeployerResult<DeploymentOutcome>> for DeployRecord {
    fn from(result: &DeployerResult<DeploymentOutcome>) -> Self {
        match result {
            Ok(outcome) => DeployRecord {
                class_hash: to_prefixed_hex_str(&outcome.class_hash),
                contract_address: outcome
                    .contract_address
                    .as_ref()
                    .map(to_prefixed_hex_str)
                    .unwrap_or_default(),
            },
            Err(_) => DeployRecord::default(),
        }
    }
}

/// `{classHash, contract, casm, compiledClassHash}` view of a declare result. Failures become an
/// empty class hash and no artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclareRecord {
    pub class_hash: String,
    pub contract: Option<ContractArtifact>,
    pub casm: Option<CompiledArtifact>,
    pub compiled_class_hash: Option<Felt>,
}

impl From<&DeployerResult<DeploymentOutcome>> for DeclareRecord {
    fn from(result: &DeployerResult<DeploymentOutcome>) -> Self {
        match result {
            Ok(outcome) => DeclareRecord {
                class_hash: to_prefixed_hex_str(&outcome.class_hash),
                contract: outcome.contract.clone(),
                casm: outcome.casm.clone(),
                compiled_class_hash: outcome.compiled_class_hash,
            },
            Err(_) => DeclareRecord::default(),
        }
    }
}
