use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use starknet_rs_core::types::Felt;

use crate::error::{DeployerError, DeployerResult};

const ABI_KEY: &str = "abi";

fn parse_json_object(json_str: &str, artifact_name: &str) -> DeployerResult<Value> {
    let value: Value = serde_json::from_str(json_str)?;
    if !value.is_object() {
        return Err(DeployerError::InvalidArtifact {
            reason: format!("{artifact_name} artifact is not a JSON object"),
        });
    }

    Ok(value)
}

/// Sierra contract class, as emitted by the Cairo compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractArtifact(Value);

impl ContractArtifact {
    pub fn from_json_str(json_str: &str) -> DeployerResult<Self> {
        parse_json_object(json_str, "Contract").map(Self)
    }

    pub fn from_path(path: impl AsRef<Path>) -> DeployerResult<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn from_value(value: Value) -> DeployerResult<Self> {
        if !value.is_object() {
            return Err(DeployerError::InvalidArtifact {
                reason: "Contract artifact is not a JSON object".to_string(),
            });
        }

        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn abi(&self) -> Option<&Value> {
        self.0.get(ABI_KEY)
    }

    /// Replaces the ABI of the artifact. A string ABI (the flattened representation) is parsed
    /// back into its JSON form so the artifact stays deserializable as a Sierra class.
    pub fn set_abi(&mut self, abi: Value) -> DeployerResult<()> {
        let abi = match abi {
            Value::String(abi_str) => serde_json::from_str(&abi_str)?,
            other => other,
        };

        match self.0.as_object_mut() {
            Some(object) => {
                object.insert(ABI_KEY.to_string(), abi);
                Ok(())
            }
            None => Err(DeployerError::InvalidArtifact {
                reason: "Contract artifact is not a JSON object".to_string(),
            }),
        }
    }
}

/// Compiled (CASM) class of a Sierra contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompiledArtifact(Value);

impl CompiledArtifact {
    pub fn from_json_str(json_str: &str) -> DeployerResult<Self> {
        parse_json_object(json_str, "Compiled").map(Self)
    }

    pub fn from_path(path: impl AsRef<Path>) -> DeployerResult<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn from_value(value: Value) -> DeployerResult<Self> {
        if !value.is_object() {
            return Err(DeployerError::InvalidArtifact {
                reason: "Compiled artifact is not a JSON object".to_string(),
            });
        }

        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarePayload {
    pub contract: ContractArtifact,
    pub casm: CompiledArtifact,
}

impl DeclarePayload {
    pub fn new(contract: ContractArtifact, casm: CompiledArtifact) -> Self {
        Self { contract, casm }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclareAndDeployPayload {
    pub contract: ContractArtifact,
    pub casm: CompiledArtifact,
    pub constructor_calldata: Vec<Felt>,
}

impl DeclareAndDeployPayload {
    pub fn new(
        contract: ContractArtifact,
        casm: CompiledArtifact,
        constructor_calldata: Vec<Felt>,
    ) -> Self {
        Self { contract, casm, constructor_calldata }
    }

    pub fn to_declare_payload(&self) -> DeclarePayload {
        DeclarePayload::new(self.contract.clone(), self.casm.clone())
    }
}
