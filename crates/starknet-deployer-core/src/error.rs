use starknet_rs_providers::ProviderError;
use thiserror::Error;

use crate::provider::Network;

#[derive(Error, Debug)]
pub enum DeployerError {
    #[error("Account not connected")]
    AccountNotConnected,
    #[error("Provider not found for network {network}")]
    ProviderNotFound { network: Network },
    #[error("Invalid artifact: {reason}")]
    InvalidArtifact { reason: String },
    #[error("Class hash computation error: {reason}")]
    HashComputation { reason: String },
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("Transaction submission failed: {reason}")]
    Submission { reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of [`DeployerError`], for callers that only need to know which stage
/// failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing account or provider; nothing was sent.
    Precondition,
    /// Reading or interpreting the artifacts failed.
    Input,
    /// The RPC node could not be queried.
    Transport,
    /// The account failed to build, sign or send a transaction.
    Rejected,
}

impl DeployerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployerError::AccountNotConnected | DeployerError::ProviderNotFound { .. } => {
                ErrorKind::Precondition
            }
            DeployerError::InvalidArtifact { .. }
            | DeployerError::HashComputation { .. }
            | DeployerError::Io(_)
            | DeployerError::Json(_) => ErrorKind::Input,
            DeployerError::Provider(_) => ErrorKind::Transport,
            DeployerError::Submission { .. } => ErrorKind::Rejected,
        }
    }
}

pub type DeployerResult<T, E = DeployerError> = Result<T, E>;
