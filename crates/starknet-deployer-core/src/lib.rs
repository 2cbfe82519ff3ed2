pub mod account;
pub mod artifacts;
pub mod constants;
pub mod deployer;
pub mod error;
pub mod hashes;
mod in_flight;
pub mod outcome;
pub mod progress;
pub mod provider;
#[cfg(any(test, feature = "test_utils"))]
pub mod utils;

pub use account::{AccountHandle, ReceiptPolling, StarknetAccount};
pub use artifacts::{CompiledArtifact, ContractArtifact};
pub use deployer::{Deployer, DeployerConfig};
pub use error::{DeployerError, DeployerResult, ErrorKind};
pub use outcome::{DeclarationStatus, DeclareRecord, DeployRecord, DeploymentOutcome};
pub use progress::{Progress, ProgressSink};
pub use provider::{JsonRpcProviderResolver, Network};
