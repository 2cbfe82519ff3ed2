use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use starknet_rs_accounts::{Account, ConnectedAccount};
use starknet_rs_contract::ContractFactory;
use starknet_rs_core::types::{ExecutionResult, Felt, FlattenedSierraClass, StarknetError};
use starknet_rs_core::utils::{get_udc_deployed_address, UdcUniqueness};
use starknet_rs_providers::{Provider, ProviderError};
use tracing::{debug, info};

use crate::artifacts::{DeclareAndDeployPayload, DeclarePayload};
use crate::constants::{RECEIPT_POLL_ATTEMPTS, RECEIPT_POLL_INTERVAL};
use crate::error::{DeployerError, DeployerResult};
use crate::hashes::SierraClassHashExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclareResult {
    pub transaction_hash: Felt,
    pub class_hash: Felt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployResult {
    pub transaction_hash: Felt,
    pub contract_address: Felt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclareAndDeployResult {
    pub declare: DeclareResult,
    pub deploy: DeployResult,
}

/// A connected account able to sign and send declare and deploy transactions.
#[async_trait]
pub trait AccountHandle: Send + Sync {
    /// Declares the class of the payload and deploys one instance of it with the payload's
    /// constructor calldata.
    async fn declare_and_deploy(
        &self,
        payload: &DeclareAndDeployPayload,
    ) -> DeployerResult<DeclareAndDeployResult>;

    /// Returns the payload in the form that would be declared, with its ABI normalized by the
    /// account. With `skip_validate` the payload is not checked against the network.
    async fn build_declare_payload(
        &self,
        payload: &DeclarePayload,
        skip_validate: bool,
    ) -> DeployerResult<DeclarePayload>;

    async fn declare(&self, payload: &DeclarePayload) -> DeployerResult<DeclareResult>;
}

fn submission_error(err: impl std::fmt::Display) -> DeployerError {
    DeployerError::Submission { reason: err.to_string() }
}

/// How often, and how many times, a transaction receipt is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolling {
    pub interval: Duration,
    pub attempts: u32,
}

impl Default for ReceiptPolling {
    fn default() -> Self {
        Self { interval: RECEIPT_POLL_INTERVAL, attempts: RECEIPT_POLL_ATTEMPTS }
    }
}

/// [`AccountHandle`] over a starknet-rs account. Deployments go through the Universal Deployer
/// Contract.
///
/// Declarations are only reported once their transaction has a successful receipt.
#[derive(Debug, Clone)]
pub struct StarknetAccount<A> {
    account: A,
    salt: Option<Felt>,
    polling: ReceiptPolling,
}

impl<A> StarknetAccount<A> {
    pub fn new(account: A) -> Self {
        Self { account, salt: None, polling: ReceiptPolling::default() }
    }

    pub fn with_receipt_polling(mut self, polling: ReceiptPolling) -> Self {
        self.polling = polling;
        self
    }

    /// Uses a fixed deployment salt instead of a random one.
    pub fn with_salt(mut self, salt: Felt) -> Self {
        self.salt = Some(salt);
        self
    }

    pub fn inner(&self) -> &A {
        &self.account
    }

    fn deployment_salt(&self) -> Felt {
        self.salt.unwrap_or_else(|| Felt::from(rand::random::<u128>()))
    }
}

impl<A> StarknetAccount<A>
where
    A: ConnectedAccount + Send + Sync,
{
    fn flatten(payload: &DeclarePayload) -> DeployerResult<(FlattenedSierraClass, Felt)> {
        let flattened = SierraClassHashExtractor::sierra_class(&payload.contract)?
            .flatten()
            .map_err(|err| DeployerError::InvalidArtifact { reason: err.to_string() })?;
        let compiled_class_hash = SierraClassHashExtractor::compiled_class_hash(&payload.casm)?;

        Ok((flattened, compiled_class_hash))
    }

    async fn send_declaration(&self, payload: &DeclarePayload) -> DeployerResult<DeclareResult> {
        let (flattened, compiled_class_hash) = Self::flatten(payload)?;
        let result = self
            .account
            .declare_v3(Arc::new(flattened), compiled_class_hash)
            .send()
            .await
            .map_err(submission_error)?;

        info!(
            "Declare transaction {:#x} sent for class {:#x}",
            result.transaction_hash, result.class_hash
        );

        Ok(DeclareResult { transaction_hash: result.transaction_hash, class_hash: result.class_hash })
    }

    /// Polls until the transaction has a receipt. A reverted transaction is a submission error,
    /// as is a transaction still unknown after the last attempt.
    pub async fn wait_for_receipt(&self, transaction_hash: Felt) -> DeployerResult<()> {
        let ReceiptPolling { interval, attempts } = self.polling;
        for _ in 0..attempts {
            match self.account.provider().get_transaction_receipt(transaction_hash).await {
                Ok(receipt) => {
                    return match receipt.receipt.execution_result() {
                        ExecutionResult::Succeeded => Ok(()),
                        ExecutionResult::Reverted { reason } => Err(DeployerError::Submission {
                            reason: format!(
                                "transaction {transaction_hash:#x} reverted: {reason}"
                            ),
                        }),
                    };
                }
                Err(ProviderError::StarknetError(StarknetError::TransactionHashNotFound)) => {
                    debug!("Waiting for transaction {transaction_hash:#x}");
                    tokio::time::sleep(interval).await;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(DeployerError::Submission {
            reason: format!(
                "transaction {transaction_hash:#x} not accepted after {attempts} attempts"
            ),
        })
    }
}

#[async_trait]
impl<A> AccountHandle for StarknetAccount<A>
where
    A: ConnectedAccount + Send + Sync,
{
    async fn declare_and_deploy(
        &self,
        payload: &DeclareAndDeployPayload,
    ) -> DeployerResult<DeclareAndDeployResult> {
        let declare = self.send_declaration(&payload.to_declare_payload()).await?;
        self.wait_for_receipt(declare.transaction_hash).await?;

        let salt = self.deployment_salt();
        let factory = ContractFactory::new(declare.class_hash, &self.account);
        let deployment = factory
            .deploy_v3(payload.constructor_calldata.clone(), salt, false)
            .send()
            .await
            .map_err(submission_error)?;

        let contract_address = get_udc_deployed_address(
            salt,
            declare.class_hash,
            &UdcUniqueness::NotUnique,
            &payload.constructor_calldata,
        );

        info!(
            "Deploy transaction {:#x} sent for contract {:#x}",
            deployment.transaction_hash, contract_address
        );

        Ok(DeclareAndDeployResult {
            declare,
            deploy: DeployResult { transaction_hash: deployment.transaction_hash, contract_address },
        })
    }

    async fn build_declare_payload(
        &self,
        payload: &DeclarePayload,
        skip_validate: bool,
    ) -> DeployerResult<DeclarePayload> {
        let (flattened, compiled_class_hash) = Self::flatten(payload)?;
        let abi = Value::String(flattened.abi.clone());

        if !skip_validate {
            let estimate = self
                .account
                .declare_v3(Arc::new(flattened), compiled_class_hash)
                .estimate_fee()
                .await
                .map_err(submission_error)?;
            debug!("Declaration validated, estimated fee {:#x}", estimate.overall_fee);
        }

        let mut built = payload.clone();
        built.contract.set_abi(abi)?;

        Ok(built)
    }

    async fn declare(&self, payload: &DeclarePayload) -> DeployerResult<DeclareResult> {
        let declare = self.send_declaration(payload).await?;
        self.wait_for_receipt(declare.transaction_hash).await?;

        Ok(declare)
    }
}
