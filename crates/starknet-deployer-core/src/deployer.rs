use std::sync::Arc;

use starknet_rs_core::types::Felt;
use tracing::{debug, error, info};

use crate::account::AccountHandle;
use crate::artifacts::{CompiledArtifact, ContractArtifact, DeclareAndDeployPayload, DeclarePayload};
use crate::error::{DeployerError, DeployerResult};
use crate::hashes::{ClassHashExtractor, SierraClassHashExtractor};
use crate::in_flight::InFlightDeclarations;
use crate::outcome::{DeclarationStatus, DeploymentOutcome};
use crate::progress::{Progress, ProgressSink};
use crate::provider::{JsonRpcProviderResolver, Network, NetworkProvider, ProviderResolver};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployerConfig {
    /// Network on which classes are looked up and declared.
    pub network: Network,
}

/// Declares contract classes, and optionally deploys them, on one network. A class found already
/// declared is never submitted again.
pub struct Deployer<R = JsonRpcProviderResolver, E = SierraClassHashExtractor> {
    resolver: R,
    extractor: E,
    network: Network,
    in_flight: InFlightDeclarations,
}

impl Default for Deployer {
    fn default() -> Self {
        Self::new(
            JsonRpcProviderResolver::default(),
            SierraClassHashExtractor,
            DeployerConfig::default(),
        )
    }
}

impl<R, E> Deployer<R, E>
where
    R: ProviderResolver,
    E: ClassHashExtractor,
{
    pub fn new(resolver: R, extractor: E, config: DeployerConfig) -> Self {
        Self { resolver, extractor, network: config.network, in_flight: InFlightDeclarations::new() }
    }

    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    fn resolve_provider(&self) -> DeployerResult<Arc<dyn NetworkProvider>> {
        self.resolver
            .resolve(&self.network)
            .ok_or_else(|| DeployerError::ProviderNotFound { network: self.network.clone() })
    }

    /// Declares the class of `contract` and deploys an instance of it with
    /// `constructor_calldata`, in one account submission.
    ///
    /// If the class is already declared, nothing is submitted and no contract is deployed: the
    /// outcome carries the class hash and no contract address.
    pub async fn declare_and_deploy<A>(
        &self,
        account: Option<&A>,
        contract: &ContractArtifact,
        casm: &CompiledArtifact,
        constructor_calldata: &[Felt],
    ) -> DeployerResult<DeploymentOutcome>
    where
        A: AccountHandle + ?Sized,
    {
        let result =
            self.try_declare_and_deploy(account, contract, casm, constructor_calldata).await;
        if let Err(err) = &result {
            error!("Declare and deploy failed: {err}");
        }
        debug!("Declare and deploy done");

        result
    }

    async fn try_declare_and_deploy<A>(
        &self,
        account: Option<&A>,
        contract: &ContractArtifact,
        casm: &CompiledArtifact,
        constructor_calldata: &[Felt],
    ) -> DeployerResult<DeploymentOutcome>
    where
        A: AccountHandle + ?Sized,
    {
        let account = account.ok_or(DeployerError::AccountNotConnected)?;
        let payload = DeclareAndDeployPayload::new(
            contract.clone(),
            casm.clone(),
            constructor_calldata.to_vec(),
        );

        let provider = self.resolve_provider()?;
        let hashes = self.extractor.extract(&payload.to_declare_payload())?;

        let slot = self.in_flight.acquire(hashes.class_hash).await;
        if slot.is_declared() || provider.is_class_declared(&hashes).await? {
            info!("Contract already declared: {:#x}", hashes.class_hash);
            let mut outcome =
                DeploymentOutcome::new(DeclarationStatus::AlreadyDeclared, hashes.class_hash);
            outcome.compiled_class_hash = Some(hashes.compiled_class_hash);
            return Ok(outcome);
        }

        info!("Declaring and deploying class {:#x} on {}", hashes.class_hash, self.network);
        let result = account.declare_and_deploy(&payload).await?;
        slot.mark_declared();

        let mut outcome =
            DeploymentOutcome::new(DeclarationStatus::Declared, result.declare.class_hash);
        outcome.compiled_class_hash = Some(hashes.compiled_class_hash);
        outcome.contract_address = Some(result.deploy.contract_address);
        outcome.transaction_hash = Some(result.deploy.transaction_hash);

        Ok(outcome)
    }

    /// Declares the class of `contract` without deploying it. `progress` is told
    /// [`Progress::Declaring`] right before the declare transaction is sent.
    ///
    /// The ABI of the declared class is the one produced by the account's payload build, so the
    /// hashes match what the account actually submits.
    pub async fn declare_contract<A>(
        &self,
        account: Option<&A>,
        contract: &ContractArtifact,
        casm: &CompiledArtifact,
        progress: Option<&dyn ProgressSink>,
    ) -> DeployerResult<DeploymentOutcome>
    where
        A: AccountHandle + ?Sized,
    {
        let result = self.try_declare_contract(account, contract, casm, progress).await;
        if let Err(err) = &result {
            error!("Declare failed: {err}");
        }
        debug!("Declare done");

        result
    }

    async fn try_declare_contract<A>(
        &self,
        account: Option<&A>,
        contract: &ContractArtifact,
        casm: &CompiledArtifact,
        progress: Option<&dyn ProgressSink>,
    ) -> DeployerResult<DeploymentOutcome>
    where
        A: AccountHandle + ?Sized,
    {
        let account = account.ok_or(DeployerError::AccountNotConnected)?;
        let mut payload = DeclarePayload::new(contract.clone(), casm.clone());

        let built = account.build_declare_payload(&payload, true).await?;
        if let Some(abi) = built.contract.abi() {
            payload.contract.set_abi(abi.clone())?;
        }

        let hashes = self.extractor.extract(&payload)?;
        let provider = self.resolve_provider()?;

        let slot = self.in_flight.acquire(hashes.class_hash).await;
        if slot.is_declared() || provider.is_class_declared(&hashes).await? {
            info!("Contract already declared: {:#x}", hashes.class_hash);
            let mut outcome =
                DeploymentOutcome::new(DeclarationStatus::AlreadyDeclared, hashes.class_hash);
            outcome.compiled_class_hash = Some(hashes.compiled_class_hash);
            outcome.contract = Some(hashes.contract);
            outcome.casm = Some(hashes.casm);
            return Ok(outcome);
        }

        info!("Declaring class {:#x} on {}", hashes.class_hash, self.network);
        if let Some(progress) = progress {
            progress.report(Progress::Declaring);
        }
        let result = account.declare(&payload).await?;
        slot.mark_declared();

        let mut outcome = DeploymentOutcome::new(DeclarationStatus::Declared, result.class_hash);
        outcome.compiled_class_hash = Some(hashes.compiled_class_hash);
        outcome.transaction_hash = Some(result.transaction_hash);
        outcome.contract = Some(hashes.contract);
        outcome.casm = Some(hashes.casm);

        Ok(outcome)
    }
}
