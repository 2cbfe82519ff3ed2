pub mod test_utils {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use starknet_rs_core::types::{Felt, StarknetError};
    use starknet_rs_providers::ProviderError;
    use tokio::time::Instant;

    use crate::account::{AccountHandle, DeclareAndDeployResult, DeclareResult, DeployResult};
    use crate::artifacts::{
        CompiledArtifact, ContractArtifact, DeclareAndDeployPayload, DeclarePayload,
    };
    use crate::error::{DeployerError, DeployerResult};
    use crate::hashes::{ClassHashExtractor, ContractHashes};
    use crate::provider::{Network, NetworkProvider, ProviderResolver};

    pub const DUMMY_CLASS_HASH: Felt = Felt::from_hex_unchecked("0xabc");
    pub const DUMMY_COMPILED_CLASS_HASH: Felt = Felt::from_hex_unchecked("0xc0de");
    pub const DUMMY_CONTRACT_ADDRESS: Felt = Felt::from_hex_unchecked("0xdd10");
    pub const DUMMY_DECLARE_TX_HASH: Felt = Felt::from_hex_unchecked("0xde1");
    pub const DUMMY_DEPLOY_TX_HASH: Felt = Felt::from_hex_unchecked("0xde2");

    /// Ordered record of what the doubles were asked to do, shared between them.
    pub type Journal = Arc<Mutex<Vec<String>>>;

    #[allow(clippy::unwrap_used)]
    pub fn dummy_contract_artifact() -> ContractArtifact {
        ContractArtifact::from_value(json!({
            "sierra_program": ["0x1", "0x2"],
            "contract_class_version": "0.1.0",
            "entry_points_by_type": { "EXTERNAL": [], "L1_HANDLER": [], "CONSTRUCTOR": [] },
            "abi": [],
        }))
        .unwrap()
    }

    #[allow(clippy::unwrap_used)]
    pub fn dummy_compiled_artifact() -> CompiledArtifact {
        CompiledArtifact::from_value(json!({
            "prime": "0x800000000000011000000000000000000000000000000000000000000000001",
            "compiler_version": "2.8.0",
            "bytecode": [],
            "entry_points_by_type": { "EXTERNAL": [], "L1_HANDLER": [], "CONSTRUCTOR": [] },
        }))
        .unwrap()
    }

    pub const BALANCE_SIERRA_PATH: &str =
        "../../contracts/test_artifacts/cairo1/balance/balance.sierra";
    pub const BALANCE_CASM_PATH: &str =
        "../../contracts/test_artifacts/cairo1/balance/balance.casm";

    /// Sierra and CASM artifacts of the balance contract.
    #[allow(clippy::unwrap_used)]
    pub fn balance_artifacts() -> (ContractArtifact, CompiledArtifact) {
        (
            ContractArtifact::from_path(BALANCE_SIERRA_PATH).unwrap(),
            CompiledArtifact::from_path(BALANCE_CASM_PATH).unwrap(),
        )
    }

    pub fn dummy_abi() -> Value {
        json!([{ "type": "function", "name": "increase_balance", "inputs": [], "outputs": [] }])
    }

    /// Returns preconfigured hashes for any payload.
    pub struct FixedHashExtractor {
        class_hash: Felt,
        compiled_class_hash: Felt,
        fail: bool,
        extracted: Mutex<Vec<DeclarePayload>>,
    }

    impl FixedHashExtractor {
        pub fn new(class_hash: Felt) -> Self {
            Self {
                class_hash,
                compiled_class_hash: DUMMY_COMPILED_CLASS_HASH,
                fail: false,
                extracted: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self { fail: true, ..Self::new(DUMMY_CLASS_HASH) }
        }

        /// Payloads hashed so far.
        pub fn extracted(&self) -> Vec<DeclarePayload> {
            self.extracted.lock().clone()
        }
    }

    impl Default for FixedHashExtractor {
        fn default() -> Self {
            Self::new(DUMMY_CLASS_HASH)
        }
    }

    impl ClassHashExtractor for FixedHashExtractor {
        fn extract(&self, payload: &DeclarePayload) -> DeployerResult<ContractHashes> {
            if self.fail {
                return Err(DeployerError::HashComputation { reason: "dummy failure".to_string() });
            }
            self.extracted.lock().push(payload.clone());

            Ok(ContractHashes {
                class_hash: self.class_hash,
                compiled_class_hash: self.compiled_class_hash,
                contract: payload.contract.clone(),
                casm: payload.casm.clone(),
            })
        }
    }

    /// In-memory set of declared classes. A class is reported only once its visibility delay
    /// has passed, like a node that has not yet built the block holding the declaration.
    #[derive(Default)]
    pub struct MockProvider {
        declared: Mutex<HashMap<Felt, Instant>>,
        visibility_delay: Duration,
        fail: bool,
        queries: AtomicUsize,
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_declared(class_hash: Felt) -> Self {
            let provider = Self::default();
            provider.mark_declared(class_hash);
            provider
        }

        pub fn failing() -> Self {
            Self { fail: true, ..Self::default() }
        }

        /// Classes marked declared from now on are reported only after `delay`.
        pub fn with_visibility_delay(delay: Duration) -> Self {
            Self { visibility_delay: delay, ..Self::default() }
        }

        pub fn mark_declared(&self, class_hash: Felt) {
            self.declared.lock().insert(class_hash, Instant::now() + self.visibility_delay);
        }

        pub fn queries(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NetworkProvider for MockProvider {
        async fn is_class_declared(&self, hashes: &ContractHashes) -> DeployerResult<bool> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::StarknetError(StarknetError::BlockNotFound).into());
            }

            let visible_at = self.declared.lock().get(&hashes.class_hash).copied();
            Ok(visible_at.is_some_and(|visible_at| visible_at <= Instant::now()))
        }
    }

    /// Resolves every network to the same provider, or to none.
    pub struct MockResolver {
        provider: Option<Arc<MockProvider>>,
        resolved: Mutex<Vec<Network>>,
    }

    impl MockResolver {
        pub fn new(provider: Arc<MockProvider>) -> Self {
            Self { provider: Some(provider), resolved: Mutex::new(Vec::new()) }
        }

        pub fn unresolvable() -> Self {
            Self { provider: None, resolved: Mutex::new(Vec::new()) }
        }

        /// Networks asked for so far.
        pub fn resolved(&self) -> Vec<Network> {
            self.resolved.lock().clone()
        }
    }

    impl ProviderResolver for MockResolver {
        fn resolve(&self, network: &Network) -> Option<Arc<dyn NetworkProvider>> {
            self.resolved.lock().push(network.clone());
            self.provider.clone().map(|provider| provider as Arc<dyn NetworkProvider>)
        }
    }

    /// Account that records submissions and declares into a [`MockProvider`].
    pub struct MockAccount {
        class_hash: Felt,
        provider: Option<Arc<MockProvider>>,
        abi: Option<Value>,
        fail_submission: bool,
        submission_delay: Option<Duration>,
        journal: Journal,
        built: AtomicUsize,
        declared: AtomicUsize,
        declared_and_deployed: AtomicUsize,
        declared_payloads: Mutex<Vec<DeclarePayload>>,
    }

    impl MockAccount {
        pub fn new(class_hash: Felt) -> Self {
            Self {
                class_hash,
                provider: None,
                abi: None,
                fail_submission: false,
                submission_delay: None,
                journal: Journal::default(),
                built: AtomicUsize::new(0),
                declared: AtomicUsize::new(0),
                declared_and_deployed: AtomicUsize::new(0),
                declared_payloads: Mutex::new(Vec::new()),
            }
        }

        /// Submitted classes become visible through `provider`.
        pub fn declaring_into(mut self, provider: Arc<MockProvider>) -> Self {
            self.provider = Some(provider);
            self
        }

        /// ABI returned by `build_declare_payload`.
        pub fn with_abi(mut self, abi: Value) -> Self {
            self.abi = Some(abi);
            self
        }

        pub fn rejecting_submissions(mut self) -> Self {
            self.fail_submission = true;
            self
        }

        pub fn with_submission_delay(mut self, delay: Duration) -> Self {
            self.submission_delay = Some(delay);
            self
        }

        pub fn with_journal(mut self, journal: Journal) -> Self {
            self.journal = journal;
            self
        }

        pub fn build_calls(&self) -> usize {
            self.built.load(Ordering::SeqCst)
        }

        pub fn declare_calls(&self) -> usize {
            self.declared.load(Ordering::SeqCst)
        }

        pub fn declare_and_deploy_calls(&self) -> usize {
            self.declared_and_deployed.load(Ordering::SeqCst)
        }

        pub fn submissions(&self) -> usize {
            self.declare_calls() + self.declare_and_deploy_calls()
        }

        pub fn declared_payloads(&self) -> Vec<DeclarePayload> {
            self.declared_payloads.lock().clone()
        }

        async fn submit(&self, kind: &str) -> DeployerResult<()> {
            self.journal.lock().push(kind.to_string());
            if let Some(delay) = self.submission_delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_submission {
                return Err(DeployerError::Submission { reason: "dummy rejection".to_string() });
            }
            if let Some(provider) = &self.provider {
                provider.mark_declared(self.class_hash);
            }

            Ok(())
        }
    }

    #[async_trait]
    impl AccountHandle for MockAccount {
        async fn declare_and_deploy(
            &self,
            payload: &DeclareAndDeployPayload,
        ) -> DeployerResult<DeclareAndDeployResult> {
            self.declared_and_deployed.fetch_add(1, Ordering::SeqCst);
            self.declared_payloads.lock().push(payload.to_declare_payload());
            self.submit("declare_and_deploy").await?;

            Ok(DeclareAndDeployResult {
                declare: DeclareResult {
                    transaction_hash: DUMMY_DECLARE_TX_HASH,
                    class_hash: self.class_hash,
                },
                deploy: DeployResult {
                    transaction_hash: DUMMY_DEPLOY_TX_HASH,
                    contract_address: DUMMY_CONTRACT_ADDRESS,
                },
            })
        }

        async fn build_declare_payload(
            &self,
            payload: &DeclarePayload,
            _skip_validate: bool,
        ) -> DeployerResult<DeclarePayload> {
            self.built.fetch_add(1, Ordering::SeqCst);
            self.journal.lock().push("build_declare_payload".to_string());

            let mut built = payload.clone();
            if let Some(abi) = &self.abi {
                built.contract.set_abi(abi.clone())?;
            }

            Ok(built)
        }

        async fn declare(&self, payload: &DeclarePayload) -> DeployerResult<DeclareResult> {
            self.declared.fetch_add(1, Ordering::SeqCst);
            self.declared_payloads.lock().push(payload.clone());
            self.submit("declare").await?;

            Ok(DeclareResult { transaction_hash: DUMMY_DECLARE_TX_HASH, class_hash: self.class_hash })
        }
    }
}
