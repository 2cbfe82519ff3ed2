use std::sync::Arc;
use std::time::Duration;

use deployer_core::utils::test_utils::{
    dummy_compiled_artifact, dummy_contract_artifact, MockProvider,
};
use deployer_core::{DeclarationStatus, Network};

use crate::common::utils::{connected_account, deployer_with_provider, setup, TestDeployer};

const SUBMISSION_DELAY: Duration = Duration::from_millis(50);
const VISIBILITY_DELAY: Duration = Duration::from_millis(100);
const START_OFFSET: Duration = Duration::from_millis(10);

/// Deployer whose provider reports declarations only after [`VISIBILITY_DELAY`].
fn setup_with_slow_provider() -> (TestDeployer, Arc<MockProvider>) {
    let provider = Arc::new(MockProvider::with_visibility_delay(VISIBILITY_DELAY));
    (deployer_with_provider(provider.clone(), Network::Sepolia), provider)
}

#[tokio::test]
async fn concurrent_declarations_of_one_class_submit_once() {
    let (deployer, provider) = setup();
    let account = connected_account(&provider).with_submission_delay(SUBMISSION_DELAY);
    let (contract, casm) = (dummy_contract_artifact(), dummy_compiled_artifact());

    let (first, second) = futures::join!(
        deployer.declare_contract(Some(&account), &contract, &casm, None),
        deployer.declare_contract(Some(&account), &contract, &casm, None),
    );

    let mut statuses = vec![first.unwrap().status, second.unwrap().status];
    statuses.sort_by_key(|status| *status == DeclarationStatus::AlreadyDeclared);

    assert_eq!(statuses, vec![DeclarationStatus::Declared, DeclarationStatus::AlreadyDeclared]);
    assert_eq!(account.declare_calls(), 1);
    // the second caller knows the class from the first one's declaration
    assert_eq!(provider.queries(), 1);
}

#[tokio::test]
async fn concurrent_deployments_of_one_class_declare_once() {
    let (deployer, provider) = setup();
    let account = connected_account(&provider).with_submission_delay(SUBMISSION_DELAY);
    let (contract, casm) = (dummy_contract_artifact(), dummy_compiled_artifact());

    let results = futures::future::join_all(
        (0..3).map(|_| deployer.declare_and_deploy(Some(&account), &contract, &casm, &[])),
    )
    .await;

    let deployed = results
        .iter()
        .filter(|result| result.as_ref().unwrap().contract_address.is_some())
        .count();

    assert_eq!(deployed, 1);
    assert_eq!(account.declare_and_deploy_calls(), 1);
}

#[tokio::test]
async fn failed_declaration_lets_the_next_caller_retry() {
    let (deployer, provider) = setup();
    let failing_account = connected_account(&provider)
        .rejecting_submissions()
        .with_submission_delay(SUBMISSION_DELAY);
    let account = connected_account(&provider);
    let (contract, casm) = (dummy_contract_artifact(), dummy_compiled_artifact());

    let (failed, declared) = futures::join!(
        deployer.declare_contract(Some(&failing_account), &contract, &casm, None),
        async {
            tokio::time::sleep(SUBMISSION_DELAY / 5).await;
            deployer.declare_contract(Some(&account), &contract, &casm, None).await
        },
    );

    assert!(failed.is_err());
    assert_eq!(declared.unwrap().status, DeclarationStatus::Declared);
    assert_eq!(account.declare_calls(), 1);
}

#[tokio::test]
async fn declaration_not_yet_visible_on_the_network_is_not_repeated() {
    let (deployer, provider) = setup_with_slow_provider();
    let account = connected_account(&provider);
    let (contract, casm) = (dummy_contract_artifact(), dummy_compiled_artifact());

    let (first, second) = futures::join!(
        deployer.declare_contract(Some(&account), &contract, &casm, None),
        async {
            tokio::time::sleep(START_OFFSET).await;
            deployer.declare_contract(Some(&account), &contract, &casm, None).await
        },
    );

    assert_eq!(first.unwrap().status, DeclarationStatus::Declared);
    assert_eq!(second.unwrap().status, DeclarationStatus::AlreadyDeclared);
    assert_eq!(account.declare_calls(), 1);
}

#[tokio::test]
async fn deployment_not_yet_visible_on_the_network_is_not_repeated() {
    let (deployer, provider) = setup_with_slow_provider();
    let account = connected_account(&provider);
    let (contract, casm) = (dummy_contract_artifact(), dummy_compiled_artifact());

    let (first, second) = futures::join!(
        deployer.declare_and_deploy(Some(&account), &contract, &casm, &[]),
        async {
            tokio::time::sleep(START_OFFSET).await;
            deployer.declare_and_deploy(Some(&account), &contract, &casm, &[]).await
        },
    );

    let (first, second) = (first.unwrap(), second.unwrap());
    assert_eq!(first.status, DeclarationStatus::Declared);
    assert!(first.contract_address.is_some());
    assert_eq!(second.status, DeclarationStatus::AlreadyDeclared);
    assert_eq!(second.contract_address, None);
    assert_eq!(account.declare_and_deploy_calls(), 1);
}

#[tokio::test]
async fn sequential_declarations_do_not_depend_on_network_visibility() {
    let (deployer, provider) = setup_with_slow_provider();
    let account = connected_account(&provider);
    let (contract, casm) = (dummy_contract_artifact(), dummy_compiled_artifact());

    let first = deployer.declare_contract(Some(&account), &contract, &casm, None).await.unwrap();
    let second = deployer.declare_contract(Some(&account), &contract, &casm, None).await.unwrap();

    assert_eq!(first.status, DeclarationStatus::Declared);
    assert_eq!(second.status, DeclarationStatus::AlreadyDeclared);
    assert_eq!(second.compiled_class_hash, first.compiled_class_hash);
    assert_eq!(account.declare_calls(), 1);
    assert_eq!(provider.queries(), 1);
}
