use deployer_core::hashes::ContractHashes;
use deployer_core::provider::{
    JsonRpcProviderResolver, Network, NetworkProvider, ProviderResolver, RpcNetworkProvider,
};
use deployer_core::utils::test_utils::{
    dummy_compiled_artifact, dummy_contract_artifact, FixedHashExtractor, MockAccount,
    DUMMY_CLASS_HASH, DUMMY_COMPILED_CLASS_HASH,
};
use deployer_core::{DeclarationStatus, Deployer, DeployerConfig, DeployerError, ErrorKind};
use serde_json::json;
use starknet_rs_core::types::StarknetError;
use starknet_rs_providers::jsonrpc::HttpTransport;
use starknet_rs_providers::{JsonRpcClient, ProviderError};

use crate::common::background_rpc::{BackgroundRpc, RpcReply};

const CLASS_HASH_NOT_FOUND: RpcReply =
    RpcReply::Error { code: 28, message: "Class hash not found" };

fn dummy_hashes() -> ContractHashes {
    ContractHashes {
        class_hash: DUMMY_CLASS_HASH,
        compiled_class_hash: DUMMY_COMPILED_CLASS_HASH,
        contract: dummy_contract_artifact(),
        casm: dummy_compiled_artifact(),
    }
}

fn rpc_provider(rpc: &BackgroundRpc) -> RpcNetworkProvider<JsonRpcClient<HttpTransport>> {
    RpcNetworkProvider::new(JsonRpcClient::new(HttpTransport::new(rpc.url.clone())))
}

#[tokio::test]
async fn unknown_class_hash_is_not_declared() {
    let rpc = BackgroundRpc::spawn(CLASS_HASH_NOT_FOUND).await.unwrap();

    let declared = rpc_provider(&rpc).is_class_declared(&dummy_hashes()).await.unwrap();

    assert!(!declared);
    assert_eq!(rpc.received_methods(), vec!["starknet_getClass"]);
}

#[tokio::test]
async fn class_is_looked_up_in_the_pre_confirmed_block() {
    let rpc = BackgroundRpc::spawn(CLASS_HASH_NOT_FOUND).await.unwrap();

    rpc_provider(&rpc).is_class_declared(&dummy_hashes()).await.unwrap();

    let params = rpc.received_params();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0]["block_id"], json!("pre_confirmed"));
    assert_eq!(params[0]["class_hash"], json!("0xabc"));
}

#[tokio::test]
async fn returned_class_is_declared() {
    let rpc = BackgroundRpc::spawn(RpcReply::Result(json!({
        "sierra_program": ["0x1", "0x2"],
        "contract_class_version": "0.1.0",
        "entry_points_by_type": { "CONSTRUCTOR": [], "EXTERNAL": [], "L1_HANDLER": [] },
        "abi": "[]"
    })))
    .await
    .unwrap();

    assert!(rpc_provider(&rpc).is_class_declared(&dummy_hashes()).await.unwrap());
}

#[tokio::test]
async fn other_node_errors_are_propagated() {
    let rpc = BackgroundRpc::spawn(RpcReply::Error { code: 24, message: "Block not found" })
        .await
        .unwrap();

    match rpc_provider(&rpc).is_class_declared(&dummy_hashes()).await {
        Err(err @ DeployerError::Provider(ProviderError::StarknetError(
            StarknetError::BlockNotFound,
        ))) => assert_eq!(err.kind(), ErrorKind::Transport),
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn resolver_uses_configured_endpoint() {
    let rpc = BackgroundRpc::spawn(CLASS_HASH_NOT_FOUND).await.unwrap();
    let resolver = JsonRpcProviderResolver::empty().with_endpoint(Network::Devnet, rpc.url.clone());

    assert!(resolver.resolve(&Network::Sepolia).is_none());

    let provider = resolver.resolve(&Network::Devnet).unwrap();
    assert!(!provider.is_class_declared(&dummy_hashes()).await.unwrap());
    assert_eq!(rpc.received_methods().len(), 1);
}

#[tokio::test]
async fn deployer_declares_class_unknown_to_the_node() {
    let rpc = BackgroundRpc::spawn(CLASS_HASH_NOT_FOUND).await.unwrap();
    let deployer = Deployer::new(
        JsonRpcProviderResolver::empty().with_endpoint(Network::Devnet, rpc.url.clone()),
        FixedHashExtractor::default(),
        DeployerConfig { network: Network::Devnet },
    );
    let account = MockAccount::new(DUMMY_CLASS_HASH);

    let outcome = deployer
        .declare_contract(Some(&account), &dummy_contract_artifact(), &dummy_compiled_artifact(), None)
        .await
        .unwrap();

    assert_eq!(outcome.status, DeclarationStatus::Declared);
    assert_eq!(account.declare_calls(), 1);
    assert_eq!(rpc.received_methods(), vec!["starknet_getClass"]);
}
