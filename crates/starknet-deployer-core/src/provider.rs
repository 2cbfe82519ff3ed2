use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use starknet_rs_core::types::{BlockId, BlockTag, StarknetError};
use starknet_rs_providers::jsonrpc::HttpTransport;
use starknet_rs_providers::{JsonRpcClient, Provider, ProviderError};
use tracing::debug;
use url::Url;

use crate::constants::{
    DEVNET_DEFAULT_RPC_URL, MAINNET_DEFAULT_RPC_URL, SEPOLIA_DEFAULT_RPC_URL,
};
use crate::error::DeployerResult;
use crate::hashes::ContractHashes;

/// Network a class is declared on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Network {
    Mainnet,
    #[default]
    Sepolia,
    Devnet,
    Custom(String),
}

impl Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Sepolia => f.write_str("sepolia"),
            Network::Devnet => f.write_str("devnet"),
            Network::Custom(name) => f.write_str(name),
        }
    }
}

impl FromStr for Network {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let network = match s.to_ascii_lowercase().as_str() {
            "mainnet" => Network::Mainnet,
            "sepolia" => Network::Sepolia,
            "devnet" => Network::Devnet,
            _ => Network::Custom(s.to_string()),
        };

        Ok(network)
    }
}

/// Read access to the declared classes of one network.
#[async_trait]
pub trait NetworkProvider: Send + Sync {
    async fn is_class_declared(&self, hashes: &ContractHashes) -> DeployerResult<bool>;
}

/// Returns the provider bound to a network, or `None` if the network is not reachable with the
/// current configuration.
pub trait ProviderResolver: Send + Sync {
    fn resolve(&self, network: &Network) -> Option<Arc<dyn NetworkProvider>>;
}

/// [`NetworkProvider`] backed by any starknet-rs provider.
pub struct RpcNetworkProvider<P> {
    inner: P,
}

impl<P> RpcNetworkProvider<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P> NetworkProvider for RpcNetworkProvider<P>
where
    P: Provider + Send + Sync,
{
    /// Looks the class up in the pre-confirmed block, so that a declaration accepted but not yet
    /// built into a block counts as declared.
    async fn is_class_declared(&self, hashes: &ContractHashes) -> DeployerResult<bool> {
        match self.inner.get_class(BlockId::Tag(BlockTag::PreConfirmed), hashes.class_hash).await {
            Ok(_) => Ok(true),
            Err(ProviderError::StarknetError(StarknetError::ClassHashNotFound)) => {
                debug!("Class {:#x} not found", hashes.class_hash);
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Resolves networks to JSON-RPC endpoints over HTTP.
#[derive(Debug, Clone)]
pub struct JsonRpcProviderResolver {
    endpoints: HashMap<Network, Url>,
}

impl JsonRpcProviderResolver {
    /// A resolver without any endpoint configured.
    pub fn empty() -> Self {
        Self { endpoints: HashMap::new() }
    }

    pub fn with_endpoint(mut self, network: Network, url: Url) -> Self {
        self.endpoints.insert(network, url);
        self
    }

    pub fn endpoint(&self, network: &Network) -> Option<&Url> {
        self.endpoints.get(network)
    }
}

impl Default for JsonRpcProviderResolver {
    fn default() -> Self {
        let mut resolver = Self::empty();
        for (network, url) in [
            (Network::Mainnet, MAINNET_DEFAULT_RPC_URL),
            (Network::Sepolia, SEPOLIA_DEFAULT_RPC_URL),
            (Network::Devnet, DEVNET_DEFAULT_RPC_URL),
        ] {
            if let Ok(url) = Url::parse(url) {
                resolver.endpoints.insert(network, url);
            }
        }

        resolver
    }
}

impl ProviderResolver for JsonRpcProviderResolver {
    fn resolve(&self, network: &Network) -> Option<Arc<dyn NetworkProvider>> {
        let url = self.endpoints.get(network)?;
        let client = JsonRpcClient::new(HttpTransport::new(url.clone()));

        Some(Arc::new(RpcNetworkProvider::new(client)))
    }
}
