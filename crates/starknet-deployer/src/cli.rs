use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use deployer_core::{DeployerConfig, JsonRpcProviderResolver, Network};
use starknet_rs_core::types::Felt;
use url::Url;

/// Declare and deploy Starknet contract classes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Args {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Declare a contract class without deploying it
    Declare(CommonArgs),
    /// Declare a contract class if needed and deploy an instance of it
    Deploy(DeployArgs),
}

impl Command {
    pub(crate) fn common(&self) -> &CommonArgs {
        match self {
            Command::Declare(common) => common,
            Command::Deploy(deploy) => &deploy.common,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub(crate) struct CommonArgs {
    #[arg(long = "contract")]
    #[arg(value_name = "PATH")]
    #[arg(help = "Specify the path to the Sierra artifact of the contract;")]
    pub(crate) contract: PathBuf,

    #[arg(long = "casm")]
    #[arg(value_name = "PATH")]
    #[arg(help = "Specify the path to the compiled (CASM) artifact of the contract; if not \
                  provided, it is compiled from the Sierra artifact")]
    pub(crate) casm: Option<PathBuf>,

    #[arg(long = "network")]
    #[arg(env = "STARKNET_NETWORK")]
    #[arg(value_name = "NETWORK")]
    #[arg(default_value = "sepolia")]
    #[arg(help = "Specify the network: mainnet, sepolia, devnet or a custom name;")]
    pub(crate) network: Network,

    #[arg(long = "rpc-url")]
    #[arg(env = "STARKNET_RPC_URL")]
    #[arg(value_name = "URL")]
    #[arg(help = "Specify the JSON-RPC endpoint of the network; required for custom networks;")]
    pub(crate) rpc_url: Option<Url>,

    #[arg(long = "account-address")]
    #[arg(env = "STARKNET_ACCOUNT_ADDRESS")]
    #[arg(value_name = "ADDRESS")]
    #[arg(value_parser = parse_felt)]
    #[arg(help = "Specify the address of the account sending the transactions;")]
    pub(crate) account_address: Felt,

    #[arg(long = "private-key")]
    #[arg(env = "STARKNET_PRIVATE_KEY")]
    #[arg(hide_env_values = true)]
    #[arg(value_name = "PRIVATE_KEY")]
    #[arg(value_parser = parse_felt)]
    #[arg(help = "Specify the private key of the account;")]
    pub(crate) private_key: Felt,

    #[arg(long = "json")]
    #[arg(help = "Print the result as JSON;")]
    pub(crate) json: bool,
}

#[derive(ClapArgs, Debug)]
pub(crate) struct DeployArgs {
    #[command(flatten)]
    pub(crate) common: CommonArgs,

    #[arg(long = "calldata")]
    #[arg(value_name = "FELTS")]
    #[arg(value_delimiter = ',')]
    #[arg(value_parser = parse_felt)]
    #[arg(help = "Specify the constructor calldata as comma-separated felts;")]
    pub(crate) calldata: Vec<Felt>,

    #[arg(long = "salt")]
    #[arg(value_name = "SALT")]
    #[arg(value_parser = parse_felt)]
    #[arg(help = "Specify the deployment salt; if not provided, it is randomly generated")]
    pub(crate) salt: Option<Felt>,
}

/// Accepts 0x-prefixed hex or decimal.
fn parse_felt(value: &str) -> Result<Felt, String> {
    let parsed = if value.starts_with("0x") || value.starts_with("0X") {
        Felt::from_hex(value)
    } else {
        Felt::from_dec_str(value)
    };

    parsed.map_err(|err| format!("Invalid felt {value}: {err}"))
}

impl CommonArgs {
    pub(crate) fn to_config(&self) -> DeployerConfig {
        DeployerConfig { network: self.network.clone() }
    }

    /// Default endpoints, with the selected network pointed at `--rpc-url` if given.
    pub(crate) fn provider_resolver(&self) -> JsonRpcProviderResolver {
        let resolver = JsonRpcProviderResolver::default();
        match &self.rpc_url {
            Some(url) => resolver.with_endpoint(self.network.clone(), url.clone()),
            None => resolver,
        }
    }

    pub(crate) fn endpoint(&self) -> Result<Url, anyhow::Error> {
        self.provider_resolver().endpoint(&self.network).cloned().ok_or_else(|| {
            anyhow::anyhow!("No RPC endpoint known for network {}; use --rpc-url", self.network)
        })
    }
}
