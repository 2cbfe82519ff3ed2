use clap::Parser;
use cli::{Args, Command, CommonArgs};
use deployer_core::hashes::SierraClassHashExtractor;
use deployer_core::{
    CompiledArtifact, ContractArtifact, DeclarationStatus, Deployer, DeploymentOutcome, Progress,
    StarknetAccount,
};
use starknet_rs_accounts::{ExecutionEncoding, SingleOwnerAccount};
use starknet_rs_providers::jsonrpc::HttpTransport;
use starknet_rs_providers::{JsonRpcClient, Provider};
use starknet_rs_signers::{LocalWallet, SigningKey};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cli;

type RpcAccount = SingleOwnerAccount<JsonRpcClient<HttpTransport>, LocalWallet>;

/// Configures tracing with default level INFO,
/// If the environment variable `RUST_LOG` is set, it will be used instead.
fn configure_tracing() {
    let level_filter_layer =
        EnvFilter::builder().with_default_directive(tracing::Level::INFO.into()).from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(level_filter_layer).init();
}

fn load_artifacts(args: &CommonArgs) -> Result<(ContractArtifact, CompiledArtifact), anyhow::Error> {
    let contract = ContractArtifact::from_path(&args.contract)?;
    let casm = match &args.casm {
        Some(path) => CompiledArtifact::from_path(path)?,
        None => {
            info!("Compiling {} to CASM", args.contract.display());
            let casm_json = usc::compile_contract(contract.as_value().clone())
                .map_err(|err| anyhow::anyhow!("Sierra compilation failed: {err}"))?;
            CompiledArtifact::from_value(casm_json)?
        }
    };

    Ok((contract, casm))
}

async fn connect_account(args: &CommonArgs) -> Result<RpcAccount, anyhow::Error> {
    let provider = JsonRpcClient::new(HttpTransport::new(args.endpoint()?));
    let chain_id = provider.chain_id().await?;
    let signer = LocalWallet::from(SigningKey::from_secret_scalar(args.private_key));

    Ok(SingleOwnerAccount::new(
        provider,
        signer,
        args.account_address,
        chain_id,
        ExecutionEncoding::New,
    ))
}

fn print_outcome(outcome: &DeploymentOutcome, json: bool) -> Result<(), anyhow::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    match outcome.status {
        DeclarationStatus::Declared => println!("Class declared"),
        DeclarationStatus::AlreadyDeclared => println!("Class already declared"),
    }
    println!("Class hash: {:#x}", outcome.class_hash);
    if let Some(compiled_class_hash) = outcome.compiled_class_hash {
        println!("Compiled class hash: {compiled_class_hash:#x}");
    }
    if let Some(contract_address) = outcome.contract_address {
        println!("Contract address: {contract_address:#x}");
    }
    if let Some(transaction_hash) = outcome.transaction_hash {
        println!("Transaction hash: {transaction_hash:#x}");
    }

    Ok(())
}

async fn run(command: Command) -> Result<DeploymentOutcome, anyhow::Error> {
    let common = command.common();
    let (contract, casm) = load_artifacts(common)?;
    let deployer =
        Deployer::new(common.provider_resolver(), SierraClassHashExtractor, common.to_config());
    let account = StarknetAccount::new(connect_account(common).await?);

    let outcome = match &command {
        Command::Declare(_) => {
            let progress = |progress: Progress| info!("Status: {progress}");
            deployer.declare_contract(Some(&account), &contract, &casm, Some(&progress)).await?
        }
        Command::Deploy(deploy) => {
            let account = match deploy.salt {
                Some(salt) => account.with_salt(salt),
                None => account,
            };
            deployer.declare_and_deploy(Some(&account), &contract, &casm, &deploy.calldata).await?
        }
    };

    Ok(outcome)
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    configure_tracing();

    let args = Args::parse();
    let json = args.command.common().json;

    tokio::select! {
        outcome = run(args.command) => print_outcome(&outcome?, json),
        signal = tokio::signal::ctrl_c() => {
            signal?;
            warn!("Interrupted; a submitted transaction may still be accepted by the network");
            Ok(())
        }
    }
}
